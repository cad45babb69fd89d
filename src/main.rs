use clap::Parser;
use fulfillment_router::core::ConfigProvider;
use fulfillment_router::utils::error::ErrorSeverity;
use fulfillment_router::utils::{logger, validation::Validate};
use fulfillment_router::{BatchPipeline, CliConfig, LocalStorage, RoutingEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting fulfillment-router CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 有 --config 時由 TOML 提供設定
    match cli.load_toml() {
        Ok(Some(config)) => {
            tracing::info!("📁 Loaded configuration from: {}", cli.config.as_deref().unwrap_or_default());
            run_batch(config).await;
        }
        Ok(None) => run_batch(cli).await,
        Err(e) => {
            tracing::error!("❌ Failed to load config file: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run_batch<C: ConfigProvider + Validate>(config: C) {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 路徑由設定決定，存儲以目前目錄為根
    let storage = LocalStorage::new(".".to_string());
    let pipeline = BatchPipeline::new(storage, config);
    let engine = RoutingEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Routing batch completed successfully!");
            println!("✅ Routing batch completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Routing batch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}
