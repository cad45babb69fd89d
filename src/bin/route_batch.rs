use anyhow::{bail, Context, Result};
use clap::Parser;
use fulfillment_router::core::ConfigProvider;
use fulfillment_router::domain::request::RequestBatch;
use fulfillment_router::utils::{logger, validation::Validate};
use fulfillment_router::{
    BatchPipeline, EligibilityReport, LocalStorage, Router, RoutingEngine, TomlConfig,
};

#[derive(Parser)]
#[command(name = "route-batch")]
#[command(about = "Route a batch of holding requests using a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "route-batch.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the default any_loanable flag from config
    #[arg(long)]
    any_loanable: Option<bool>,

    /// Dry run - show the configuration and batch size without writing reports
    #[arg(long)]
    dry_run: bool,

    /// Print every eligibility rule's verdict for one request id and exit
    #[arg(long)]
    explain: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logging() {
        let level = if args.verbose { "debug" } else { config.log_level() };
        logger::init_json_logger(level);
    } else {
        logger::init_cli_logger(args.verbose || config.log_level() == "debug");
    }

    tracing::info!("🚀 Starting TOML-based routing batch");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(any_loanable) = args.any_loanable {
        config
            .routing
            .get_or_insert(fulfillment_router::config::toml_config::RoutingConfig { any_loanable: None })
            .any_loanable = Some(any_loanable);
        tracing::info!("🔧 any_loanable overridden to: {}", any_loanable);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if let Some(request_id) = &args.explain {
        explain_request(&config, request_id)?;
        return Ok(());
    }

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No reports will be written");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let storage = LocalStorage::new(".".to_string());
    let pipeline = BatchPipeline::new(storage, config);
    let engine = RoutingEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
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
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Batch: {} v{}", config.batch.name, config.batch.version);
    if let Some(description) = &config.batch.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Missing attributes: {:?}", config.missing_attribute_policy());
    println!("  Default any_loanable: {}", config.default_any_loanable());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn load_batch(config: &TomlConfig) -> Result<RequestBatch> {
    let data = std::fs::read(config.input_path())
        .with_context(|| format!("reading request batch {}", config.input_path()))?;
    serde_json::from_slice(&data).context("parsing request batch")
}

fn perform_dry_run(config: &TomlConfig) -> Result<()> {
    let batch = load_batch(config)?;
    let policy = config.missing_attribute_policy();

    println!("🔍 Dry Run Analysis:");
    println!("  Requests: {}", batch.requests.len());

    let rejected: Vec<String> = batch
        .requests
        .iter()
        .filter_map(|request| {
            request
                .requestable
                .clone()
                .into_requestable(&request.id, policy)
                .err()
                .map(|e| e.to_string())
        })
        .collect();

    if rejected.is_empty() {
        println!("  ✅ Every request passes the missing-attribute policy");
    } else {
        println!(
            "  ⚠️ {} requests would be rejected, the other {} would be routed:",
            rejected.len(),
            batch.requests.len() - rejected.len()
        );
        for reason in rejected {
            println!("    {}", reason);
        }
    }

    Ok(())
}

fn explain_request(config: &TomlConfig, request_id: &str) -> Result<()> {
    let batch = load_batch(config)?;
    let Some(request) = batch.requests.into_iter().find(|r| r.id == request_id) else {
        bail!("request '{}' not found in {}", request_id, config.input_path());
    };

    let any_loanable = request
        .any_loanable
        .unwrap_or_else(|| config.default_any_loanable());
    let requestable = request
        .requestable
        .into_requestable(&request.id, config.missing_attribute_policy())?;

    let report = EligibilityReport::evaluate(&requestable, &request.patron, any_loanable);
    let routed = Router::route(requestable, &request.patron, any_loanable);

    println!("🔎 Request {} ({})", request.id, request.patron.tier());
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!(
        "➡️  Routed services: [{}]",
        routed
            .services
            .iter()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> TomlConfig {
        let base = dir.path().to_string_lossy().replace('\\', "/");
        std::fs::write(
            dir.path().join("requests.json"),
            r#"{"requests": [{"id": "annex", "requestable": {"alma_managed": true, "annex": true}, "patron": {"tier": "cas"}}]}"#,
        )
        .unwrap();
        TomlConfig::from_toml_str(&format!(
            r#"
[batch]
name = "explain"
version = "1.0.0"

[input]
path = "{base}/requests.json"

[output]
path = "{base}/out"
formats = ["json"]
"#
        ))
        .unwrap()
    }

    #[test]
    fn test_explain_known_request() {
        let temp_dir = TempDir::new().unwrap();
        assert!(explain_request(&config_for(&temp_dir), "annex").is_ok());
    }

    #[test]
    fn test_explain_unknown_request_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = explain_request(&config_for(&temp_dir), "missing").unwrap_err();
        assert!(err.to_string().contains("request 'missing' not found"));
    }
}
