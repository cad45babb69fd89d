pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::{RoutingConfig, TomlConfig};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::request::MissingAttributePolicy;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "fulfillment-router")]
#[command(about = "Decide which fulfillment services apply to a batch of holding requests")]
pub struct CliConfig {
    /// JSON file with a top-level "requests" array
    #[arg(long, default_value = "requests.json")]
    pub input_path: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub output_formats: Vec<String>,

    /// falsy_default or fail_fast
    #[arg(long, default_value = "falsy_default")]
    pub missing_attributes: MissingAttributePolicy,

    /// Assume another copy of each record is loanable unless the request says otherwise
    #[arg(long)]
    pub any_loanable: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// TOML configuration file; when given it supplies the input, routing and output settings
    #[arg(long)]
    pub config: Option<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 --config 指定的 TOML 檔，--any-loanable 仍會覆蓋設定
    pub fn load_toml(&self) -> Result<Option<TomlConfig>> {
        let Some(path) = &self.config else {
            return Ok(None);
        };

        let mut config = TomlConfig::from_file(path)?;
        if self.any_loanable {
            config
                .routing
                .get_or_insert(RoutingConfig { any_loanable: None })
                .any_loanable = Some(true);
        }
        Ok(Some(config))
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn missing_attribute_policy(&self) -> MissingAttributePolicy {
        self.missing_attributes
    }

    fn default_any_loanable(&self) -> bool {
        self.any_loanable
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input_path", &self.input_path)?;
        validation::validate_file_extension("input_path", &self.input_path, &["json"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_one_of("output_formats", &self.output_formats, &["json", "csv"])?;
        Ok(())
    }
}
