pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    eligibility::{EligibilityReport, EligibilityRule},
    engine::RoutingEngine,
    pipeline::BatchPipeline,
    router::Router,
};
pub use domain::model::{Holding, Patron, PatronTier, RejectedRequest, Requestable, ServiceTag};
pub use utils::error::{Result, RouterError};
