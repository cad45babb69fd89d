pub mod eligibility;
pub mod engine;
pub mod pipeline;
pub mod router;

pub use crate::domain::model::{RoutedRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
