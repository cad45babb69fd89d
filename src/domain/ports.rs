use crate::domain::model::TransformResult;
use crate::domain::request::{MissingAttributePolicy, RouteRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn missing_attribute_policy(&self) -> MissingAttributePolicy;
    /// Used when a request does not carry its own `any_loanable` flag.
    fn default_any_loanable(&self) -> bool;
    fn json_filename(&self) -> &str {
        "routed.json"
    }
    fn csv_filename(&self) -> &str {
        "routed.csv"
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RouteRequest>>;
    async fn transform(&self, data: Vec<RouteRequest>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
