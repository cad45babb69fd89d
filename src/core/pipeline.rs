use crate::core::router::Router;
use crate::core::{ConfigProvider, Pipeline, RoutedRecord, Storage, TransformResult};
use crate::domain::model::RejectedRequest;
use crate::domain::model::ServiceTag;
use crate::domain::request::{RequestBatch, RouteRequest};
use crate::utils::error::{Result, RouterError};
use serde::Serialize;
use std::collections::HashMap;

pub struct BatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

#[derive(Serialize)]
struct RoutedReport<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    total: usize,
    tag_counts: std::collections::BTreeMap<ServiceTag, usize>,
    records: &'a [RoutedRecord],
    rejected: &'a [RejectedRequest],
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    patron_tier: &'a str,
    any_loanable: bool,
    services: String,
}

impl<S: Storage, C: ConfigProvider> BatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn route_one(&self, request: RouteRequest) -> Result<RoutedRecord> {
        let any_loanable = request
            .any_loanable
            .unwrap_or_else(|| self.config.default_any_loanable());
        let requestable = request
            .requestable
            .into_requestable(&request.id, self.config.missing_attribute_policy())?;

        let routed = Router::route(requestable, &request.patron, any_loanable);
        tracing::debug!("Request {} -> {:?}", request.id, routed.services);

        Ok(RoutedRecord {
            id: request.id,
            patron_tier: request.patron.tier(),
            any_loanable,
            services: routed.services,
        })
    }

    fn render_json(&self, result: &TransformResult) -> Result<Vec<u8>> {
        let report = RoutedReport {
            generated_at: chrono::Utc::now(),
            total: result.routed_records.len(),
            tag_counts: result.tag_counts.iter().map(|(k, v)| (*k, *v)).collect(),
            records: &result.routed_records,
            rejected: &result.rejected,
        };
        Ok(serde_json::to_vec_pretty(&report)?)
    }

    fn render_csv(&self, result: &TransformResult) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &result.routed_records {
            writer.serialize(CsvRow {
                id: &record.id,
                patron_tier: record.patron_tier.as_str(),
                any_loanable: record.any_loanable,
                services: record
                    .services
                    .iter()
                    .map(ServiceTag::as_str)
                    .collect::<Vec<_>>()
                    .join("|"),
            })?;
        }
        writer.into_inner().map_err(|e| RouterError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BatchPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RouteRequest>> {
        tracing::debug!("Reading request batch from: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;
        let batch: RequestBatch = serde_json::from_slice(&data)?;

        if batch.requests.is_empty() {
            tracing::warn!("⚠️ Request batch is empty");
        }

        Ok(batch.requests)
    }

    async fn transform(&self, data: Vec<RouteRequest>) -> Result<TransformResult> {
        let mut routed_records = Vec::with_capacity(data.len());
        let mut rejected = Vec::new();
        let mut tag_counts: HashMap<ServiceTag, usize> = HashMap::new();

        for request in data {
            let id = request.id.clone();
            // 單筆缺欄位只剔除該筆，其餘照常路由
            let record = match self.route_one(request) {
                Ok(record) => record,
                Err(e @ RouterError::MissingAttributeError { .. }) => {
                    tracing::warn!("⚠️ Rejected request {}: {}", id, e);
                    rejected.push(RejectedRequest {
                        id,
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };
            if record.services.is_empty() {
                tracing::debug!("Request {} has no self-service option", record.id);
            }
            for tag in &record.services {
                *tag_counts.entry(*tag).or_insert(0) += 1;
            }
            routed_records.push(record);
        }

        Ok(TransformResult {
            routed_records,
            rejected,
            tag_counts,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path().trim_end_matches('/');
        let mut written = Vec::new();

        for format in self.config.output_formats() {
            let (filename, data) = match format.as_str() {
                "json" => (self.config.json_filename(), self.render_json(&result)?),
                "csv" => (self.config.csv_filename(), self.render_csv(&result)?),
                other => {
                    return Err(RouterError::InvalidConfigValueError {
                        field: "output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Valid formats: json, csv".to_string(),
                    })
                }
            };

            let path = format!("{}/{}", output_path, filename);
            tracing::debug!("Writing {} ({} bytes) to storage", path, data.len());
            self.storage.write_file(&path, &data).await?;
            written.push(path);
        }

        tracing::debug!("Wrote {}", written.join(", "));
        Ok(output_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::MissingAttributePolicy;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_input(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.get_file(path).await.ok_or_else(|| {
                RouterError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        output_formats: Vec<String>,
        policy: MissingAttributePolicy,
        default_any_loanable: bool,
    }

    impl MockConfig {
        fn new(policy: MissingAttributePolicy) -> Self {
            Self {
                output_formats: vec!["json".to_string(), "csv".to_string()],
                policy,
                default_any_loanable: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "requests.json"
        }

        fn output_path(&self) -> &str {
            "/tmp/routed"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn missing_attribute_policy(&self) -> MissingAttributePolicy {
            self.policy
        }

        fn default_any_loanable(&self) -> bool {
            self.default_any_loanable
        }
    }

    const BATCH: &str = r#"{
        "requests": [
            {"id": "online", "requestable": {"alma_managed": true, "online": true}, "patron": {"tier": "guest"}},
            {"id": "annex", "requestable": {"alma_managed": true, "annex": true}, "patron": {"tier": "cas"}},
            {"id": "charged", "requestable": {"alma_managed": true, "charged": true}, "patron": {"tier": "cas"}},
            {"id": "rare", "requestable": {"aeon": true}}
        ]
    }"#;

    #[tokio::test]
    async fn test_extract_reads_batch() {
        let storage = MockStorage::with_input("requests.json", BATCH);
        let pipeline = BatchPipeline::new(storage, MockConfig::new(MissingAttributePolicy::FalsyDefault));

        let requests = pipeline.extract().await.unwrap();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].id, "online");
    }

    #[tokio::test]
    async fn test_extract_missing_file_is_io_error() {
        let storage = MockStorage::with_input("other.json", BATCH);
        let pipeline = BatchPipeline::new(storage, MockConfig::new(MissingAttributePolicy::FalsyDefault));

        assert!(matches!(pipeline.extract().await, Err(RouterError::IoError(_))));
    }

    #[tokio::test]
    async fn test_transform_routes_and_counts() {
        let storage = MockStorage::with_input("requests.json", BATCH);
        let pipeline = BatchPipeline::new(storage, MockConfig::new(MissingAttributePolicy::FalsyDefault));

        let requests = pipeline.extract().await.unwrap();
        let result = pipeline.transform(requests).await.unwrap();

        let services: Vec<_> = result.routed_records.iter().map(|r| r.services.clone()).collect();
        assert_eq!(
            services,
            vec![
                vec![ServiceTag::Online],
                vec![ServiceTag::Annex, ServiceTag::OnShelfEdd],
                vec![ServiceTag::Ill],
                vec![ServiceTag::Aeon],
            ]
        );
        assert_eq!(result.tag_counts.get(&ServiceTag::OnShelfEdd), Some(&1));
        assert_eq!(result.tag_counts.get(&ServiceTag::OnShelf), None);
    }

    #[tokio::test]
    async fn test_transform_uses_default_any_loanable() {
        let storage = MockStorage::with_input("requests.json", BATCH);
        let mut config = MockConfig::new(MissingAttributePolicy::FalsyDefault);
        config.default_any_loanable = true;
        let pipeline = BatchPipeline::new(storage, config);

        let requests = pipeline.extract().await.unwrap();
        let result = pipeline.transform(requests).await.unwrap();
        let charged = &result.routed_records[2];
        assert!(charged.any_loanable);
        assert!(charged.services.is_empty());
    }

    #[tokio::test]
    async fn test_transform_fail_fast_rejects_only_incomplete_requests() {
        let batch = r#"{
            "requests": [
                {"id": "good", "requestable": {"alma_managed": true, "partner_holding": false, "online": true, "aeon": false}},
                {"id": "bad", "requestable": {"alma_managed": true}}
            ]
        }"#;
        let storage = MockStorage::with_input("requests.json", batch);
        let pipeline = BatchPipeline::new(storage.clone(), MockConfig::new(MissingAttributePolicy::FailFast));

        let requests = pipeline.extract().await.unwrap();
        let result = pipeline.transform(requests).await.unwrap();

        assert_eq!(result.routed_records.len(), 1);
        assert_eq!(result.routed_records[0].id, "good");
        assert_eq!(result.routed_records[0].services, vec![ServiceTag::Online]);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].id, "bad");
        assert!(result.rejected[0].reason.contains("partner_holding"));

        pipeline.load(result).await.unwrap();
        let json = storage.get_file("/tmp/routed/routed.json").await.unwrap();
        let report: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(report["total"], 1);
        assert_eq!(report["rejected"][0]["id"], "bad");
    }

    #[tokio::test]
    async fn test_load_writes_json_and_csv() {
        let storage = MockStorage::with_input("requests.json", BATCH);
        let pipeline = BatchPipeline::new(storage.clone(), MockConfig::new(MissingAttributePolicy::FalsyDefault));

        let requests = pipeline.extract().await.unwrap();
        let result = pipeline.transform(requests).await.unwrap();
        let output = pipeline.load(result).await.unwrap();
        assert_eq!(output, "/tmp/routed");

        let json = storage.get_file("/tmp/routed/routed.json").await.unwrap();
        let report: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(report["total"], 4);
        assert_eq!(report["records"][1]["services"], serde_json::json!(["annex", "on_shelf_edd"]));
        assert_eq!(report["tag_counts"]["aeon"], 1);

        let csv = String::from_utf8(storage.get_file("/tmp/routed/routed.csv").await.unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("id,patron_tier,any_loanable,services"));
        assert_eq!(lines.nth(1), Some("annex,cas,false,annex|on_shelf_edd"));
    }
}
