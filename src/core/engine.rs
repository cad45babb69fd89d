use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Runs a routing pipeline end to end: read the batch, route every request,
/// write the reports.
pub struct RoutingEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> RoutingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting routing batch");

        // Extract
        tracing::info!("📥 Reading requests...");
        let requests = self.pipeline.extract().await?;
        tracing::info!("📥 Read {} requests", requests.len());

        // Transform
        tracing::info!("🔀 Routing requests...");
        let result = self.pipeline.transform(requests).await?;
        tracing::info!("🔀 Routed {} requests", result.routed_records.len());
        if !result.rejected.is_empty() {
            tracing::warn!("⚠️ Rejected {} requests", result.rejected.len());
        }

        let mut counts: Vec<_> = result.tag_counts.iter().collect();
        counts.sort();
        for (tag, count) in counts {
            tracing::debug!("  {} -> {}", tag, count);
        }

        // Load
        tracing::info!("💾 Writing reports...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "💾 Output saved to: {} ({:?})",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RoutedRecord, TransformResult};
    use crate::domain::model::{Patron, PatronTier, ServiceTag};
    use crate::domain::request::{RequestableInput, RouteRequest};
    use crate::utils::error::RouterError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubPipeline {
        fail_extract: bool,
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<RouteRequest>> {
            if self.fail_extract {
                return Err(RouterError::ProcessingError {
                    message: "no batch".to_string(),
                });
            }
            Ok(vec![RouteRequest {
                id: "r-1".to_string(),
                requestable: RequestableInput {
                    aeon: Some(true),
                    ..Default::default()
                },
                patron: Patron::new(PatronTier::Cas),
                any_loanable: None,
            }])
        }

        async fn transform(&self, data: Vec<RouteRequest>) -> Result<TransformResult> {
            let routed_records = data
                .into_iter()
                .map(|r| RoutedRecord {
                    id: r.id,
                    patron_tier: r.patron.tier(),
                    any_loanable: false,
                    services: vec![ServiceTag::Aeon],
                })
                .collect();
            Ok(TransformResult {
                routed_records,
                rejected: Vec::new(),
                tag_counts: HashMap::from([(ServiceTag::Aeon, 1)]),
            })
        }

        async fn load(&self, result: TransformResult) -> Result<String> {
            self.loads.fetch_add(result.routed_records.len(), Ordering::SeqCst);
            Ok("out".to_string())
        }
    }

    #[test]
    fn test_run_executes_all_phases() {
        let engine = RoutingEngine::new(StubPipeline {
            fail_extract: false,
            loads: AtomicUsize::new(0),
        });
        let output = tokio_test::block_on(engine.run()).unwrap();
        assert_eq!(output, "out");
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_stops_on_extract_error() {
        let engine = RoutingEngine::new(StubPipeline {
            fail_extract: true,
            loads: AtomicUsize::new(0),
        });
        assert!(tokio_test::block_on(engine.run()).is_err());
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }
}
