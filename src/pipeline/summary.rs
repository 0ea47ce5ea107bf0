use crate::pipeline::types::{PipelineError, Stage, SummaryResult};
use crate::services::Summarizer;
use std::sync::Arc;
use tracing::{debug, error};

/// Single-stage pipeline. Input is sent untranslated.
pub struct SummaryPipeline {
    summarizer: Arc<dyn Summarizer>,
}

impl SummaryPipeline {
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self { summarizer }
    }

    pub async fn run(&self, text: &str) -> Result<SummaryResult, PipelineError> {
        match self.summarizer.summarize(text).await {
            Ok(summary) => {
                debug!("summarize: {} -> {} chars", text.len(), summary.len());
                Ok(SummaryResult { summary })
            }
            Err(e) => {
                error!("{} stage failed: {}", Stage::Summarize, e);
                Err(PipelineError::from_service(Stage::Summarize, &e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::services::ServiceError;
    use async_trait::async_trait;

    struct Fixed(Result<String, ServiceError>);

    #[async_trait]
    impl Summarizer for Fixed {
        async fn summarize(&self, _text: &str) -> Result<String, ServiceError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_summary_ok() {
        let pipeline = SummaryPipeline::new(Arc::new(Fixed(Ok("short".into()))));
        let result = pipeline.run("a long document").await.unwrap();
        assert_eq!(result.summary, "short");
    }

    #[tokio::test]
    async fn test_no_candidates_is_schema_error() {
        let err = ServiceError::schema("summarizer", "no summary candidates in response");
        let pipeline = SummaryPipeline::new(Arc::new(Fixed(Err(err))));
        let err = pipeline.run("").await.unwrap_err();
        assert_eq!(err.stage, Stage::Summarize);
        assert_eq!(err.kind, ErrorKind::Schema);
    }
}
