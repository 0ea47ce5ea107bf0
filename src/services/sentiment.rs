use crate::services::base::{SentimentResult, SentimentScorer};
use crate::services::client::{ServiceClient, ServiceEndpoint};
use crate::services::errors::ServiceError;
use async_trait::async_trait;
use serde_json::json;

/// Text classification on the Hugging Face inference API.
pub struct HuggingFaceSentimentScorer {
    client: ServiceClient,
    endpoint: ServiceEndpoint,
}

impl HuggingFaceSentimentScorer {
    pub fn new(client: ServiceClient, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl SentimentScorer for HuggingFaceSentimentScorer {
    async fn score(&self, pivot_text: &str) -> Result<SentimentResult, ServiceError> {
        let json = self
            .client
            .call(&self.endpoint, &json!({ "inputs": pivot_text }))
            .await?;
        Ok(SentimentResult::from_payload(json))
    }
}
