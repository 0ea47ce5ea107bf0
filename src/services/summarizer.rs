use crate::services::base::Summarizer;
use crate::services::client::{ServiceClient, ServiceEndpoint};
use crate::services::errors::ServiceError;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Abstractive summarization on the Hugging Face inference API.
pub struct HuggingFaceSummarizer {
    client: ServiceClient,
    endpoint: ServiceEndpoint,
}

impl HuggingFaceSummarizer {
    pub fn new(client: ServiceClient, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }
}

/// First candidate's `summary_text`.
pub(crate) fn parse_summary(json: &Value) -> Option<String> {
    json.as_array()?
        .first()?
        .get("summary_text")?
        .as_str()
        .map(ToString::to_string)
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, pivot_text: &str) -> Result<String, ServiceError> {
        let json = self
            .client
            .call(&self.endpoint, &json!({ "inputs": pivot_text }))
            .await?;
        parse_summary(&json).ok_or_else(|| {
            ServiceError::schema(&self.endpoint.name, "no summary candidates in response")
        })
    }
}
