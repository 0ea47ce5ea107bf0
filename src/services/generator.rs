use crate::services::base::ReplyGenerator;
use crate::services::client::{ServiceClient, ServiceEndpoint};
use crate::services::errors::ServiceError;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Conversational text generation on the Hugging Face inference API.
pub struct HuggingFaceReplyGenerator {
    client: ServiceClient,
    endpoint: ServiceEndpoint,
}

impl HuggingFaceReplyGenerator {
    pub fn new(client: ServiceClient, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }
}

/// `generated_text` from either `{..}` or `[{..}, ..]`.
pub(crate) fn parse_generated_text(json: &Value) -> Option<String> {
    let candidate = match json {
        Value::Array(items) => items.first()?,
        other => other,
    };
    candidate
        .get("generated_text")?
        .as_str()
        .map(ToString::to_string)
}

#[async_trait]
impl ReplyGenerator for HuggingFaceReplyGenerator {
    async fn generate(&self, pivot_text: &str) -> Result<String, ServiceError> {
        let json = self
            .client
            .call(&self.endpoint, &json!({ "inputs": pivot_text }))
            .await?;
        parse_generated_text(&json).ok_or_else(|| {
            ServiceError::schema(&self.endpoint.name, "no generated_text in response")
        })
    }
}
