use crate::services::base::Translator;
use crate::services::client::{ServiceClient, ServiceEndpoint};
use crate::services::errors::ServiceError;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Translation against the Google Translate v2 API.
///
/// The source language is left for the service to infer, so the same call
/// serves both directions of the chat pipeline.
pub struct GoogleTranslator {
    client: ServiceClient,
    endpoint: ServiceEndpoint,
}

impl GoogleTranslator {
    pub fn new(client: ServiceClient, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }
}

pub(crate) fn parse_translation(json: &Value) -> Option<String> {
    json["data"]["translations"][0]["translatedText"]
        .as_str()
        .map(ToString::to_string)
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError> {
        // "text" keeps the API from HTML-escaping apostrophes and ampersands
        let payload = json!({
            "q": text,
            "target": target_language,
            "format": "text",
        });
        let json = self.client.call(&self.endpoint, &payload).await?;
        parse_translation(&json).ok_or_else(|| {
            ServiceError::schema(&self.endpoint.name, "no translatedText in response")
        })
    }
}
