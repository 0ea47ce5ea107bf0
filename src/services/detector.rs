use crate::services::base::LanguageDetector;
use crate::services::client::{ServiceClient, ServiceEndpoint};
use crate::services::errors::ServiceError;
use async_trait::async_trait;
use serde_json::{Value, json};

/// Google's code for "could not tell".
const UNDETERMINED: &str = "und";

/// Language detection against the Google Translate v2 `detect` API.
pub struct GoogleLanguageDetector {
    client: ServiceClient,
    endpoint: ServiceEndpoint,
}

impl GoogleLanguageDetector {
    pub fn new(client: ServiceClient, endpoint: ServiceEndpoint) -> Self {
        Self { client, endpoint }
    }
}

/// `data.detections[0][0].language`, ignoring blank and undetermined codes.
pub(crate) fn parse_detection(json: &Value) -> Option<String> {
    let language = json["data"]["detections"][0][0]["language"].as_str()?.trim();
    if language.is_empty() || language.eq_ignore_ascii_case(UNDETERMINED) {
        return None;
    }
    Some(language.to_string())
}

#[async_trait]
impl LanguageDetector for GoogleLanguageDetector {
    async fn detect(&self, text: &str) -> Result<String, ServiceError> {
        let json = self.client.call(&self.endpoint, &json!({ "q": text })).await?;
        parse_detection(&json).ok_or_else(|| {
            ServiceError::schema(&self.endpoint.name, "no language in detection response")
        })
    }
}
