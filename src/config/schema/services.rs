use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::services::ServiceEndpoint;

pub const DEFAULT_DETECTOR_URL: &str =
    "https://translation.googleapis.com/language/translate/v2/detect";
pub const DEFAULT_TRANSLATOR_URL: &str =
    "https://translation.googleapis.com/language/translate/v2";
pub const DEFAULT_SENTIMENT_URL: &str = "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment-latest";
pub const DEFAULT_GENERATOR_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/blenderbot-400M-distill";
pub const DEFAULT_SUMMARIZER_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

/// Upper bound accepted for `timeoutMs` (10 minutes).
pub const MAX_TIMEOUT_MS: u64 = 600_000;

fn default_timeout_ms() -> u64 {
    30_000
}

/// The five upstream services the pipelines call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Detector,
    Translator,
    Sentiment,
    Generator,
    Summarizer,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 5] = [
        Self::Detector,
        Self::Translator,
        Self::Sentiment,
        Self::Generator,
        Self::Summarizer,
    ];

    /// Config key and endpoint name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Detector => "detector",
            Self::Translator => "translator",
            Self::Sentiment => "sentiment",
            Self::Generator => "generator",
            Self::Summarizer => "summarizer",
        }
    }

    pub fn default_url(self) -> &'static str {
        match self {
            Self::Detector => DEFAULT_DETECTOR_URL,
            Self::Translator => DEFAULT_TRANSLATOR_URL,
            Self::Sentiment => DEFAULT_SENTIMENT_URL,
            Self::Generator => DEFAULT_GENERATOR_URL,
            Self::Summarizer => DEFAULT_SUMMARIZER_URL,
        }
    }

    /// Whether the service is hosted on Hugging Face inference.
    pub fn is_hugging_face(self) -> bool {
        matches!(self, Self::Sentiment | Self::Generator | Self::Summarizer)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Overrides the service's default URL when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, rename = "apiKey")]
    pub api_key: String,
    #[serde(default = "default_timeout_ms", rename = "timeoutMs")]
    pub timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("url", &self.url)
            .field(
                "api_key",
                &if self.api_key.is_empty() {
                    "[empty]"
                } else {
                    "[REDACTED]"
                },
            )
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ServiceConfig {
    pub fn resolved_url(&self, kind: ServiceKind) -> &str {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| kind.default_url())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicesConfig {
    #[serde(default)]
    pub detector: ServiceConfig,
    #[serde(default)]
    pub translator: ServiceConfig,
    #[serde(default)]
    pub sentiment: ServiceConfig,
    #[serde(default)]
    pub generator: ServiceConfig,
    #[serde(default)]
    pub summarizer: ServiceConfig,
}

impl ServicesConfig {
    pub fn get(&self, kind: ServiceKind) -> &ServiceConfig {
        match kind {
            ServiceKind::Detector => &self.detector,
            ServiceKind::Translator => &self.translator,
            ServiceKind::Sentiment => &self.sentiment,
            ServiceKind::Generator => &self.generator,
            ServiceKind::Summarizer => &self.summarizer,
        }
    }

    pub fn get_mut(&mut self, kind: ServiceKind) -> &mut ServiceConfig {
        match kind {
            ServiceKind::Detector => &mut self.detector,
            ServiceKind::Translator => &mut self.translator,
            ServiceKind::Sentiment => &mut self.sentiment,
            ServiceKind::Generator => &mut self.generator,
            ServiceKind::Summarizer => &mut self.summarizer,
        }
    }

    /// Immutable endpoint descriptor injected into the service wrapper.
    pub fn endpoint(&self, kind: ServiceKind) -> ServiceEndpoint {
        let svc = self.get(kind);
        ServiceEndpoint::bearer(
            kind.name(),
            svc.resolved_url(kind),
            &svc.api_key,
            svc.timeout(),
        )
    }
}
