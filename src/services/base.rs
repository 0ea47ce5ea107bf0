use crate::services::errors::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `{label, score}` classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentimentScore {
    pub label: String,
    pub score: f64,
}

/// Sentiment metadata attached to a chat turn.
///
/// Upstream models disagree on shape (bare object, list, list of lists), so
/// anything that is not exactly one `{label, score}` object is kept verbatim.
/// Either way the value serializes back to what the model returned, so an
/// integer score (`1`, not `1.0`) stays raw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SentimentResult {
    Scored(SentimentScore),
    Raw(Value),
}

impl SentimentResult {
    pub fn from_payload(payload: Value) -> Self {
        if !payload.get("score").is_some_and(Value::is_f64) {
            return Self::Raw(payload);
        }
        match serde_json::from_value::<SentimentScore>(payload.clone()) {
            Ok(score) if (0.0..=1.0).contains(&score.score) => Self::Scored(score),
            _ => Self::Raw(payload),
        }
    }

    /// Highest-scoring label anywhere in the payload. Display only.
    pub fn top_label(&self) -> Option<(&str, f64)> {
        match self {
            Self::Scored(s) => Some((s.label.as_str(), s.score)),
            Self::Raw(value) => {
                let mut best = None;
                find_best_label(value, &mut best);
                best
            }
        }
    }
}

fn find_best_label<'a>(value: &'a Value, best: &mut Option<(&'a str, f64)>) {
    match value {
        Value::Array(items) => {
            for item in items {
                find_best_label(item, best);
            }
        }
        Value::Object(map) => {
            if let (Some(label), Some(score)) = (
                map.get("label").and_then(Value::as_str),
                map.get("score").and_then(Value::as_f64),
            ) && best.is_none_or(|(_, b)| score > b)
            {
                *best = Some((label, score));
            }
        }
        _ => {}
    }
}

/// Classifies the language of free text.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Returns the detected language code (e.g. "es").
    async fn detect(&self, text: &str) -> Result<String, ServiceError>;
}

/// Direction-agnostic translation. Callers skip identity translations.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, pivot_text: &str) -> Result<SentimentResult, ServiceError>;
}

/// Produces a single-turn conversational reply; no history is forwarded.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, pivot_text: &str) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, pivot_text: &str) -> Result<String, ServiceError>;
}
