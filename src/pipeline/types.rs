use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::errors::ErrorKind;
use crate::services::{SentimentResult, ServiceError, ServiceErrorKind};

/// Text flowing between stages. Stages emit new messages instead of mutating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
    language_code: Option<String>,
}

impl Message {
    /// Raw caller input; language not yet known.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_code: None,
        }
    }

    pub fn in_language(text: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language_code: Some(language_code.into()),
        }
    }

    /// Same text, tagged with `language_code`.
    #[must_use]
    pub fn with_language(&self, language_code: impl Into<String>) -> Self {
        Self::in_language(self.text.clone(), language_code)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }
}

/// Outcome of one chat turn. Nothing about it is stored server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurnResult {
    pub reply: String,
    #[serde(rename = "detectedLanguage")]
    pub detected_language: String,
    pub sentiment: SentimentResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
}

/// One external call within a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Detect,
    TranslateIn,
    ScoreSentiment,
    GenerateReply,
    TranslateOut,
    Summarize,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Detect => "detect",
            Self::TranslateIn => "translate_in",
            Self::ScoreSentiment => "score_sentiment",
            Self::GenerateReply => "generate_reply",
            Self::TranslateOut => "translate_out",
            Self::Summarize => "summarize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error result of a pipeline run: which stage failed and how.
#[derive(Debug, Clone, Error, Serialize)]
#[error("{stage} stage failed ({kind}): {message}")]
pub struct PipelineError {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
    /// Underlying service failure, for status mapping and logs.
    #[serde(skip)]
    pub service_kind: Option<ServiceErrorKind>,
}

impl PipelineError {
    pub fn from_service(stage: Stage, err: &ServiceError) -> Self {
        Self {
            stage,
            kind: err.category(),
            message: err.to_string(),
            service_kind: Some(err.kind),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.service_kind == Some(ServiceErrorKind::Timeout)
    }
}
