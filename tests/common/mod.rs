// Shared test helpers; not every item is used by every test binary.
#![allow(unused)]

use async_trait::async_trait;
use courtify::pipeline::{ChatPipeline, SummaryPipeline};
use courtify::services::{
    LanguageDetector, ReplyGenerator, SentimentResult, SentimentScorer, ServiceError,
    ServiceErrorKind, Summarizer, Translator,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// One call made to a mock service, in the order the pipeline made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Detect(String),
    Translate { text: String, target: String },
    Score(String),
    Generate(String),
    Summarize(String),
}

pub type CallLog = Arc<Mutex<Vec<RecordedCall>>>;

fn record(log: &CallLog, call: RecordedCall) {
    log.lock().unwrap().push(call);
}

pub fn calls(log: &CallLog) -> Vec<RecordedCall> {
    log.lock().unwrap().clone()
}

pub fn translate_calls(log: &CallLog) -> Vec<RecordedCall> {
    calls(log)
        .into_iter()
        .filter(|c| matches!(c, RecordedCall::Translate { .. }))
        .collect()
}

pub fn failure(kind: ServiceErrorKind, endpoint: &str) -> ServiceError {
    ServiceError::new(kind, endpoint, "injected failure")
}

pub struct MockDetector {
    pub log: CallLog,
    pub result: Result<String, ServiceError>,
}

#[async_trait]
impl LanguageDetector for MockDetector {
    async fn detect(&self, text: &str) -> Result<String, ServiceError> {
        record(&self.log, RecordedCall::Detect(text.to_string()));
        self.result.clone()
    }
}

/// Looks translations up in a fixed table; unknown pairs get a tagged echo.
pub struct MockTranslator {
    pub log: CallLog,
    pub table: Vec<(&'static str, &'static str, &'static str)>,
    pub fail_target: Option<(String, ServiceError)>,
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, ServiceError> {
        record(
            &self.log,
            RecordedCall::Translate {
                text: text.to_string(),
                target: target.to_string(),
            },
        );
        if let Some((fail, err)) = &self.fail_target
            && fail == target
        {
            return Err(err.clone());
        }
        Ok(self
            .table
            .iter()
            .find(|(src, to, _)| *src == text && *to == target)
            .map_or_else(|| format!("<{}> {}", target, text), |(_, _, out)| (*out).to_string()))
    }
}

pub struct MockScorer {
    pub log: CallLog,
    pub result: Result<SentimentResult, ServiceError>,
}

#[async_trait]
impl SentimentScorer for MockScorer {
    async fn score(&self, text: &str) -> Result<SentimentResult, ServiceError> {
        record(&self.log, RecordedCall::Score(text.to_string()));
        self.result.clone()
    }
}

pub struct MockGenerator {
    pub log: CallLog,
    pub result: Result<String, ServiceError>,
}

#[async_trait]
impl ReplyGenerator for MockGenerator {
    async fn generate(&self, text: &str) -> Result<String, ServiceError> {
        record(&self.log, RecordedCall::Generate(text.to_string()));
        self.result.clone()
    }
}

pub struct MockSummarizer {
    pub log: CallLog,
    pub result: Result<String, ServiceError>,
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, ServiceError> {
        record(&self.log, RecordedCall::Summarize(text.to_string()));
        self.result.clone()
    }
}

pub fn positive() -> SentimentResult {
    SentimentResult::from_payload(json!([[
        {"label": "positive", "score": 0.91},
        {"label": "neutral", "score": 0.07},
        {"label": "negative", "score": 0.02}
    ]]))
}

/// Knobs for [`chat_pipeline`]. Defaults describe a healthy set of services.
pub struct ChatOverrides {
    pub detected: Result<String, ServiceError>,
    pub table: Vec<(&'static str, &'static str, &'static str)>,
    pub translate_fail: Option<(String, ServiceError)>,
    pub sentiment: Result<SentimentResult, ServiceError>,
    pub reply: Result<String, ServiceError>,
}

impl Default for ChatOverrides {
    fn default() -> Self {
        Self {
            detected: Ok("en".to_string()),
            table: Vec::new(),
            translate_fail: None,
            sentiment: Ok(positive()),
            reply: Ok("I'm doing well, thanks for asking!".to_string()),
        }
    }
}

pub fn chat_pipeline(overrides: ChatOverrides) -> (ChatPipeline, CallLog) {
    let log: CallLog = Arc::default();
    let pipeline = ChatPipeline::new(
        Arc::new(MockDetector {
            log: log.clone(),
            result: overrides.detected,
        }),
        Arc::new(MockTranslator {
            log: log.clone(),
            table: overrides.table,
            fail_target: overrides.translate_fail,
        }),
        Arc::new(MockScorer {
            log: log.clone(),
            result: overrides.sentiment,
        }),
        Arc::new(MockGenerator {
            log: log.clone(),
            result: overrides.reply,
        }),
    );
    (pipeline, log)
}

pub fn summary_pipeline(result: Result<String, ServiceError>) -> (SummaryPipeline, CallLog) {
    let log: CallLog = Arc::default();
    let pipeline = SummaryPipeline::new(Arc::new(MockSummarizer {
        log: log.clone(),
        result,
    }));
    (pipeline, log)
}
