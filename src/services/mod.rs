pub mod base;
pub mod client;
pub mod detector;
pub mod errors;
pub mod generator;
pub mod sentiment;
pub mod summarizer;
pub mod translator;

pub use base::{
    LanguageDetector, ReplyGenerator, SentimentResult, SentimentScore, SentimentScorer,
    Summarizer, Translator,
};
pub use client::{ServiceClient, ServiceEndpoint};
pub use detector::GoogleLanguageDetector;
pub use errors::{ServiceError, ServiceErrorKind};
pub use generator::HuggingFaceReplyGenerator;
pub use sentiment::HuggingFaceSentimentScorer;
pub use summarizer::HuggingFaceSummarizer;
pub use translator::GoogleTranslator;

use crate::config::{Config, ServiceKind};
use crate::errors::CourtifyError;
use std::sync::Arc;
use tracing::debug;

/// The five upstream wrappers, wired from one validated config.
#[derive(Clone)]
pub struct Services {
    pub detector: Arc<dyn LanguageDetector>,
    pub translator: Arc<dyn Translator>,
    pub sentiment: Arc<dyn SentimentScorer>,
    pub generator: Arc<dyn ReplyGenerator>,
    pub summarizer: Arc<dyn Summarizer>,
}

impl Services {
    /// Fails with a config error when any endpoint lacks a URL or credential.
    pub fn from_config(config: &Config) -> Result<Self, CourtifyError> {
        config.validate_services()?;

        let client = ServiceClient::new();
        let endpoint = |kind: ServiceKind| {
            let ep = config.services.endpoint(kind);
            debug!("{} endpoint: {}", ep.name, ep.url);
            ep
        };

        Ok(Self {
            detector: Arc::new(GoogleLanguageDetector::new(
                client.clone(),
                endpoint(ServiceKind::Detector),
            )),
            translator: Arc::new(GoogleTranslator::new(
                client.clone(),
                endpoint(ServiceKind::Translator),
            )),
            sentiment: Arc::new(HuggingFaceSentimentScorer::new(
                client.clone(),
                endpoint(ServiceKind::Sentiment),
            )),
            generator: Arc::new(HuggingFaceReplyGenerator::new(
                client.clone(),
                endpoint(ServiceKind::Generator),
            )),
            summarizer: Arc::new(HuggingFaceSummarizer::new(
                client,
                endpoint(ServiceKind::Summarizer),
            )),
        })
    }
}
