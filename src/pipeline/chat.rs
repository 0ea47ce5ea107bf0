use crate::pipeline::language::LanguagePolicy;
use crate::pipeline::types::{ChatTurnResult, Message, PipelineError, Stage};
use crate::services::{LanguageDetector, ReplyGenerator, SentimentScorer, Translator};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Detect, translate in, score, generate, translate out.
///
/// Stages run strictly in order and each consumes the previous stage's
/// output. Any failure after detection aborts the turn.
pub struct ChatPipeline {
    detector: Arc<dyn LanguageDetector>,
    translator: Arc<dyn Translator>,
    scorer: Arc<dyn SentimentScorer>,
    generator: Arc<dyn ReplyGenerator>,
    policy: LanguagePolicy,
}

impl ChatPipeline {
    pub fn new(
        detector: Arc<dyn LanguageDetector>,
        translator: Arc<dyn Translator>,
        scorer: Arc<dyn SentimentScorer>,
        generator: Arc<dyn ReplyGenerator>,
    ) -> Self {
        Self {
            detector,
            translator,
            scorer,
            generator,
            policy: LanguagePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_language_policy(mut self, policy: LanguagePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn run(&self, text: &str) -> Result<ChatTurnResult, PipelineError> {
        let started = Instant::now();
        let input = Message::new(text);

        let original = self.detect(&input).await;
        let detected_language = original.language_code().unwrap_or_default().to_string();
        let needs_translation = !self.policy.is_pivot(&detected_language);

        let pivot_input = if needs_translation {
            let translated = self
                .translator
                .translate(original.text(), self.policy.pivot())
                .await
                .map_err(|e| fail(Stage::TranslateIn, &e))?;
            debug!(
                "translate_in: {} -> {} ({} chars)",
                detected_language,
                self.policy.pivot(),
                translated.len()
            );
            Message::in_language(translated, self.policy.pivot())
        } else {
            debug!("translate_in: skipped, input already in {}", detected_language);
            original.with_language(self.policy.pivot())
        };

        let sentiment = self
            .scorer
            .score(pivot_input.text())
            .await
            .map_err(|e| fail(Stage::ScoreSentiment, &e))?;
        match sentiment.top_label() {
            Some((label, score)) => debug!("score_sentiment: {} ({:.3})", label, score),
            None => debug!("score_sentiment: unrecognized payload kept as-is"),
        }

        let pivot_reply = self
            .generator
            .generate(pivot_input.text())
            .await
            .map_err(|e| fail(Stage::GenerateReply, &e))?;
        debug!("generate_reply: {} chars", pivot_reply.len());

        let reply = if needs_translation {
            let translated = self
                .translator
                .translate(&pivot_reply, &detected_language)
                .await
                .map_err(|e| fail(Stage::TranslateOut, &e))?;
            debug!(
                "translate_out: {} -> {}",
                self.policy.pivot(),
                detected_language
            );
            translated
        } else {
            debug!("translate_out: skipped");
            pivot_reply
        };

        debug!(
            "chat turn completed in {}ms (language={})",
            started.elapsed().as_millis(),
            detected_language
        );

        Ok(ChatTurnResult {
            reply,
            detected_language,
            sentiment,
        })
    }

    /// Never fails: an unusable detection falls back to the policy language.
    async fn detect(&self, input: &Message) -> Message {
        match self.detector.detect(input.text()).await {
            Ok(code) => {
                debug!("detect: {}", code);
                input.with_language(code)
            }
            Err(e) => {
                warn!(
                    "detect failed ({}), falling back to {}: {}",
                    e.category(),
                    self.policy.fallback(),
                    e
                );
                input.with_language(self.policy.fallback())
            }
        }
    }
}

fn fail(stage: Stage, err: &crate::services::ServiceError) -> PipelineError {
    error!("{} stage failed: {}", stage, err);
    PipelineError::from_service(stage, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::services::{SentimentResult, ServiceError, ServiceErrorKind};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Calls(Mutex<Vec<String>>);

    impl Calls {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn take(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FixedDetector(Result<String, ServiceError>);

    #[async_trait]
    impl LanguageDetector for FixedDetector {
        async fn detect(&self, _text: &str) -> Result<String, ServiceError> {
            self.0.clone()
        }
    }

    /// Prefixes the target language, records every call.
    struct TaggingTranslator(Arc<Calls>);

    #[async_trait]
    impl Translator for TaggingTranslator {
        async fn translate(&self, text: &str, target: &str) -> Result<String, ServiceError> {
            self.0.push(format!("translate:{}:{}", target, text));
            Ok(format!("[{}] {}", target, text))
        }
    }

    struct RecordingScorer(Arc<Calls>);

    #[async_trait]
    impl SentimentScorer for RecordingScorer {
        async fn score(&self, text: &str) -> Result<SentimentResult, ServiceError> {
            self.0.push(format!("score:{}", text));
            Ok(SentimentResult::from_payload(
                json!({"label": "neutral", "score": 0.5}),
            ))
        }
    }

    struct RecordingGenerator(Arc<Calls>, Option<ServiceError>);

    #[async_trait]
    impl ReplyGenerator for RecordingGenerator {
        async fn generate(&self, text: &str) -> Result<String, ServiceError> {
            self.0.push(format!("generate:{}", text));
            match &self.1 {
                Some(err) => Err(err.clone()),
                None => Ok("reply".to_string()),
            }
        }
    }

    fn pipeline(
        detected: Result<String, ServiceError>,
        generator_error: Option<ServiceError>,
    ) -> (ChatPipeline, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let pipeline = ChatPipeline::new(
            Arc::new(FixedDetector(detected)),
            Arc::new(TaggingTranslator(calls.clone())),
            Arc::new(RecordingScorer(calls.clone())),
            Arc::new(RecordingGenerator(calls.clone(), generator_error)),
        );
        (pipeline, calls)
    }

    #[tokio::test]
    async fn test_pivot_input_skips_translation() {
        let (pipeline, calls) = pipeline(Ok("en".into()), None);
        let result = pipeline.run("Hello there").await.unwrap();
        assert_eq!(result.reply, "reply");
        assert_eq!(result.detected_language, "en");
        assert_eq!(
            calls.take(),
            vec!["score:Hello there", "generate:Hello there"]
        );
    }

    #[tokio::test]
    async fn test_region_tagged_pivot_skips_translation() {
        let (pipeline, calls) = pipeline(Ok("EN-us".into()), None);
        let result = pipeline.run("Howdy").await.unwrap();
        assert_eq!(result.detected_language, "EN-us");
        assert!(calls.take().iter().all(|c| !c.starts_with("translate")));
    }

    #[tokio::test]
    async fn test_foreign_input_round_trips() {
        let (pipeline, calls) = pipeline(Ok("es".into()), None);
        let result = pipeline.run("Hola").await.unwrap();
        assert_eq!(result.detected_language, "es");
        assert_eq!(result.reply, "[es] reply");
        assert_eq!(
            calls.take(),
            vec![
                "translate:en:Hola",
                "score:[en] Hola",
                "generate:[en] Hola",
                "translate:es:reply",
            ]
        );
    }

    #[tokio::test]
    async fn test_detection_failure_uses_fallback() {
        let err = ServiceError::new(ServiceErrorKind::Timeout, "detector", "deadline");
        let (pipeline, calls) = pipeline(Err(err), None);
        let pipeline =
            pipeline.with_language_policy(LanguagePolicy::new("en", Some("fr".into())));
        let result = pipeline.run("Bonjour").await.unwrap();
        assert_eq!(result.detected_language, "fr");
        assert_eq!(calls.take()[0], "translate:en:Bonjour");
    }

    #[tokio::test]
    async fn test_generator_failure_stops_before_translate_out() {
        let err = ServiceError::new(ServiceErrorKind::Status(503), "generator", "loading");
        let (pipeline, calls) = pipeline(Ok("es".into()), Some(err));
        let err = pipeline.run("Hola").await.unwrap_err();
        assert_eq!(err.stage, Stage::GenerateReply);
        assert_eq!(err.kind, ErrorKind::Upstream);
        assert!(calls.take().iter().all(|c| !c.starts_with("translate:es")));
    }
}
