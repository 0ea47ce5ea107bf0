pub mod chat;
pub mod language;
pub mod summary;
pub mod types;

pub use chat::ChatPipeline;
pub use language::LanguagePolicy;
pub use summary::SummaryPipeline;
pub use types::{ChatTurnResult, Message, PipelineError, Stage, SummaryResult};

use crate::config::Config;
use crate::errors::CourtifyError;
use crate::services::Services;

/// Chat and summary pipelines sharing one set of service wrappers.
pub fn from_config(config: &Config) -> Result<(ChatPipeline, SummaryPipeline), CourtifyError> {
    let services = Services::from_config(config)?;
    let chat = ChatPipeline::new(
        services.detector,
        services.translator,
        services.sentiment,
        services.generator,
    )
    .with_language_policy(LanguagePolicy::from_config(&config.pipeline));
    let summary = SummaryPipeline::new(services.summarizer);
    Ok((chat, summary))
}
