#![warn(clippy::pedantic)]
// Noisy doc/signature lints on every pub function
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Keeping format!("{}", x) over format!("{x}") for readability with complex exprs
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod pipeline;
pub mod services;
pub(crate) mod utils;

/// Re-exports for fuzz targets. Not part of the public API.
#[doc(hidden)]
pub mod fuzz_api {
    use serde_json::Value;

    /// Wrapper around the upstream error-body extractor.
    pub fn upstream_message(body: &str) -> String {
        crate::services::errors::upstream_message(body)
    }

    /// Runs every upstream body parser over one decoded payload.
    pub fn parse_upstream_payload(json: &Value) {
        let _ = crate::services::detector::parse_detection(json);
        let _ = crate::services::translator::parse_translation(json);
        let _ = crate::services::generator::parse_generated_text(json);
        let _ = crate::services::summarizer::parse_summary(json);
        let sentiment = crate::services::SentimentResult::from_payload(json.clone());
        let _ = sentiment.top_label();
    }

    /// Parses and validates a config document the way the loader does.
    pub fn parse_config(content: &str) -> bool {
        serde_json::from_str::<crate::config::Config>(content)
            .is_ok_and(|config| config.validate().is_ok())
    }
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
