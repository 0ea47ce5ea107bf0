use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::pipeline::PipelineError;

/// Coarse failure category reported to callers alongside the failing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network failure or timeout talking to an upstream service.
    Transport,
    /// The upstream answered with a non-success status or an error body.
    Upstream,
    /// The upstream answered, but the body lacked an expected field.
    Schema,
    /// Missing credential or endpoint detected at startup.
    Config,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Upstream => "upstream",
            Self::Schema => "schema",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed error hierarchy for courtify.
///
/// Returned from config validation and pipeline setup, and used by the CLI to
/// label a failed run. Leaf functions keep using `anyhow::Result`.
#[derive(Debug, Error)]
pub enum CourtifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl CourtifyError {
    /// Category used when this error is surfaced to a caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Pipeline(e) => e.kind,
        }
    }
}
