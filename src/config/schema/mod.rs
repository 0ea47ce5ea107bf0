use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::CourtifyError;
use crate::pipeline::language::is_valid_language_code;

mod services;

pub use services::*;

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_message_bytes() -> usize {
    1_048_576
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Longest chat message or document accepted, in bytes.
    #[serde(default = "default_max_message_bytes", rename = "maxMessageBytes")]
    pub max_message_bytes: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

fn default_pivot_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Language sentiment scoring and reply generation run in.
    #[serde(default = "default_pivot_language", rename = "pivotLanguage")]
    pub pivot_language: String,
    /// Language assumed when detection fails. Defaults to the pivot language.
    #[serde(
        default,
        rename = "fallbackLanguage",
        skip_serializing_if = "Option::is_none"
    )]
    pub fallback_language: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pivot_language: default_pivot_language(),
            fallback_language: None,
        }
    }
}

impl PipelineConfig {
    pub fn effective_fallback(&self) -> &str {
        self.fallback_language
            .as_deref()
            .unwrap_or(&self.pivot_language)
    }
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), CourtifyError> {
        self.validate_gateway()?;
        self.validate_service_settings()?;
        self.validate_pipeline()?;
        Ok(())
    }

    /// Stricter check run before serving: every endpoint needs a credential.
    pub fn validate_services(&self) -> Result<(), CourtifyError> {
        self.validate()?;
        let missing: Vec<&str> = ServiceKind::ALL
            .iter()
            .filter(|kind| self.services.get(**kind).api_key.trim().is_empty())
            .map(|kind| kind.name())
            .collect();
        if !missing.is_empty() {
            return Err(CourtifyError::Config(format!(
                "missing apiKey for services: {} (set services.<name>.apiKey or COURTIFY_<NAME>_API_KEY)",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    fn validate_gateway(&self) -> Result<(), CourtifyError> {
        if self.gateway.host.trim().is_empty() {
            return Err(CourtifyError::Config("gateway.host must not be empty".into()));
        }
        if self.gateway.port == 0 {
            return Err(CourtifyError::Config("gateway.port must be > 0".into()));
        }
        if self.gateway.port < 1024 {
            warn!(
                "gateway.port {} is a privileged port (< 1024), may require elevated permissions",
                self.gateway.port
            );
        }
        if self.gateway.max_message_bytes == 0 {
            return Err(CourtifyError::Config(
                "gateway.maxMessageBytes must be > 0".into(),
            ));
        }
        Ok(())
    }

    fn validate_service_settings(&self) -> Result<(), CourtifyError> {
        for kind in ServiceKind::ALL {
            let name = kind.name();
            let svc = self.services.get(kind);
            if svc.timeout_ms == 0 {
                return Err(CourtifyError::Config(format!(
                    "services.{name}.timeoutMs must be > 0"
                )));
            }
            if svc.timeout_ms > MAX_TIMEOUT_MS {
                return Err(CourtifyError::Config(format!(
                    "services.{name}.timeoutMs is unreasonably large (> {MAX_TIMEOUT_MS})"
                )));
            }
            let url = svc.resolved_url(kind);
            match url::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                    if parsed.scheme() == "http" {
                        warn!("services.{} uses plain http: {}", name, url);
                    }
                }
                Ok(parsed) => {
                    return Err(CourtifyError::Config(format!(
                        "services.{name}.url must be http(s), got scheme '{}'",
                        parsed.scheme()
                    )));
                }
                Err(e) => {
                    return Err(CourtifyError::Config(format!(
                        "services.{name}.url is not a valid URL: {e}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_pipeline(&self) -> Result<(), CourtifyError> {
        let p = &self.pipeline;
        if !is_valid_language_code(&p.pivot_language) {
            return Err(CourtifyError::Config(format!(
                "pipeline.pivotLanguage '{}' is not a language code",
                p.pivot_language
            )));
        }
        if let Some(fallback) = &p.fallback_language
            && !is_valid_language_code(fallback)
        {
            return Err(CourtifyError::Config(format!(
                "pipeline.fallbackLanguage '{}' is not a language code",
                fallback
            )));
        }
        Ok(())
    }
}
