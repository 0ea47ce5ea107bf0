use super::schema::{Config, ServiceKind};
use tracing::debug;

/// Fills every Hugging Face slot that is still empty after the per-service vars.
pub const SHARED_HF_ENV_VAR: &str = "COURTIFY_HF_API_KEY";

macro_rules! define_credentials {
    ($( $name:literal, $env:literal => $($path:ident).+ );* $(;)?) => {
        /// All known credential slot names.
        pub const CREDENTIAL_NAMES: &[&str] = &[$($name),*];

        /// (slot name, env var name) pairs.
        pub const CREDENTIAL_ENV_VARS: &[(&str, &str)] = &[$(($name, $env)),*];

        /// Get a mutable reference to a credential field by slot name.
        pub fn get_credential_field<'a>(config: &'a mut Config, name: &str) -> Option<&'a mut String> {
            match name {
                $($name => Some(&mut config.$($path).+),)*
                _ => None,
            }
        }

        /// Get the current value of a credential field by slot name.
        pub fn get_credential_value<'a>(config: &'a Config, name: &str) -> Option<&'a str> {
            match name {
                $($name => Some(config.$($path).+.as_str()),)*
                _ => None,
            }
        }
    };
}

define_credentials! {
    "detector-api-key",   "COURTIFY_DETECTOR_API_KEY"   => services.detector.api_key;
    "translator-api-key", "COURTIFY_TRANSLATOR_API_KEY" => services.translator.api_key;
    "sentiment-api-key",  "COURTIFY_SENTIMENT_API_KEY"  => services.sentiment.api_key;
    "generator-api-key",  "COURTIFY_GENERATOR_API_KEY"  => services.generator.api_key;
    "summarizer-api-key", "COURTIFY_SUMMARIZER_API_KEY" => services.summarizer.api_key;
}

/// Apply environment variable overrides.
///
/// Any `COURTIFY_*` env var that is set and non-empty will overwrite the
/// corresponding config field, allowing secrets to be injected without
/// touching the config file (useful for containers and CI).
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |var| std::env::var(var).ok());
}

/// Same as [`apply_env_overrides`] with an injectable variable lookup.
pub fn apply_overrides_from<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (name, var) in CREDENTIAL_ENV_VARS {
        if let Some(val) = lookup(var).filter(|v| !v.is_empty())
            && let Some(field) = get_credential_field(config, name)
        {
            debug!("loaded {name} from {var}");
            *field = val;
        }
    }

    if let Some(shared) = lookup(SHARED_HF_ENV_VAR).filter(|v| !v.is_empty()) {
        for kind in ServiceKind::ALL.into_iter().filter(|k| k.is_hugging_face()) {
            let svc = config.services.get_mut(kind);
            if svc.api_key.is_empty() {
                debug!("loaded {} api key from {}", kind.name(), SHARED_HF_ENV_VAR);
                svc.api_key.clone_from(&shared);
            }
        }
    }
}

/// Slot name for a service's credential.
pub fn credential_name(kind: ServiceKind) -> &'static str {
    match kind {
        ServiceKind::Detector => "detector-api-key",
        ServiceKind::Translator => "translator-api-key",
        ServiceKind::Sentiment => "sentiment-api-key",
        ServiceKind::Generator => "generator-api-key",
        ServiceKind::Summarizer => "summarizer-api-key",
    }
}

/// Detect which backend provided a credential value.
pub fn detect_source(name: &str, config: &Config) -> &'static str {
    detect_source_from(name, config, |var| std::env::var(var).ok())
}

fn detect_source_from<F>(name: &str, config: &Config, lookup: F) -> &'static str
where
    F: Fn(&str) -> Option<String>,
{
    let env_var = CREDENTIAL_ENV_VARS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, e)| *e);

    if let Some(var) = env_var
        && lookup(var).is_some_and(|v| !v.is_empty())
    {
        return "env";
    }

    match get_credential_value(config, name) {
        Some(val) if !val.is_empty() => {
            let shared = lookup(SHARED_HF_ENV_VAR);
            if shared.as_deref() == Some(val) {
                "env (shared)"
            } else {
                "config"
            }
        }
        _ => "[empty]",
    }
}
