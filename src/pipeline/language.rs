//! Language-code handling shared by the chat pipeline and config validation.
//!
//! Detectors and translators disagree on casing and region suffixes
//! (`en`, `EN`, `en-US`, `en_GB`), so codes are compared by primary subtag.

use crate::config::PipelineConfig;

/// Lowercased primary subtag: `"pt-BR"` → `"pt"`.
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Whether two codes name the same language.
pub fn same_language(a: &str, b: &str) -> bool {
    let a = primary_subtag(a);
    !a.is_empty() && a == primary_subtag(b)
}

/// 2–3 ASCII letters, optionally followed by alphanumeric subtags.
pub fn is_valid_language_code(code: &str) -> bool {
    let mut parts = code.split(['-', '_']);
    let Some(primary) = parts.next() else {
        return false;
    };
    (2..=3).contains(&primary.len())
        && primary.chars().all(|c| c.is_ascii_alphabetic())
        && parts.all(|p| (1..=8).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Pivot and fallback languages for one pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePolicy {
    pivot: String,
    fallback: String,
}

impl Default for LanguagePolicy {
    fn default() -> Self {
        Self::new("en", None)
    }
}

impl LanguagePolicy {
    /// `fallback` defaults to the pivot language.
    pub fn new(pivot: impl Into<String>, fallback: Option<String>) -> Self {
        let pivot = pivot.into();
        let fallback = fallback.unwrap_or_else(|| pivot.clone());
        Self { pivot, fallback }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.pivot_language.clone(),
            config.fallback_language.clone(),
        )
    }

    pub fn pivot(&self) -> &str {
        &self.pivot
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn is_pivot(&self, code: &str) -> bool {
        same_language(code, &self.pivot)
    }
}
