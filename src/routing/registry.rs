//! Supported-locale registry.
//!
//! # Responsibilities
//! - Hold the ordered set of supported locale codes
//! - Hold the default locale (guaranteed member of the set)
//! - Answer membership queries during resolution
//!
//! # Design Decisions
//! - Built once from configuration, immutable afterwards
//! - Construction fails fast on an empty set or a foreign default
//! - Codes are normalized to lowercase; lookups are case-insensitive

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::schema::LocaleConfig;

/// A locale code from the configured supported set (e.g. "en", "de").
///
/// Stored lowercased so comparisons never have to think about case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors raised while building a [`LocaleRegistry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The supported set was empty.
    #[error("supported locale set must not be empty")]
    EmptySupportedSet,

    /// The same code appeared twice in the supported set.
    #[error("duplicate locale '{0}' in supported set")]
    DuplicateLocale(String),

    /// The default locale is not a member of the supported set.
    #[error("default locale '{0}' is not in the supported set")]
    DefaultNotSupported(String),
}

/// Immutable set of supported locales plus the default locale.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    supported: Vec<Locale>,
    default: Locale,
}

impl LocaleRegistry {
    /// Build the registry from configuration, validating its invariants.
    pub fn from_config(config: &LocaleConfig) -> Result<Self, RegistryError> {
        Self::new(config.supported.clone(), config.default.clone())
    }

    /// Build the registry from an ordered list of codes and a default.
    pub fn new(supported: Vec<String>, default: String) -> Result<Self, RegistryError> {
        if supported.is_empty() {
            return Err(RegistryError::EmptySupportedSet);
        }

        let mut locales: Vec<Locale> = Vec::with_capacity(supported.len());
        for code in supported {
            let locale = Locale::new(code);
            if locales.contains(&locale) {
                return Err(RegistryError::DuplicateLocale(locale.0));
            }
            locales.push(locale);
        }

        let default = Locale::new(default);
        if !locales.contains(&default) {
            return Err(RegistryError::DefaultNotSupported(default.0));
        }

        Ok(Self {
            supported: locales,
            default,
        })
    }

    /// Ordered set of supported locales.
    pub fn supported(&self) -> &[Locale] {
        &self.supported
    }

    /// The default locale. Always a member of [`Self::supported`].
    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// Whether `code` names a supported locale (case-insensitive).
    pub fn is_supported(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Look up the canonical [`Locale`] for a raw code.
    pub fn get(&self, code: &str) -> Option<&Locale> {
        self.supported
            .iter()
            .find(|l| l.0.eq_ignore_ascii_case(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LocaleRegistry {
        LocaleRegistry::new(
            vec!["ru".into(), "en".into(), "de".into()],
            "ru".into(),
        )
        .unwrap()
    }

    #[test]
    fn default_must_be_supported() {
        let err = LocaleRegistry::new(vec!["en".into()], "fr".into()).unwrap_err();
        assert_eq!(err, RegistryError::DefaultNotSupported("fr".into()));
    }

    #[test]
    fn empty_set_rejected() {
        let err = LocaleRegistry::new(vec![], "en".into()).unwrap_err();
        assert_eq!(err, RegistryError::EmptySupportedSet);
    }

    #[test]
    fn duplicates_rejected() {
        let err =
            LocaleRegistry::new(vec!["en".into(), "EN".into()], "en".into()).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateLocale("en".into()));
    }

    #[test]
    fn membership_is_case_insensitive() {
        let registry = registry();
        assert!(registry.is_supported("de"));
        assert!(registry.is_supported("DE"));
        assert!(!registry.is_supported("fr"));
    }

    #[test]
    fn order_is_preserved() {
        let registry = registry();
        let codes: Vec<&str> = registry.supported().iter().map(Locale::as_str).collect();
        assert_eq!(codes, vec!["ru", "en", "de"]);
        assert_eq!(registry.default_locale().as_str(), "ru");
    }
}
