//! Locale resolution.
//!
//! # Responsibilities
//! - Resolve the locale for a request from prefix, cookie, and
//!   Accept-Language, in strict precedence order
//! - Parse Accept-Language quality weights
//! - Report which tier produced the winner (the planner needs it for
//!   cookie persistence)
//!
//! # Design Decisions
//! - Pure function over immutable registry state: no I/O, no mutation
//! - Unsupported values at any tier are skipped, never corrected
//! - Header tags match a supported locale exactly or by primary subtag
//!   ("en-US" matches "en"); `*` and q<=0 entries are ignored

use std::sync::Arc;

use crate::routing::registry::{Locale, LocaleRegistry};

/// The precedence tier that produced a resolved locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    /// Explicit locale prefix segment in the path.
    Prefix,
    /// The previous-selection cookie.
    Cookie,
    /// Accept-Language negotiation.
    Header,
    /// The registry default.
    Default,
}

/// A resolved locale plus the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale {
    pub locale: Locale,
    pub source: LocaleSource,
}

/// Resolves the request locale by fixed precedence:
/// prefix > cookie > Accept-Language > default.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    registry: Arc<LocaleRegistry>,
}

impl LocaleResolver {
    pub fn new(registry: Arc<LocaleRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve a locale. Each argument is the raw value from the request,
    /// already isolated by the caller; `None` means the tier is absent.
    pub fn resolve(
        &self,
        prefix: Option<&str>,
        cookie: Option<&str>,
        accept_language: Option<&str>,
    ) -> ResolvedLocale {
        if let Some(locale) = prefix.and_then(|code| self.registry.get(code)) {
            return ResolvedLocale {
                locale: locale.clone(),
                source: LocaleSource::Prefix,
            };
        }

        if let Some(locale) = cookie.and_then(|code| self.registry.get(code)) {
            return ResolvedLocale {
                locale: locale.clone(),
                source: LocaleSource::Cookie,
            };
        }

        if let Some(locale) = accept_language.and_then(|header| self.negotiate(header)) {
            return ResolvedLocale {
                locale,
                source: LocaleSource::Header,
            };
        }

        ResolvedLocale {
            locale: self.registry.default_locale().clone(),
            source: LocaleSource::Default,
        }
    }

    /// Best supported locale from an Accept-Language header, by declared
    /// quality weight.
    fn negotiate(&self, header: &str) -> Option<Locale> {
        for (tag, quality) in parse_accept_language(header) {
            if quality <= 0.0 || tag == "*" {
                continue;
            }
            if let Some(locale) = self.lookup(&tag) {
                return Some(locale.clone());
            }
        }
        None
    }

    /// Exact lookup first, then the primary subtag ("en-US" → "en").
    fn lookup(&self, tag: &str) -> Option<&Locale> {
        self.registry.get(tag).or_else(|| {
            tag.split_once('-')
                .and_then(|(primary, _)| self.registry.get(primary))
        })
    }
}

/// Parse an Accept-Language header into `(tag, quality)` pairs sorted by
/// quality, highest first. The sort is stable, so tags with equal quality
/// keep their declared order. Malformed q-values read as 0.
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    let mut entries: Vec<(String, f32)> = Vec::new();
    for part in header.split(',') {
        let mut pieces = part.split(';');
        let tag = pieces.next().unwrap_or("").trim().to_ascii_lowercase();
        if tag.is_empty() {
            continue;
        }
        let mut quality = 1.0_f32;
        for attr in pieces {
            if let Some(value) = attr.trim().strip_prefix("q=") {
                quality = value.trim().parse().unwrap_or(0.0);
            }
        }
        entries.push((tag, quality));
    }
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries
}
