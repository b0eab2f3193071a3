//! Physical path matching.
//!
//! # Responsibilities
//! - Match a prefix-stripped request path against the pathname table
//! - Bind named parameters from the matched template
//! - Flag whether the match used the locale's own localized form or a
//!   foreign locale's alias (the planner redirects the latter)
//!
//! # Design Decisions
//! - Explicit `None` on a miss, never a panic: an unmatched path is an
//!   ordinary outcome
//! - The given locale's templates are tried first; other locales' aliases
//!   are consulted only afterwards, in registry order
//! - Precedence within a locale comes precomputed from the table
//!   (literal-only before parameterized, longest literal prefix first)

use std::sync::Arc;

use crate::routing::pathnames::PathnameTable;
use crate::routing::pattern::Params;
use crate::routing::registry::{Locale, LocaleRegistry};

/// A successful match of a physical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Canonical route id of the matched entry.
    pub canonical_id: String,
    /// Parameters bound by the template.
    pub params: Params,
    /// The template string that matched.
    pub matched_pattern: String,
    /// True when the match used the requested locale's own localized
    /// form; false when it went through another locale's alias.
    pub is_locale_form: bool,
}

/// Matches request paths (locale prefix already stripped) against the
/// compiled pathname table.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    registry: Arc<LocaleRegistry>,
    table: Arc<PathnameTable>,
}

impl PathMatcher {
    pub fn new(registry: Arc<LocaleRegistry>, table: Arc<PathnameTable>) -> Self {
        Self { registry, table }
    }

    /// Match `path` for `locale`.
    ///
    /// The locale's own localized templates take precedence; if none of
    /// them match, the other supported locales' templates are tried so a
    /// request using a foreign alias can still be tied to its canonical
    /// route (and redirected by the planner).
    pub fn match_path(&self, path: &str, locale: &Locale) -> Option<RouteMatch> {
        if let Some(m) = self.match_for_locale(path, locale) {
            return Some(m);
        }

        for other in self.registry.supported() {
            if other == locale {
                continue;
            }
            if let Some(mut m) = self.match_for_locale(path, other) {
                // The requested locale's own form already failed, so this
                // template is genuinely another locale's alias.
                m.is_locale_form = false;
                return Some(m);
            }
        }
        None
    }

    fn match_for_locale(&self, path: &str, locale: &Locale) -> Option<RouteMatch> {
        for entry in self.table.entries_in_match_order(locale) {
            let pattern = entry.pattern_for(locale);
            if let Some(params) = pattern.matches(path) {
                return Some(RouteMatch {
                    canonical_id: entry.canonical_id().to_string(),
                    params,
                    matched_pattern: pattern.raw().to_string(),
                    is_locale_form: true,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PathnameConfig;
    use std::collections::BTreeMap;

    fn matcher() -> PathMatcher {
        let registry = Arc::new(
            LocaleRegistry::new(
                vec!["ru".into(), "en".into(), "de".into()],
                "ru".into(),
            )
            .unwrap(),
        );
        let table = PathnameTable::from_config(
            &[
                PathnameConfig {
                    canonical: "/".into(),
                    pattern: None,
                    locales: None,
                },
                PathnameConfig {
                    canonical: "/pathnames".into(),
                    pattern: None,
                    locales: Some(BTreeMap::from([
                        ("ru".to_string(), "/pathnames".to_string()),
                        ("en".to_string(), "/pathnames".to_string()),
                        ("de".to_string(), "/pfadnamen".to_string()),
                    ])),
                },
                PathnameConfig {
                    canonical: "/news/:id".into(),
                    pattern: None,
                    locales: Some(BTreeMap::from([
                        ("ru".to_string(), "/news/:id".to_string()),
                        ("en".to_string(), "/news/:id".to_string()),
                        ("de".to_string(), "/nachrichten/:id".to_string()),
                    ])),
                },
                PathnameConfig {
                    canonical: "/news/latest".into(),
                    pattern: None,
                    locales: None,
                },
            ],
            &registry,
        )
        .unwrap();
        PathMatcher::new(registry, Arc::new(table))
    }

    fn de() -> Locale {
        Locale::new("de")
    }

    #[test]
    fn own_locale_form_matches() {
        let m = matcher().match_path("/pfadnamen", &de()).unwrap();
        assert_eq!(m.canonical_id, "/pathnames");
        assert!(m.is_locale_form);
        assert_eq!(m.matched_pattern, "/pfadnamen");
    }

    #[test]
    fn foreign_alias_is_flagged() {
        let m = matcher().match_path("/pathnames", &de()).unwrap();
        assert_eq!(m.canonical_id, "/pathnames");
        assert!(!m.is_locale_form);
    }

    #[test]
    fn root_matches() {
        let m = matcher().match_path("/", &Locale::new("ru")).unwrap();
        assert_eq!(m.canonical_id, "/");
        assert!(m.is_locale_form);
    }

    #[test]
    fn params_are_bound() {
        let m = matcher().match_path("/nachrichten/42", &de()).unwrap();
        assert_eq!(m.canonical_id, "/news/:id");
        assert_eq!(m.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn literal_entries_shadow_parameterized_ones() {
        let m = matcher()
            .match_path("/news/latest", &Locale::new("en"))
            .unwrap();
        assert_eq!(m.canonical_id, "/news/latest");
    }

    #[test]
    fn miss_is_none() {
        assert_eq!(matcher().match_path("/fr/about", &de()), None);
        assert_eq!(matcher().match_path("/missing", &de()), None);
    }
}
