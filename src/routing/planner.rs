//! Rewrite/redirect planning.
//!
//! # Data Flow
//! ```text
//! raw path + cookie + Accept-Language
//!     → split leading locale prefix (supported codes only)
//!     → resolver (prefix > cookie > header > default)
//!     → matcher (prefix-stripped path, resolved locale)
//!     → Directive:
//!         no match                     → NotFound
//!         no locale prefix             → Redirect to /{locale}/{alias}
//!         prefix + foreign alias       → Redirect to /{locale}/{alias}
//!         prefix + locale's own alias  → Rewrite to the canonical route
//! ```
//!
//! # Design Decisions
//! - All prefix-stripping, redirect-vs-rewrite, and cookie-persistence
//!   policy is concentrated here; resolver and matcher know none of it
//! - Redirects are 308 (permanent, method-preserving) and always point at
//!   the resolved locale's own localized form, so planning a redirect
//!   target again always yields a rewrite (no loops)
//! - The cookie instruction is advisory: the HTTP layer applies it

use std::sync::Arc;

use serde::Serialize;

use crate::routing::matcher::PathMatcher;
use crate::routing::navigation::prefix_with_locale;
use crate::routing::pathnames::PathnameTable;
use crate::routing::pattern::Params;
use crate::routing::registry::{Locale, LocaleRegistry};
use crate::routing::resolver::{LocaleResolver, LocaleSource};

/// Status used for canonicalizing redirects.
pub const REDIRECT_STATUS: u16 = 308;

/// Serve the canonical route under the existing path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewritePlan {
    /// Canonical route id to hand to the rendering layer.
    pub canonical_id: String,
    /// Locale the response should be rendered in.
    pub locale: Locale,
    /// Parameters bound from the path.
    pub params: Params,
    /// Locale to persist in the selection cookie, if any.
    pub set_locale_cookie: Option<Locale>,
}

/// Send the client to the canonical localized path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectPlan {
    /// Redirect target path (locale prefix included, query excluded).
    pub target: String,
    /// HTTP status to respond with.
    pub status: u16,
    /// Locale to persist in the selection cookie, if any.
    pub set_locale_cookie: Option<Locale>,
}

/// The single routing decision for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    Rewrite(RewritePlan),
    Redirect(RedirectPlan),
    NotFound,
}

/// Combines resolver and matcher output into one directive per request.
#[derive(Debug, Clone)]
pub struct RequestPlanner {
    registry: Arc<LocaleRegistry>,
    table: Arc<PathnameTable>,
    resolver: LocaleResolver,
    matcher: PathMatcher,
}

impl RequestPlanner {
    pub fn new(registry: Arc<LocaleRegistry>, table: Arc<PathnameTable>) -> Self {
        let resolver = LocaleResolver::new(Arc::clone(&registry));
        let matcher = PathMatcher::new(Arc::clone(&registry), Arc::clone(&table));
        Self {
            registry,
            table,
            resolver,
            matcher,
        }
    }

    pub fn registry(&self) -> &Arc<LocaleRegistry> {
        &self.registry
    }

    pub fn table(&self) -> &Arc<PathnameTable> {
        &self.table
    }

    /// Plan the directive for one request. `raw_path` carries no query
    /// string; the HTTP layer preserves the query on its own.
    pub fn plan(
        &self,
        raw_path: &str,
        cookie: Option<&str>,
        accept_language: Option<&str>,
    ) -> Directive {
        let (prefix, remainder) = self.split_locale_prefix(raw_path);
        let resolved = self.resolver.resolve(
            prefix.as_ref().map(Locale::as_str),
            cookie,
            accept_language,
        );
        let locale = resolved.locale;

        let matched = match self.matcher.match_path(&remainder, &locale) {
            Some(m) => m,
            None => return Directive::NotFound,
        };

        // Tiers 3 and 4 mean the choice was negotiated, not stated by the
        // request; persist it so the next request is stable.
        let set_locale_cookie = match resolved.source {
            LocaleSource::Header | LocaleSource::Default
                if cookie != Some(locale.as_str()) =>
            {
                Some(locale.clone())
            }
            _ => None,
        };

        if prefix.is_none() || !matched.is_locale_form {
            return match self.localized_target(&matched.canonical_id, &locale, &matched.params)
            {
                Some(target) => Directive::Redirect(RedirectPlan {
                    target,
                    status: REDIRECT_STATUS,
                    set_locale_cookie,
                }),
                None => Directive::NotFound,
            };
        }

        Directive::Rewrite(RewritePlan {
            canonical_id: matched.canonical_id,
            locale,
            params: matched.params,
            set_locale_cookie,
        })
    }

    /// Split a leading supported-locale segment off `path`. Unsupported
    /// first segments are ordinary path segments and stay in place.
    fn split_locale_prefix<'a>(&self, path: &'a str) -> (Option<Locale>, std::borrow::Cow<'a, str>) {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let (first, rest) = match trimmed.split_once('/') {
            Some((first, rest)) => (first, rest),
            None => (trimmed, ""),
        };

        match self.registry.get(first) {
            Some(locale) => (Some(locale.clone()), format!("/{rest}").into()),
            None => (None, path.into()),
        }
    }

    /// The canonical localized path for `(route, locale)` with `params`
    /// substituted, locale prefix included.
    fn localized_target(
        &self,
        canonical_id: &str,
        locale: &Locale,
        params: &Params,
    ) -> Option<String> {
        let entry = self.table.get(canonical_id)?;
        match entry.pattern_for(locale).render(params) {
            Ok(path) => Some(prefix_with_locale(locale, &path)),
            Err(error) => {
                // Parameter sets are validated to agree across locales at
                // startup, so a render failure here is a table bug.
                tracing::error!(
                    canonical_id,
                    locale = %locale,
                    %error,
                    "Failed to render canonical localized path"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::PathnameConfig;
    use std::collections::BTreeMap;

    fn planner() -> RequestPlanner {
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
            ],
            &registry,
        )
        .unwrap();
        RequestPlanner::new(registry, Arc::new(table))
    }

    fn expect_redirect(directive: Directive) -> RedirectPlan {
        match directive {
            Directive::Redirect(plan) => plan,
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    fn expect_rewrite(directive: Directive) -> RewritePlan {
        match directive {
            Directive::Rewrite(plan) => plan,
            other => panic!("expected rewrite, got {other:?}"),
        }
    }

    #[test]
    fn unprefixed_path_redirects_to_negotiated_locale() {
        let plan = expect_redirect(planner().plan("/pathnames", None, Some("de")));
        assert_eq!(plan.target, "/de/pfadnamen");
        assert_eq!(plan.status, REDIRECT_STATUS);
        assert_eq!(plan.set_locale_cookie, Some(Locale::new("de")));
    }

    #[test]
    fn canonical_path_rewrites_without_redirect() {
        let plan = expect_rewrite(planner().plan("/de/pfadnamen", None, None));
        assert_eq!(plan.canonical_id, "/pathnames");
        assert_eq!(plan.locale.as_str(), "de");
        assert_eq!(plan.set_locale_cookie, None);
    }

    #[test]
    fn root_with_prefix_rewrites() {
        let plan = expect_rewrite(planner().plan("/ru/", None, None));
        assert_eq!(plan.canonical_id, "/");
        assert_eq!(plan.locale.as_str(), "ru");
    }

    #[test]
    fn bare_locale_segment_counts_as_root() {
        let plan = expect_rewrite(planner().plan("/en", None, None));
        assert_eq!(plan.canonical_id, "/");
        assert_eq!(plan.locale.as_str(), "en");
    }

    #[test]
    fn foreign_alias_under_prefix_redirects_to_own_alias() {
        let plan = expect_redirect(planner().plan("/de/pathnames", None, None));
        assert_eq!(plan.target, "/de/pfadnamen");
        // Prefix-resolved locales never write the cookie.
        assert_eq!(plan.set_locale_cookie, None);
    }

    #[test]
    fn unprefixed_root_redirects_to_default() {
        let plan = expect_redirect(planner().plan("/", None, None));
        assert_eq!(plan.target, "/ru/");
        assert_eq!(plan.set_locale_cookie, Some(Locale::new("ru")));
    }

    #[test]
    fn matching_cookie_suppresses_set_cookie() {
        let plan = expect_redirect(planner().plan("/pathnames", Some("de"), None));
        assert_eq!(plan.target, "/de/pfadnamen");
        assert_eq!(plan.set_locale_cookie, None);
    }

    #[test]
    fn cookie_tier_beats_header_and_sets_nothing() {
        let plan = expect_redirect(planner().plan("/pathnames", Some("de"), Some("ru;q=0.9")));
        assert_eq!(plan.target, "/de/pfadnamen");
        assert_eq!(plan.set_locale_cookie, None);
    }

    #[test]
    fn unsupported_prefix_is_not_found() {
        assert_eq!(planner().plan("/fr/about", None, None), Directive::NotFound);
    }

    #[test]
    fn unmatched_path_is_not_found() {
        assert_eq!(planner().plan("/de/missing", None, None), Directive::NotFound);
    }

    #[test]
    fn redirects_are_idempotent() {
        let planner = planner();
        for path in ["/", "/pathnames", "/de/pathnames", "/en/pfadnamen"] {
            let first = planner.plan(path, None, Some("de"));
            if let Directive::Redirect(plan) = first {
                let second = planner.plan(&plan.target, None, Some("de"));
                assert!(
                    matches!(second, Directive::Rewrite(_)),
                    "redirect target {} must rewrite, got {second:?}",
                    plan.target
                );
            }
        }
    }
}
