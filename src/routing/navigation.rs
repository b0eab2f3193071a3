//! Outgoing link construction.
//!
//! # Responsibilities
//! - Build concrete localized paths from a canonical route id, target
//!   locale, and parameters (the inverse of matching)
//!
//! # Design Decisions
//! - Unknown routes, unsupported locales, and missing parameters are
//!   programmer/configuration errors surfaced immediately, never a silent
//!   default: they are a different failure class than a request-time 404

use std::sync::Arc;

use thiserror::Error;

use crate::routing::pathnames::PathnameTable;
use crate::routing::pattern::{Params, PatternError};
use crate::routing::registry::{Locale, LocaleRegistry};

/// Errors raised while building an outgoing path.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The canonical route id is not in the pathname table.
    #[error("unknown canonical route id '{0}'")]
    UnknownRoute(String),

    /// The target locale is not supported.
    #[error("locale '{0}' is not in the supported set")]
    UnsupportedLocale(String),

    /// A template placeholder had no corresponding parameter.
    #[error("route '{route}': {source}")]
    Render {
        route: String,
        #[source]
        source: PatternError,
    },
}

/// Builds locale-correct outgoing paths for link-emitting callers.
#[derive(Debug, Clone)]
pub struct NavigationBuilder {
    registry: Arc<LocaleRegistry>,
    table: Arc<PathnameTable>,
}

impl NavigationBuilder {
    pub fn new(registry: Arc<LocaleRegistry>, table: Arc<PathnameTable>) -> Self {
        Self { registry, table }
    }

    /// Build the concrete path for `(canonical_id, locale, params)`,
    /// locale prefix included.
    pub fn build_path(
        &self,
        canonical_id: &str,
        locale: &str,
        params: &Params,
    ) -> Result<String, NavigationError> {
        let locale = self
            .registry
            .get(locale)
            .ok_or_else(|| NavigationError::UnsupportedLocale(locale.to_string()))?;

        let entry = self
            .table
            .get(canonical_id)
            .ok_or_else(|| NavigationError::UnknownRoute(canonical_id.to_string()))?;

        let path = entry
            .pattern_for(locale)
            .render(params)
            .map_err(|source| NavigationError::Render {
                route: canonical_id.to_string(),
                source,
            })?;

        Ok(prefix_with_locale(locale, &path))
    }
}

/// Prepend the locale segment. The root path keeps its trailing slash so
/// `"/"` becomes `"/de/"`, not `"/de"`.
pub(crate) fn prefix_with_locale(locale: &Locale, path: &str) -> String {
    if path == "/" {
        format!("/{locale}/")
    } else {
        format!("/{locale}{path}")
    }
}
