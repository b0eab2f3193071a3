//! Canonical route table.
//!
//! # Data Flow
//! ```text
//! PathnameConfig[] (from TOML)
//!     → compile canonical id + localized templates (pattern.rs)
//!     → validate: unique ids, known locales, full locale coverage,
//!       identical parameter sets across an entry's templates
//!     → order entries by specificity per locale
//!     → Freeze as immutable PathnameTable
//! ```
//!
//! # Design Decisions
//! - `Uniform` vs `PerLocale` is a tagged variant so both cases are
//!   handled exhaustively at compile time
//! - Ordering is precomputed per locale: literal-only templates first,
//!   longer literal prefixes first, configuration order breaks ties
//! - An invalid table is a fatal startup error; the process must not
//!   serve requests over a table it could not validate

use std::collections::HashMap;

use thiserror::Error;

use crate::config::schema::PathnameConfig;
use crate::routing::pattern::{PathPattern, PatternError};
use crate::routing::registry::{Locale, LocaleRegistry};

/// Errors raised while building a [`PathnameTable`].
#[derive(Debug, Error)]
pub enum TableError {
    /// Two entries claimed the same canonical route id.
    #[error("duplicate canonical route id '{0}'")]
    DuplicateCanonicalId(String),

    /// An entry declared both a uniform pattern and a per-locale mapping.
    #[error("route '{0}' declares both a uniform pattern and a per-locale mapping")]
    AmbiguousEntry(String),

    /// A per-locale mapping referenced a locale outside the registry.
    #[error("route '{canonical}' maps unsupported locale '{locale}'")]
    UnsupportedLocale { canonical: String, locale: String },

    /// A per-locale mapping left a supported locale without a pattern.
    #[error("route '{canonical}' has no pattern for supported locale '{locale}'")]
    MissingLocalePattern { canonical: String, locale: String },

    /// A localized pattern bound a different parameter set than the
    /// canonical id.
    #[error("route '{canonical}': pattern '{pattern}' does not bind the same parameters as the canonical id")]
    ParamMismatch { canonical: String, pattern: String },

    /// A template failed to compile.
    #[error("route '{canonical}': {source}")]
    InvalidPattern {
        canonical: String,
        #[source]
        source: PatternError,
    },
}

/// The localized form(s) of one canonical route.
#[derive(Debug, Clone)]
pub enum PatternSet {
    /// One template shared by every locale.
    Uniform(PathPattern),
    /// One template per supported locale.
    PerLocale(HashMap<Locale, PathPattern>),
}

/// One canonical route and its localized templates.
#[derive(Debug, Clone)]
pub struct PathnameEntry {
    canonical_id: String,
    canonical_pattern: PathPattern,
    patterns: PatternSet,
}

impl PathnameEntry {
    /// The locale-independent route id (e.g. `"/pathnames"`).
    pub fn canonical_id(&self) -> &str {
        &self.canonical_id
    }

    /// The canonical id compiled as a template, for rendering internal
    /// paths with bound parameters.
    pub fn canonical_pattern(&self) -> &PathPattern {
        &self.canonical_pattern
    }

    /// The localized variants.
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// The template serving `locale`.
    ///
    /// Per-locale mappings cover every supported locale (validated at
    /// construction); a locale outside the registry falls back to the
    /// canonical form.
    pub fn pattern_for(&self, locale: &Locale) -> &PathPattern {
        match &self.patterns {
            PatternSet::Uniform(pattern) => pattern,
            PatternSet::PerLocale(map) => map.get(locale).unwrap_or(&self.canonical_pattern),
        }
    }
}

/// Immutable table of canonical routes, ordered for matching.
#[derive(Debug, Clone)]
pub struct PathnameTable {
    entries: Vec<PathnameEntry>,
    by_id: HashMap<String, usize>,
    match_order: HashMap<Locale, Vec<usize>>,
}

impl PathnameTable {
    /// Compile and validate the table from configuration.
    pub fn from_config(
        entries: &[PathnameConfig],
        registry: &LocaleRegistry,
    ) -> Result<Self, TableError> {
        let mut compiled: Vec<PathnameEntry> = Vec::with_capacity(entries.len());
        let mut by_id = HashMap::with_capacity(entries.len());

        for entry in entries {
            let canonical = entry.canonical.clone();
            if by_id.contains_key(&canonical) {
                return Err(TableError::DuplicateCanonicalId(canonical));
            }

            let canonical_pattern = compile(&canonical, &canonical)?;
            let mut expected_params = canonical_pattern.param_names();
            expected_params.sort_unstable();

            let patterns = match (&entry.pattern, &entry.locales) {
                (Some(_), Some(_)) => return Err(TableError::AmbiguousEntry(canonical)),
                (Some(raw), None) => PatternSet::Uniform(compile(&canonical, raw)?),
                (None, Some(map)) => {
                    let mut localized = HashMap::with_capacity(map.len());
                    for (code, raw) in map {
                        let locale = registry.get(code).cloned().ok_or_else(|| {
                            TableError::UnsupportedLocale {
                                canonical: canonical.clone(),
                                locale: code.clone(),
                            }
                        })?;
                        localized.insert(locale, compile(&canonical, raw)?);
                    }
                    for locale in registry.supported() {
                        if !localized.contains_key(locale) {
                            return Err(TableError::MissingLocalePattern {
                                canonical,
                                locale: locale.as_str().to_string(),
                            });
                        }
                    }
                    PatternSet::PerLocale(localized)
                }
                // No explicit pattern: the canonical id is the template.
                (None, None) => PatternSet::Uniform(canonical_pattern.clone()),
            };

            check_params(&canonical, &expected_params, &patterns)?;

            by_id.insert(canonical.clone(), compiled.len());
            compiled.push(PathnameEntry {
                canonical_id: canonical,
                canonical_pattern,
                patterns,
            });
        }

        let match_order = registry
            .supported()
            .iter()
            .map(|locale| (locale.clone(), specificity_order(&compiled, locale)))
            .collect();

        Ok(Self {
            entries: compiled,
            by_id,
            match_order,
        })
    }

    /// Look up an entry by canonical route id.
    pub fn get(&self, canonical_id: &str) -> Option<&PathnameEntry> {
        self.by_id.get(canonical_id).map(|&i| &self.entries[i])
    }

    /// All entries, in configuration order.
    pub fn entries(&self) -> impl Iterator<Item = &PathnameEntry> {
        self.entries.iter()
    }

    /// Entries in matching precedence order for `locale`: literal-only
    /// templates before parameterized ones, longer literal prefixes first.
    pub fn entries_in_match_order(
        &self,
        locale: &Locale,
    ) -> impl Iterator<Item = &PathnameEntry> + '_ {
        let order = self.match_order.get(locale);
        let indices: &[usize] = order.map(Vec::as_slice).unwrap_or(&[]);
        indices.iter().map(move |&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn compile(canonical: &str, raw: &str) -> Result<PathPattern, TableError> {
    PathPattern::compile(raw).map_err(|source| TableError::InvalidPattern {
        canonical: canonical.to_string(),
        source,
    })
}

fn check_params(
    canonical: &str,
    expected: &[&str],
    patterns: &PatternSet,
) -> Result<(), TableError> {
    let mismatch = |pattern: &PathPattern| TableError::ParamMismatch {
        canonical: canonical.to_string(),
        pattern: pattern.raw().to_string(),
    };

    let check = |pattern: &PathPattern| {
        let mut names = pattern.param_names();
        names.sort_unstable();
        if names == expected {
            Ok(())
        } else {
            Err(mismatch(pattern))
        }
    };

    match patterns {
        PatternSet::Uniform(pattern) => check(pattern),
        PatternSet::PerLocale(map) => map.values().try_for_each(check),
    }
}

/// Precedence order for one locale: literal-only first, then by literal
/// prefix length descending. The sort is stable, so entries that tie keep
/// their configuration order.
fn specificity_order(entries: &[PathnameEntry], locale: &Locale) -> Vec<usize> {
    let mut order: Vec<usize> = (0..entries.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (
            entries[a].pattern_for(locale),
            entries[b].pattern_for(locale),
        );
        pb.is_literal()
            .cmp(&pa.is_literal())
            .then(pb.literal_prefix_len().cmp(&pa.literal_prefix_len()))
    });
    order
}
