//! Locale routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path, cookie, Accept-Language)
//!     → planner.rs (strip locale prefix)
//!     → resolver.rs (prefix > cookie > header > default)
//!     → matcher.rs (path → canonical route + params)
//!     → Return: Directive (rewrite | redirect | not-found)
//!
//! Outgoing links (inverse direction):
//!     (canonical route, locale, params)
//!     → navigation.rs
//!     → "/{locale}/localized/path"
//!
//! Table Compilation (at startup):
//!     PathnameConfig[]
//!     → registry.rs (validate supported set + default)
//!     → pattern.rs (compile templates into segment matchers)
//!     → pathnames.rs (dedupe, order by specificity, freeze)
//! ```
//!
//! # Design Decisions
//! - Registry and table compiled at startup, immutable at runtime
//! - No regex in the hot path (segment matching only)
//! - Deterministic: same input always yields the same directive
//! - Literal-only patterns win over parameterized ones
//! - All redirect/cookie policy lives in the planner; resolver and
//!   matcher stay independently testable

pub mod matcher;
pub mod navigation;
pub mod pathnames;
pub mod pattern;
pub mod planner;
pub mod registry;
pub mod resolver;

pub use matcher::{PathMatcher, RouteMatch};
pub use navigation::{NavigationBuilder, NavigationError};
pub use pathnames::{PathnameEntry, PathnameTable, PatternSet, TableError};
pub use pattern::{Params, PathPattern, PatternError};
pub use planner::{Directive, RedirectPlan, RequestPlanner, RewritePlan};
pub use registry::{Locale, LocaleRegistry, RegistryError};
pub use resolver::{LocaleResolver, LocaleSource, ResolvedLocale};
