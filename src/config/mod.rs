//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks: locale set, pathname table)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the locale registry and pathname
//!   table live for the process lifetime (no hot reload)
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::{
    CookieConfig, GatewayConfig, LimitsConfig, ListenerConfig, LocaleConfig,
    ObservabilityConfig, PathnameConfig, TimeoutConfig, UpstreamConfig,
};
