//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Build the locale registry and pathname table once, surfacing their
//!   construction failures as validation errors
//! - Validate addresses the gateway will bind or dial
//!
//! # Design Decisions
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<...>>
//! - Collects independent errors rather than stopping at the first
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::routing::pathnames::{PathnameTable, TableError};
use crate::routing::registry::{LocaleRegistry, RegistryError};

/// A semantic configuration error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener bind address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("upstream address '{0}' is not a valid socket address")]
    InvalidUpstreamAddress(String),

    #[error("metrics address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Validate a configuration, collecting every independent error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.upstream.address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidUpstreamAddress(
            config.upstream.address.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if let Err(e) = build_routing(config) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Build the immutable routing state (registry + table) from a config.
///
/// This is the single construction path used by validation, the server,
/// and the CLI, so they cannot disagree about what is valid.
pub fn build_routing(
    config: &GatewayConfig,
) -> Result<(Arc<LocaleRegistry>, Arc<PathnameTable>), ValidationError> {
    let registry = LocaleRegistry::from_config(&config.locales)?;
    let table = PathnameTable::from_config(&config.pathnames, &registry)?;
    Ok((Arc::new(registry), Arc::new(table)))
}
