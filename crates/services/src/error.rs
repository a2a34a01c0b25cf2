//! Shared error types for the services crate.

use thiserror::Error;

use recall_core::model::ConfigError;

/// Errors emitted while starting a trainer session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no items available for session")]
    EmptyPool,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
