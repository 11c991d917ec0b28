//! Error types for the test bootstrap

use thiserror::Error;

/// Errors raised while bootstrapping a test process
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Harness setup failed: {0}")]
    Harness(#[from] contract_harness::HarnessError),
}

/// Result type for bootstrap operations
pub type BootstrapResult<T> = Result<T, BootstrapError>;
