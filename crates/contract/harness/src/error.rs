//! Error types for the contract harness.
//!
//! Two families live here: [`ContainerError`] is what an implementation under
//! test returns from its fallible capability methods, and [`HarnessError`] is
//! what a harness run reports back to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by containers under test.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("destination too small: {needed} slots needed, {available} available")]
    DestinationTooSmall { needed: usize, available: usize },

    #[error("container is read-only")]
    ReadOnly,

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("{0}")]
    Other(String),
}

/// Why constructor resolution failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ResolutionFailure {
    /// No non-static single-parameter constructor accepts the seed type.
    #[error("no constructor accepting {seed}")]
    NotFound { seed: String },

    /// A matching constructor exists but has no invoker.
    #[error("constructor `{constructor}` can't be invoked")]
    NotInvokable { constructor: String },

    /// The invoker ran and reported an error.
    #[error("constructor `{constructor}` failed: {reason}")]
    InvocationFailed { constructor: String, reason: String },

    /// The invoker produced something other than the target type.
    #[error("constructor `{constructor}` didn't construct a {expected}")]
    WrongType {
        constructor: String,
        expected: String,
    },
}

/// Errors reported by a harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum HarnessError {
    /// The caller-supplied seed items can't drive the script.
    #[error("invalid seed items: {0}")]
    InvalidSeed(String),

    /// Harness configuration values are out of range.
    #[error("invalid harness configuration: {0}")]
    InvalidConfig(String),

    /// The target type could not be constructed.
    #[error("constructor resolution for {target} failed: {failure}")]
    Resolution {
        target: String,
        failure: ResolutionFailure,
    },

    /// A contract invariant did not hold.
    #[error("[{step}] {message}")]
    Violation { step: String, message: String },

    /// An I/O call against a stream under test failed.
    #[error("[{step}] I/O error ({kind}): {message}")]
    Io {
        step: String,
        kind: String,
        message: String,
    },
}

impl HarnessError {
    pub fn violation(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Violation {
            step: step.into(),
            message: message.into(),
        }
    }

    pub fn resolution(target: impl Into<String>, failure: ResolutionFailure) -> Self {
        Self::Resolution {
            target: target.into(),
            failure,
        }
    }

    pub fn io(step: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            step: step.into(),
            kind: format!("{:?}", err.kind()),
            message: err.to_string(),
        }
    }

    /// The script step this error was raised at, if any.
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::Violation { step, .. } | Self::Io { step, .. } => Some(step),
            Self::InvalidSeed(_) | Self::InvalidConfig(_) | Self::Resolution { .. } => None,
        }
    }
}

/// Convenience result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
