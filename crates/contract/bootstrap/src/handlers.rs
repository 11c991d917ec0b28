//! Process-wide error handlers
//!
//! The harness core never reads these; [`GlobalReporter`] is the bridge that
//! forwards harness failures into them.

use contract_harness::Reporter;
use parking_lot::{const_rwlock, RwLock};
use std::fmt;
use std::sync::Arc;

/// An error handed to the installed handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Component that raised the error
    pub source: String,
    pub message: String,
    pub detail: Option<String>,
}

impl ErrorInfo {
    pub fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

pub type ErrorHandler = Arc<dyn Fn(&ErrorInfo) + Send + Sync>;

static HANDLERS: RwLock<Vec<ErrorHandler>> = const_rwlock(Vec::new());

pub fn install_error_handler<F>(handler: F)
where
    F: Fn(&ErrorInfo) + Send + Sync + 'static,
{
    HANDLERS.write().push(Arc::new(handler));
}

pub fn clear_error_handlers() {
    HANDLERS.write().clear();
}

/// Hand `info` to every installed handler. Returns how many ran.
pub fn dispatch_error(info: ErrorInfo) -> usize {
    // Snapshot so a handler may install or clear handlers.
    let handlers: Vec<ErrorHandler> = HANDLERS.read().clone();
    if handlers.is_empty() {
        tracing::warn!(source = %info.source, "unhandled error: {}", info.message);
    }
    for handler in &handlers {
        handler(&info);
    }
    handlers.len()
}

/// Handler that logs the error and its detail.
pub fn log_error(info: &ErrorInfo) {
    tracing::error!(
        "Handling error from source {}: {}",
        info.source,
        info.message
    );
    if let Some(detail) = &info.detail {
        tracing::error!("{}", detail);
    }
}

/// Reporter that dispatches every failure to the process-wide handlers.
#[derive(Debug, Clone)]
pub struct GlobalReporter {
    source: String,
}

impl GlobalReporter {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Default for GlobalReporter {
    fn default() -> Self {
        Self::new("contract-harness")
    }
}

impl Reporter for GlobalReporter {
    fn fail(&self, message: &str) {
        dispatch_error(ErrorInfo::new(self.source.clone(), message));
    }
}
