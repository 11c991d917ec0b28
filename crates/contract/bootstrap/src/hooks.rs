//! Lifecycle hooks around process and per-test initialization

use std::fmt;

/// Identifies the test being initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    pub class: String,
    pub method: String,
}

impl TestContext {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for TestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.method)
    }
}

/// Build a [`TestContext`] for the enclosing module.
#[macro_export]
macro_rules! test_context {
    ($method:expr) => {
        $crate::TestContext::new(module_path!(), $method)
    };
}

/// Callbacks run around initialization. Every method defaults to a no-op.
pub trait LifecycleHooks: Send + Sync {
    fn on_before_initialization(&self) {}

    fn on_after_initialization(&self) {}

    fn on_before_test_init(&self, _ctx: &TestContext) {}

    fn on_after_test_init(&self, _ctx: &TestContext) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl LifecycleHooks for NoHooks {}

/// Per-test initialization: before hook, log line, after hook.
pub fn run_test_init(hooks: &dyn LifecycleHooks, ctx: &TestContext) {
    hooks.on_before_test_init(ctx);
    tracing::info!("Running test {}", ctx);
    hooks.on_after_test_init(ctx);
}
