//! Test-process bootstrap for the contract harness
//!
//! Loads [`TestsOptions`], installs logging and the default error handler
//! once per process, and runs the [`LifecycleHooks`] around process and
//! per-test initialization.
//!
//! # Example
//!
//! ```rust,no_run
//! use contract_bootstrap::{test_context, TestsInitialization};
//!
//! let init = TestsInitialization::init_default().unwrap();
//! init.init_test(&test_context!("vec_is_a_list"));
//! let harness = init.harness().unwrap();
//! harness.check_list(&mut Vec::<u8>::new(), &[1, 2]).unwrap();
//! ```

pub mod error;
pub mod handlers;
pub mod hooks;
pub mod logging;
pub mod options;

pub use error::{BootstrapError, BootstrapResult};
pub use handlers::{
    clear_error_handlers, dispatch_error, install_error_handler, ErrorInfo, GlobalReporter,
};
pub use hooks::{LifecycleHooks, NoHooks, TestContext};
pub use options::TestsOptions;

use contract_harness::Harness;
use parking_lot::{const_mutex, Mutex};
use std::sync::{Arc, OnceLock};

static INITIALIZED: OnceLock<Initialized> = OnceLock::new();
static INIT_LOCK: Mutex<()> = const_mutex(());

/// The process-wide result of [`TestsInitialization::init`].
pub struct Initialized {
    options: TestsOptions,
    hooks: Arc<dyn LifecycleHooks>,
}

impl Initialized {
    pub fn options(&self) -> &TestsOptions {
        &self.options
    }

    /// Per-test initialization with the process hooks.
    pub fn init_test(&self, ctx: &TestContext) {
        hooks::run_test_init(self.hooks.as_ref(), ctx);
    }

    /// A harness configured from the loaded options that reports through
    /// the process-wide error handlers.
    pub fn harness(&self) -> BootstrapResult<Harness> {
        Ok(Harness::new(self.options.harness.clone())?
            .with_reporter(Arc::new(GlobalReporter::default())))
    }
}

/// One-time process initialization.
pub struct TestsInitialization;

impl TestsInitialization {
    /// Initialize the process. Only the first call does any work; later
    /// calls return the first initialization and ignore their arguments.
    pub fn init(
        options: TestsOptions,
        hooks: Arc<dyn LifecycleHooks>,
    ) -> BootstrapResult<&'static Initialized> {
        let _guard = INIT_LOCK.lock();
        if let Some(initialized) = INITIALIZED.get() {
            return Ok(initialized);
        }

        hooks.on_before_initialization();
        logging::init_logging(&options)?;
        install_error_handler(handlers::log_error);
        tracing::info!("Tests initialized");
        hooks.on_after_initialization();

        Ok(INITIALIZED.get_or_init(|| Initialized { options, hooks }))
    }

    /// Initialize from `TestsOptions::load(None)` without hooks.
    pub fn init_default() -> BootstrapResult<&'static Initialized> {
        Self::init(TestsOptions::load(None)?, Arc::new(NoHooks))
    }

    pub fn get() -> Option<&'static Initialized> {
        INITIALIZED.get()
    }
}

/// Per-test initialization, initializing the process with defaults first
/// if nothing did yet.
pub fn init_test(ctx: &TestContext) -> BootstrapResult<&'static Initialized> {
    let initialized = match TestsInitialization::get() {
        Some(initialized) => initialized,
        None => TestsInitialization::init_default()?,
    };
    initialized.init_test(ctx);
    Ok(initialized)
}
