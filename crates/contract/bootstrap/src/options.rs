//! Test-process options

use crate::error::BootstrapResult;
use contract_harness::HarnessConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys are joined with `__`
pub const ENV_PREFIX: &str = "CONTRACT_HARNESS";

/// Options for a test process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestsOptions {
    /// Log file, recreated on every run
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,

    /// Level used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// JSON console output
    #[serde(default)]
    pub json: bool,

    /// Harness tuning
    #[serde(default)]
    pub harness: HarnessConfig,
}

impl Default for TestsOptions {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            log_level: default_log_level(),
            json: false,
            harness: HarnessConfig::default(),
        }
    }
}

// Default value helpers
fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("tests.log"))
}

fn default_log_level() -> String {
    "trace".to_string()
}

impl TestsOptions {
    /// Load options: defaults, then the file if given, then environment.
    pub fn load(path: Option<&Path>) -> BootstrapResult<Self> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&TestsOptions::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        // Add environment variables with CONTRACT_HARNESS__ prefix
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Options for quiet, fast runs: no log file and a small payload
    pub fn quick() -> Self {
        Self {
            log_file: None,
            log_level: "info".to_string(),
            harness: HarnessConfig::quick(),
            ..Default::default()
        }
    }
}
