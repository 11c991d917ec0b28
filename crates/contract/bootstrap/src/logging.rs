//! Tracing subscriber setup for test processes

use crate::error::{BootstrapError, BootstrapResult};
use crate::options::TestsOptions;
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Console output goes through
/// the test writer; the optional log file is deleted first and then written
/// without ANSI colors. Returns `false` when another subscriber was already
/// installed, which leaves that one in place.
pub fn init_logging(options: &TestsOptions) -> BootstrapResult<bool> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.log_level))
        .map_err(|e| BootstrapError::Logging(e.to_string()))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if options.json {
        layers.push(fmt::layer().json().with_test_writer().boxed());
    } else {
        layers.push(fmt::layer().with_test_writer().boxed());
    }

    if let Some(path) = &options.log_file {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .boxed(),
        );
    }

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .is_ok();
    if !installed {
        tracing::debug!("global subscriber already installed, keeping it");
    }
    Ok(installed)
}
