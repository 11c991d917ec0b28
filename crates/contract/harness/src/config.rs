//! Configuration for the contract harness

use crate::error::{HarnessError, HarnessResult};
use serde::{Deserialize, Serialize};

/// Harness tuning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Stream script settings
    #[serde(default)]
    pub stream: StreamConfig,

    /// Enumerable script settings
    #[serde(default)]
    pub enumerable: EnumerableConfig,
}

/// Stream script settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Random payload length in bytes
    #[serde(default = "default_payload_len")]
    pub payload_len: usize,

    /// Payload RNG seed; unset draws from OS randomness
    #[serde(default)]
    pub seed: Option<u64>,

    /// Byte written at offset 0 before the payload
    #[serde(default)]
    pub sentinel: u8,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            payload_len: default_payload_len(),
            seed: None,
            sentinel: 0,
        }
    }
}

/// Enumerable script settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerableConfig {
    /// Extra advances that must keep failing once a cursor is exhausted
    #[serde(default = "default_exhaustion_probes")]
    pub exhaustion_probes: usize,
}

impl Default for EnumerableConfig {
    fn default() -> Self {
        Self {
            exhaustion_probes: default_exhaustion_probes(),
        }
    }
}

// Default value helpers
fn default_payload_len() -> usize {
    200_000
}

fn default_exhaustion_probes() -> usize {
    2
}

impl HarnessConfig {
    /// Reject values the scripts can't run with.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.stream.payload_len == 0 {
            return Err(HarnessError::InvalidConfig(
                "stream.payload_len must be greater than zero".into(),
            ));
        }
        if self.enumerable.exhaustion_probes == 0 {
            return Err(HarnessError::InvalidConfig(
                "enumerable.exhaustion_probes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// A small, reproducible configuration for fast test runs.
    pub fn quick() -> Self {
        Self {
            stream: StreamConfig {
                payload_len: 1024,
                seed: Some(7),
                sentinel: 0,
            },
            ..Default::default()
        }
    }
}
