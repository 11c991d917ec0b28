//! Conformance reporting for suites of harness runs

use crate::capability::{Capability, Variant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Passed,
    Failed,
    Skipped,
}

/// Outcome of one named harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub name: String,
    pub capability: Capability,
    pub variant: Variant,
    pub status: RunStatus,
    pub duration: Duration,
    pub error: Option<String>,
}

impl RunRecord {
    /// Create a passed record
    pub fn passed(
        name: impl Into<String>,
        capability: Capability,
        variant: Variant,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            capability,
            variant,
            status: RunStatus::Passed,
            duration,
            error: None,
        }
    }

    /// Create a failed record
    pub fn failed(
        name: impl Into<String>,
        capability: Capability,
        variant: Variant,
        error: String,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            capability,
            variant,
            status: RunStatus::Failed,
            duration,
            error: Some(error),
        }
    }

    /// Create a skipped record; the reason lands in `error`
    pub fn skipped(
        name: impl Into<String>,
        capability: Capability,
        variant: Variant,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            capability,
            variant,
            status: RunStatus::Skipped,
            duration: Duration::ZERO,
            error: Some(reason.into()),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub conformant: bool,
}

/// Complete suite report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub suite_name: String,
    pub timestamp: DateTime<Utc>,
    pub duration: Duration,
    pub records: Vec<RunRecord>,
    pub summary: ReportSummary,
}

impl SuiteReport {
    /// Create a new, empty report
    pub fn new(suite_name: impl Into<String>) -> Self {
        Self {
            suite_name: suite_name.into(),
            timestamp: Utc::now(),
            duration: Duration::ZERO,
            records: Vec::new(),
            summary: ReportSummary::default(),
        }
    }

    pub fn add_record(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    /// Compute the summary from the records
    pub fn finalize(&mut self) {
        let mut summary = ReportSummary::default();
        for record in &self.records {
            summary.total += 1;
            match record.status {
                RunStatus::Passed => summary.passed += 1,
                RunStatus::Failed => summary.failed += 1,
                RunStatus::Skipped => summary.skipped += 1,
            }
        }
        summary.conformant = summary.failed == 0;
        self.summary = summary;
    }

    pub fn is_conformant(&self) -> bool {
        self.summary.conformant
    }

    pub fn failures(&self) -> impl Iterator<Item = &RunRecord> {
        self.records
            .iter()
            .filter(|r| r.status == RunStatus::Failed)
    }

    /// Panic with the text report unless every run passed or was skipped.
    pub fn assert_conformant(&self) {
        if !self.is_conformant() {
            panic!("Container contract violated:\n{}", self.to_text());
        }
    }

    /// Generate a text report
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Generate JSON report
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(64);
        writeln!(f, "{}", rule)?;
        writeln!(f, "Suite: {}", self.suite_name)?;
        writeln!(
            f,
            "Started: {}  Took: {:?}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.duration
        )?;
        writeln!(f, "{}", rule)?;

        // Sections follow capability declaration order
        for capability in Capability::all() {
            let mut records = self
                .records
                .iter()
                .filter(|r| r.capability == capability)
                .peekable();
            if records.peek().is_none() {
                continue;
            }

            writeln!(f, "{}:", capability)?;
            for record in records {
                let mark = match record.status {
                    RunStatus::Passed => "ok  ",
                    RunStatus::Failed => "FAIL",
                    RunStatus::Skipped => "skip",
                };
                writeln!(
                    f,
                    "  [{}] {} ({}, {:?})",
                    mark, record.name, record.variant, record.duration
                )?;
                if let Some(error) = &record.error {
                    let label = match record.status {
                        RunStatus::Skipped => "Skipped",
                        _ => "Error",
                    };
                    writeln!(f, "         {}: {}", label, error)?;
                }
            }
        }

        writeln!(f, "{}", rule)?;
        writeln!(
            f,
            "{} runs: {} passed, {} failed, {} skipped",
            self.summary.total, self.summary.passed, self.summary.failed, self.summary.skipped
        )?;
        let verdict = if self.summary.conformant {
            "CONFORMANT"
        } else {
            "NON-CONFORMANT"
        };
        writeln!(f, "Result: {}", verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SuiteReport {
        let mut report = SuiteReport::new("std");
        report.add_record(RunRecord::passed(
            "vec",
            Capability::List,
            Variant::Typed,
            Duration::from_millis(3),
        ));
        report.add_record(RunRecord::failed(
            "broken-map",
            Capability::Dictionary,
            Variant::Typed,
            "[dictionary.duplicate_key] Double keys possible".to_string(),
            Duration::from_millis(1),
        ));
        report.add_record(RunRecord::skipped(
            "socket",
            Capability::AsyncStream,
            Variant::Typed,
            "no network",
        ));
        report.finalize();
        report
    }

    #[test]
    fn test_report_finalize() {
        let report = sample();
        assert_eq!(
            report.summary,
            ReportSummary {
                total: 3,
                passed: 1,
                failed: 1,
                skipped: 1,
                conformant: false,
            }
        );
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_report_to_text() {
        let text = sample().to_text();
        assert!(text.contains("Suite: std"));
        assert!(text.contains("NON-CONFORMANT"));
        assert!(text.contains("Double keys possible"));
        assert!(text.contains("Skipped: no network"));
        assert!(text.contains("[FAIL] broken-map (typed"));
        assert!(text.contains("3 runs: 1 passed, 1 failed, 1 skipped"));
        assert!(text.find("list:") < text.find("dictionary:"));
    }

    #[test]
    fn test_report_to_json() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["records"][0]["capability"], "List");
    }

    #[test]
    fn test_empty_report_is_conformant() {
        let mut report = SuiteReport::new("empty");
        report.finalize();
        report.assert_conformant();
    }

    #[test]
    #[should_panic(expected = "NON-CONFORMANT")]
    fn test_assert_conformant_panics_with_report() {
        sample().assert_conformant();
    }
}
