//! Named, timed aggregation of harness runs

use crate::capability::{Capability, Variant};
use crate::error::HarnessResult;
use crate::harness::Harness;
use crate::report::{RunRecord, SuiteReport};
use std::future::Future;
use std::time::Instant;

/// Runs checks through a [`Harness`] and records each outcome.
pub struct Suite {
    harness: Harness,
    report: SuiteReport,
    started: Instant,
}

impl Suite {
    pub fn new(name: impl Into<String>, harness: Harness) -> Self {
        Self {
            harness,
            report: SuiteReport::new(name),
            started: Instant::now(),
        }
    }

    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    /// Run one check and record it under `name`.
    pub fn check<R>(
        &mut self,
        name: &str,
        capability: Capability,
        variant: Variant,
        run: impl FnOnce(&Harness) -> HarnessResult<R>,
    ) -> HarnessResult<R> {
        let start = Instant::now();
        let result = run(&self.harness);
        self.conclude(name, capability, variant, start, &result);
        result
    }

    /// Async counterpart of [`check`](Self::check). The check receives its
    /// own handle on the harness.
    pub async fn check_async<R, F, Fut>(
        &mut self,
        name: &str,
        capability: Capability,
        variant: Variant,
        run: F,
    ) -> HarnessResult<R>
    where
        F: FnOnce(Harness) -> Fut,
        Fut: Future<Output = HarnessResult<R>>,
    {
        let start = Instant::now();
        let result = run(self.harness.clone()).await;
        self.conclude(name, capability, variant, start, &result);
        result
    }

    pub fn skip(
        &mut self,
        name: &str,
        capability: Capability,
        variant: Variant,
        reason: impl Into<String>,
    ) {
        self.record(RunRecord::skipped(name, capability, variant, reason));
    }

    pub fn record(&mut self, record: RunRecord) {
        self.report.add_record(record);
    }

    fn conclude<R>(
        &mut self,
        name: &str,
        capability: Capability,
        variant: Variant,
        start: Instant,
        result: &HarnessResult<R>,
    ) {
        let duration = start.elapsed();
        let record = match result {
            Ok(_) => RunRecord::passed(name, capability, variant, duration),
            Err(err) => RunRecord::failed(name, capability, variant, err.to_string(), duration),
        };
        self.record(record);
    }

    /// Close the suite and compute its summary.
    pub fn finish(mut self) -> SuiteReport {
        self.report.duration = self.started.elapsed();
        self.report.finalize();
        tracing::info!(
            suite = %self.report.suite_name,
            total = self.report.summary.total,
            failed = self.report.summary.failed,
            "suite finished"
        );
        self.report
    }

    /// Finish and panic with the text report if any check failed.
    pub fn assert_conformant(self) {
        self.finish().assert_conformant();
    }
}
