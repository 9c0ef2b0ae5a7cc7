//! Structured reporting for run lifecycle events.

use std::sync::Arc;

use serde_json::Value;

use refract_config::Config;
use refract_rules::{Registry, TransformError};

use crate::record::FailureReason;
use crate::summary::RunSummary;

/// Details of one failed (record, transformation) pair.
#[derive(Debug, Clone, Copy)]
pub struct FailureReport<'a> {
    /// One-based input line number.
    pub line: usize,
    /// Record identifier, when it could be read.
    pub id: Option<&'a Value>,
    /// Transformation that failed.
    pub transformation: &'a str,
    /// Why it failed.
    pub reason: &'a FailureReason,
}

impl FailureReport<'_> {
    fn id_text(&self) -> String {
        self.id.map_or_else(|| "null".to_owned(), Value::to_string)
    }
}

/// Observer trait used to surface run events to telemetry sinks.
pub trait RunReporter: Send + Sync {
    /// Invoked once the registry is built, before input is read.
    fn run_started(&self, registry: &Registry, config: &Config);

    /// Invoked for every failed pair.
    fn record_failed(&self, report: &FailureReport<'_>);

    /// Invoked after all output is flushed.
    fn run_finished(&self, summary: &RunSummary);
}

impl<T> RunReporter for Arc<T>
where
    T: RunReporter,
{
    fn run_started(&self, registry: &Registry, config: &Config) {
        (**self).run_started(registry, config);
    }

    fn record_failed(&self, report: &FailureReport<'_>) {
        (**self).record_failed(report);
    }

    fn run_finished(&self, summary: &RunSummary) {
        (**self).run_finished(summary);
    }
}

/// Default reporter that records run events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredRunReporter;

impl StructuredRunReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RunReporter for StructuredRunReporter {
    fn run_started(&self, registry: &Registry, config: &Config) {
        tracing::info!(
            target: "refract::pipeline",
            event = "run_started",
            language = %registry.language(),
            transformations = %registry.names().collect::<Vec<_>>().join(","),
            no_match = %config.no_match(),
            chain = config.chain(),
            batch_size = config.batch_size(),
            "starting transformation run"
        );
    }

    fn record_failed(&self, report: &FailureReport<'_>) {
        match report.reason {
            FailureReason::Transform(TransformError::OverlappingEdits { first, second }) => {
                tracing::error!(
                    target: "refract::pipeline",
                    event = "overlapping_edits",
                    line = report.line,
                    id = %report.id_text(),
                    transformation = report.transformation,
                    first = %first,
                    second = %second,
                    "transformation produced overlapping edits"
                );
            }
            FailureReason::Transform(error) if error.is_rule_defect() => {
                tracing::error!(
                    target: "refract::pipeline",
                    event = "record_failed",
                    line = report.line,
                    id = %report.id_text(),
                    transformation = report.transformation,
                    kind = report.reason.kind(),
                    error = %report.reason,
                    "transformation rule defect"
                );
            }
            FailureReason::Record(_) | FailureReason::Transform(_) => {
                tracing::warn!(
                    target: "refract::pipeline",
                    event = "record_failed",
                    line = report.line,
                    id = %report.id_text(),
                    transformation = report.transformation,
                    kind = report.reason.kind(),
                    error = %report.reason,
                    "record failed"
                );
            }
        }
    }

    fn run_finished(&self, summary: &RunSummary) {
        tracing::info!(
            target: "refract::pipeline",
            event = "run_finished",
            records = summary.records(),
            failures = summary.failures(),
            "transformation run finished"
        );
        for counts in summary.transformations() {
            tracing::info!(
                target: "refract::summary",
                event = "transformation_summary",
                transformation = counts.name(),
                success = counts.success(),
                no_match = counts.no_match(),
                failed = counts.failed(),
                "transformation summary"
            );
        }
    }
}
