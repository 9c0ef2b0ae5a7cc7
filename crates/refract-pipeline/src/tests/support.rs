//! Shared helpers for pipeline tests.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use refract_config::Config;
use refract_rules::Registry;

use crate::reporter::{FailureReport, RunReporter};
use crate::{JsonlSink, Pipeline, RunSummary};

/// Run events captured by [`RecordingRunReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RunEvent {
    Started { transformations: Vec<String> },
    Failed { line: usize, transformation: String, kind: &'static str },
    Finished { records: usize },
}

/// Reporter that stores every event for later assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingRunReporter {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingRunReporter {
    pub(crate) fn events(&self) -> Vec<RunEvent> {
        self.events.lock().expect("events lock").clone()
    }

    fn push(&self, event: RunEvent) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl RunReporter for RecordingRunReporter {
    fn run_started(&self, registry: &Registry, _config: &Config) {
        self.push(RunEvent::Started {
            transformations: registry.names().map(str::to_owned).collect(),
        });
    }

    fn record_failed(&self, report: &FailureReport<'_>) {
        self.push(RunEvent::Failed {
            line: report.line,
            transformation: report.transformation.to_owned(),
            kind: report.reason.kind(),
        });
    }

    fn run_finished(&self, summary: &RunSummary) {
        self.push(RunEvent::Finished {
            records: summary.records(),
        });
    }
}

/// Output of a run over in-memory input.
pub(crate) struct RunOutput {
    pub(crate) summary: RunSummary,
    pub(crate) records: Vec<Value>,
    pub(crate) text: String,
    pub(crate) reporter: Arc<RecordingRunReporter>,
}

/// Runs `config` over `input` and collects the emitted records.
pub(crate) fn run_lines(config: Config, input: &str) -> RunOutput {
    run_bytes(config, input.as_bytes())
}

/// Runs `config` over raw input bytes, which need not be valid UTF-8.
pub(crate) fn run_bytes(config: Config, input: &[u8]) -> RunOutput {
    let reporter = Arc::new(RecordingRunReporter::default());
    let pipeline = Pipeline::new(config, Arc::clone(&reporter)).expect("pipeline");
    let mut sink = JsonlSink::new(Vec::new());
    let summary = pipeline.run(input, &mut sink).expect("run");
    let text = String::from_utf8(sink.into_inner()).expect("utf8 output");
    let records = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("output line is JSON"))
        .collect();
    RunOutput {
        summary,
        records,
        text,
        reporter,
    }
}

/// Builds one input line.
pub(crate) fn record_line(id: &str, code: &str) -> String {
    serde_json::json!({ "id": id, "input": code }).to_string()
}
