//! Batch pipeline for the refract transformation engine.
//!
//! Reads JSON Lines records, applies every enabled transformation to each
//! record's source text and writes one tagged result record per
//! (record, transformation) pair. A bad record never aborts the run: each
//! failing pair becomes a `failed` output record and processing continues.
//!
//! - [`Pipeline`] drives the run on a rayon pool, one parser per worker,
//!   and emits results in input order
//! - [`JsonlSource`] reads input in bounded chunks
//! - [`RecordSink`] receives output, either as one stream ([`JsonlSink`])
//!   or as one file per transformation ([`DirectorySink`])
//! - [`RunReporter`] observes the run; [`StructuredRunReporter`] logs to
//!   `tracing`
//! - [`telemetry::initialise`] installs the global subscriber

mod error;
mod pipeline;
mod record;
mod reporter;
mod sink;
mod source;
mod summary;
pub mod telemetry;

pub use error::{PipelineError, RecordError};
pub use pipeline::Pipeline;
pub use record::{
    FailureReason, LINE_FIELD, Outcome, OutputBuilder, PairResult, Record, RecordFailure,
    RecordFields,
};
pub use reporter::{FailureReport, RunReporter, StructuredRunReporter};
pub use sink::{DirectorySink, JsonlSink, RecordSink, create_sink};
pub use source::{InputLine, JsonlSource, STDIN_PATH, open_input};
pub use summary::{RunSummary, TransformationCounts};
