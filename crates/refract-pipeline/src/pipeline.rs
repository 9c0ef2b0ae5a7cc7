//! The batch pipeline: read, transform in parallel, emit in input order.

use std::io::BufRead;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use refract_config::{Config, MalformedInputPolicy, NoMatchPolicy};
use refract_rules::{Registry, TransformError, TransformationResult};
use refract_syntax::{Parser, SyntaxError, SyntaxTree};

use crate::error::PipelineError;
use crate::record::{
    FailureReason, Outcome, OutputBuilder, PairResult, Record, RecordFailure, RecordFields,
};
use crate::reporter::{FailureReport, RunReporter};
use crate::sink::RecordSink;
use crate::source::{InputLine, JsonlSource};
use crate::summary::RunSummary;

/// A record after every enabled transformation has run on it.
enum Processed {
    /// A readable record with one result per transformation, in registry
    /// order.
    Record {
        record: Record,
        results: Vec<PairResult>,
    },
    /// A line that could not be read; every pair fails.
    Unreadable(RecordFailure),
}

/// Runs the enabled transformations over a stream of records.
#[derive(Debug)]
pub struct Pipeline<R> {
    config: Config,
    registry: Registry,
    output: OutputBuilder,
    reporter: R,
}

impl<R: RunReporter> Pipeline<R> {
    /// Builds the registry for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Registry`] when a configured transformation
    /// is unknown or does not support the configured language.
    pub fn new(config: Config, reporter: R) -> Result<Self, PipelineError> {
        let registry = Registry::from_names(config.transformations(), config.language())?;
        let output = OutputBuilder::new(
            RecordFields {
                id: config.id_field().to_owned(),
                code: config.code_field().to_owned(),
            },
            config.no_match(),
        );
        Ok(Self {
            config,
            registry,
            output,
            reporter,
        })
    }

    /// The validated run configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The enabled transformations, in run order.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Processes every record of `input` and writes the results to `sink`.
    ///
    /// Records are transformed in parallel, one chunk at a time, and
    /// written in input order.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] when the worker pool cannot start, the
    /// input cannot be read or the sink rejects a write. Per-record
    /// failures are written as `failed` records instead.
    pub fn run<B, S>(&self, input: B, sink: &mut S) -> Result<RunSummary, PipelineError>
    where
        B: BufRead,
        S: RecordSink + ?Sized,
    {
        self.reporter.run_started(&self.registry, &self.config);

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.jobs().unwrap_or(0))
            .build()?;
        let language = self.registry.language();
        let mut source = JsonlSource::new(input);
        let mut summary = RunSummary::new(self.registry.names());

        loop {
            let chunk = source.next_chunk(self.config.batch_size())?;
            if chunk.is_empty() {
                break;
            }
            let processed: Vec<Processed> = pool.install(|| {
                chunk
                    .par_iter()
                    .map_init(
                        || Parser::new(language),
                        |parser, line| self.process(parser, line),
                    )
                    .collect()
            });
            for item in &processed {
                self.emit(item, sink, &mut summary)?;
            }
        }

        sink.flush().map_err(PipelineError::SinkWrite)?;
        self.reporter.run_finished(&summary);
        Ok(summary)
    }

    fn process(&self, parser: &mut Result<Parser, SyntaxError>, line: &InputLine) -> Processed {
        let parsed = line
            .text
            .as_deref()
            .map_err(|error| RecordFailure {
                line: line.number,
                id: None,
                error: error.clone(),
            })
            .and_then(|text| Record::parse(line.number, text, self.output.fields()));
        let record = match parsed {
            Ok(record) => record,
            Err(failure) => return Processed::Unreadable(failure),
        };
        let results = match parser {
            Ok(worker) => self.transform(worker, record.code()),
            Err(error) => self.fail_all(&TransformError::Parse(error.clone())),
        };
        Processed::Record { record, results }
    }

    /// Runs every enabled transformation on one source text.
    fn transform(&self, parser: &mut Parser, code: &str) -> Vec<PairResult> {
        let tree = match parser.parse(code) {
            Ok(tree) => tree,
            Err(error) => return self.fail_all(&TransformError::Parse(error)),
        };

        if self.config.malformed_input() == MalformedInputPolicy::Reject {
            let errors = tree.errors();
            if let Some(first) = errors.first() {
                return self.fail_all(&TransformError::MalformedInput {
                    count: errors.len(),
                    first: first.clone(),
                });
            }
        }

        if self.config.chain() {
            self.transform_chained(parser, tree)
        } else {
            self.registry
                .iter()
                .map(|transformation| transformation.apply(&tree, parser).into())
                .collect()
        }
    }

    /// Feeds each success into the next transformation.
    fn transform_chained(&self, parser: &mut Parser, tree: SyntaxTree) -> Vec<PairResult> {
        let mut current = tree;
        let mut results = Vec::with_capacity(self.registry.len());
        for transformation in &self.registry {
            let result = transformation.apply(&current, parser);
            if let TransformationResult::Success(text) = &result {
                match parser.parse(text.as_str()) {
                    Ok(next) => current = next,
                    Err(error) => {
                        results.push(PairResult::Failed(FailureReason::Transform(
                            TransformError::Parse(error),
                        )));
                        continue;
                    }
                }
            }
            results.push(result.into());
        }
        results
    }

    fn fail_all(&self, error: &TransformError) -> Vec<PairResult> {
        self.registry
            .iter()
            .map(|_| PairResult::Failed(FailureReason::Transform(error.clone())))
            .collect()
    }

    fn emit<S: RecordSink + ?Sized>(
        &self,
        processed: &Processed,
        sink: &mut S,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        summary.record_seen();
        match processed {
            Processed::Record { record, results } => {
                for (index, (transformation, result)) in
                    self.registry.iter().zip(results).enumerate()
                {
                    let name = transformation.name();
                    summary.record(index, result.outcome());
                    if let PairResult::Failed(reason) = result {
                        self.reporter.record_failed(&FailureReport {
                            line: record.line(),
                            id: Some(record.id()),
                            transformation: name,
                            reason,
                        });
                    }
                    if matches!(result, PairResult::NoMatch)
                        && self.config.no_match() == NoMatchPolicy::Skip
                    {
                        continue;
                    }
                    let output = self.output.build(record, name, result);
                    sink.write(name, &output).map_err(PipelineError::SinkWrite)?;
                }
            }
            Processed::Unreadable(failure) => {
                let reason = FailureReason::Record(failure.error.clone());
                let result = PairResult::Failed(reason.clone());
                for (index, transformation) in self.registry.iter().enumerate() {
                    let name = transformation.name();
                    summary.record(index, Outcome::Failed);
                    self.reporter.record_failed(&FailureReport {
                        line: failure.line,
                        id: failure.id.as_ref(),
                        transformation: name,
                        reason: &reason,
                    });
                    let output = self.output.build_unreadable(failure, name, &result);
                    sink.write(name, &output).map_err(PipelineError::SinkWrite)?;
                }
            }
        }
        Ok(())
    }
}
