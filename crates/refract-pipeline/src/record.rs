//! Input records and the output records derived from them.

use serde::Serialize;
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use refract_config::NoMatchPolicy;
use refract_rules::{TransformError, TransformationResult};

use crate::error::RecordError;

/// Field added to unreadable-record markers in place of the identifier.
pub const LINE_FIELD: &str = "line";

/// Names of the record fields the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    /// Identifier field.
    pub id: String,
    /// Source text field.
    pub code: String,
}

/// One readable input record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    line: usize,
    id: Value,
    code: String,
    fields: Map<String, Value>,
}

/// An input line that could not be read as a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    /// One-based input line number.
    pub line: usize,
    /// The identifier, when it could be read.
    pub id: Option<Value>,
    /// What was wrong with the line.
    pub error: RecordError,
}

impl Record {
    /// Reads a record from one JSON Lines line.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordFailure`] carrying whatever identifier could be
    /// recovered.
    pub fn parse(line: usize, text: &str, names: &RecordFields) -> Result<Self, RecordFailure> {
        let fail = |id: Option<Value>, error: RecordError| RecordFailure { line, id, error };

        let value: Value = serde_json::from_str(text).map_err(|error| {
            fail(
                None,
                RecordError::InvalidJson {
                    message: error.to_string(),
                },
            )
        })?;
        let Value::Object(fields) = value else {
            return Err(fail(None, RecordError::NotAnObject));
        };

        let id = match fields.get(&names.id) {
            Some(id @ (Value::String(_) | Value::Number(_))) => id.clone(),
            Some(_) => {
                return Err(fail(
                    None,
                    RecordError::InvalidId {
                        field: names.id.clone(),
                    },
                ));
            }
            None => {
                return Err(fail(
                    None,
                    RecordError::MissingField {
                        field: names.id.clone(),
                    },
                ));
            }
        };

        let code = match fields.get(&names.code) {
            Some(Value::String(code)) => code.clone(),
            Some(_) => {
                return Err(fail(
                    Some(id),
                    RecordError::NotAString {
                        field: names.code.clone(),
                    },
                ));
            }
            None => {
                return Err(fail(
                    Some(id),
                    RecordError::MissingField {
                        field: names.code.clone(),
                    },
                ));
            }
        };

        Ok(Self {
            line,
            id,
            code,
            fields,
        })
    }

    /// One-based input line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// The identifier, echoed verbatim.
    #[must_use]
    pub const fn id(&self) -> &Value {
        &self.id
    }

    /// The source text.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Every field of the input object, in input order.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

/// Terminal state of one (record, transformation) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    /// The transformed text was emitted.
    Success,
    /// The trigger pattern does not occur in the record.
    NoMatch,
    /// The pair failed at some stage.
    Failed,
}

/// Why a pair failed.
#[derive(Debug, Clone)]
pub enum FailureReason {
    /// The line could not be read as a record.
    Record(RecordError),
    /// The transformation failed on a readable record.
    Transform(TransformError),
}

impl FailureReason {
    /// Stable identifier of the failure class, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record_error",
            Self::Transform(error) => error.kind(),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Record(error) => error.fmt(f),
            Self::Transform(error) => error.fmt(f),
        }
    }
}

/// Result of one transformation on one record.
#[derive(Debug, Clone)]
pub enum PairResult {
    /// The rewritten source text.
    Success(String),
    /// Nothing to rewrite.
    NoMatch,
    /// The pair failed.
    Failed(FailureReason),
}

impl PairResult {
    /// The outcome recorded for this pair.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        match self {
            Self::Success(_) => Outcome::Success,
            Self::NoMatch => Outcome::NoMatch,
            Self::Failed(_) => Outcome::Failed,
        }
    }
}

impl From<TransformationResult> for PairResult {
    fn from(result: TransformationResult) -> Self {
        match result {
            TransformationResult::Success(text) => Self::Success(text),
            TransformationResult::NoMatch => Self::NoMatch,
            TransformationResult::Failure(error) => Self::Failed(FailureReason::Transform(error)),
        }
    }
}

/// Builds output records for one run.
#[derive(Debug, Clone)]
pub struct OutputBuilder {
    names: RecordFields,
    no_match: NoMatchPolicy,
}

impl OutputBuilder {
    /// Creates a builder for the given field names and no-match policy.
    #[must_use]
    pub const fn new(names: RecordFields, no_match: NoMatchPolicy) -> Self {
        Self { names, no_match }
    }

    /// The field names records are read with.
    #[must_use]
    pub const fn fields(&self) -> &RecordFields {
        &self.names
    }

    /// Builds the output object for a readable record.
    ///
    /// Passthrough fields keep their input order. The source field carries
    /// the transformed text on success and the original text for a
    /// pass-through no-match; otherwise it is omitted.
    #[must_use]
    pub fn build(&self, record: &Record, transformation: &str, result: &PairResult) -> Value {
        let code = match result {
            PairResult::Success(text) => Some(text.as_str()),
            PairResult::NoMatch if self.no_match == NoMatchPolicy::PassThrough => {
                Some(record.code())
            }
            PairResult::NoMatch | PairResult::Failed(_) => None,
        };

        let mut output = Map::with_capacity(record.fields().len().saturating_add(3));
        for (key, value) in record.fields() {
            if *key == self.names.code {
                if let Some(text) = code {
                    output.insert(key.clone(), Value::String(text.to_owned()));
                }
            } else {
                output.insert(key.clone(), value.clone());
            }
        }
        Self::finish(output, transformation, result)
    }

    /// Builds the failure marker for a line that could not be read.
    #[must_use]
    pub fn build_unreadable(
        &self,
        failure: &RecordFailure,
        transformation: &str,
        result: &PairResult,
    ) -> Value {
        let mut output = Map::new();
        match &failure.id {
            Some(id) => {
                output.insert(self.names.id.clone(), id.clone());
            }
            None => {
                output.insert(self.names.id.clone(), Value::Null);
                output.insert(LINE_FIELD.to_owned(), Value::from(failure.line));
            }
        }
        Self::finish(output, transformation, result)
    }

    fn finish(mut output: Map<String, Value>, transformation: &str, result: &PairResult) -> Value {
        output.insert(
            "transformation".to_owned(),
            Value::String(transformation.to_owned()),
        );
        output.insert(
            "outcome".to_owned(),
            Value::String(result.outcome().to_string()),
        );
        if let PairResult::Failed(reason) = result {
            output.insert("reason".to_owned(), Value::String(reason.to_string()));
        }
        Value::Object(output)
    }
}
