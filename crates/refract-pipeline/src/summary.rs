//! Per-transformation outcome counts for a run.

use std::fmt;

use crate::record::Outcome;

/// Outcome counts for one transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationCounts {
    name: String,
    success: usize,
    no_match: usize,
    failed: usize,
}

impl TransformationCounts {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    /// Transformation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of successful rewrites.
    #[must_use]
    pub const fn success(&self) -> usize {
        self.success
    }

    /// Number of records without a match.
    #[must_use]
    pub const fn no_match(&self) -> usize {
        self.no_match
    }

    /// Number of failed pairs.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Count for a single outcome.
    #[must_use]
    pub const fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Success => self.success,
            Outcome::NoMatch => self.no_match,
            Outcome::Failed => self.failed,
        }
    }

    const fn record(&mut self, outcome: Outcome) {
        let slot = match outcome {
            Outcome::Success => &mut self.success,
            Outcome::NoMatch => &mut self.no_match,
            Outcome::Failed => &mut self.failed,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Outcome counts for every enabled transformation, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    records: usize,
    transformations: Vec<TransformationCounts>,
}

impl RunSummary {
    /// Creates an empty summary for the given transformations.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            records: 0,
            transformations: names.into_iter().map(TransformationCounts::new).collect(),
        }
    }

    /// Counts one more input record.
    pub const fn record_seen(&mut self) {
        self.records = self.records.saturating_add(1);
    }

    /// Counts an outcome for the transformation at `index`.
    pub fn record(&mut self, index: usize, outcome: Outcome) {
        if let Some(counts) = self.transformations.get_mut(index) {
            counts.record(outcome);
        }
    }

    /// Number of input records read.
    #[must_use]
    pub const fn records(&self) -> usize {
        self.records
    }

    /// Per-transformation counts.
    #[must_use]
    pub fn transformations(&self) -> &[TransformationCounts] {
        &self.transformations
    }

    /// Counts for `name`, if it was enabled.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TransformationCounts> {
        self.transformations.iter().find(|counts| counts.name == name)
    }

    /// Total failed pairs across all transformations.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.transformations.iter().map(TransformationCounts::failed).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .transformations
            .iter()
            .map(|counts| counts.name.len())
            .chain(std::iter::once("transformation".len()))
            .max()
            .unwrap_or_default();
        writeln!(
            f,
            "{:<width$}  {:>8}  {:>8}  {:>8}",
            "transformation", "success", "no_match", "failed"
        )?;
        for counts in &self.transformations {
            writeln!(
                f,
                "{:<width$}  {:>8}  {:>8}  {:>8}",
                counts.name, counts.success, counts.no_match, counts.failed
            )?;
        }
        write!(f, "total records: {}", self.records)
    }
}
