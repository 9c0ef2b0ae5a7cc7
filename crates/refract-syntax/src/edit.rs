//! Byte spans, planned edits and their application to a source buffer.

use std::cmp::Reverse;
use std::fmt;
use std::ops::Range;

use crate::error::EditError;

/// A half-open byte range `[start, end)` into a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span. A span whose start lies after its end is rejected
    /// when an edit using it is applied.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates an empty span at `offset`, used for pure insertions.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// First byte covered by the span.
    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    /// First byte after the span.
    #[must_use]
    pub const fn end(self) -> usize {
        self.end
    }

    /// Number of bytes covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true when the span covers no bytes.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns the span as a `Range` suitable for slicing.
    #[must_use]
    pub const fn range(self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns true when `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true when the two spans cannot both be replaced independently.
    ///
    /// Non-empty spans intersect when they share a byte. Two insertions at
    /// the same offset intersect because their relative order is ambiguous.
    /// An insertion intersects a non-empty span only when it falls strictly
    /// inside it; insertions at either boundary are well ordered.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => self.start == other.start,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A planned substitution of `replacement` for the bytes under `span`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    span: Span,
    replacement: String,
}

impl Edit {
    /// Creates an edit.
    #[must_use]
    pub fn new(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }

    /// The span being replaced.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// The text written in place of the span.
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Applies `edits` to `source`, returning the rewritten text.
///
/// Every edit is checked before any is applied, so the call either applies
/// all edits or none. Edits are applied from the highest start offset to the
/// lowest so pending offsets stay valid; at equal starts the longer span is
/// replaced first, which places an insertion before a replacement sharing its
/// offset.
///
/// # Errors
///
/// Returns [`EditError::OutOfBounds`] or [`EditError::CharBoundary`] for a
/// span that does not address the buffer, and [`EditError::Overlapping`] for
/// the first pair of intersecting spans in submission order.
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    for edit in edits {
        check_bounds(source, edit.span)?;
    }
    check_overlaps(edits)?;

    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by_key(|edit| (Reverse(edit.span.start), Reverse(edit.span.end)));

    let mut result = source.to_owned();
    for edit in ordered {
        result.replace_range(edit.span.range(), &edit.replacement);
    }
    Ok(result)
}

fn check_bounds(source: &str, span: Span) -> Result<(), EditError> {
    if span.start > span.end || span.end > source.len() {
        return Err(EditError::OutOfBounds {
            span,
            len: source.len(),
        });
    }
    if !source.is_char_boundary(span.start) || !source.is_char_boundary(span.end) {
        return Err(EditError::CharBoundary { span });
    }
    Ok(())
}

fn check_overlaps(edits: &[Edit]) -> Result<(), EditError> {
    for (index, first) in edits.iter().enumerate() {
        let mut later = edits.iter().skip(index.saturating_add(1));
        if let Some(second) = later.find(|e| first.span.intersects(e.span)) {
            return Err(EditError::Overlapping {
                first: first.span,
                second: second.span,
            });
        }
    }
    Ok(())
}
