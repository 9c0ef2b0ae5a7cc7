//! Chunked JSON Lines input.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{PipelineError, RecordError};

/// Path spelling that selects standard input.
pub const STDIN_PATH: &str = "-";

/// One non-blank input line with its one-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    /// One-based line number in the input.
    pub number: usize,
    /// Line text without the terminator, or why it could not be decoded.
    pub text: Result<String, RecordError>,
}

/// Reads JSON Lines input in bounded chunks.
///
/// Blank lines are skipped but still counted, so line numbers match the
/// input file.
#[derive(Debug)]
pub struct JsonlSource<R> {
    reader: R,
    line: usize,
    buffer: Vec<u8>,
}

impl<R: BufRead> JsonlSource<R> {
    /// Wraps a buffered reader.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: Vec::new(),
        }
    }

    /// Reads up to `size` non-blank lines. An empty chunk means the input is
    /// exhausted.
    ///
    /// A line that is not valid UTF-8 is still returned, carrying
    /// [`RecordError::InvalidUtf8`], so it fails on its own.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ReadInput`] when the reader fails.
    pub fn next_chunk(&mut self, size: usize) -> Result<Vec<InputLine>, PipelineError> {
        let mut chunk = Vec::with_capacity(size);
        while chunk.len() < size {
            self.buffer.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buffer)
                .map_err(PipelineError::ReadInput)?;
            if read == 0 {
                break;
            }
            self.line = self.line.saturating_add(1);
            let end = self
                .buffer
                .iter()
                .rposition(|byte| !matches!(byte, b'\n' | b'\r'))
                .map_or(0, |last| last.saturating_add(1));
            self.buffer.truncate(end);
            if self.buffer.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let text = std::str::from_utf8(&self.buffer)
                .map(str::to_owned)
                .map_err(|error| RecordError::InvalidUtf8 {
                    message: error.to_string(),
                });
            chunk.push(InputLine {
                number: self.line,
                text,
            });
        }
        Ok(chunk)
    }
}

/// Opens `path` for reading, or standard input when it is `-`.
///
/// # Errors
///
/// Returns [`PipelineError::OpenInput`] when the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead + Send>, PipelineError> {
    if path.as_os_str() == STDIN_PATH {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).map_err(|source| PipelineError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Box::new(BufReader::new(file)))
}
