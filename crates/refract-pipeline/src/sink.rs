//! Output destinations for result records.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use refract_config::OutputLayout;
use serde_json::Value;

use crate::error::PipelineError;
use crate::source::STDIN_PATH;

/// Receives output records in emission order.
pub trait RecordSink {
    /// Writes one output record produced by `transformation`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O failure.
    fn write(&mut self, transformation: &str, record: &Value) -> io::Result<()>;

    /// Flushes buffered records.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O failure.
    fn flush(&mut self) -> io::Result<()>;
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn write(&mut self, transformation: &str, record: &Value) -> io::Result<()> {
        (**self).write(transformation, record)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

fn write_line<W: Write>(writer: &mut W, record: &Value) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")
}

/// Writes every record to a single JSON Lines stream.
#[derive(Debug)]
pub struct JsonlSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonlSink<W> {
    /// Wraps a writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl JsonlSink<BufWriter<Box<dyn Write + Send>>> {
    /// Creates a sink writing to `path`, or to standard output when it is
    /// `-`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::CreateOutput`] when the file cannot be
    /// created.
    pub fn create(path: &Path) -> Result<Self, PipelineError> {
        let writer: Box<dyn Write + Send> = if path.as_os_str() == STDIN_PATH {
            Box::new(io::stdout())
        } else {
            Box::new(File::create(path).map_err(|source| PipelineError::CreateOutput {
                path: path.to_path_buf(),
                source,
            })?)
        };
        Ok(Self::new(BufWriter::new(writer)))
    }
}

impl<W: Write> RecordSink for JsonlSink<W> {
    fn write(&mut self, _transformation: &str, record: &Value) -> io::Result<()> {
        write_line(&mut self.writer, record)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Writes each transformation's records to `<name>.jsonl` inside one
/// directory.
#[derive(Debug)]
pub struct DirectorySink {
    writers: HashMap<String, BufWriter<File>>,
}

impl DirectorySink {
    /// Creates `dir` if needed and one file per transformation name.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::CreateOutput`] naming the path that could
    /// not be created.
    pub fn create<'a>(
        dir: &Path,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, PipelineError> {
        let failed =
            |path: PathBuf| move |source: io::Error| PipelineError::CreateOutput { path, source };
        fs::create_dir_all(dir).map_err(failed(dir.to_path_buf()))?;

        let mut writers = HashMap::new();
        for name in names {
            let path = Self::file_for(dir, name);
            let file = File::create(&path).map_err(failed(path))?;
            writers.insert(name.to_owned(), BufWriter::new(file));
        }
        Ok(Self { writers })
    }

    /// Path of the file holding `name`'s records.
    #[must_use]
    pub fn file_for(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.jsonl"))
    }
}

impl RecordSink for DirectorySink {
    fn write(&mut self, transformation: &str, record: &Value) -> io::Result<()> {
        let writer = self.writers.get_mut(transformation).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no output file for transformation '{transformation}'"),
            )
        })?;
        write_line(writer, record)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writers.values_mut().try_for_each(Write::flush)
    }
}

/// Creates the sink `layout` describes at `path`.
///
/// # Errors
///
/// Returns [`PipelineError::CreateOutput`] when the output cannot be
/// created, including a per-transformation layout aimed at standard output.
pub fn create_sink<'a>(
    layout: OutputLayout,
    path: &Path,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<Box<dyn RecordSink>, PipelineError> {
    match layout {
        OutputLayout::Single => Ok(Box::new(JsonlSink::create(path)?)),
        OutputLayout::PerTransformation if path.as_os_str() == STDIN_PATH => {
            Err(PipelineError::CreateOutput {
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "per-transformation output needs a directory path",
                ),
            })
        }
        OutputLayout::PerTransformation => Ok(Box::new(DirectorySink::create(path, names)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn jsonl_sink_writes_one_object_per_line() {
        let mut sink = JsonlSink::new(Vec::new());
        sink.write("a", &json!({"id": 1})).expect("write");
        sink.write("b", &json!({"id": 2})).expect("write");
        sink.flush().expect("flush");
        let text = String::from_utf8(sink.into_inner()).expect("utf8");
        assert_eq!(text, "{\"id\":1}\n{\"id\":2}\n");
    }

    #[rstest]
    fn directory_sink_splits_by_transformation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("out");
        let mut sink =
            DirectorySink::create(&out, ["while_to_for", "for_to_while"]).expect("create");
        sink.write("while_to_for", &json!({"id": "a"})).expect("write");
        sink.write("for_to_while", &json!({"id": "b"})).expect("write");
        sink.write("while_to_for", &json!({"id": "c"})).expect("write");
        sink.flush().expect("flush");

        let read = |name: &str| {
            fs::read_to_string(DirectorySink::file_for(&out, name)).expect("read output")
        };
        assert_eq!(read("while_to_for"), "{\"id\":\"a\"}\n{\"id\":\"c\"}\n");
        assert_eq!(read("for_to_while"), "{\"id\":\"b\"}\n");
    }

    #[rstest]
    fn per_transformation_layout_needs_a_directory() {
        let Err(error) = create_sink(OutputLayout::PerTransformation, Path::new("-"), ["a"]) else {
            panic!("expected stdout to be rejected");
        };
        assert!(matches!(error, PipelineError::CreateOutput { .. }));
    }

    #[rstest]
    fn directory_sink_rejects_unknown_transformation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = DirectorySink::create(dir.path(), ["a"]).expect("create");
        let error = sink.write("b", &json!({})).expect_err("unknown");
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }
}
