//! Command-line runtime for the refract transformation engine.
//!
//! `run` processes a JSON Lines batch through the pipeline, `apply`
//! rewrites a single file with one transformation, and `list` prints the
//! catalogue. Output streams are injected so the runtime can be driven from
//! tests.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser as _;
use refract_config::{Config, OutputLayout};
use refract_pipeline::{
    JsonlSink, Pipeline, STDIN_PATH, StructuredRunReporter, create_sink, open_input, telemetry,
};
use refract_rules::{Registry, RegistryError, TransformationResult, catalogue};
use refract_syntax::{Parser, SupportedLanguage, SyntaxError};

mod cli;
mod errors;

use cli::{ApplyArgs, Cli, CliCommand, ListArgs, RunArgs};
use errors::AppError;

/// Exit status for command-line usage errors.
const USAGE_EXIT: u8 = 2;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };

    let result = match cli.command {
        CliCommand::Run(args) => run_batch(args, stdout, stderr),
        CliCommand::Apply(args) => apply_one(&args, stdout),
        CliCommand::List(args) => list(&args, stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            writeln!(stderr, "refract: {error}").ok();
            ExitCode::FAILURE
        }
    }
}

/// Writes a clap diagnostic to the stream it belongs on.
fn report_usage<W: Write, E: Write>(
    error: &clap::Error,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode {
    let rendered = error.render();
    if error.use_stderr() {
        write!(stderr, "{rendered}").ok();
        ExitCode::from(USAGE_EXIT)
    } else {
        write!(stdout, "{rendered}").ok();
        ExitCode::SUCCESS
    }
}

fn run_batch<W: Write, E: Write>(
    args: RunArgs,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<(), AppError> {
    let config = Config::load(&args.config)?;
    telemetry::initialise(&config)?;
    let layout = config.output_layout();
    let pipeline = Pipeline::new(config, StructuredRunReporter::new())?;

    let input = open_input(&args.input)?;
    let summary = if layout == OutputLayout::Single && args.output.as_os_str() == STDIN_PATH {
        pipeline.run(input, &mut JsonlSink::new(&mut *stdout))?
    } else {
        let mut sink = create_sink(layout, &args.output, pipeline.registry().names())?;
        pipeline.run(input, &mut sink)?
    };

    writeln!(stderr, "{summary}").map_err(AppError::WriteOutput)
}

fn read_source(path: &Path) -> Result<String, AppError> {
    let failed = |source: io::Error| AppError::ReadSource {
        path: path.to_path_buf(),
        source,
    };
    if path.as_os_str() == STDIN_PATH {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(failed)?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(failed)
    }
}

/// Picks the language from `--language`, then the file extension. Standard
/// input without `--language` is read as C++.
fn resolve_language(args: &ApplyArgs) -> Result<SupportedLanguage, SyntaxError> {
    if let Some(language) = args.language {
        return Ok(language);
    }
    if args.file.as_os_str() == STDIN_PATH {
        return Ok(SupportedLanguage::default());
    }
    SupportedLanguage::from_path(&args.file)
        .ok_or_else(|| SyntaxError::unknown_language(args.file.clone()))
}

fn apply_one<W: Write>(args: &ApplyArgs, stdout: &mut W) -> Result<(), AppError> {
    let language = resolve_language(args)?;
    let registry = Registry::from_names(&[args.transformation.as_str()], language)?;
    let source = read_source(&args.file)?;

    let mut parser = Parser::new(language)?;
    let tree = parser.parse(source)?;
    let transformation = registry
        .get(&args.transformation)
        .ok_or_else(|| RegistryError::Unknown {
            name: args.transformation.clone(),
        })?;

    match transformation.apply(&tree, &mut parser) {
        TransformationResult::Success(text) => {
            stdout.write_all(text.as_bytes()).map_err(AppError::WriteOutput)?;
            stdout.flush().map_err(AppError::WriteOutput)
        }
        TransformationResult::NoMatch => Err(AppError::NoMatch {
            name: args.transformation.clone(),
        }),
        TransformationResult::Failure(error) => Err(AppError::Transform {
            name: args.transformation.clone(),
            source: Box::new(error),
        }),
    }
}

fn list<W: Write>(args: &ListArgs, stdout: &mut W) -> Result<(), AppError> {
    let entries: Vec<_> = catalogue()
        .into_iter()
        .filter(|transformation| {
            args.language
                .is_none_or(|language| transformation.supports(language))
        })
        .collect();
    let width = entries
        .iter()
        .map(|transformation| transformation.name().len())
        .max()
        .unwrap_or_default();

    for transformation in &entries {
        let languages: Vec<&str> = transformation
            .languages()
            .iter()
            .map(|language| language.as_str())
            .collect();
        writeln!(
            stdout,
            "{:<width$}  {:<5}  {}",
            transformation.name(),
            languages.join(","),
            transformation.description()
        )
        .map_err(AppError::WriteOutput)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
