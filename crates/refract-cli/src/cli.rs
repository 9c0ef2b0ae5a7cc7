//! CLI argument definitions for the refract toolchain.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use refract_config::ConfigArgs;
use refract_syntax::SupportedLanguage;

/// Command-line interface for the refract transformation engine.
#[derive(Parser, Debug)]
#[command(
    name = "refract",
    version,
    about = "Rewrites C and C++ source with validated, syntax-aware transformations",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub(crate) enum CliCommand {
    /// Runs the enabled transformations over a JSON Lines batch.
    Run(RunArgs),
    /// Applies one transformation to a single source file.
    Apply(ApplyArgs),
    /// Lists the available transformations.
    List(ListArgs),
}

/// Arguments for `refract run`.
#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub(crate) config: ConfigArgs,
    /// JSON Lines input, or `-` for standard input.
    #[arg(short, long, value_name = "INPUT", default_value = "-")]
    pub(crate) input: PathBuf,
    /// Output file (or directory for the per-transformation layout), or `-`
    /// for standard output.
    #[arg(short, long, value_name = "OUTPUT", default_value = "-")]
    pub(crate) output: PathBuf,
}

/// Arguments for `refract apply`.
#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    /// Transformation to apply.
    #[arg(short = 't', long = "transformation", value_name = "NAME")]
    pub(crate) transformation: String,
    /// Source language; detected from the file extension when omitted.
    #[arg(long, value_name = "LANG")]
    pub(crate) language: Option<SupportedLanguage>,
    /// Source file, or `-` for standard input.
    #[arg(value_name = "FILE", default_value = "-")]
    pub(crate) file: PathBuf,
}

/// Arguments for `refract list`.
#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    /// Only list transformations that support this language.
    #[arg(long, value_name = "LANG")]
    pub(crate) language: Option<SupportedLanguage>,
}
