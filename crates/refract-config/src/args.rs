//! Command-line flags for commands that run a batch.
//!
//! [`ConfigArgs`] is what users type; [`ConfigArgs::to_arguments`] renders
//! the flags that were given into the argument list `ortho_config` parses,
//! so command-line values take part in the normal precedence order.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Args;
use refract_syntax::SupportedLanguage;

use crate::defaults::DEFAULT_CONFIG_FILE;
use crate::logging::LogFormat;
use crate::policy::{MalformedInputPolicy, NoMatchPolicy, OutputLayout};

/// Program name placed first in the rendered argument list.
const PROGRAM_NAME: &str = "refract";

/// Configuration flags shared by every command that runs a batch.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// TOML configuration file (defaults to ./refract.toml when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    /// Source language of every record.
    #[arg(long, value_name = "LANG")]
    pub language: Option<SupportedLanguage>,

    /// Transformation to enable; repeat to enable several, in order.
    #[arg(short = 't', long = "transformation", value_name = "NAME")]
    pub transformations: Vec<String>,

    /// What to emit when a transformation finds nothing to rewrite.
    #[arg(long = "on-no-match", value_enum, value_name = "POLICY")]
    pub no_match: Option<NoMatchPolicy>,

    /// How to treat sources that already contain syntax errors.
    #[arg(long = "malformed-input", value_enum, value_name = "POLICY")]
    pub malformed_input: Option<MalformedInputPolicy>,

    /// Feed each transformation the previous successful output.
    #[arg(long, overrides_with = "no_chain")]
    pub chain: bool,

    /// Give every transformation the original source, even when the
    /// configuration file enables chaining.
    #[arg(long = "no-chain", overrides_with = "chain")]
    pub no_chain: bool,

    /// Record field holding the identifier.
    #[arg(long, value_name = "FIELD")]
    pub id_field: Option<String>,

    /// Record field holding the source text.
    #[arg(long, value_name = "FIELD")]
    pub code_field: Option<String>,

    /// Write one stream, or one file per transformation.
    #[arg(long, value_enum, value_name = "LAYOUT")]
    pub output_layout: Option<OutputLayout>,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(short = 'j', long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Records read and processed together.
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Tracing filter directive.
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Log line format.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl ConfigArgs {
    /// Resolves the configuration file to read, if any.
    ///
    /// An explicit path is always used; otherwise `refract.toml` in the
    /// working directory is used when it exists.
    #[must_use]
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config_path.clone().or_else(|| {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            fallback.is_file().then_some(fallback)
        })
    }

    /// The chaining choice made on the command line, if any.
    #[must_use]
    pub const fn chain_override(&self) -> Option<bool> {
        match (self.chain, self.no_chain) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }

    /// Renders the given flags as the argument list the settings loader
    /// parses. Flags that were not given are left out so lower layers still
    /// apply.
    #[must_use]
    pub fn to_arguments(&self) -> Vec<OsString> {
        let mut arguments = vec![OsString::from(PROGRAM_NAME)];
        let mut push = |flag: &str, value: OsString| {
            arguments.push(OsString::from(flag));
            arguments.push(value);
        };

        if let Some(path) = self.config_file() {
            push("--config-path", path.into_os_string());
        }
        if let Some(language) = self.language {
            push("--language", language.as_str().into());
        }
        for name in &self.transformations {
            push("--transformations", name.into());
        }
        if let Some(policy) = self.no_match {
            push("--no-match", policy.to_string().into());
        }
        if let Some(policy) = self.malformed_input {
            push("--malformed-input", policy.to_string().into());
        }
        if let Some(chain) = self.chain_override() {
            push("--chain", chain.to_string().into());
        }
        if let Some(field) = &self.id_field {
            push("--id-field", field.into());
        }
        if let Some(field) = &self.code_field {
            push("--code-field", field.into());
        }
        if let Some(layout) = self.output_layout {
            push("--output-layout", layout.to_string().into());
        }
        if let Some(jobs) = self.jobs {
            push("--jobs", jobs.to_string().into());
        }
        if let Some(batch_size) = self.batch_size {
            push("--batch-size", batch_size.to_string().into());
        }
        if let Some(filter) = &self.log_filter {
            push("--log-filter", filter.into());
        }
        if let Some(format) = self.log_format {
            push("--log-format", format.to_string().into());
        }
        arguments
    }
}
