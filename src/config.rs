//! Command-line and environment configuration for the `shelfmark` binary.
//!
//! # Environment Variables
//!
//! - `SHELFMARK_LOG`: `tracing` filter directives (default: `shelfmark=info`)

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

/// Run a catalog command script and write its reports to a file.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "shelfmark", version, about)]
pub struct Cli {
    /// Command script, one command per line.
    pub input: PathBuf,

    /// Where to write the reports [default: <INPUT stem>_output_file.txt next to INPUT]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub log_filter: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("input path {0:?} has no file name")]
    NoFileName(PathBuf),

    #[error("output path {0:?} would overwrite the input")]
    OutputIsInput(PathBuf),

    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}

impl RunConfig {
    pub const LOG_ENV: &'static str = "SHELFMARK_LOG";
    pub const DEFAULT_LOG_FILTER: &'static str = "shelfmark=info";
    const OUTPUT_SUFFIX: &'static str = "_output_file.txt";

    /// Resolves `cli` against the process environment.
    ///
    /// # Errors
    ///
    /// See [`RunConfig::resolve_with`].
    pub fn resolve(cli: Cli) -> Result<Self, ConfigError> {
        Self::resolve_with(cli, std::env::var_os(Self::LOG_ENV))
    }

    /// Resolves `cli` with an explicit log filter value in place of `SHELFMARK_LOG`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoFileName`] if no default output name can be derived from the input.
    /// - [`ConfigError::OutputIsInput`] if the output path names the input file.
    /// - [`ConfigError::InvalidValue`] if the log filter is not valid UTF-8 or does not parse.
    pub fn resolve_with(cli: Cli, log_filter: Option<OsString>) -> Result<Self, ConfigError> {
        let output = match cli.output {
            Some(output) => output,
            None => default_output(&cli.input)?,
        };
        if output == cli.input {
            return Err(ConfigError::OutputIsInput(output));
        }

        let log_filter = match log_filter {
            Some(value) => value.into_string().map_err(|_| ConfigError::InvalidValue {
                name: Self::LOG_ENV,
                message: "must be valid UTF-8".to_owned(),
            })?,
            None => Self::DEFAULT_LOG_FILTER.to_owned(),
        };
        tracing_subscriber::EnvFilter::try_new(&log_filter).map_err(|err| ConfigError::InvalidValue {
            name: Self::LOG_ENV,
            message: err.to_string(),
        })?;

        Ok(Self {
            input: cli.input,
            output,
            log_filter,
        })
    }
}

/// `dir/name.ext` becomes `dir/name_output_file.txt`.
fn default_output(input: &Path) -> Result<PathBuf, ConfigError> {
    let stem = input
        .file_stem()
        .ok_or_else(|| ConfigError::NoFileName(input.to_path_buf()))?;
    let mut name = stem.to_os_string();
    name.push(RunConfig::OUTPUT_SUFFIX);
    Ok(input.with_file_name(name))
}
