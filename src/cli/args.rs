//! Command line argument schema.
//!
//! Help and version are plain boolean flags rather than clap's built-in
//! actions so the driver decides when they short-circuit.

use std::{ffi::OsString, path::PathBuf};

use clap::{CommandFactory, Parser};

use super::permissive::{self, Split};
use crate::{
    error::CliError,
    options::NameOverrides,
    packager::{PackageType, host_platform},
};

/// Packages application entry points into distributable bundles
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pkg-packager",
    about = "Packages application entry points into distributable bundles",
    override_usage = "pkg-packager [-hDV] [options] <input>",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
pub struct Args {
    /// Path to asset to copy into packaged resources
    #[arg(short = 'a', long = "asset", value_name = "FROM[:TO]")]
    pub assets: Vec<String>,

    /// Path to JSON configuration
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to directory to copy into packaged resources
    #[arg(short = 'd', long = "directory", value_name = "FROM[:TO]")]
    pub directories: Vec<String>,

    /// Enable debug output
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// The program executable name
    #[arg(long, value_name = "NAME")]
    pub executable_name: Option<String>,

    /// Show this message
    #[arg(short, long)]
    pub help: bool,

    /// Symlink a file path
    #[arg(short = 'l', long = "symlink", value_name = "FROM:TO")]
    pub symlinks: Vec<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "build")]
    pub output: PathBuf,

    /// The platform type (linux|macos|win)
    #[arg(short, long, value_name = "PLATFORM", default_value_t = host_platform())]
    pub platform: String,

    /// The packaged product file name
    #[arg(long, value_name = "NAME")]
    pub product_file_name: Option<String>,

    /// The packaged product name
    #[arg(long, value_name = "NAME")]
    pub product_name: Option<String>,

    /// Packager builder (appimage|appdmg|exe|zip)
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        default_value_t = PackageType::host_default().to_string()
    )]
    pub package_type: String,

    /// Output program version
    #[arg(short = 'V', long)]
    pub version: bool,

    /// Application entry points to package
    #[arg(value_name = "INPUT")]
    pub targets: Vec<String>,

    /// Unrecognized flags, kept for diagnostics
    #[arg(skip)]
    pub passthrough: Vec<String>,
}

impl Args {
    /// Parses arguments (program name excluded), dropping unknown flags.
    pub fn try_parse_permissive<I, T>(raw: I) -> Result<Self, ParseFailure>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let split = permissive::split_unknown(&Self::command(), raw.into_iter().map(Into::into));
        let argv = std::iter::once(OsString::from("pkg-packager")).chain(split.known.iter().cloned());

        match Self::try_parse_from(argv) {
            Ok(mut args) => {
                args.passthrough = split.unknown;
                Ok(args)
            }
            Err(error) => Err(ParseFailure { error, split }),
        }
    }

    /// Rendered usage text.
    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }

    /// Builder selected with `--type`.
    pub fn package_type(&self) -> Result<PackageType, CliError> {
        parse_package_type(&self.package_type)
    }

    /// Explicit naming flags.
    pub fn name_overrides(&self) -> NameOverrides {
        NameOverrides {
            product_name: self.product_name.clone(),
            executable_name: self.executable_name.clone(),
            product_file_name: self.product_file_name.clone(),
        }
    }
}

/// Parses a builder identifier from the command line or the config file.
pub fn parse_package_type(value: &str) -> Result<PackageType, CliError> {
    value
        .parse()
        .map_err(|reason| CliError::InvalidArguments { reason })
}

/// Arguments clap rejected, with enough context to still honor
/// `--help` and `--version`.
#[derive(Debug)]
pub struct ParseFailure {
    pub error: clap::Error,
    split: Split,
}

impl ParseFailure {
    pub fn wants_help(&self) -> bool {
        self.split.saw("help")
    }

    pub fn wants_version(&self) -> bool {
        self.split.saw("version")
    }
}
