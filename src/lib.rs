//! Command-line front-end for packaging application entry points.
//!
//! This library turns command line flags and an optional JSON config into
//! one options record per target and hands the batch to a packaging engine:
//! - AppImage bundles on Linux
//! - DMG disk images on macOS
//! - EXE installers on Windows
//! - ZIP archives everywhere else
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod options;
pub mod packager;

// Re-export commonly used types
pub use error::{CliError, PackagerError, Result};
