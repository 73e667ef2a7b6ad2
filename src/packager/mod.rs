//! Packaging engine seam.
//!
//! The front-end never builds bundles itself. It registers each target with
//! a [`Packager`] and then asks it to package the whole batch once:
//!
//! 1. [`Packager::register_target`] is purely declarative
//! 2. [`Packager::package`] runs the batch and returns one entry per target
//! 3. `None` entries are targets that produced no artifact and are skipped
//!
//! [`CommandPackager`] is the default engine: it hands every target to a
//! builder executable (`pkg-packager-<type>`) resolved through the options'
//! [`BuilderLoader`].

mod command;
mod loader;
mod types;

use std::{future::Future, path::PathBuf};

use serde::Deserialize;

use crate::{error::Result, options::PackagerOptions};

pub use command::{BuildRequest, Builder, CommandPackager};
pub use loader::{BuilderLoader, resolve_builder};
pub use types::{PackageType, host_platform};

/// Batch-wide settings passed to [`Packager::package`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchConfig {
    /// Config file given on the command line, forwarded untouched.
    pub config: Option<PathBuf>,
}

/// Artifact reported by the engine for one target.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PackageResult {
    /// Path of the written artifact
    pub name: String,
    /// Artifact size in bytes
    pub size: u64,
    /// Hex-encoded SHA-512 of the artifact
    pub sha512: String,
}

/// External packaging engine.
pub trait Packager {
    /// Records a target and its finalized options. Performs no I/O.
    fn register_target(&mut self, target: String, options: PackagerOptions);

    /// Packages every registered target.
    ///
    /// The returned list is ordered like the registrations; `None` marks a
    /// target that was skipped. Any error aborts the whole batch.
    fn package(
        &mut self,
        batch: &BatchConfig,
    ) -> impl Future<Output = Result<Vec<Option<PackageResult>>>> + Send;
}
