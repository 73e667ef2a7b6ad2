//! Builder discovery.

use std::{fmt, path::Path, sync::Arc};

use super::Builder;
use crate::error::{PackagerError, Result};

type LoadFn = dyn Fn(&str) -> Result<Builder> + Send + Sync;

/// Resolver injected into every options record: maps a builder identifier
/// or path to a runnable [`Builder`].
#[derive(Clone)]
pub struct BuilderLoader(Arc<LoadFn>);

impl BuilderLoader {
    /// Wraps a custom resolver.
    pub fn new<F>(load: F) -> Self
    where
        F: Fn(&str) -> Result<Builder> + Send + Sync + 'static,
    {
        Self(Arc::new(load))
    }

    /// Resolves `builder` to a runnable builder.
    pub fn load(&self, builder: &str) -> Result<Builder> {
        (self.0)(builder)
    }
}

impl Default for BuilderLoader {
    fn default() -> Self {
        Self::new(resolve_builder)
    }
}

impl fmt::Debug for BuilderLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BuilderLoader(<fn>)")
    }
}

/// Default resolution: an identifier naming an existing file is used as-is,
/// anything else is looked up on `PATH`.
pub fn resolve_builder(builder: &str) -> Result<Builder> {
    let path = Path::new(builder);
    if path.is_file() {
        log::debug!("Using builder at {}", path.display());
        return Ok(Builder::new(builder, path.to_path_buf()));
    }

    match which::which(builder) {
        Ok(program) => {
            log::debug!("Found builder {} at {}", builder, program.display());
            Ok(Builder::new(builder, program))
        }
        Err(e) => {
            log::debug!("Builder {} not found in PATH: {}", builder, e);
            Err(PackagerError::BuilderNotFound {
                builder: builder.to_string(),
                reason: e.to_string(),
            })
        }
    }
}
