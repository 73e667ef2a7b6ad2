//! Default engine: one builder process per registered target.

use std::{
    io,
    path::{Path, PathBuf},
    process::Stdio,
};

use serde::Serialize;
use tokio::{io::AsyncWriteExt, process::Command};

use super::{BatchConfig, PackageResult, Packager};
use crate::{
    error::{PackagerError, Result},
    options::PackagerOptions,
};

/// Request written to a builder's stdin as a single JSON document.
#[derive(Debug, Serialize)]
pub struct BuildRequest<'a> {
    /// Resolved target entry point
    pub target: &'a str,
    /// Finalized options for the target
    pub options: &'a PackagerOptions,
    /// Config file given on the command line
    pub config: Option<&'a Path>,
}

/// A resolved builder executable.
#[derive(Clone, Debug)]
pub struct Builder {
    id: String,
    program: PathBuf,
}

impl Builder {
    /// Creates a builder from its identifier and resolved executable.
    pub fn new(id: impl Into<String>, program: PathBuf) -> Self {
        Self {
            id: id.into(),
            program,
        }
    }

    /// Identifier the builder was resolved from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Path of the builder executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the builder for one target.
    ///
    /// Stdout must hold one JSON value: `null`, `false` or nothing for a
    /// skipped target, otherwise `{ "name", "size", "sha512" }`. A non-zero
    /// exit status fails with the last line the builder wrote to stderr.
    pub async fn build(&self, request: &BuildRequest<'_>) -> Result<Option<PackageResult>> {
        let payload = serde_json::to_vec(request)?;

        log::debug!(
            "Running builder {} for {}",
            self.program.display(),
            request.target
        );

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.failure(format!("failed to start: {e}")))?;

        // stdin is written while stdout and stderr drain
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(&payload).await,
                None => Ok(()),
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        match fed {
            Ok(()) => {}
            // Builders are free to ignore the request.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("Builder {} closed stdin early", self.id);
            }
            Err(e) => return Err(e.into()),
        }
        let output = output?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            log::debug!("[{}] {}", self.id, line);
        }

        if !output.status.success() {
            let reason = stderr
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .last()
                .map(str::to_string)
                .unwrap_or_else(|| format!("exited with {}", output.status));
            return Err(self.failure(reason));
        }

        parse_builder_output(&output.stdout)
            .map_err(|e| self.failure(format!("invalid result: {e}")))
    }

    fn failure(&self, reason: String) -> PackagerError {
        PackagerError::Builder {
            builder: self.id.clone(),
            reason,
        }
    }
}

/// Interprets a builder's stdout.
fn parse_builder_output(stdout: &[u8]) -> serde_json::Result<Option<PackageResult>> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<serde_json::Value>(text)? {
        serde_json::Value::Null | serde_json::Value::Bool(false) => Ok(None),
        value => serde_json::from_value(value).map(Some),
    }
}

/// Engine that delegates every target to a builder executable.
///
/// Targets are packaged one after another in registration order; the first
/// failure aborts the batch.
#[derive(Debug, Default)]
pub struct CommandPackager {
    targets: Vec<(String, PackagerOptions)>,
}

impl CommandPackager {
    /// Creates an engine with no registered targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets registered so far.
    pub fn targets(&self) -> &[(String, PackagerOptions)] {
        &self.targets
    }
}

impl Packager for CommandPackager {
    fn register_target(&mut self, target: String, options: PackagerOptions) {
        log::debug!("Registered target {} ({})", target, options.package_type);
        self.targets.push((target, options));
    }

    async fn package(&mut self, batch: &BatchConfig) -> Result<Vec<Option<PackageResult>>> {
        let targets = std::mem::take(&mut self.targets);
        let mut results = Vec::with_capacity(targets.len());

        for (target, options) in &targets {
            let builder = options
                .load_builder
                .load(&options.package_type.builder_id())?;

            let request = BuildRequest {
                target,
                options,
                config: batch.config.as_deref(),
            };
            results.push(builder.build(&request).await?);
        }

        Ok(results)
    }
}
