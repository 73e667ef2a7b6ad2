//! Command line interface for pkg-packager.
//!
//! Arguments and the optional JSON config are folded into one options
//! record per target, every target is registered with the packaging
//! engine, and the engine runs the batch once. Written artifacts are
//! reported one line each on stdout.

mod args;
mod output;
mod permissive;

pub use args::{Args, ParseFailure, parse_package_type};
pub use output::{format_size, report_results, wrote_line};
pub use permissive::{Split, split_unknown};

use std::{ffi::OsString, io::Write};

use crate::{
    config::PackagerConfig,
    error::Result,
    logging,
    options::{OptionsAssembler, PackagerOptions, resolve_target},
    packager::{BatchConfig, CommandPackager, Packager},
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let raw: Vec<OsString> = std::env::args_os().skip(1).collect();
    let mut packager = CommandPackager::new();
    run_with(raw, &mut packager, &mut std::io::stdout(), &mut std::io::stderr()).await
}

/// Runs the whole pipeline against an arbitrary engine and output streams.
///
/// Returns the process exit code. Only failures to write to `out`/`err`
/// are returned as errors; packaging failures are reported on `err` and
/// turned into exit code 1.
pub async fn run_with<P, O, E>(raw: Vec<OsString>, packager: &mut P, out: &mut O, err: &mut E) -> Result<i32>
where
    P: Packager,
    O: Write,
    E: Write,
{
    let args = match Args::try_parse_permissive(raw) {
        Ok(args) => args,
        Err(failure) if failure.wants_help() => return print_help(out),
        Err(failure) if failure.wants_version() => return print_version(out),
        Err(failure) => {
            write!(err, "{}", failure.error.render())?;
            return Ok(1);
        }
    };

    if args.help {
        return print_help(out);
    }
    if args.version {
        return print_version(out);
    }

    logging::init(args.debug);
    if !args.passthrough.is_empty() {
        log::debug!("Passing through unknown flags: {:?}", args.passthrough);
    }

    if args.targets.is_empty() {
        writeln!(out, "{}", Args::usage())?;
        return Ok(1);
    }

    let results = match package(&args, packager, err).await {
        Ok(results) => results,
        Err(e) => {
            log::debug!("{:?}", e);
            writeln!(err, "error: {}", e)?;
            return Ok(1);
        }
    };

    let cwd = std::env::current_dir()
        .ok()
        .map(|dir| dir.to_string_lossy().into_owned());
    report_results(out, &results, cwd.as_deref())?;

    Ok(0)
}

/// Assembles and registers every target, then runs the batch.
async fn package<P, E>(
    args: &Args,
    packager: &mut P,
    err: &mut E,
) -> Result<Vec<Option<crate::packager::PackageResult>>>
where
    P: Packager,
    E: Write,
{
    let mut base = PackagerOptions {
        debug: args.debug,
        output: args.output.clone(),
        platform: args.platform.clone(),
        assets: args.assets.clone(),
        symlinks: args.symlinks.clone(),
        directories: args.directories.clone(),
        ..PackagerOptions::default()
    };

    let mut type_name = args.package_type.clone();
    let mut config_names = Default::default();
    if let Some(path) = &args.config {
        match PackagerConfig::load(path) {
            Ok(config) => {
                if config.is_empty() {
                    log::debug!("No pkg.packager section in {}", path.display());
                }
                let overrides = config.apply(&mut base);
                if let Some(name) = overrides.package_type {
                    type_name = name;
                }
                config_names = overrides.names;
            }
            Err(e) => {
                log::debug!("{:?}", e);
                writeln!(err, " warn: Invalid JSON for {}", path.display())?;
            }
        }
    }
    base.package_type = parse_package_type(&type_name)?;

    let mut assembler = OptionsAssembler::new(base, config_names, args.name_overrides());
    for target in &args.targets {
        let resolved = resolve_target(target);
        let options = assembler.assemble(&resolved);
        packager.register_target(resolved, options);
    }

    let batch = BatchConfig {
        config: args.config.clone(),
    };
    packager.package(&batch).await
}

fn print_help<O: Write>(out: &mut O) -> Result<i32> {
    writeln!(out, "{}", Args::usage())?;
    Ok(0)
}

fn print_version<O: Write>(out: &mut O) -> Result<i32> {
    writeln!(out, "{}", env!("CARGO_PKG_VERSION"))?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::PackagerError,
        packager::{PackageResult, PackageType},
    };

    /// In-memory engine that records registrations and replays a canned
    /// outcome.
    #[derive(Default)]
    struct RecordingPackager {
        registered: Vec<(String, PackagerOptions)>,
        batches: Vec<BatchConfig>,
        outcome: Option<std::result::Result<Vec<Option<PackageResult>>, String>>,
    }

    impl Packager for RecordingPackager {
        fn register_target(&mut self, target: String, options: PackagerOptions) {
            self.registered.push((target, options));
        }

        async fn package(&mut self, batch: &BatchConfig) -> Result<Vec<Option<PackageResult>>> {
            self.batches.push(batch.clone());
            match self.outcome.take() {
                Some(Ok(results)) => Ok(results),
                Some(Err(reason)) => Err(PackagerError::Builder {
                    builder: "pkg-packager-zip".to_string(),
                    reason,
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    struct Run {
        code: i32,
        stdout: String,
        stderr: String,
    }

    async fn run_args(args: &[&str], packager: &mut RecordingPackager) -> Run {
        let raw = args.iter().map(OsString::from).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run_with(raw, packager, &mut out, &mut err).await.unwrap();
        Run {
            code,
            stdout: String::from_utf8(out).unwrap(),
            stderr: String::from_utf8(err).unwrap(),
        }
    }

    fn artifact(name: &str) -> PackageResult {
        PackageResult {
            name: name.to_string(),
            size: 1_340_000,
            sha512: "cafe".to_string(),
        }
    }

    #[tokio::test]
    async fn no_targets_prints_usage_and_fails() {
        let mut packager = RecordingPackager::default();
        let run = run_args(&["-D", "-t", "zip"], &mut packager).await;

        assert_eq!(run.code, 1);
        assert!(run.stdout.contains("usage") || run.stdout.contains("Usage"));
        assert!(packager.batches.is_empty());
    }

    #[tokio::test]
    async fn help_and_version_always_exit_zero() {
        for args in [
            &["--help"][..],
            &["-h", "app.js"][..],
            &["--bogus", "-V"][..],
            &["--version", "-t", "nope", "app.js"][..],
            &["-h", "--output"][..],
        ] {
            let mut packager = RecordingPackager::default();
            let run = run_args(args, &mut packager).await;
            assert_eq!(run.code, 0, "args {args:?}");
            assert!(packager.registered.is_empty());
        }

        let mut packager = RecordingPackager::default();
        let run = run_args(&["-V"], &mut packager).await;
        assert_eq!(run.stdout.trim(), env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn targets_are_registered_then_packaged_once() {
        let mut packager = RecordingPackager::default();
        let run = run_args(
            &["-t", "zip", "-c", "missing-config.json", "/x/y/app.js", "/x/y/other.js"],
            &mut packager,
        )
        .await;

        assert_eq!(run.code, 0);
        assert_eq!(packager.batches.len(), 1);
        assert_eq!(
            packager.batches[0].config.as_deref(),
            Some(std::path::Path::new("missing-config.json"))
        );

        let names: Vec<_> = packager.registered.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(names, ["/x/y/app.js", "/x/y/other.js"]);
        for (_, options) in &packager.registered {
            assert_eq!(options.package_type, PackageType::Zip);
            assert_eq!(options.product_name, "app");
            assert_eq!(options.executable_name, "app");
            assert_eq!(options.product_file_name, "app");
        }
    }

    #[tokio::test]
    async fn invalid_config_warns_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("package.json");
        std::fs::write(&config, "{ \"pkg\": ").unwrap();

        let mut packager = RecordingPackager::default();
        let run = run_args(
            &["-a", "cli.txt", "-c", config.to_str().unwrap(), "/x/app.js"],
            &mut packager,
        )
        .await;

        assert_eq!(run.code, 0);
        assert!(run.stderr.contains(" warn: Invalid JSON for "));
        assert_eq!(packager.registered[0].1.assets, vec!["cli.txt"]);
    }

    #[tokio::test]
    async fn config_arrays_follow_cli_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("package.json");
        std::fs::write(
            &config,
            r#"{ "pkg": {
                "packager": { "assets": ["cfg.txt"], "output": "dist", "productName": "Cfg" },
                "assets": ["pkg.txt"]
            } }"#,
        )
        .unwrap();

        let mut packager = RecordingPackager::default();
        let run = run_args(
            &["-a", "one.txt", "--asset", "two.txt", "-o", "out", "-c", config.to_str().unwrap(), "/x/app.js"],
            &mut packager,
        )
        .await;

        assert_eq!(run.code, 0);
        let options = &packager.registered[0].1;
        assert_eq!(options.assets, vec!["one.txt", "two.txt", "cfg.txt", "pkg.txt"]);
        assert_eq!(options.output, std::path::PathBuf::from("dist"));
        assert_eq!(options.product_name, "Cfg");
        assert_eq!(options.product_file_name, "app");
    }

    #[tokio::test]
    async fn product_name_flag_updates_file_name() {
        let mut packager = RecordingPackager::default();
        run_args(&["--product-name", "Foo", "/x/y/app.js"], &mut packager).await;
        assert_eq!(packager.registered[0].1.product_file_name, "Foo");

        let mut packager = RecordingPackager::default();
        run_args(
            &["--product-file-name", "Bar", "--product-name", "Foo", "/x/y/app.js"],
            &mut packager,
        )
        .await;
        assert_eq!(packager.registered[0].1.product_name, "Foo");
        assert_eq!(packager.registered[0].1.product_file_name, "Bar");
    }

    #[tokio::test]
    async fn results_are_reported_skipping_gaps() {
        let mut packager = RecordingPackager {
            outcome: Some(Ok(vec![
                Some(artifact("/abs/one.zip")),
                None,
                Some(artifact("/abs/two.zip")),
            ])),
            ..Default::default()
        };
        let run = run_args(&["a.js", "b.js", "c.js"], &mut packager).await;

        assert_eq!(run.code, 0);
        let lines: Vec<_> = run.stdout.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "> wrote: /abs/one.zip (1.34 MB) sha512:cafe");
        assert!(lines[1].contains("sha512:cafe"));
    }

    #[tokio::test]
    async fn batch_failure_is_one_error_line() {
        let mut packager = RecordingPackager {
            outcome: Some(Err("disk full".to_string())),
            ..Default::default()
        };
        let run = run_args(&["app.js"], &mut packager).await;

        assert_eq!(run.code, 1);
        assert!(run.stdout.is_empty());
        assert_eq!(run.stderr, "error: builder pkg-packager-zip failed: disk full\n");
    }

    #[tokio::test]
    async fn invalid_type_fails_before_registration() {
        let mut packager = RecordingPackager::default();
        let run = run_args(&["-t", "deb", "app.js"], &mut packager).await;

        assert_eq!(run.code, 1);
        assert!(run.stderr.starts_with("error: Invalid arguments: unknown type deb"));
        assert!(packager.registered.is_empty());
    }

    fn write_config(dir: &tempfile::TempDir, packager: &str) -> String {
        let config = dir.path().join("package.json");
        std::fs::write(&config, format!(r#"{{ "pkg": {{ "packager": {packager} }} }}"#)).unwrap();
        config.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn config_type_overrides_invalid_flag() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, r#"{ "type": "zip" }"#);

        let mut packager = RecordingPackager::default();
        let run = run_args(&["-t", "deb", "-c", &config, "/x/app.js"], &mut packager).await;

        assert_eq!(run.code, 0, "stderr: {}", run.stderr);
        assert_eq!(packager.registered[0].1.package_type, PackageType::Zip);
    }

    #[tokio::test]
    async fn invalid_config_type_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(&dir, r#"{ "type": "deb" }"#);

        let mut packager = RecordingPackager::default();
        let run = run_args(&["-t", "zip", "-c", &config, "/x/app.js"], &mut packager).await;

        assert_eq!(run.code, 1);
        assert_eq!(run.stderr.lines().count(), 1);
        assert!(run.stderr.starts_with("error: Invalid arguments: unknown type deb"));
        assert!(packager.registered.is_empty());
        assert!(packager.batches.is_empty());
    }

    #[tokio::test]
    async fn repeated_flags_are_accepted() {
        let mut packager = RecordingPackager::default();
        let run = run_args(&["-D", "-D", "-o", "a", "-o", "b", "/x/app.js"], &mut packager).await;

        assert_eq!(run.code, 0, "stderr: {}", run.stderr);
        assert_eq!(packager.registered[0].1.output, std::path::PathBuf::from("b"));
    }

    #[tokio::test]
    async fn unknown_flags_do_not_fail() {
        let mut packager = RecordingPackager::default();
        let run = run_args(&["--no-bytecode", "--public-packages=*", "app.js"], &mut packager).await;

        assert_eq!(run.code, 0);
        assert_eq!(packager.registered.len(), 1);
    }
}
