//! Logger setup.
//!
//! Diagnostics go through the `log` facade to `env_logger` on stderr. The
//! default filter is `warn`, overridable with `RUST_LOG`:
//!
//! - `RUST_LOG=info`: progress from builders
//! - `RUST_LOG=debug`: target resolution, config merging, builder stderr
//!
//! `-D/--debug` turns on `debug` for this crate regardless of `RUST_LOG`.

use log::LevelFilter;

/// Initializes the global logger. Later calls are no-ops.
pub fn init(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_module(env!("CARGO_CRATE_NAME"), LevelFilter::Debug);
    }

    // already set when the pipeline is driven more than once in-process
    let _ = builder.format_timestamp(None).try_init();
}
