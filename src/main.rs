//! pkg-packager - packages application entry points into distributable
//! bundles (AppImage, DMG, EXE, ZIP).
//!
//! This binary parses flags and config, then delegates the actual bundle
//! construction to `pkg-packager-<type>` builder executables.

use std::process;

use pkg_packager::cli;

#[tokio::main]
async fn main() {
    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
