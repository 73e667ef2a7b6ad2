//! Target entry-point resolution.
//!
//! Targets follow Node's module lookup: relative and absolute paths are
//! probed as a file, then with a known extension, then as a directory
//! (`package.json` `main`, then `index.*`). Bare names are searched in
//! `node_modules` of the current directory and each of its ancestors.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use path_absolutize::Absolutize;

const EXTENSIONS: [&str; 3] = ["js", "json", "node"];

/// Resolves a target against the current directory.
///
/// Falls back to the original string when nothing matches.
pub fn resolve_target(target: &str) -> String {
    let resolved = std::env::current_dir()
        .ok()
        .and_then(|cwd| resolve_module(target, &cwd));

    match resolved {
        Some(path) => {
            log::debug!("Resolved target {} to {}", target, path.display());
            path.to_string_lossy().into_owned()
        }
        None => {
            log::debug!("Could not resolve target {}, using it as given", target);
            target.to_string()
        }
    }
}

/// Resolves `request` relative to `base`, returning an absolute path.
pub fn resolve_module(request: &str, base: &Path) -> Option<PathBuf> {
    if request.is_empty() {
        return None;
    }

    let path = Path::new(request);
    let found = if is_path_like(request) {
        load(&base.join(path))
    } else {
        base.ancestors()
            .map(|dir| dir.join("node_modules").join(path))
            .find_map(|candidate| load(&candidate))
    };

    found.map(|path| {
        let normalized = path.absolutize().map(|p| p.into_owned());
        normalized.unwrap_or(path)
    })
}

/// Product name derived from a target: its file name without extension.
pub fn default_product_name(target: &str) -> String {
    Path::new(target)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.to_string())
}

fn is_path_like(request: &str) -> bool {
    Path::new(request).is_absolute()
        || request == "."
        || request == ".."
        || request.starts_with("./")
        || request.starts_with("../")
        || (cfg!(windows) && (request.starts_with(".\\") || request.starts_with("..\\")))
}

fn load(candidate: &Path) -> Option<PathBuf> {
    load_as_file(candidate).or_else(|| load_as_directory(candidate))
}

fn load_as_file(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    EXTENSIONS
        .iter()
        .map(|ext| with_extension(path, ext))
        .find(|candidate| candidate.is_file())
}

fn load_as_directory(dir: &Path) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }

    if let Some(main) = package_main(&dir.join("package.json")) {
        let main_path = dir.join(main);
        if let Some(found) = load_as_file(&main_path).or_else(|| load_index(&main_path)) {
            return Some(found);
        }
    }

    load_index(dir)
}

fn load_index(dir: &Path) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("index.{ext}")))
        .find(|candidate| candidate.is_file())
}

fn package_main(manifest: &Path) -> Option<String> {
    let text = fs::read_to_string(manifest).ok()?;
    let manifest: serde_json::Value = serde_json::from_str(&text).ok()?;
    manifest.get("main")?.as_str().map(str::to_string)
}

/// Appends `.ext` without replacing an existing extension.
fn with_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
