//! JSON configuration loading and merging.
//!
//! Only two sub-trees of the document are consulted:
//!
//! ```json
//! {
//!   "pkg": {
//!     "packager": { "type": "zip", "output": "dist", "assets": ["LICENSE"] },
//!     "assets": ["README.md"]
//!   }
//! }
//! ```
//!
//! Array options (`assets`, `symlinks`, `directories`) are appended after the
//! command-line values. Scalars overwrite whatever the command line set.
//! `type` is returned unparsed so it is validated once, whichever side set
//! it. Unrecognized keys are forwarded to the builders untouched.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::options::{NameOverrides, PackagerOptions};

/// Parsed configuration document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackagerConfig {
    packager: Option<Map<String, Value>>,
    assets: Option<Vec<Value>>,
}

impl PackagerConfig {
    /// Reads and parses a config file.
    ///
    /// Callers are expected to warn and carry on without a config when this
    /// fails.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let document: Value = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(Self::from_document(&document))
    }

    /// Extracts `pkg.packager` (object) and `pkg.assets` (array).
    pub fn from_document(document: &Value) -> Self {
        let pkg = document.get("pkg");
        Self {
            packager: pkg
                .and_then(|pkg| pkg.get("packager"))
                .and_then(Value::as_object)
                .cloned(),
            assets: pkg
                .and_then(|pkg| pkg.get("assets"))
                .and_then(Value::as_array)
                .cloned(),
        }
    }

    /// True when neither sub-tree was present.
    pub fn is_empty(&self) -> bool {
        self.packager.is_none() && self.assets.is_none()
    }

    /// Merges the config into `options`.
    ///
    /// Naming fields and `type` are not written here. Names are layered by
    /// the assembler between the derived defaults and the command-line
    /// flags; `type` replaces the `--type` string before it is parsed.
    pub fn apply(&self, options: &mut PackagerOptions) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::default();
        let names = &mut overrides.names;

        if let Some(packager) = &self.packager {
            for (key, value) in packager {
                match key.as_str() {
                    "assets" => append_mappings(&mut options.assets, key, value),
                    "symlinks" => append_mappings(&mut options.symlinks, key, value),
                    "directories" => append_mappings(&mut options.directories, key, value),
                    "type" if value.is_null() => {}
                    "type" => overrides.package_type = Some(render(value)),
                    "debug" => assign(&mut options.debug, key, value),
                    "output" => assign(&mut options.output, key, value),
                    "platform" => assign(&mut options.platform, key, value),
                    "icons" => assign(&mut options.icons, key, value),
                    "productName" => names.product_name = typed(key, value),
                    "executableName" => names.executable_name = typed(key, value),
                    "productFileName" => names.product_file_name = typed(key, value),
                    _ => {
                        options.extra.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        if let Some(assets) = &self.assets {
            options.assets.extend(mapping_strings(assets));
        }

        overrides
    }
}

/// Config values that are resolved after the merge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Raw `type`, overriding `--type`
    pub package_type: Option<String>,
    /// `productName`, `executableName`, `productFileName`
    pub names: NameOverrides,
}

/// Appends config entries after the existing ones when `value` is an array.
fn append_mappings(target: &mut Vec<String>, key: &str, value: &Value) {
    match value {
        Value::Array(entries) => target.extend(mapping_strings(entries)),
        _ => log::debug!("Ignoring non-array config value for {}", key),
    }
}

/// Flattens one level of nesting and renders non-strings as JSON text.
fn mapping_strings(entries: &[Value]) -> Vec<String> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::Array(nested) => out.extend(nested.iter().map(render)),
            other => out.push(render(other)),
        }
    }
    out
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn assign<T: DeserializeOwned>(slot: &mut T, key: &str, value: &Value) {
    if let Some(parsed) = typed(key, value) {
        *slot = parsed;
    }
}

fn typed<T: DeserializeOwned>(key: &str, value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::debug!("Ignoring config value for {}: {}", key, e);
            None
        }
    }
}
