//! Options record handed to the packaging engine, and the per-target
//! assembly rules that finalize it.

mod target;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::packager::{BuilderLoader, PackageType, host_platform};

pub use target::{default_product_name, resolve_module, resolve_target};

/// Icon embedded into the packaged application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    /// Icon file path
    pub file: PathBuf,
    /// Edge length in pixels
    pub size: u32,
}

/// Options for one target.
///
/// Serialized with the camelCase keys packager configs use
/// (`productName`, `executableName`, `productFileName`).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagerOptions {
    /// Bundle format builder
    #[serde(rename = "type")]
    pub package_type: PackageType,

    /// Debug output requested
    pub debug: bool,

    /// Output directory
    pub output: PathBuf,

    /// Target platform identifier
    pub platform: String,

    /// Icons, in preference order
    pub icons: Vec<Icon>,

    /// `from[:to]` assets copied into packaged resources
    pub assets: Vec<String>,

    /// `from:to` symlinks created in the package
    pub symlinks: Vec<String>,

    /// `from[:to]` directories copied into packaged resources
    pub directories: Vec<String>,

    /// Display name of the product
    pub product_name: String,

    /// Name of the packaged executable
    pub executable_name: String,

    /// Base name of the produced artifact
    pub product_file_name: String,

    /// Packager-specific keys from the config file, forwarded untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Resolver for builder implementations
    #[serde(skip)]
    pub load_builder: BuilderLoader,
}

impl Default for PackagerOptions {
    fn default() -> Self {
        Self {
            package_type: PackageType::host_default(),
            debug: false,
            output: PathBuf::from("build"),
            platform: host_platform(),
            icons: default_icons(),
            assets: Vec::new(),
            symlinks: Vec::new(),
            directories: Vec::new(),
            product_name: String::new(),
            executable_name: String::new(),
            product_file_name: String::new(),
            extra: Map::new(),
            load_builder: BuilderLoader::default(),
        }
    }
}

/// The bundled 64px icon shipped in `assets/` next to the executable.
pub fn default_icons() -> Vec<Icon> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets").join("icon.ico")))
        .map(|file| vec![Icon { file, size: 64 }])
        .unwrap_or_default()
}

/// Explicit values for the three naming fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NameOverrides {
    pub product_name: Option<String>,
    pub executable_name: Option<String>,
    pub product_file_name: Option<String>,
}

/// Produces the finalized options for each target.
///
/// The first target assembled fixes the default product name for the
/// whole invocation. Naming fields are then layered in this order:
/// derived default, config file values, command-line flags.
#[derive(Debug)]
pub struct OptionsAssembler {
    base: PackagerOptions,
    config_names: NameOverrides,
    cli_names: NameOverrides,
    default_name: Option<String>,
}

impl OptionsAssembler {
    pub fn new(base: PackagerOptions, config_names: NameOverrides, cli_names: NameOverrides) -> Self {
        Self {
            base,
            config_names,
            cli_names,
            default_name: None,
        }
    }

    /// Default product name, once a target has been assembled.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Finalizes the options for an already-resolved target.
    pub fn assemble(&mut self, target: &str) -> PackagerOptions {
        let default = self
            .default_name
            .get_or_insert_with(|| default_product_name(target))
            .clone();

        let mut options = self.base.clone();
        options.product_name = default.clone();
        options.executable_name = default.clone();
        options.product_file_name = default.clone();

        if let Some(name) = &self.config_names.product_name {
            options.product_name = name.clone();
        }
        if let Some(name) = &self.config_names.executable_name {
            options.executable_name = name.clone();
        }
        if let Some(name) = &self.config_names.product_file_name {
            options.product_file_name = name.clone();
        }

        if let Some(name) = &self.cli_names.product_name {
            options.product_name = name.clone();
            // keep the file name in sync unless it was pinned elsewhere
            if options.product_file_name.is_empty() || options.product_file_name == default {
                options.product_file_name = name.clone();
            }
        }
        if let Some(name) = &self.cli_names.executable_name {
            options.executable_name = name.clone();
        }
        if let Some(name) = &self.cli_names.product_file_name {
            options.product_file_name = name.clone();
        }

        options
    }
}
