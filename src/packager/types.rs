//! Builder identifiers and host platform detection.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// Builder used to produce the distributable bundle.
///
/// Each variant maps to a builder executable named `pkg-packager-<id>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// Portable Linux AppImage
    AppImage,
    /// macOS disk image
    AppDmg,
    /// Windows installer executable
    Exe,
    /// Plain zip archive
    Zip,
}

impl PackageType {
    /// All builder identifiers, in the order shown in usage text.
    pub const ALL: [PackageType; 4] = [Self::AppImage, Self::AppDmg, Self::Exe, Self::Zip];

    /// Builder for the operating system this binary was compiled for.
    pub fn host_default() -> Self {
        if cfg!(target_os = "linux") {
            Self::AppImage
        } else if cfg!(target_os = "macos") {
            Self::AppDmg
        } else if cfg!(target_os = "windows") {
            Self::Exe
        } else {
            Self::Zip
        }
    }

    /// Lowercase identifier used on the command line and in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppImage => "appimage",
            Self::AppDmg => "appdmg",
            Self::Exe => "exe",
            Self::Zip => "zip",
        }
    }

    /// Name of the builder executable that produces this bundle type.
    pub fn builder_id(self) -> String {
        format!("pkg-packager-{}", self.as_str())
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<_> = Self::ALL.iter().map(|ty| ty.as_str()).collect();
                format!("unknown type {s} (expected one of: {})", valid.join(", "))
            })
    }
}

/// Canonical platform identifier of the running host.
///
/// Uses the same vocabulary as the builders: `linux`, `alpine`, `macos`,
/// `win`, `freebsd`. Any other OS is reported by its Rust name.
pub fn host_platform() -> String {
    match std::env::consts::OS {
        "linux" if Path::new("/etc/alpine-release").exists() => "alpine".to_string(),
        "linux" => "linux".to_string(),
        "macos" => "macos".to_string(),
        "windows" => "win".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_builder_id() {
        for ty in PackageType::ALL {
            assert_eq!(ty.as_str().parse::<PackageType>(), Ok(ty));
        }
    }

    #[test]
    fn rejects_unknown_builder_id() {
        let err = "deb".parse::<PackageType>().unwrap_err();
        assert!(err.contains("appimage, appdmg, exe, zip"));
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        let ty: PackageType = serde_json::from_str("\"appdmg\"").unwrap();
        assert_eq!(ty, PackageType::AppDmg);
        assert_eq!(serde_json::to_string(&PackageType::Zip).unwrap(), "\"zip\"");
    }

    #[test]
    fn builder_id_is_prefixed() {
        assert_eq!(PackageType::AppImage.builder_id(), "pkg-packager-appimage");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_hosts_default_to_appimage() {
        assert_eq!(PackageType::host_default(), PackageType::AppImage);
        assert!(matches!(host_platform().as_str(), "linux" | "alpine"));
    }
}
