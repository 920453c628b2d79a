//! `[icons]` section configuration.
//!
//! Where the source icons live and which sizes to generate.
//!
//! # Example
//!
//! ```toml
//! [icons]
//! dir = "public/icons"    # Relative to the config file's directory
//! prefix = "icon"         # Files are named `<prefix>-{s}x{s}.<ext>`
//! source = "svg"          # Source file extension
//! sizes = [72, 96, 128, 144, 152, 192, 384, 512]
//! ```

use crate::config::ConfigDiagnostics;
use crate::icon::IconSizeSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod fields {
    use crate::config::FieldPath;

    pub const DIR: FieldPath = FieldPath::new("icons.dir");
    pub const PREFIX: FieldPath = FieldPath::new("icons.prefix");
    pub const SOURCE: FieldPath = FieldPath::new("icons.source");
    pub const SIZES: FieldPath = FieldPath::new("icons.sizes");
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconsConfig {
    /// Directory holding both source and generated icons.
    pub dir: PathBuf,

    /// File name prefix shared by every icon.
    pub prefix: String,

    /// Extension of the vector sources.
    pub source: String,

    /// Sizes to generate, in order.
    pub sizes: IconSizeSet,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("public/icons"),
            prefix: "icon".to_string(),
            source: "svg".to_string(),
            sizes: IconSizeSet::default(),
        }
    }
}

impl IconsConfig {
    /// Resolve `dir` against the project root with tilde expansion.
    pub fn normalize(&mut self, root: &Path) {
        self.dir = crate::config::util::resolve_dir(&self.dir, root);
    }

    /// Validate icon configuration.
    ///
    /// # Checks
    /// - at least one size, none of them zero
    /// - non-empty prefix without path separators
    /// - non-empty source extension
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.sizes.is_empty() {
            diag.error_with_hint(
                fields::SIZES,
                "no icon sizes configured",
                "e.g. sizes = [72, 96, 128, 144, 152, 192, 384, 512]",
            );
        }

        let invalid = self.sizes.invalid();
        if !invalid.is_empty() {
            diag.error(
                fields::SIZES,
                format!("icon sizes must be positive (found {})", invalid.len()),
            );
        }

        if self.prefix.trim().is_empty() {
            diag.error(fields::PREFIX, "prefix must not be empty");
        } else if self.prefix.contains(['/', '\\']) {
            diag.error_with_hint(
                fields::PREFIX,
                format!("prefix `{}` contains a path separator", self.prefix),
                format!("put the directory part into {}", fields::DIR.as_str()),
            );
        }

        if self.source.trim().is_empty() {
            diag.error(fields::SOURCE, "source extension must not be empty");
        }

        if self.dir.exists() && !self.dir.is_dir() {
            diag.error(
                fields::DIR,
                format!("`{}` is not a directory", self.dir.display()),
            );
        }
    }
}
