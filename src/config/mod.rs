//! Configuration management for `icongen.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── icons      # [icons]
//! │   ├── raster     # [raster]
//! │   └── batch      # [batch]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # IconGenConfig (this file)
//! ```
//!
//! # Precedence
//!
//! built-in defaults < `icongen.toml` < command-line flags

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

// Re-export from section/
pub use section::{BatchMode, Converter, FitMode, RasterConfig, RasterFormat};

// Re-export from types/
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use section::{BatchConfig, IconsConfig};

use crate::{
    cli::{BuildArgs, Cli, Commands},
    debug, log,
    rasterizer::RasterizerConfig,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing icongen.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IconGenConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file, or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Icon location, naming and sizes
    #[serde(default)]
    pub icons: IconsConfig,

    /// Output format and rendering
    #[serde(default)]
    pub raster: RasterConfig,

    /// Failure semantics
    #[serde(default)]
    pub batch: BatchConfig,
}

impl IconGenConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Without one, the
    /// built-in defaults apply and the cwd becomes the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config, &cwd) {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                config.config_path = Some(path);
                config
            }
            None => {
                debug!("config"; "no {} found, using defaults", cli.config.display());
                Self {
                    root: cwd.clone(),
                    ..Self::default()
                }
            }
        };

        config.finalize(cli, &cwd);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content).map_err(ConfigError::from)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored):", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI overrides and normalize paths.
    ///
    /// `--dir` is relative to the working directory, `icons.dir` to the root.
    fn finalize(&mut self, cli: &Cli, cwd: &Path) {
        crate::logger::set_verbose(cli.verbose);

        match &cli.dir {
            Some(dir) => self.icons.dir = util::resolve_dir(dir, cwd),
            None => self.icons.normalize(&self.root),
        }

        Self::update_option(&mut self.icons.sizes, cli.sizes.as_ref());
        Self::update_option(&mut self.raster.format, cli.format.as_ref());
        Self::update_option(&mut self.raster.converter, cli.converter.as_ref());

        if let Commands::Build { build_args } = cli.command() {
            self.apply_build_args(&build_args);
        }
    }

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        // --atomic only ever turns atomic mode on
        if args.atomic {
            self.batch.atomic = true;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.icons.validate(&mut diag);
        self.raster.validate(&mut diag);

        let raster_ext = self.raster.format.extension();
        if self.icons.source.trim().eq_ignore_ascii_case(raster_ext) {
            diag.error_with_hint(
                section::icons::fields::SOURCE,
                format!("source extension `{}` is also the output format", self.icons.source),
                "outputs would overwrite their sources; pick another raster.format",
            );
        }

        Ok(diag.into_result()?)
    }

    /// Explicit rasterizer input derived from this configuration.
    pub fn rasterizer(&self) -> RasterizerConfig {
        RasterizerConfig {
            dir: self.icons.dir.clone(),
            prefix: self.icons.prefix.clone(),
            source_ext: self.icons.source.clone(),
            sizes: self.icons.sizes.clone(),
            raster: self.raster.clone(),
            mode: self.batch.mode(),
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> IconGenConfig {
    let (parsed, ignored) = IconGenConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
