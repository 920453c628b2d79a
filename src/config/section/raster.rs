//! `[raster]` section configuration.
//!
//! Output format and rendering settings.
//!
//! # Example
//!
//! ```toml
//! [raster]
//! format = "png"          # Output format: png | jpg | webp
//! converter = "builtin"   # Conversion backend: builtin | magick | ffmpeg
//! fit = "contain"         # Non-square viewBox handling: contain | cover | fill
//! quality = 90            # JPEG quality (1-100), ignored for png/webp
//! ```

use crate::config::ConfigDiagnostics;
use crate::utils::exec::is_installed;
use serde::{Deserialize, Serialize};

pub mod fields {
    use crate::config::FieldPath;

    pub const CONVERTER: FieldPath = FieldPath::new("raster.converter");
    pub const QUALITY: FieldPath = FieldPath::new("raster.quality");
}

/// Raster output format
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    /// PNG format.
    #[default]
    PNG,
    /// JPEG format (alpha flattened onto white).
    JPG,
    /// Lossless WebP format.
    WEBP,
}

impl RasterFormat {
    /// Get file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::PNG => "png",
            Self::JPG => "jpg",
            Self::WEBP => "webp",
        }
    }

    /// Check if this format can carry transparency.
    pub fn has_alpha(&self) -> bool {
        !matches!(self, Self::JPG)
    }
}

impl std::str::FromStr for RasterFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::PNG),
            "jpg" | "jpeg" => Ok(Self::JPG),
            "webp" => Ok(Self::WEBP),
            other => Err(format!("unknown raster format `{other}` (png | jpg | webp)")),
        }
    }
}

/// Rasterization backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Converter {
    /// Use built-in Rust libraries (usvg + resvg).
    #[default]
    Builtin,
    /// Use ImageMagick (`magick` command).
    Magick,
    /// Use FFmpeg for conversion.
    Ffmpeg,
}

impl Converter {
    /// External program required by this backend, if any.
    pub fn program(&self) -> Option<&'static str> {
        match self {
            Self::Builtin => None,
            Self::Magick => Some("magick"),
            Self::Ffmpeg => Some("ffmpeg"),
        }
    }
}

impl std::str::FromStr for Converter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "builtin" => Ok(Self::Builtin),
            "magick" => Ok(Self::Magick),
            "ffmpeg" => Ok(Self::Ffmpeg),
            other => Err(format!(
                "unknown converter `{other}` (builtin | magick | ffmpeg)"
            )),
        }
    }
}

/// How a non-square viewBox is mapped onto the square target.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to fit inside, centre, pad with transparency.
    #[default]
    Contain,
    /// Scale to cover, centre, crop overflow.
    Cover,
    /// Stretch each axis independently.
    Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    /// Output format for rendered icons.
    pub format: RasterFormat,

    /// Conversion backend for rasterization.
    pub converter: Converter,

    /// Mapping of non-square sources onto the square output.
    pub fit: FitMode,

    /// JPEG quality (1-100).
    pub quality: u8,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            format: RasterFormat::PNG,
            converter: Converter::Builtin,
            fit: FitMode::Contain,
            quality: 90,
        }
    }
}

impl RasterConfig {
    /// Validate raster configuration.
    ///
    /// # Checks
    /// - quality must be within 1..=100
    /// - external converters (magick/ffmpeg) must be installed
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(1..=100).contains(&self.quality) {
            diag.error_with_hint(
                fields::QUALITY,
                format!("quality {} is out of range", self.quality),
                "use a value between 1 and 100",
            );
        }

        if let Some(program) = self.converter.program()
            && !is_installed(program)
        {
            diag.error_with_hint(
                fields::CONVERTER,
                format!("`{program}` command not found"),
                format!(
                    "install {} or set {} = \"builtin\"",
                    installer_name(program),
                    fields::CONVERTER.as_str()
                ),
            );
        }
    }
}

fn installer_name(program: &str) -> &'static str {
    match program {
        "magick" => "ImageMagick",
        _ => "FFmpeg",
    }
}
