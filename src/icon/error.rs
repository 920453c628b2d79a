//! Icon batch error taxonomy.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single icon size.
///
/// Every variant carries the size and the path involved so the report can
/// name exactly which icon broke the batch.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("source icon for size {size} not found: `{}`", path.display())]
    AssetNotFound { size: u32, path: PathBuf },

    #[error("failed to read source icon for size {size}: `{}`", path.display())]
    ReadFailure {
        size: u32,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to rasterize size {size} from `{}`: {reason}", path.display())]
    ConversionFailure {
        size: u32,
        path: PathBuf,
        reason: String,
    },

    #[error("failed to write icon for size {size}: `{}`", path.display())]
    WriteFailure {
        size: u32,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Error class without payload, for matching in callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconErrorKind {
    AssetNotFound,
    ReadFailure,
    ConversionFailure,
    WriteFailure,
}

impl IconError {
    /// Classify a read error: `NotFound` is a missing asset, anything else a read failure.
    pub fn from_read(size: u32, path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::AssetNotFound { size, path }
        } else {
            Self::ReadFailure { size, path, source }
        }
    }

    pub fn conversion(size: u32, path: PathBuf, reason: &anyhow::Error) -> Self {
        Self::ConversionFailure {
            size,
            path,
            reason: format!("{reason:#}"),
        }
    }

    pub fn kind(&self) -> IconErrorKind {
        match self {
            Self::AssetNotFound { .. } => IconErrorKind::AssetNotFound,
            Self::ReadFailure { .. } => IconErrorKind::ReadFailure,
            Self::ConversionFailure { .. } => IconErrorKind::ConversionFailure,
            Self::WriteFailure { .. } => IconErrorKind::WriteFailure,
        }
    }

    /// Size whose conversion failed.
    pub fn size(&self) -> u32 {
        match self {
            Self::AssetNotFound { size, .. }
            | Self::ReadFailure { size, .. }
            | Self::ConversionFailure { size, .. }
            | Self::WriteFailure { size, .. } => *size,
        }
    }
}

impl fmt::Display for IconErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AssetNotFound => "asset not found",
            Self::ReadFailure => "read failure",
            Self::ConversionFailure => "conversion failure",
            Self::WriteFailure => "write failure",
        };
        f.write_str(name)
    }
}
