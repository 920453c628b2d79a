//! Ordered set of square icon sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sizes generated when nothing else is configured.
pub const DEFAULT_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];

/// Ordered sequence of square pixel dimensions.
///
/// Order is preserved exactly as configured and drives the batch order.
/// Zero is representable so configs and CLI input can be reported on, but
/// the rasterizer rejects it before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconSizeSet(Vec<u32>);

impl IconSizeSet {
    pub fn new(sizes: impl Into<Vec<u32>>) -> Self {
        Self(sizes.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sizes that can never be rendered (currently only zero).
    pub fn invalid(&self) -> Vec<u32> {
        self.iter().filter(|&s| s == 0).collect()
    }
}

impl Default for IconSizeSet {
    fn default() -> Self {
        Self(DEFAULT_SIZES.to_vec())
    }
}

impl fmt::Display for IconSizeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Parse a comma-separated list such as `72,96,128`.
impl FromStr for IconSizeSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sizes = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| format!("invalid icon size `{part}`"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if sizes.is_empty() {
            return Err("at least one icon size is required".to_string());
        }
        Ok(Self(sizes))
    }
}
