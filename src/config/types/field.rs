//! Config field path used in diagnostics.

use crate::logger::paint;
use owo_colors::Style;
use std::fmt;

/// Dotted path of a config field, e.g. `icons.sizes`.
///
/// Each section declares its paths as constants in a `fields` module:
///
/// ```ignore
/// diag.error(icons::fields::SIZES, "no icon sizes configured");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&paint(format_args!("`{}`", self.0), Style::new().bright_blue()))
    }
}
