//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization and display

pub mod fs;

pub use fs::normalize_path;
