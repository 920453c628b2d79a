//! Utility modules.
//!
//! - [`exec`]: External command execution (magick, ffmpeg)
//! - [`hash`]: blake3 content hashing
//! - [`path`]: Path normalization and display
//! - [`plural`]: Count formatting

pub mod exec;
pub mod hash;
pub mod path;
pub mod plural;
