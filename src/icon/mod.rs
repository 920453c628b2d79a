//! Icon data model.
//!
//! - [`IconSizeSet`]: ordered square sizes to generate
//! - [`IconAsset`]: source/output paths of one icon at one size
//! - [`IconError`]: per-size failure taxonomy

mod asset;
mod error;
mod size;

pub use asset::IconAsset;
pub use error::{IconError, IconErrorKind};
pub use size::IconSizeSet;
