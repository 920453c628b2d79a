//! SVG rasterization.
//!
//! # Modules
//!
//! - [`convert`]: SVG → PNG/JPG/WebP with builtin/magick/ffmpeg backends
//! - [`fit`]: placement of a viewBox inside the square target
//! - [`encode`]: pixmap → encoded raster bytes
//!
//! # Architecture
//!
//! ```text
//! SVG bytes + size
//!         │
//!         ▼
//!    ┌─────────┐
//!    │ convert │ ──► usvg parse (builtin) or magick/ffmpeg pipe
//!    └────┬────┘
//!         │ builtin only
//!         ▼
//!    ┌─────┐   ┌────────┐
//!    │ fit │──►│ encode │ ──► PNG / JPG / WebP bytes
//!    └─────┘   └────────┘
//! ```

mod convert;
mod encode;
mod fit;

pub use convert::{convert_svg, parse_svg};
