//! Configuration section definitions.
//!
//! Each module corresponds to a section in `icongen.toml`:
//!
//! | Module   | TOML Section | Purpose                                  |
//! |----------|--------------|------------------------------------------|
//! | `icons`  | `[icons]`    | Icon directory, naming, sizes            |
//! | `raster` | `[raster]`   | Output format, backend, fit, quality     |
//! | `batch`  | `[batch]`    | Failure semantics (best-effort / atomic) |

mod batch;
pub mod icons;
pub mod raster;

pub use batch::{BatchConfig, BatchMode};
pub use icons::IconsConfig;
pub use raster::{Converter, FitMode, RasterConfig, RasterFormat};
