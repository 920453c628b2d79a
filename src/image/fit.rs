//! Placement of a viewBox inside a square raster.

use crate::config::FitMode;

/// Affine placement: per-axis scale plus translation, in target pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Place a `(width, height)` source inside a `target`×`target` square.
///
/// A square source maps edge to edge in every mode.
pub fn place(source: (f32, f32), target: u32, fit: FitMode) -> Placement {
    let (width, height) = source;
    #[allow(clippy::cast_precision_loss)]
    let target = target as f32;
    let sx = target / width;
    let sy = target / height;

    let scale = match fit {
        FitMode::Fill => {
            return Placement {
                scale_x: sx,
                scale_y: sy,
                offset_x: 0.0,
                offset_y: 0.0,
            };
        }
        FitMode::Contain => sx.min(sy),
        FitMode::Cover => sx.max(sy),
    };

    // Centre on both axes; negative offsets crop (cover)
    Placement {
        scale_x: scale,
        scale_y: scale,
        offset_x: (target - width * scale) / 2.0,
        offset_y: (target - height * scale) / 2.0,
    }
}
