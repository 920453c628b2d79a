//! Pixmap encoding.

use anyhow::{Context, Result};
use image::{
    ExtendedColorType, ImageEncoder,
    codecs::{jpeg::JpegEncoder, webp::WebPEncoder},
};
use resvg::tiny_skia::Pixmap;

use crate::config::RasterFormat;

/// Encode a rendered pixmap into `format`.
///
/// `quality` only affects JPEG.
pub fn encode(pixmap: &Pixmap, format: RasterFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        RasterFormat::PNG => pixmap.encode_png().context("Failed to encode PNG"),
        RasterFormat::JPG => {
            let rgb = flatten_on_white(pixmap);
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut buf, quality)
                .write_image(&rgb, pixmap.width(), pixmap.height(), ExtendedColorType::Rgb8)
                .context("Failed to encode JPEG")?;
            Ok(buf)
        }
        RasterFormat::WEBP => {
            let rgba = demultiplied_rgba(pixmap);
            let mut buf = Vec::new();
            WebPEncoder::new_lossless(&mut buf)
                .write_image(&rgba, pixmap.width(), pixmap.height(), ExtendedColorType::Rgba8)
                .context("Failed to encode WebP")?;
            Ok(buf)
        }
    }
}

/// Straight-alpha RGBA bytes (tiny-skia stores premultiplied).
fn demultiplied_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

/// RGB bytes composited over white.
///
/// With premultiplied input, `src + white * (1 - a)` is `c + (255 - a)`.
fn flatten_on_white(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let under = 255 - p.alpha();
            [p.red() + under, p.green() + under, p.blue() + under]
        })
        .collect()
}
