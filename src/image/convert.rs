//! SVG format conversion.
//!
//! Converts SVG to raster formats (PNG, JPG, WebP) using various backends.

use anyhow::{Context, Result};
use resvg::tiny_skia::{Pixmap, Transform};

use super::{encode::encode, fit::place};
use crate::config::{Converter, FitMode, RasterConfig, RasterFormat};
use crate::utils::exec::Cmd;

/// Density passed to ImageMagick so small viewBoxes are not upscaled blurry.
const MAGICK_DENSITY: &str = "384";

/// Convert SVG to a `size`×`size` raster image
///
/// # Arguments
/// * `svg_data` - Raw SVG bytes
/// * `size` - Edge length of the square output in pixels
/// * `config` - Output format, backend, fit mode and quality
///
/// # Returns
/// Encoded image bytes, or error if the size is zero, the SVG is
/// malformed, or the backend fails.
pub fn convert_svg(svg_data: &[u8], size: u32, config: &RasterConfig) -> Result<Vec<u8>> {
    if size == 0 {
        anyhow::bail!("Invalid icon size: {size}x{size}");
    }

    let bytes = match config.converter {
        Converter::Builtin => return convert_builtin(svg_data, size, config),
        Converter::Magick => convert_magick(svg_data, size, config)?,
        Converter::Ffmpeg => convert_ffmpeg(svg_data, size, config)?,
    };

    // External tools are trusted less than our own renderer
    ensure_dimensions(&bytes, size)?;
    Ok(bytes)
}

/// Parse SVG data into a render tree.
pub fn parse_svg(svg_data: &[u8]) -> Result<usvg::Tree> {
    usvg::Tree::from_data(svg_data, &usvg::Options::default()).context("Failed to parse SVG")
}

/// Convert using built-in Rust libraries (usvg + resvg + image)
fn convert_builtin(svg_data: &[u8], size: u32, config: &RasterConfig) -> Result<Vec<u8>> {
    let tree = parse_svg(svg_data)?;
    let pixmap = render(&tree, size, config.fit)?;
    encode(&pixmap, config.format, config.quality)
}

/// Render the tree into a transparent square pixmap.
fn render(tree: &usvg::Tree, size: u32, fit: FitMode) -> Result<Pixmap> {
    let mut pixmap =
        Pixmap::new(size, size).with_context(|| format!("Failed to allocate {size}x{size} pixmap"))?;

    let tree_size = tree.size();
    let p = place((tree_size.width(), tree_size.height()), size, fit);
    let transform = Transform::from_row(p.scale_x, 0.0, 0.0, p.scale_y, p.offset_x, p.offset_y);

    resvg::render(tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Convert using ImageMagick
fn convert_magick(svg_data: &[u8], size: u32, config: &RasterConfig) -> Result<Vec<u8>> {
    let geometry = format!("{size}x{size}");
    let resize = match config.fit {
        FitMode::Contain => geometry.clone(),
        FitMode::Cover => format!("{geometry}^"),
        FitMode::Fill => format!("{geometry}!"),
    };
    let quality = config.quality.to_string();
    let format_arg = format!("{}:-", config.format.extension());

    let mut cmd = Cmd::new("magick")
        .args(["-background", "none", "-density", MAGICK_DENSITY, "svg:-"])
        .args(["-resize", resize.as_str(), "-gravity", "center", "-extent", geometry.as_str()]);

    if !config.format.has_alpha() {
        cmd = cmd.args(["-background", "white", "-flatten", "-quality", quality.as_str()]);
    }

    let output = cmd
        .arg(&format_arg)
        .stdin(svg_data)
        .run()
        .context("ImageMagick conversion failed")?;

    Ok(output.stdout)
}

/// Convert using FFmpeg
fn convert_ffmpeg(svg_data: &[u8], size: u32, config: &RasterConfig) -> Result<Vec<u8>> {
    let filter = match config.fit {
        FitMode::Contain => format!(
            "scale={size}:{size}:force_original_aspect_ratio=decrease,\
             pad={size}:{size}:(ow-iw)/2:(oh-ih)/2:color=0x00000000"
        ),
        FitMode::Cover => format!(
            "scale={size}:{size}:force_original_aspect_ratio=increase,crop={size}:{size}"
        ),
        FitMode::Fill => format!("scale={size}:{size}"),
    };

    let format_args: &[&str] = match config.format {
        RasterFormat::PNG => &["-pix_fmt", "rgba", "-c:v", "png", "-f", "image2pipe"],
        RasterFormat::WEBP => &["-pix_fmt", "yuva420p", "-c:v", "libwebp", "-lossless", "1", "-f", "webp"],
        RasterFormat::JPG => &["-c:v", "mjpeg", "-f", "image2pipe"],
    };

    let output = Cmd::new("ffmpeg")
        .args(["-loglevel", "error", "-f", "svg_pipe", "-frame_size", "1000000000", "-i", "pipe:"])
        .args(["-vf", filter.as_str(), "-frames:v", "1"])
        .args(format_args)
        .arg("pipe:1")
        .stdin(svg_data)
        .run()
        .context("FFmpeg conversion failed")?;

    Ok(output.stdout)
}

/// Decode `bytes` and check that the image really is `size`×`size`.
fn ensure_dimensions(bytes: &[u8], size: u32) -> Result<()> {
    let decoded = image::load_from_memory(bytes).context("Converter produced an unreadable image")?;
    let (width, height) = (decoded.width(), decoded.height());
    if (width, height) != (size, size) {
        anyhow::bail!("Converter produced {width}x{height}, expected {size}x{size}");
    }
    Ok(())
}
