//! Icon asset naming convention.

use std::path::{Path, PathBuf};

/// One logical icon at one size.
///
/// The source lives at `<dir>/<prefix>-{s}x{s}.<source_ext>` and the raster
/// output next to it with the raster extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    pub size: u32,
    pub source: PathBuf,
    pub output: PathBuf,
}

impl IconAsset {
    /// Resolve source and output paths for `size`.
    pub fn new(dir: &Path, prefix: &str, size: u32, source_ext: &str, raster_ext: &str) -> Self {
        let stem = Self::stem(prefix, size);
        Self {
            size,
            source: dir.join(format!("{stem}.{source_ext}")),
            output: dir.join(format!("{stem}.{raster_ext}")),
        }
    }

    /// Base file name shared by source and output, e.g. `icon-72x72`.
    pub fn stem(prefix: &str, size: u32) -> String {
        format!("{prefix}-{size}x{size}")
    }

    /// Whether writing the output would replace the source.
    ///
    /// Extensions compare case-insensitively so `PNG` sources are caught on
    /// case-insensitive filesystems too.
    pub fn overwrites_source(&self) -> bool {
        match (self.source.extension(), self.output.extension()) {
            (Some(source), Some(output)) => source.eq_ignore_ascii_case(output),
            (source, output) => source == output,
        }
    }

    /// Output file name for display.
    pub fn output_name(&self) -> String {
        self.output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_convention() {
        let asset = IconAsset::new(Path::new("public/icons"), "icon", 96, "svg", "png");
        assert_eq!(asset.size, 96);
        assert_eq!(asset.source, PathBuf::from("public/icons/icon-96x96.svg"));
        assert_eq!(asset.output, PathBuf::from("public/icons/icon-96x96.png"));
    }

    #[test]
    fn test_custom_prefix_and_format() {
        let asset = IconAsset::new(Path::new("/tmp"), "app", 512, "svg", "webp");
        assert_eq!(asset.output_name(), "app-512x512.webp");
        assert_eq!(asset.source.parent(), asset.output.parent());
    }

    #[test]
    fn test_overwrites_source() {
        let dir = Path::new("icons");
        assert!(!IconAsset::new(dir, "icon", 72, "svg", "png").overwrites_source());
        assert!(IconAsset::new(dir, "icon", 72, "png", "png").overwrites_source());
        assert!(IconAsset::new(dir, "icon", 72, "PNG", "png").overwrites_source());
        assert!(!IconAsset::new(dir, "icon", 72, "jpeg", "jpg").overwrites_source());
    }

    #[test]
    fn test_stem() {
        assert_eq!(IconAsset::stem("icon", 72), "icon-72x72");
    }
}
