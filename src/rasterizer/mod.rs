//! Batch icon rasterization.
//!
//! Converts every configured size, strictly in order and one at a time:
//!
//! ```text
//! Pending ──► Converting(72) ──► Converting(96) ──► ... ──► Done
//!                   │                  │
//!                   └──────────────────┴──────────────────► Failed(size)
//! ```
//!
//! # Batch modes
//!
//! - **best effort**: each size is read, rendered and written before the
//!   next starts. The first failure stops the batch; icons already written
//!   stay on disk.
//! - **atomic**: each size is read, rendered and staged next to its output.
//!   Outputs are only replaced once every size succeeded; otherwise the
//!   staging files are removed and nothing changes.

mod stage;

use std::fs;
use std::path::PathBuf;

use crate::config::{BatchMode, RasterConfig};
use crate::icon::{IconAsset, IconError, IconSizeSet};
use crate::image::{convert_svg, parse_svg};
use crate::utils::hash;
use crate::{debug, logger};
use stage::Staging;

/// Explicit input of one batch run.
#[derive(Debug, Clone)]
pub struct RasterizerConfig {
    /// Directory holding sources and outputs.
    pub dir: PathBuf,
    /// File name prefix, e.g. `icon`.
    pub prefix: String,
    /// Source extension, e.g. `svg`.
    pub source_ext: String,
    /// Sizes in processing order.
    pub sizes: IconSizeSet,
    /// Output format and rendering.
    pub raster: RasterConfig,
    /// Failure semantics.
    pub mode: BatchMode,
}

impl RasterizerConfig {
    /// Assets in batch order.
    pub fn assets(&self) -> impl Iterator<Item = IconAsset> + '_ {
        let raster_ext = self.raster.format.extension();
        self.sizes
            .iter()
            .map(move |size| IconAsset::new(&self.dir, &self.prefix, size, &self.source_ext, raster_ext))
    }
}

/// Progress of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    Converting(u32),
    Done,
    Failed(u32),
}

/// Whether a written icon differs from what was on disk before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// New file, or content changed.
    Written,
    /// Rewritten with byte-identical content.
    Unchanged,
}

impl Outcome {
    fn from_digests(previous: Option<[u8; 32]>, current: [u8; 32]) -> Self {
        if previous == Some(current) {
            Self::Unchanged
        } else {
            Self::Written
        }
    }
}

/// One icon that reached its output path.
#[derive(Debug, Clone)]
pub struct ConvertedIcon {
    pub asset: IconAsset,
    pub outcome: Outcome,
    /// Short content hash of the written bytes.
    pub fingerprint: String,
}

/// Result of a batch run.
///
/// `converted` lists icons present on disk after the run, in order. On
/// failure in best-effort mode these are the sizes before the failing one;
/// in atomic mode the list is empty.
#[derive(Debug)]
pub struct BatchReport {
    pub state: BatchState,
    pub converted: Vec<ConvertedIcon>,
    pub error: Option<IconError>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn unchanged(&self) -> usize {
        self.converted
            .iter()
            .filter(|icon| icon.outcome == Outcome::Unchanged)
            .count()
    }

    /// Converted icons, or the error that stopped the batch.
    pub fn into_result(self) -> Result<Vec<ConvertedIcon>, IconError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.converted),
        }
    }
}

/// Callback invoked once per icon that reached its output path.
type Progress<'a> = Box<dyn FnMut(&ConvertedIcon) + 'a>;

/// Sequential SVG → raster batch converter.
pub struct IconRasterizer<'a> {
    config: &'a RasterizerConfig,
    state: BatchState,
    progress: Progress<'a>,
}

impl<'a> IconRasterizer<'a> {
    /// Rasterizer printing one success line per converted icon.
    pub fn new(config: &'a RasterizerConfig) -> Self {
        Self {
            config,
            state: BatchState::Pending,
            progress: Box::new(|icon: &ConvertedIcon| logger::success("icon", &progress_line(icon))),
        }
    }

    /// Replace the per-icon progress output.
    #[cfg(test)]
    pub fn with_progress(mut self, progress: impl FnMut(&ConvertedIcon) + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Run the whole batch.
    pub fn run(mut self) -> BatchReport {
        debug!("icon"; "{} size(s) in {} ({:?})",
            self.config.sizes.len(), self.config.dir.display(), self.config.mode);

        let mut converted = Vec::with_capacity(self.config.sizes.len());
        let result = match self.config.mode {
            BatchMode::BestEffort => self.run_best_effort(&mut converted),
            BatchMode::Atomic => self.run_atomic(&mut converted),
        };

        let error = match result {
            Ok(()) => {
                self.state = BatchState::Done;
                None
            }
            Err(err) => {
                self.state = BatchState::Failed(err.size());
                Some(err)
            }
        };

        BatchReport {
            state: self.state,
            converted,
            error,
        }
    }

    fn run_best_effort(&mut self, converted: &mut Vec<ConvertedIcon>) -> Result<(), IconError> {
        for asset in self.config.assets() {
            self.state = BatchState::Converting(asset.size);
            let bytes = self.render(&asset)?;
            let icon = write_output(asset, &bytes)?;
            self.report(&icon);
            converted.push(icon);
        }
        Ok(())
    }

    fn run_atomic(&mut self, converted: &mut Vec<ConvertedIcon>) -> Result<(), IconError> {
        let mut staging = Staging::new();
        for asset in self.config.assets() {
            self.state = BatchState::Converting(asset.size);
            let bytes = self.render(&asset)?;
            staging.stage(&asset, &bytes)?;
        }

        debug!("icon"; "committing {} staged icon(s)", staging.len());
        for icon in staging.commit()? {
            self.report(&icon);
            converted.push(icon);
        }
        Ok(())
    }

    fn report(&mut self, icon: &ConvertedIcon) {
        (self.progress)(icon);
        debug!("icon"; "{} -> {}", icon.asset.output.display(), icon.fingerprint);
    }

    /// Read the source of `asset` and rasterize it.
    fn render(&self, asset: &IconAsset) -> Result<Vec<u8>, IconError> {
        let data = read_source(asset)?;
        convert_svg(&data, asset.size, &self.config.raster)
            .map_err(|err| IconError::conversion(asset.size, asset.source.clone(), &err))
    }
}

/// Verify that the source of `asset` exists, is readable and parses,
/// without rendering or writing anything.
pub fn check_source(asset: &IconAsset) -> Result<(), IconError> {
    let data = read_source(asset)?;
    parse_svg(&data)
        .map(drop)
        .map_err(|err| IconError::conversion(asset.size, asset.source.clone(), &err))
}

/// Read the whole source file, rejecting zero sizes and outputs that would
/// overwrite their own source before touching disk.
fn read_source(asset: &IconAsset) -> Result<Vec<u8>, IconError> {
    let rejected = if asset.size == 0 {
        Some("icon size must be positive".to_string())
    } else if asset.overwrites_source() {
        Some(format!(
            "output `{}` would overwrite its source",
            asset.output.display()
        ))
    } else {
        None
    };
    if let Some(reason) = rejected {
        return Err(IconError::ConversionFailure {
            size: asset.size,
            path: asset.source.clone(),
            reason,
        });
    }

    fs::read(&asset.source).map_err(|err| IconError::from_read(asset.size, asset.source.clone(), err))
}

/// Write rendered bytes over the output, noting whether content changed.
fn write_output(asset: IconAsset, bytes: &[u8]) -> Result<ConvertedIcon, IconError> {
    let previous = hash::compute_file(&asset.output).ok().flatten();
    let digest = hash::compute(bytes);

    if let Err(source) = fs::write(&asset.output, bytes) {
        return Err(IconError::WriteFailure {
            size: asset.size,
            path: asset.output,
            source,
        });
    }

    Ok(ConvertedIcon {
        outcome: Outcome::from_digests(previous, digest),
        fingerprint: hash::short_hex(&digest),
        asset,
    })
}

/// Success line for one icon, e.g. `icon-72x72.png 72x72 (unchanged)`.
fn progress_line(icon: &ConvertedIcon) -> String {
    let size = icon.asset.size;
    let suffix = match icon.outcome {
        Outcome::Written => "",
        Outcome::Unchanged => " (unchanged)",
    };
    format!("{} {size}x{size}{suffix}", icon.asset.output_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FitMode, RasterFormat};
    use crate::icon::IconErrorKind;
    use std::path::Path;
    use tempfile::TempDir;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 512 512"><circle cx="256" cy="256" r="200" fill="#336699"/></svg>"##;
    const TINY_VIEWBOX_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 3 3"><rect width="3" height="3" fill="#000"/></svg>"##;

    fn config(dir: &Path, sizes: &[u32]) -> RasterizerConfig {
        RasterizerConfig {
            dir: dir.to_path_buf(),
            prefix: "icon".to_string(),
            source_ext: "svg".to_string(),
            sizes: IconSizeSet::new(sizes.to_vec()),
            raster: RasterConfig::default(),
            mode: BatchMode::BestEffort,
        }
    }

    fn write_source(dir: &Path, size: u32, svg: &str) {
        fs::write(dir.join(format!("icon-{size}x{size}.svg")), svg).unwrap();
    }

    fn output(dir: &Path, size: u32) -> PathBuf {
        dir.join(format!("icon-{size}x{size}.png"))
    }

    fn dimensions(path: &Path) -> (u32, u32) {
        let img = image::open(path).unwrap();
        (img.width(), img.height())
    }

    #[test]
    fn test_all_sizes_written_at_exact_dimensions() {
        let temp = TempDir::new().unwrap();
        let sizes = [72, 96, 128];
        for size in sizes {
            write_source(temp.path(), size, SQUARE_SVG);
        }

        let cfg = config(temp.path(), &sizes);
        let report = IconRasterizer::new(&cfg).run();

        assert!(report.is_success());
        assert_eq!(report.state, BatchState::Done);
        assert_eq!(report.converted.len(), 3);
        for size in sizes {
            assert_eq!(dimensions(&output(temp.path(), size)), (size, size));
        }
    }

    #[test]
    fn test_viewbox_dimensions_do_not_matter() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 96, TINY_VIEWBOX_SVG);

        let report = IconRasterizer::new(&config(temp.path(), &[96])).run();
        assert!(report.is_success());
        assert_eq!(dimensions(&output(temp.path(), 96)), (96, 96));
    }

    #[test]
    fn test_converted_in_configured_order() {
        let temp = TempDir::new().unwrap();
        for size in [16, 48, 32] {
            write_source(temp.path(), size, SQUARE_SVG);
        }

        let cfg = config(temp.path(), &[48, 16, 32]);
        let converted = IconRasterizer::new(&cfg).run().into_result().unwrap();
        let order: Vec<_> = converted.iter().map(|icon| icon.asset.size).collect();
        assert_eq!(order, vec![48, 16, 32]);
    }

    #[test]
    fn test_both_sizes_present() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);
        write_source(temp.path(), 96, SQUARE_SVG);

        let report = IconRasterizer::new(&config(temp.path(), &[72, 96])).run();

        assert!(report.error.is_none());
        assert_eq!(report.converted.len(), 2);
        assert!(output(temp.path(), 72).exists());
        assert!(output(temp.path(), 96).exists());
    }

    #[test]
    fn test_missing_source_stops_batch() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);
        write_source(temp.path(), 128, SQUARE_SVG);

        let cfg = config(temp.path(), &[72, 96, 128]);
        let report = IconRasterizer::new(&cfg).run();

        let err = report.error.as_ref().unwrap();
        assert_eq!(err.kind(), IconErrorKind::AssetNotFound);
        assert_eq!(err.size(), 96);
        assert!(err.to_string().contains("96"));
        assert_eq!(report.state, BatchState::Failed(96));

        // 72 persists, 96 absent, 128 never attempted
        assert_eq!(report.converted.len(), 1);
        assert!(output(temp.path(), 72).exists());
        assert!(!output(temp.path(), 96).exists());
        assert!(!output(temp.path(), 128).exists());
    }

    #[test]
    fn test_zero_size_is_conversion_failure() {
        let temp = TempDir::new().unwrap();
        let report = IconRasterizer::new(&config(temp.path(), &[0])).run();
        let err = report.into_result().unwrap_err();
        assert_eq!(err.kind(), IconErrorKind::ConversionFailure);
        assert_eq!(err.size(), 0);
    }

    #[test]
    fn test_malformed_source_is_conversion_failure() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, "<svg><unclosed");

        let err = IconRasterizer::new(&config(temp.path(), &[72]))
            .run()
            .into_result()
            .unwrap_err();
        assert_eq!(err.kind(), IconErrorKind::ConversionFailure);
        assert!(!output(temp.path(), 72).exists());
    }

    #[test]
    fn test_unwritable_output_is_write_failure() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);
        // A directory where the output file should go
        fs::create_dir(output(temp.path(), 72)).unwrap();

        let err = IconRasterizer::new(&config(temp.path(), &[72]))
            .run()
            .into_result()
            .unwrap_err();
        assert_eq!(err.kind(), IconErrorKind::WriteFailure);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);
        write_source(temp.path(), 96, SQUARE_SVG);
        let cfg = config(temp.path(), &[72, 96]);

        let first = IconRasterizer::new(&cfg).run();
        assert_eq!(first.unchanged(), 0);
        let bytes_72 = fs::read(output(temp.path(), 72)).unwrap();

        let second = IconRasterizer::new(&cfg).run();
        assert!(second.is_success());
        assert_eq!(second.unchanged(), 2);
        assert_eq!(fs::read(output(temp.path(), 72)).unwrap(), bytes_72);
        assert_eq!(
            first.converted[1].fingerprint,
            second.converted[1].fingerprint
        );
    }

    #[test]
    fn test_sources_never_modified() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);

        IconRasterizer::new(&config(temp.path(), &[72])).run();
        let source = fs::read_to_string(temp.path().join("icon-72x72.svg")).unwrap();
        assert_eq!(source, SQUARE_SVG);
    }

    #[test]
    fn test_atomic_failure_writes_nothing() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);

        let mut cfg = config(temp.path(), &[72, 96]);
        cfg.mode = BatchMode::Atomic;
        let report = IconRasterizer::new(&cfg).run();

        assert_eq!(report.state, BatchState::Failed(96));
        assert!(report.converted.is_empty());
        assert!(!output(temp.path(), 72).exists());

        // Only the source is left in the directory
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_atomic_failure_keeps_previous_outputs() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);
        fs::write(output(temp.path(), 72), b"old").unwrap();

        let mut cfg = config(temp.path(), &[72, 96]);
        cfg.mode = BatchMode::Atomic;
        assert!(!IconRasterizer::new(&cfg).run().is_success());
        assert_eq!(fs::read(output(temp.path(), 72)).unwrap(), b"old");
    }

    #[test]
    fn test_atomic_success() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);
        write_source(temp.path(), 96, SQUARE_SVG);

        let mut cfg = config(temp.path(), &[72, 96]);
        cfg.mode = BatchMode::Atomic;
        let report = IconRasterizer::new(&cfg).run();

        assert!(report.is_success());
        assert_eq!(report.converted.len(), 2);
        assert_eq!(dimensions(&output(temp.path(), 96)), (96, 96));
        assert!(!Staging::temp_path(&report.converted[0].asset).exists());
    }

    #[test]
    fn test_other_format_extension() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 48, SQUARE_SVG);

        let mut cfg = config(temp.path(), &[48]);
        cfg.raster = RasterConfig {
            format: RasterFormat::WEBP,
            fit: FitMode::Cover,
            ..Default::default()
        };
        let converted = IconRasterizer::new(&cfg).run().into_result().unwrap();
        assert_eq!(converted[0].asset.output_name(), "icon-48x48.webp");
        assert_eq!(dimensions(&temp.path().join("icon-48x48.webp")), (48, 48));
    }

    #[test]
    fn test_check_source() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);
        write_source(temp.path(), 96, "not an svg");
        let cfg = config(temp.path(), &[72, 96, 128, 0]);

        let kinds: Vec<_> = cfg
            .assets()
            .map(|asset| check_source(&asset).err().map(|e| e.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(IconErrorKind::ConversionFailure),
                Some(IconErrorKind::AssetNotFound),
                Some(IconErrorKind::ConversionFailure),
            ]
        );
        // Nothing is written by a check
        assert!(!output(temp.path(), 72).exists());
    }

    fn run_collecting_lines(cfg: &RasterizerConfig) -> (BatchReport, Vec<String>) {
        let mut lines = Vec::new();
        let report = IconRasterizer::new(cfg)
            .with_progress(|icon| lines.push(progress_line(icon)))
            .run();
        (report, lines)
    }

    #[test]
    fn test_one_success_line_per_size() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);
        write_source(temp.path(), 96, SQUARE_SVG);

        let (report, lines) = run_collecting_lines(&config(temp.path(), &[72, 96]));
        assert!(report.is_success());
        assert_eq!(lines, vec!["icon-72x72.png 72x72", "icon-96x96.png 96x96"]);

        let (_, rerun) = run_collecting_lines(&config(temp.path(), &[72]));
        assert_eq!(rerun, vec!["icon-72x72.png 72x72 (unchanged)"]);
    }

    #[test]
    fn test_no_success_line_for_failed_size() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 72, SQUARE_SVG);

        let (report, lines) = run_collecting_lines(&config(temp.path(), &[72, 96, 128]));
        assert_eq!(report.state, BatchState::Failed(96));
        assert_eq!(lines, vec!["icon-72x72.png 72x72"]);

        let mut atomic = config(temp.path(), &[72, 96]);
        atomic.mode = BatchMode::Atomic;
        let (_, lines) = run_collecting_lines(&atomic);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_duplicate_sizes_processed_twice_in_both_modes() {
        let temp = TempDir::new().unwrap();
        write_source(temp.path(), 16, SQUARE_SVG);

        for mode in [BatchMode::BestEffort, BatchMode::Atomic] {
            fs::remove_file(output(temp.path(), 16)).ok();
            let mut cfg = config(temp.path(), &[16, 16]);
            cfg.mode = mode;

            let (report, lines) = run_collecting_lines(&cfg);
            let outcomes: Vec<_> = report.converted.iter().map(|icon| icon.outcome).collect();
            assert_eq!(outcomes, vec![Outcome::Written, Outcome::Unchanged], "{mode:?}");
            assert_eq!(lines.len(), 2, "{mode:?}");
            assert_eq!(dimensions(&output(temp.path(), 16)), (16, 16));
        }
    }

    #[test]
    fn test_output_never_overwrites_source() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("icon-16x16.png");
        fs::write(&source, SQUARE_SVG).unwrap();

        for (source_ext, mode) in [("png", BatchMode::BestEffort), ("PNG", BatchMode::Atomic)] {
            let mut cfg = config(temp.path(), &[16]);
            cfg.source_ext = source_ext.to_string();
            cfg.mode = mode;

            let err = IconRasterizer::new(&cfg).run().into_result().unwrap_err();
            assert_eq!(err.kind(), IconErrorKind::ConversionFailure);
            assert!(err.to_string().contains("overwrite its source"));
        }
        assert_eq!(fs::read_to_string(&source).unwrap(), SQUARE_SVG);
    }
}
