//! `build` command: rasterize every configured size.
//!
//! # Flow
//!
//! ```text
//! IconGenConfig ──► RasterizerConfig ──► IconRasterizer::run ──► BatchReport
//!                                                                    │
//!                                        summary line  ◄── success ──┤
//!                                        error         ◄── failure ──┘
//! ```

use anyhow::{Context, Result};

use crate::config::{BatchMode, IconGenConfig};
use crate::rasterizer::{BatchReport, IconRasterizer};
use crate::utils::{path::fs::relative_to, plural::plural_count};
use crate::{debug, log};

/// Run the icon batch described by `config`.
///
/// Returns an error naming the failing size when the batch stops early.
pub fn build_icons(config: &IconGenConfig) -> Result<()> {
    let rasterizer = config.rasterizer();
    let dir = relative_to(&rasterizer.dir, config.get_root());

    log!("icon"; "rasterizing {} in {} ({} via {})",
        plural_count(rasterizer.sizes.len(), "size"),
        dir.display(),
        rasterizer.raster.format.extension(),
        rasterizer.raster.converter.program().unwrap_or("resvg"));
    if let Some(path) = &config.config_path {
        debug!("icon"; "config {}", path.display());
    }

    let report = IconRasterizer::new(&rasterizer).run();
    summarize(&report, rasterizer.mode);

    let failure = report.error.as_ref().map(|err| (err.size(), err.kind()));
    report.into_result().map(drop).with_context(|| match failure {
        Some((size, kind)) => format!("icon batch failed at size {size} ({kind})"),
        None => "icon batch failed".to_string(),
    })
}

fn summarize(report: &BatchReport, mode: BatchMode) {
    let converted = report.converted.len();
    let unchanged = report.unchanged();

    if report.is_success() {
        let mut line = format!("{} converted", plural_count(converted, "icon"));
        if unchanged > 0 {
            line.push_str(&format!(" ({unchanged} unchanged)"));
        }
        log!("icon"; "{line}");
        return;
    }

    match mode {
        BatchMode::Atomic => log!("icon"; "atomic batch aborted, no icons were replaced"),
        BatchMode::BestEffort if converted > 0 => {
            log!("icon"; "{} written before the failure", plural_count(converted, "icon"))
        }
        BatchMode::BestEffort => {}
    }
}
