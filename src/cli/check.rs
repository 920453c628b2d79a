//! `check` command: verify sources without writing anything.
//!
//! Unlike `build`, every size is inspected so all problems are reported
//! in one run.

use anyhow::{Result, bail};

use crate::config::IconGenConfig;
use crate::icon::IconError;
use crate::rasterizer::check_source;
use crate::utils::plural::plural_count;
use crate::{log, logger};

/// Check that every configured source exists, is readable and parses.
pub fn check_icons(config: &IconGenConfig) -> Result<()> {
    let rasterizer = config.rasterizer();
    let problems: Vec<IconError> = rasterizer
        .assets()
        .filter_map(|asset| match check_source(&asset) {
            Ok(()) => {
                let name = asset.source.file_name().unwrap_or_default().to_string_lossy();
                logger::success("check", &name);
                None
            }
            Err(err) => {
                log!("check"; "✗ {err}");
                Some(err)
            }
        })
        .collect();

    let total = rasterizer.sizes.len();
    if problems.is_empty() {
        log!("check"; "{} ok", plural_count(total, "source"));
        return Ok(());
    }

    let sizes: Vec<String> = problems.iter().map(|err| err.size().to_string()).collect();
    bail!(
        "{} of {} failed the check (sizes: {})",
        plural_count(problems.len(), "source"),
        total,
        sizes.join(", ")
    )
}
