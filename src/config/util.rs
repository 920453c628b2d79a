//! Configuration utility functions.

use crate::utils::path::normalize_path;
use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/app/public/icons/  ← start
/// /home/user/app/icongen.toml   ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Resolve a configured directory against the project root.
///
/// Expands a leading `~`, joins relative paths onto `root`, then normalizes.
pub fn resolve_dir(dir: &Path, root: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).into_owned());
    let full_path = if expanded.is_relative() {
        root.join(expanded)
    } else {
        expanded
    };
    normalize_path(&full_path)
}

// ============================================================================
// tests
// ============================================================================
