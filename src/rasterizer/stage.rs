//! Staging area for atomic batches.
//!
//! Rendered icons are written to hidden sibling files first and only
//! renamed over the real outputs once every size has succeeded.

use std::fs;
use std::path::{Path, PathBuf};

use super::{ConvertedIcon, Outcome};
use crate::icon::{IconAsset, IconError};
use crate::utils::hash;
use crate::{debug, log};

struct Staged {
    asset: IconAsset,
    temp: PathBuf,
    digest: [u8; 32],
}

/// Staged outputs awaiting commit. Dropping without committing removes them.
#[derive(Default)]
pub struct Staging {
    staged: Vec<Staged>,
}

impl Staging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hidden sibling used while staging: `.icon-72x72.png.icongen-staging`.
    pub fn temp_path(asset: &IconAsset) -> PathBuf {
        let name = format!(".{}.icongen-staging", asset.output_name());
        asset.output.with_file_name(name)
    }

    /// Write `bytes` to the staging file of `asset`.
    pub fn stage(&mut self, asset: &IconAsset, bytes: &[u8]) -> Result<(), IconError> {
        let temp = Self::temp_path(asset);
        fs::write(&temp, bytes).map_err(|source| IconError::WriteFailure {
            size: asset.size,
            path: temp.clone(),
            source,
        })?;
        debug!("stage"; "staged {}", temp.display());

        // A repeated size re-stages the same file, so every entry for it
        // describes the latest bytes
        let digest = hash::compute(bytes);
        for entry in self.staged.iter_mut().filter(|s| s.temp == temp) {
            entry.digest = digest;
        }
        self.staged.push(Staged {
            asset: asset.clone(),
            temp,
            digest,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Rename every staged file over its output, in staging order.
    ///
    /// Each entry yields one converted icon; a repeated size is renamed
    /// once and reported again as rewritten in place. A rename failure
    /// stops the commit; renames already done stay and the remaining
    /// staging files are removed.
    pub fn commit(mut self) -> Result<Vec<ConvertedIcon>, IconError> {
        let staged = std::mem::take(&mut self.staged);
        let mut committed: Vec<ConvertedIcon> = Vec::with_capacity(staged.len());
        let mut pending = staged.into_iter();

        while let Some(entry) = pending.next() {
            let previous = hash::compute_file(&entry.asset.output).ok().flatten();
            let renamed = committed.iter().any(|icon| icon.asset.output == entry.asset.output);

            if !renamed && let Err(source) = fs::rename(&entry.temp, &entry.asset.output) {
                remove_quietly(&entry.temp);
                pending.for_each(|rest| remove_quietly(&rest.temp));
                return Err(IconError::WriteFailure {
                    size: entry.asset.size,
                    path: entry.asset.output,
                    source,
                });
            }

            committed.push(ConvertedIcon {
                outcome: Outcome::from_digests(previous, entry.digest),
                fingerprint: hash::short_hex(&entry.digest),
                asset: entry.asset,
            });
        }

        Ok(committed)
    }
}

impl Drop for Staging {
    fn drop(&mut self) {
        if !self.staged.is_empty() {
            debug!("stage"; "discarding {} staged icon(s)", self.staged.len());
        }
        for entry in self.staged.drain(..) {
            remove_quietly(&entry.temp);
        }
    }
}

fn remove_quietly(path: &Path) {
    if let Err(err) = fs::remove_file(path)
        && err.kind() != std::io::ErrorKind::NotFound
    {
        log!("warning"; "failed to remove staging file {}: {}", path.display(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn asset(dir: &Path, size: u32) -> IconAsset {
        IconAsset::new(dir, "icon", size, "svg", "png")
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let a = asset(Path::new("/icons"), 72);
        assert_eq!(
            Staging::temp_path(&a),
            PathBuf::from("/icons/.icon-72x72.png.icongen-staging")
        );
    }

    #[test]
    fn test_commit_moves_files_into_place() {
        let temp = TempDir::new().unwrap();
        let a = asset(temp.path(), 72);

        let mut staging = Staging::new();
        staging.stage(&a, b"png-bytes").unwrap();
        assert!(Staging::temp_path(&a).exists());
        assert!(!a.output.exists());

        let committed = staging.commit().unwrap();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].outcome, Outcome::Written);
        assert_eq!(fs::read(&a.output).unwrap(), b"png-bytes");
        assert!(!Staging::temp_path(&a).exists());
    }

    #[test]
    fn test_drop_discards_staged_files() {
        let temp = TempDir::new().unwrap();
        let a = asset(temp.path(), 96);
        {
            let mut staging = Staging::new();
            staging.stage(&a, b"png-bytes").unwrap();
        }
        assert!(!Staging::temp_path(&a).exists());
        assert!(!a.output.exists());
    }

    #[test]
    fn test_repeated_size_committed_per_entry() {
        let temp = TempDir::new().unwrap();
        let a = asset(temp.path(), 72);

        let mut staging = Staging::new();
        staging.stage(&a, b"first").unwrap();
        staging.stage(&a, b"second").unwrap();
        assert_eq!(staging.len(), 2);

        let committed = staging.commit().unwrap();
        let outcomes: Vec<_> = committed.iter().map(|icon| icon.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::Written, Outcome::Unchanged]);
        assert_eq!(fs::read(&a.output).unwrap(), b"second");
        assert!(!Staging::temp_path(&a).exists());
    }

    #[test]
    fn test_stage_into_missing_dir_is_write_failure() {
        let temp = TempDir::new().unwrap();
        let a = asset(&temp.path().join("missing"), 72);
        let err = Staging::new().stage(&a, b"bytes").unwrap_err();
        assert_eq!(err.kind(), crate::icon::IconErrorKind::WriteFailure);
        assert_eq!(err.size(), 72);
    }
}
