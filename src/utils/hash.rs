//! Content hashing with blake3.
//!
//! Used to tell whether a freshly rendered icon differs from the one
//! already on disk.
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::short_hex(&hash::compute(&png_bytes)); // -> "a1b2c3d4e5f6"
//! ```

use std::io;
use std::path::Path;

/// Compute the 32-byte blake3 digest of `data`.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> [u8; 32] {
    *blake3::hash(data.as_ref()).as_bytes()
}

/// First 12 hex chars of a digest, for log output.
#[inline]
pub fn short_hex(digest: &[u8; 32]) -> String {
    hex::encode(&digest[..6])
}

/// Digest of a file's content, `None` if the file does not exist.
pub fn compute_file(path: &Path) -> io::Result<Option<[u8; 32]>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(compute(&bytes))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
