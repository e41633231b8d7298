//! Artwork embedding.
//!
//! An image becomes an [`AssetBlob`]: its bytes base64-encoded, wrapped into
//! 76-character lines, plus an MD5 checksum. The checksum is computed over
//! the wrapped text bytes, not the raw image. The consumer verifies it
//! against the text it reads back, so hashing the raw bytes would produce a
//! sidecar it rejects.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use md5::{Digest, Md5};

use crate::error::Error;

/// Line width the base64 text is wrapped to before hashing.
const WRAP_WIDTH: usize = 76;

/// An image ready to be embedded in a sidecar.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetBlob {
    /// Base64 text, 76-character lines joined by `\n`.
    pub text: String,
    /// Lowercase hex MD5 of `text`'s bytes, always 32 characters.
    pub checksum: String,
}

/// Read an image file and prepare it for embedding.
///
/// A file that simply does not exist yields `Ok(None)`: the caller omits the
/// asset and the sidecar is still valid. A file that exists but cannot be
/// read is reported as [`Error::AssetUnavailable`]; the caller omits the
/// asset as well, but can surface the reason.
pub fn embed(path: &Path) -> Result<Option<AssetBlob>, Error> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(|source| Error::AssetUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(from_bytes(&bytes)))
}

/// Build an [`AssetBlob`] from raw image bytes.
pub fn from_bytes(bytes: &[u8]) -> AssetBlob {
    let encoded = STANDARD.encode(bytes);
    let text = wrap(&encoded);
    let checksum = hex::encode(Md5::digest(text.as_bytes()));
    AssetBlob { text, checksum }
}

/// Split into fixed-width lines joined by `\n`, no trailing newline.
fn wrap(encoded: &str) -> String {
    let mut text = String::with_capacity(encoded.len() + encoded.len() / WRAP_WIDTH);
    let mut rest = encoded;
    while rest.len() > WRAP_WIDTH {
        // base64 output is ASCII, so byte positions are char boundaries
        let (line, tail) = rest.split_at(WRAP_WIDTH);
        text.push_str(line);
        text.push('\n');
        rest = tail;
    }
    text.push_str(rest);
    text
}
