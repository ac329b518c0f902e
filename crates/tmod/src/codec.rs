//! Entry compression and decompression handling.
//!
//! Entries are stored as raw DEFLATE streams when that makes them strictly smaller, otherwise the
//! raw bytes are stored and the stored size equals the raw size.

use std::io::{Read, Write};

use flate2::{bufread::DeflateDecoder, write::DeflateEncoder, Compression};
use md5::{Digest, Md5};
use tracing::instrument;

use crate::error::{CorruptEntryError, Result};
use crate::types::HASH_LEN;

/// Compress `raw` into a raw DEFLATE stream
#[instrument(skip_all, err, fields(size = raw.len()))]
pub fn compress(raw: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(raw.len() / 2), level);
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

/// Inflate `stored`, failing unless it yields exactly `expected_len` bytes and the DEFLATE stream
/// spans all of `stored`
#[instrument(skip(stored), err, fields(size = stored.len()))]
pub fn decompress(stored: &[u8], expected_len: u64) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(stored);

    let mut raw = Vec::with_capacity(expected_len.min(stored.len() as u64 * 4) as usize);
    // One extra byte is enough to notice an overlong stream without inflating all of it
    (&mut decoder)
        .take(expected_len.saturating_add(1))
        .read_to_end(&mut raw)
        .map_err(|e| CorruptEntryError::Decompression(e.to_string()))?;

    if raw.len() as u64 != expected_len {
        return Err(CorruptEntryError::LengthMismatch {
            expected: expected_len,
            actual: raw.len() as u64,
        }
        .into());
    }

    let consumed = decoder.total_in();
    if consumed != stored.len() as u64 {
        return Err(CorruptEntryError::Decompression(format!(
            "{} bytes after the end of the stream",
            stored.len() as u64 - consumed
        ))
        .into());
    }

    Ok(raw)
}

/// Whether an entry should be stored in its compressed form
///
/// Only a strict size reduction counts, so incompressible data is never expanded.
pub fn should_compress(raw_len: u64, stored_len: u64) -> bool {
    stored_len < raw_len
}

/// MD5 digest used as the content hash of an archive body
pub fn content_hash(body: &[u8]) -> [u8; HASH_LEN] {
    Md5::digest(body).into()
}
