//! Content hashing for change detection.

use std::io::{BufReader, Read};

use sha2::{Digest as _, Sha256};

use crate::sources::ByteSource;

/// Buffer size for streaming reads (8 KB).
const BUFFER_SIZE: usize = 8192;

/// Hash algorithm identifier.
pub const HASH_ALGORITHM: &str = "SHA-256";

/// SHA-256 of `bytes` as a lowercase hexadecimal string (64 characters).
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 of everything `reader` yields, read in fixed-size chunks.
///
/// The digest is only produced once the reader is exhausted; a read error returns `Err` and no
/// partial digest.
pub fn content_hash_reader<R: Read>(reader: R) -> std::io::Result<String> {
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, reader);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; BUFFER_SIZE];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Stream the bytes stored under `id` through [`content_hash_reader`], degrading to an empty
/// string if they cannot be read.
///
/// Hashing never fails ingestion: callers get `""` plus a logged warning instead.
pub fn content_hash_or_empty(source: &dyn ByteSource, id: &str) -> String {
    match source.open(id).and_then(content_hash_reader) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::warn!(
                id,
                algorithm = HASH_ALGORITHM,
                error = %err,
                "content hashing failed; storing empty hash"
            );
            String::new()
        }
    }
}
