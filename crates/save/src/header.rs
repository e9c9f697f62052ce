//! Save payload header.
//!
//! Fixed 16-byte little-endian header in front of the compressed payload:
//!
//! ```text
//! [0..4]   magic "MCTY"
//! [4..8]   format version (u32)
//! [8..12]  uncompressed payload size (u32)
//! [12..16] xxHash32 checksum of the compressed payload
//! ```
//!
//! On save: compress -> checksum -> prepend header. On load: check magic and
//! version, verify the checksum, then hand the payload on for decompression
//! sized by the declared length.

use xxhash_rust::xxh32::xxh32;

use crate::SaveError;

/// Magic bytes identifying a city save.
pub const MAGIC: [u8; 4] = *b"MCTY";

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Current header format version.
pub const FORMAT_VERSION: u32 = 1;

/// Upper bound on the declared uncompressed size. The snapshot is a few
/// kilobytes; anything claiming more is corrupt and must not drive an
/// allocation.
pub const MAX_UNCOMPRESSED_SIZE: u32 = 1 << 20;

const XXHASH_SEED: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub format_version: u32,
    pub uncompressed_size: u32,
    pub checksum: u32,
}

/// Prepends a header to the compressed payload.
pub fn wrap(compressed: &[u8], uncompressed_size: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + compressed.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&uncompressed_size.to_le_bytes());
    out.extend_from_slice(&xxh32(compressed, XXHASH_SEED).to_le_bytes());
    out.extend_from_slice(compressed);
    out
}

/// Parses and validates the header, returning it with the payload slice.
pub fn unwrap(bytes: &[u8]) -> Result<(Header, &[u8]), SaveError> {
    if bytes.len() < HEADER_SIZE {
        return Err(SaveError::TooShort);
    }
    if bytes[..4] != MAGIC {
        return Err(SaveError::BadMagic);
    }

    let format_version = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let uncompressed_size = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let checksum = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    if format_version > FORMAT_VERSION {
        return Err(SaveError::UnsupportedVersion(format_version));
    }
    if uncompressed_size > MAX_UNCOMPRESSED_SIZE {
        return Err(SaveError::DeclaredSizeTooLarge(uncompressed_size));
    }

    let payload = &bytes[HEADER_SIZE..];
    if xxh32(payload, XXHASH_SEED) != checksum {
        return Err(SaveError::ChecksumMismatch);
    }

    Ok((
        Header {
            format_version,
            uncompressed_size,
            checksum,
        },
        payload,
    ))
}
