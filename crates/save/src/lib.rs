//! Byte-level save codec for the city snapshot.
//!
//! `encode` turns a [`CitySnapshot`] into a self-contained byte buffer:
//! bitcode payload, lz4-compressed, behind a versioned, checksummed header.
//! `decode` reverses it and runs the snapshot's field validation so a
//! tampered or bit-rotted save loads as a clamped, playable city or fails
//! loudly with a typed error. Where the buffer ends up (file, flash page,
//! browser storage) is the host's business.

use std::fmt;

use simulation::snapshot::CitySnapshot;

pub mod header;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// Buffer smaller than the fixed header.
    TooShort,
    /// The magic bytes are not "MCTY".
    BadMagic,
    /// Save written by a newer format than this build understands.
    UnsupportedVersion(u32),
    /// Payload bytes do not match the stored checksum.
    ChecksumMismatch,
    /// Declared uncompressed size is beyond any real snapshot.
    DeclaredSizeTooLarge(u32),
    Decompress(String),
    Decode(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::TooShort => write!(f, "save data shorter than its header"),
            SaveError::BadMagic => write!(f, "not a city save (bad magic bytes)"),
            SaveError::UnsupportedVersion(v) => {
                write!(f, "save uses format version {v}, newer than this build")
            }
            SaveError::ChecksumMismatch => write!(f, "save data corrupted (checksum mismatch)"),
            SaveError::DeclaredSizeTooLarge(n) => {
                write!(f, "save declares an implausible uncompressed size of {n} bytes")
            }
            SaveError::Decompress(e) => write!(f, "failed to decompress save data: {e}"),
            SaveError::Decode(e) => write!(f, "failed to decode save data: {e}"),
        }
    }
}

impl std::error::Error for SaveError {}

/// Serializes a snapshot into a self-contained save buffer.
pub fn encode(snapshot: &CitySnapshot) -> Vec<u8> {
    let payload = bitcode::encode(snapshot);
    let compressed = lz4_flex::compress(&payload);
    header::wrap(&compressed, payload.len() as u32)
}

/// Parses a save buffer back into a validated snapshot.
pub fn decode(bytes: &[u8]) -> Result<CitySnapshot, SaveError> {
    let (head, compressed) = header::unwrap(bytes)?;
    let payload = lz4_flex::decompress(compressed, head.uncompressed_size as usize)
        .map_err(|e| SaveError::Decompress(e.to_string()))?;
    let mut snapshot: CitySnapshot =
        bitcode::decode(&payload).map_err(|e| SaveError::Decode(e.to_string()))?;
    snapshot.validate();
    Ok(snapshot)
}
