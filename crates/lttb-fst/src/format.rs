// LTTB binary format: header parsing, feature bits

use std::io::{self, Write};

use crate::LoadError;

/// Magic bytes at the start of every compiled transducer.
pub const MAGIC: [u8; 4] = *b"LTTB";

/// Size of the header in bytes: 4 magic bytes plus a little-endian `u64`
/// feature word.
pub const HEADER_SIZE: usize = 12;

/// Finals and transitions carry weights. Not supported by this loader.
pub const FEATURE_WEIGHTED: u64 = 1 << 0;

/// Every final state is followed by its default output suffix.
pub const FEATURE_FINAL_SUFFIXES: u64 = 1 << 1;

/// Feature bits this loader understands.
pub const SUPPORTED_FEATURES: u64 = FEATURE_FINAL_SUFFIXES;

/// Parsed transducer file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LttbHeader {
    pub features: u64,
}

impl LttbHeader {
    #[inline]
    pub fn has_final_suffixes(&self) -> bool {
        self.features & FEATURE_FINAL_SUFFIXES != 0
    }
}

/// Parses and validates the 12-byte header.
///
/// A file whose leading bytes disagree with [`MAGIC`] is rejected as
/// [`LoadError::InvalidMagic`] even when it is shorter than the header; a
/// correct but incomplete header is [`LoadError::Truncated`]. Any feature
/// bit outside [`SUPPORTED_FEATURES`] (weights included) is
/// [`LoadError::UnsupportedFeatures`].
pub fn parse_header(data: &[u8]) -> Result<LttbHeader, LoadError> {
    let magic_len = data.len().min(MAGIC.len());
    if data[..magic_len] != MAGIC[..magic_len] {
        return Err(LoadError::InvalidMagic);
    }
    if data.len() < HEADER_SIZE {
        return Err(LoadError::Truncated {
            offset: data.len(),
            what: "header",
        });
    }

    let mut word = [0u8; 8];
    word.copy_from_slice(&data[MAGIC.len()..HEADER_SIZE]);
    let features = u64::from_le_bytes(word);

    let unsupported = features & !SUPPORTED_FEATURES;
    if unsupported != 0 {
        return Err(LoadError::UnsupportedFeatures(unsupported));
    }

    Ok(LttbHeader { features })
}

/// Write a header carrying `features`.
pub fn write_header<W: Write>(out: &mut W, features: u64) -> io::Result<()> {
    out.write_all(&MAGIC)?;
    out.write_all(&features.to_le_bytes())
}
