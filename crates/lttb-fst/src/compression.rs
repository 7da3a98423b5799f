// Multibyte integer coding and a bounds-checked reader over raw file bytes.

use std::io::{self, Write};

use crate::LoadError;

/// Largest value the multibyte coding can represent.
pub const MULTIBYTE_MAX: u32 = 0x3FFF_FFFF;

/// Cursor over a byte slice that turns every short read into
/// [`LoadError::Truncated`].
///
/// Multibyte layout: the top two bits of the first byte give the number of
/// extra bytes (0-3); the remaining six bits are the most significant bits
/// of the value, followed by the extra bytes in big-endian order.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, LoadError> {
        match self.data.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(b)
            }
            None => Err(LoadError::Truncated {
                offset: self.pos,
                what,
            }),
        }
    }

    pub fn read_multibyte(&mut self, what: &'static str) -> Result<u32, LoadError> {
        let first = self.read_u8(what)?;
        let extra = first >> 6;
        let mut value = u32::from(first & 0x3F);
        for _ in 0..extra {
            value = (value << 8) | u32::from(self.read_u8(what)?);
        }
        Ok(value)
    }

    /// Read an element count.
    ///
    /// Every element occupies at least one byte, so a count larger than the
    /// bytes left can only come from a truncated file. Rejecting it here also
    /// keeps a corrupt count from driving a huge allocation.
    pub fn read_count(&mut self, what: &'static str) -> Result<usize, LoadError> {
        let count = self.read_multibyte(what)? as usize;
        if count > self.remaining() {
            return Err(LoadError::Truncated {
                offset: self.data.len(),
                what,
            });
        }
        Ok(count)
    }

    /// Read a length-prefixed string of multibyte code points.
    pub fn read_string(&mut self, what: &'static str) -> Result<String, LoadError> {
        let len = self.read_count(what)?;
        let mut s = String::with_capacity(len);
        for _ in 0..len {
            let cp = self.read_multibyte(what)?;
            let ch = char::from_u32(cp).ok_or_else(|| {
                LoadError::Malformed(format!("invalid code point {cp:#x} in {what}"))
            })?;
            s.push(ch);
        }
        Ok(s)
    }
}

/// Write `value` in multibyte form.
pub fn write_multibyte<W: Write>(out: &mut W, value: u32) -> io::Result<()> {
    match value {
        0..=0x3F => out.write_all(&[value as u8]),
        0x40..=0x3FFF => out.write_all(&[0x40 | (value >> 8) as u8, value as u8]),
        0x4000..=0x3F_FFFF => out.write_all(&[
            0x80 | (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ]),
        0x40_0000..=MULTIBYTE_MAX => out.write_all(&[
            0xC0 | (value >> 24) as u8,
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        ]),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("value {value:#x} exceeds multibyte range"),
        )),
    }
}

/// Write a length-prefixed string of multibyte code points.
pub fn write_string<W: Write>(out: &mut W, s: &str) -> io::Result<()> {
    write_multibyte(out, s.chars().count() as u32)?;
    for ch in s.chars() {
        write_multibyte(out, ch as u32)?;
    }
    Ok(())
}
