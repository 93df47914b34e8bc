//! Forward-only cursor over a map record
//!
//! All reads are bounds-checked; running off the end of the buffer yields a
//! [`DecodeError`] naming the field that was being read.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use super::error::DecodeError;
use super::types::Endianness;

/// Sequential reader over a fixed byte buffer
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    endianness: Endianness,
}

impl<'a> ByteReader<'a> {
    /// Start at the first byte of `data`, reading multi-byte fields in `endianness`
    pub fn new(data: &'a [u8], endianness: Endianness) -> Self {
        Self {
            data,
            pos: 0,
            endianness,
        }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes not yet read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether every byte has been read
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                field,
                offset: self.pos,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// One byte
    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.take(1, field)?[0])
    }

    /// A one-byte flag; only the value 1 is true
    pub fn read_flag(&mut self, field: &'static str) -> Result<bool, DecodeError> {
        Ok(self.read_u8(field)? == 1)
    }

    /// Signed 16-bit word
    pub fn read_i16(&mut self, field: &'static str) -> Result<i16, DecodeError> {
        let endianness = self.endianness;
        let bytes = self.take(2, field)?;
        Ok(match endianness {
            Endianness::Big => BigEndian::read_i16(bytes),
            Endianness::Little => LittleEndian::read_i16(bytes),
        })
    }

    /// Signed 32-bit word
    pub fn read_i32(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        let endianness = self.endianness;
        let bytes = self.take(4, field)?;
        Ok(match endianness {
            Endianness::Big => BigEndian::read_i32(bytes),
            Endianness::Little => LittleEndian::read_i32(bytes),
        })
    }

    /// Unsigned 32-bit word
    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let endianness = self.endianness;
        let bytes = self.take(4, field)?;
        Ok(match endianness {
            Endianness::Big => BigEndian::read_u32(bytes),
            Endianness::Little => LittleEndian::read_u32(bytes),
        })
    }

    /// IEEE 754 double
    pub fn read_f64(&mut self, field: &'static str) -> Result<f64, DecodeError> {
        let endianness = self.endianness;
        let bytes = self.take(8, field)?;
        Ok(match endianness {
            Endianness::Big => BigEndian::read_f64(bytes),
            Endianness::Little => LittleEndian::read_f64(bytes),
        })
    }

    /// A u32 byte count followed by that many Latin-1 characters
    pub fn read_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let len = self.read_u32(field)? as usize;
        let bytes = self.take(len, field)?;
        Ok(bytes.iter().map(|&b| char::from(b)).collect())
    }

    /// `N` bytes as stored
    pub fn read_byte_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, field)?);
        Ok(out)
    }

    /// `N` signed 32-bit words
    pub fn read_i32_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[i32; N], DecodeError> {
        let mut out = [0i32; N];
        for slot in out.iter_mut() {
            *slot = self.read_i32(field)?;
        }
        Ok(out)
    }

    /// `N` unsigned 32-bit words
    pub fn read_u32_array<const N: usize>(
        &mut self,
        field: &'static str,
    ) -> Result<[u32; N], DecodeError> {
        let mut out = [0u32; N];
        for slot in out.iter_mut() {
            *slot = self.read_u32(field)?;
        }
        Ok(out)
    }

    /// A block whose byte length is stored inline as an i32, read as
    /// `length / 4` words. The length is checked against the remaining
    /// buffer before anything is allocated.
    pub fn read_sized_words(
        &mut self,
        field: &'static str,
    ) -> Result<(i32, Vec<i32>), DecodeError> {
        let offset = self.pos;
        let declared = self.read_i32(field)?;
        let len = usize::try_from(declared).map_err(|_| DecodeError::InvalidLength {
            field,
            offset,
            declared: i64::from(declared),
        })?;
        let count = len / 4;
        if count * 4 > self.remaining() {
            return Err(DecodeError::Truncated {
                field,
                offset: self.pos,
                needed: count * 4,
                remaining: self.remaining(),
            });
        }
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(self.read_i32(field)?);
        }
        Ok((declared, words))
    }
}
