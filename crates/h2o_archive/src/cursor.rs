//! Forward only reader over an in-memory archive buffer

use std::io::Cursor;

use binrw::BinRead;
use byteorder::{ByteOrder, LittleEndian};
use widestring::U16String;

use crate::error::{Error, Result};

/// A record with a fixed on-disk size which can be decoded with [`ByteCursor::read_record`]
pub trait FixedSize {
    /// Number of bytes the record occupies in the archive
    const SIZE: usize;
}

/// Little-endian reader over a borrowed byte buffer.
///
/// Every read is bounds checked against the remaining buffer and advances the
/// position by exactly the number of bytes consumed. The position never moves
/// backwards.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Current offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes that have not been read yet
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Whether every byte of the buffer has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next `len` bytes, failing if the buffer is too short
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::OutOfBounds {
                offset: self.position,
                requested: len,
                remaining: self.remaining(),
            });
        }

        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    /// Take the next `N` bytes as an array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    /// Decode a fixed size `binrw` record.
    ///
    /// The bytes are carved out with the same bounds check as every other
    /// read, so the record parser never sees a short buffer.
    pub fn read_record<T>(&mut self) -> Result<T>
    where
        T: FixedSize + for<'r> BinRead<Args<'r> = ()>,
    {
        let bytes = self.read_bytes(T::SIZE)?;
        Ok(T::read_le(&mut Cursor::new(bytes))?)
    }

    /// Read single byte characters up to (not including) the absolute offset `end`
    pub fn read_string_to(&mut self, end: usize) -> Result<String> {
        let len = end.saturating_sub(self.position);
        Ok(latin1(self.read_bytes(len)?))
    }

    /// Read single byte characters until `terminator`, which is consumed but not returned
    pub fn read_terminated_string(&mut self, terminator: u8) -> Result<String> {
        let start = self.position;
        loop {
            if self.read_u8()? == terminator {
                break;
            }
        }
        Ok(latin1(&self.data[start..self.position - 1]))
    }

    /// Read `count` UTF-16 strings, each ending with a two byte zero
    pub fn read_wide_strings(&mut self, count: usize) -> Result<Vec<String>> {
        (0..count)
            .map(|_| {
                let mut runes = Vec::new();
                loop {
                    let rune = self.read_u16()?;
                    if rune == 0 {
                        break;
                    }
                    runes.push(rune);
                }
                Ok(U16String::from_vec(runes).to_string_lossy())
            })
            .collect()
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
