//! Binary stream reader with cursor tracking.

use std::str;

use crate::{zigzag_decode, StreamError, WireEnum};

/// A sequential binary reader over a borrowed byte slice.
///
/// Every read is bounds checked and leaves the cursor untouched when it
/// fails on a short buffer.
///
/// # Example
///
/// ```
/// use watcher_buffers::StreamInput;
///
/// let data = [0x01, 0xac, 0x02];
/// let mut input = StreamInput::new(&data);
///
/// assert_eq!(input.read_boolean(), Ok(true));
/// assert_eq!(input.read_vint(), Ok(300));
/// assert!(input.is_empty());
/// ```
pub struct StreamInput<'a> {
    /// The underlying byte slice.
    uint8: &'a [u8],
    /// Current cursor position.
    x: usize,
}

impl<'a> StreamInput<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Returns the number of remaining bytes.
    pub fn remaining(&self) -> usize {
        self.uint8.len() - self.x
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails with [`StreamError::TrailingBytes`] unless the input is exhausted.
    pub fn expect_end(&self) -> Result<(), StreamError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(StreamError::TrailingBytes(n)),
        }
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    fn check(&self, n: usize) -> Result<(), StreamError> {
        if n > self.remaining() {
            Err(StreamError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads a boolean byte; any non-zero value is true.
    #[inline]
    pub fn read_boolean(&mut self) -> Result<bool, StreamError> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a signed 64-bit big-endian integer.
    pub fn read_i64(&mut self) -> Result<i64, StreamError> {
        let bytes = self.read_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(bytes);
        Ok(i64::from_be_bytes(buf))
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn read_bytes(&mut self, size: usize) -> Result<&'a [u8], StreamError> {
        self.check(size)?;
        let x = self.x;
        let end = x + size;
        let bin = &self.uint8[x..end];
        self.x = end;
        Ok(bin)
    }

    /// Reads a vInt. The fifth byte may only carry the top four bits.
    pub fn read_vint(&mut self) -> Result<i32, StreamError> {
        let start = self.x;
        let mut result: u32 = 0;
        for i in 0..5 {
            let b = match self.read_u8() {
                Ok(b) => b as u32,
                Err(e) => {
                    self.x = start;
                    return Err(e);
                }
            };
            if i == 4 && b & 0xf0 != 0 {
                self.x = start;
                return Err(StreamError::MalformedVInt);
            }
            result |= (b & 0x7f) << (7 * i);
            if b & 0x80 == 0 {
                return Ok(result as i32);
            }
        }
        unreachable!("the fifth vInt byte has no continuation bit")
    }

    /// Reads a vLong of at most ten bytes. The tenth byte may only be 0 or 1.
    pub fn read_vlong(&mut self) -> Result<u64, StreamError> {
        let start = self.x;
        let mut result: u64 = 0;
        for i in 0..10 {
            let b = match self.read_u8() {
                Ok(b) => b as u64,
                Err(e) => {
                    self.x = start;
                    return Err(e);
                }
            };
            if i == 9 && b > 1 {
                self.x = start;
                return Err(StreamError::MalformedVLong);
            }
            result |= (b & 0x7f) << (7 * i);
            if b & 0x80 == 0 {
                return Ok(result);
            }
        }
        unreachable!("the tenth vLong byte has no continuation bit")
    }

    /// Reads a zig-zag encoded signed long.
    pub fn read_zlong(&mut self) -> Result<i64, StreamError> {
        Ok(zigzag_decode(self.read_vlong()?))
    }

    fn read_length(&mut self) -> Result<usize, StreamError> {
        let length = self.read_vint()?;
        usize::try_from(length).map_err(|_| StreamError::NegativeLength(length))
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<&'a str, StreamError> {
        let bytes = self.read_bytes_reference()?;
        str::from_utf8(bytes).map_err(|_| StreamError::InvalidUtf8)
    }

    /// Reads a length-prefixed byte sequence.
    pub fn read_bytes_reference(&mut self) -> Result<&'a [u8], StreamError> {
        let start = self.x;
        let length = self.read_length()?;
        self.read_bytes(length).inspect_err(|_| self.x = start)
    }

    /// Reads an enum variant from its vInt ordinal.
    pub fn read_enum<E: WireEnum>(&mut self) -> Result<E, StreamError> {
        let ordinal = self.read_vint()?;
        u32::try_from(ordinal)
            .ok()
            .and_then(E::from_ordinal)
            .ok_or(StreamError::UnknownOrdinal {
                name: E::NAME,
                ordinal,
            })
    }
}
