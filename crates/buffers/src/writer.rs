//! Binary stream writer with auto-growing capacity.

use crate::{zigzag_encode, StreamError, WireEnum};

/// Default allocation size; large enough for a typical request in one chunk.
const DEFAULT_ALLOC_SIZE: usize = 1024;

/// A sequential binary writer that grows automatically as needed.
///
/// # Example
///
/// ```
/// use watcher_buffers::StreamOutput;
///
/// let mut out = StreamOutput::new();
/// out.write_boolean(true);
/// out.write_vint(300);
/// assert_eq!(out.flush(), [0x01, 0xac, 0x02]);
/// ```
pub struct StreamOutput {
    /// The underlying byte buffer.
    uint8: Vec<u8>,
    /// Position where last flush happened.
    x0: usize,
    /// Current cursor position.
    x: usize,
    /// Allocation size when buffer needs to grow.
    alloc_size: usize,
}

impl Default for StreamOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamOutput {
    /// Creates a new writer with the default allocation size.
    pub fn new() -> Self {
        Self::with_alloc_size(DEFAULT_ALLOC_SIZE)
    }

    /// Creates a new writer with custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        let alloc_size = alloc_size.max(1);
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.x == self.x0
    }

    fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let required = capacity - remaining;
            let total_required = total + required;
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    fn grow(&mut self, new_size: usize) {
        let x0 = self.x0;
        let x = self.x;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..x - x0].copy_from_slice(&self.uint8[x0..x]);
        self.uint8 = new_buf;
        self.x = x - x0;
        self.x0 = 0;
    }

    /// Returns the written data and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    /// Returns a view of the unflushed data without advancing.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8[self.x0..self.x]
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
    }

    /// Writes a boolean as one byte: 1 for true, 0 for false.
    #[inline]
    pub fn write_boolean(&mut self, val: bool) {
        self.write_u8(if val { 1 } else { 0 });
    }

    /// Writes a signed 64-bit integer (big-endian).
    #[inline]
    pub fn write_i64(&mut self, val: i64) {
        self.write_bytes(&val.to_be_bytes());
    }

    /// Writes raw bytes with no length prefix.
    pub fn write_bytes(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }

    /// Writes an int in 7-bit groups, low group first.
    ///
    /// Negative values are written as their unsigned bit pattern and always
    /// take five bytes.
    pub fn write_vint(&mut self, val: i32) {
        let mut n = val as u32;
        while n & !0x7f != 0 {
            self.write_u8(((n & 0x7f) | 0x80) as u8);
            n >>= 7;
        }
        self.write_u8(n as u8);
    }

    /// Writes an unsigned long in 7-bit groups, at most ten bytes.
    pub fn write_vlong(&mut self, val: u64) {
        let mut n = val;
        while n & !0x7f != 0 {
            self.write_u8(((n & 0x7f) | 0x80) as u8);
            n >>= 7;
        }
        self.write_u8(n as u8);
    }

    /// Writes a signed long zig-zag encoded over a vLong.
    pub fn write_zlong(&mut self, val: i64) {
        self.write_vlong(zigzag_encode(val));
    }

    /// Writes a vInt length prefix for `length` bytes.
    fn write_length(&mut self, length: usize) -> Result<(), StreamError> {
        let length = i32::try_from(length).map_err(|_| StreamError::LengthOverflow(length))?;
        self.write_vint(length);
        Ok(())
    }

    /// Writes a UTF-8 string prefixed by its byte length.
    ///
    /// Peers that prefix strings with a UTF-16 code unit count and write
    /// modified UTF-8 disagree with this layout for any non-ASCII text:
    /// `"café"` is prefixed 5 here and 4 there. ASCII strings encode the
    /// same in both. See `test_string` for the exact bytes.
    pub fn write_string(&mut self, s: &str) -> Result<(), StreamError> {
        self.write_length(s.len())?;
        self.write_bytes(s.as_bytes());
        Ok(())
    }

    /// Writes a byte sequence prefixed by its length. Zero length is allowed.
    pub fn write_bytes_reference(&mut self, buf: &[u8]) -> Result<(), StreamError> {
        self.write_length(buf.len())?;
        self.write_bytes(buf);
        Ok(())
    }

    /// Writes an enum variant as its vInt ordinal.
    pub fn write_enum<E: WireEnum>(&mut self, val: E) {
        // Ordinals are declaration indices and stay far below i32::MAX.
        self.write_vint(val.ordinal() as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let mut out = StreamOutput::new();
        out.write_u8(0x01);
        out.write_u8(0x02);
        assert_eq!(out.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_boolean() {
        let mut out = StreamOutput::new();
        out.write_boolean(true);
        out.write_boolean(false);
        assert_eq!(out.flush(), [0x01, 0x00]);
    }

    #[test]
    fn test_i64_big_endian() {
        let mut out = StreamOutput::new();
        out.write_i64(-1);
        assert_eq!(out.flush(), [0xff; 8]);
        out.write_i64(0x0102030405060708);
        assert_eq!(out.flush(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_vint() {
        let mut out = StreamOutput::new();
        out.write_vint(0);
        assert_eq!(out.flush(), [0x00]);
        out.write_vint(127);
        assert_eq!(out.flush(), [0x7f]);
        out.write_vint(128);
        assert_eq!(out.flush(), [0x80, 0x01]);
        out.write_vint(300);
        assert_eq!(out.flush(), [0xac, 0x02]);
    }

    #[test]
    fn test_vint_negative_takes_five_bytes() {
        let mut out = StreamOutput::new();
        out.write_vint(-1);
        assert_eq!(out.flush(), [0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn test_vlong_max() {
        let mut out = StreamOutput::new();
        out.write_vlong(u64::MAX);
        let data = out.flush();
        assert_eq!(data.len(), 10);
        assert_eq!(data[9], 0x01);
    }

    #[test]
    fn test_zlong() {
        let mut out = StreamOutput::new();
        out.write_zlong(-3);
        assert_eq!(out.flush(), [0x05]);
        out.write_zlong(42);
        assert_eq!(out.flush(), [0x54]);
        out.write_zlong(-1);
        assert_eq!(out.flush(), [0x01]);
    }

    #[test]
    fn test_string() {
        let mut out = StreamOutput::new();
        out.write_string("hello").unwrap();
        assert_eq!(out.flush(), b"\x05hello");
        out.write_string("café").unwrap();
        assert_eq!(out.flush(), b"\x05caf\xc3\xa9");
    }

    #[test]
    fn test_empty_bytes_reference() {
        let mut out = StreamOutput::new();
        out.write_bytes_reference(&[]).unwrap();
        assert_eq!(out.flush(), [0x00]);
    }

    #[test]
    fn test_grows_past_alloc_size() {
        let mut out = StreamOutput::with_alloc_size(4);
        let payload = vec![7u8; 300];
        out.write_bytes_reference(&payload).unwrap();
        let data = out.flush();
        assert_eq!(data.len(), 302);
        assert_eq!(&data[..2], &[0xac, 0x02]);
        assert!(data[2..].iter().all(|b| *b == 7));
    }

    #[test]
    fn test_flush_multiple() {
        let mut out = StreamOutput::with_alloc_size(2);
        out.write_u8(0x01);
        assert_eq!(out.len(), 1);
        assert_eq!(out.flush(), [0x01]);
        assert!(out.is_empty());
        out.write_u8(0x02);
        out.write_u8(0x03);
        out.write_u8(0x04);
        assert_eq!(out.as_slice(), [0x02, 0x03, 0x04]);
        assert_eq!(out.flush(), [0x02, 0x03, 0x04]);
    }
}
