//! Binary stream primitives shared by watcher transport messages.
//!
//! [`StreamOutput`] appends to an auto-growing buffer; [`StreamInput`] reads
//! from a borrowed byte slice with every read bounds checked. Both speak the
//! same primitive set: single bytes, booleans, big-endian longs, 7-bit
//! variable-length integers (vInt / vLong), zig-zag longs (zLong), and
//! length-prefixed strings and byte sequences.
//!
//! # Example
//!
//! ```
//! use watcher_buffers::{StreamInput, StreamOutput};
//!
//! let mut out = StreamOutput::new();
//! out.write_string("my_watch").unwrap();
//! out.write_zlong(-3);
//! let data = out.flush();
//!
//! let mut input = StreamInput::new(&data);
//! assert_eq!(input.read_string().unwrap(), "my_watch");
//! assert_eq!(input.read_zlong().unwrap(), -3);
//! ```

mod reader;
mod writer;

pub use reader::StreamInput;
pub use writer::StreamOutput;

use thiserror::Error;

/// Errors raised while reading or writing a binary stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("invalid vInt: too many bytes or high bits set in the last byte")]
    MalformedVInt,
    #[error("invalid vLong: too many bytes or high bits set in the last byte")]
    MalformedVLong,
    #[error("length prefix must be >= 0 but was {0}")]
    NegativeLength(i32),
    #[error("length {0} does not fit a vInt length prefix")]
    LengthOverflow(usize),
    #[error("unknown {name} ordinal: {ordinal}")]
    UnknownOrdinal { name: &'static str, ordinal: i32 },
    #[error("{0} unread bytes left after message")]
    TrailingBytes(usize),
}

/// A closed enumeration whose wire form is its declaration ordinal.
///
/// Reordering the variants of an implementor is a wire-breaking change.
pub trait WireEnum: Sized + Copy {
    /// Name used in error messages.
    const NAME: &'static str;

    /// Position of the variant in declaration order.
    fn ordinal(self) -> u32;

    /// Inverse of [`WireEnum::ordinal`].
    fn from_ordinal(ordinal: u32) -> Option<Self>;
}

/// Zig-zag encodes a signed long so small magnitudes stay short on the wire.
#[inline]
pub fn zigzag_encode(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
pub fn zigzag_decode(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}
