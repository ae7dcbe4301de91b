//! Interfaces for endian-aware binary input and output.
//!
//! Codestream readers and writers are typed against these traits rather than
//! a concrete stream, so header parsing does not care whether the bytes come
//! from a big- or little-endian stream. Every operation works on a
//! byte-aligned position; integers are two's-complement and floats travel as
//! their raw IEEE-754 bit patterns in the stream's declared byte order.

use crate::error::J2kError;
use crate::stream::endian::ByteOrdering;

/// Endian-aware multi-byte reads over a byte-granular stream.
pub trait BinaryDataInput {
    fn read_u8(&mut self) -> Result<u8, J2kError>;
    fn read_i8(&mut self) -> Result<i8, J2kError>;
    fn read_u16(&mut self) -> Result<u16, J2kError>;
    fn read_i16(&mut self) -> Result<i16, J2kError>;
    fn read_u32(&mut self) -> Result<u32, J2kError>;
    fn read_i32(&mut self) -> Result<i32, J2kError>;
    fn read_u64(&mut self) -> Result<u64, J2kError>;
    fn read_i64(&mut self) -> Result<i64, J2kError>;
    fn read_f32(&mut self) -> Result<f32, J2kError>;
    fn read_f64(&mut self) -> Result<f64, J2kError>;

    /// Skips `n` bytes. A negative count is a usage error.
    fn skip_bytes(&mut self, n: i32) -> Result<i32, J2kError>;

    /// Byte order used for all multi-byte reads.
    fn byte_ordering(&self) -> ByteOrdering;
}

/// Endian-aware multi-byte writes over a byte-granular stream.
pub trait BinaryDataOutput {
    fn write_u8(&mut self, v: u8) -> Result<(), J2kError>;
    fn write_i8(&mut self, v: i8) -> Result<(), J2kError>;
    fn write_u16(&mut self, v: u16) -> Result<(), J2kError>;
    fn write_i16(&mut self, v: i16) -> Result<(), J2kError>;
    fn write_u32(&mut self, v: u32) -> Result<(), J2kError>;
    fn write_i32(&mut self, v: i32) -> Result<(), J2kError>;
    fn write_u64(&mut self, v: u64) -> Result<(), J2kError>;
    fn write_i64(&mut self, v: i64) -> Result<(), J2kError>;
    fn write_f32(&mut self, v: f32) -> Result<(), J2kError>;
    fn write_f64(&mut self, v: f64) -> Result<(), J2kError>;

    /// Writes any buffered bytes through to the destination.
    fn flush(&mut self) -> Result<(), J2kError>;

    /// Byte order used for all multi-byte writes.
    fn byte_ordering(&self) -> ByteOrdering;
}
