//! Endian-aware layering over the byte-buffered stream.
//!
//! Multi-byte values are assembled from and disassembled into short byte
//! arrays that move through `BufferedFile`'s byte-level primitives, so the
//! stream position stays byte-granular and no alignment state leaks between
//! calls.

use std::marker::PhantomData;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::J2kError;
use crate::stream::buffered::{BufferedFile, OpenMode};
use crate::stream::traits::{BinaryDataInput, BinaryDataOutput};

/// Byte order of multi-byte values in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrdering {
    /// Most significant byte first.
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

/// A `byteorder::ByteOrder` that also knows its own name, so a stream can
/// report its declared ordering at run time.
pub trait Endianness: ByteOrder {
    const ORDERING: ByteOrdering;
}

impl Endianness for BigEndian {
    const ORDERING: ByteOrdering = ByteOrdering::BigEndian;
}

impl Endianness for LittleEndian {
    const ORDERING: ByteOrdering = ByteOrdering::LittleEndian;
}

/// A buffered random-access file stream with multi-byte operations in one
/// fixed byte order.
pub struct EndianBufferedFile<E: Endianness> {
    inner: BufferedFile,
    endian: PhantomData<E>,
}

/// Big-endian buffered file stream (the order of JPEG 2000 codestreams).
pub type BeBufferedFile = EndianBufferedFile<BigEndian>;

/// Little-endian buffered file stream.
pub type LeBufferedFile = EndianBufferedFile<LittleEndian>;

impl<E: Endianness> EndianBufferedFile<E> {
    /// Opens `path` with the default buffer size.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self, J2kError> {
        Ok(Self {
            inner: BufferedFile::open(path, mode)?,
            endian: PhantomData,
        })
    }

    /// Opens `path` with an explicit buffer size.
    pub fn with_buffer_size<P: AsRef<Path>>(
        path: P,
        mode: OpenMode,
        buffer_size: usize,
    ) -> Result<Self, J2kError> {
        Ok(Self {
            inner: BufferedFile::with_buffer_size(path, mode, buffer_size)?,
            endian: PhantomData,
        })
    }

    /// Wraps an already opened byte-level stream.
    pub fn from_buffered(inner: BufferedFile) -> Self {
        Self {
            inner,
            endian: PhantomData,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    pub fn length(&mut self) -> Result<u64, J2kError> {
        self.inner.length()
    }

    pub fn seek(&mut self, off: u64) -> Result<(), J2kError> {
        self.inner.seek(off)
    }

    pub fn read_byte(&mut self) -> Result<u8, J2kError> {
        self.inner.read_byte()
    }

    pub fn read_fully(&mut self, buf: &mut [u8]) -> Result<(), J2kError> {
        self.inner.read_fully(buf)
    }

    pub fn write_byte(&mut self, b: u8) -> Result<(), J2kError> {
        self.inner.write_byte(b)
    }

    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), J2kError> {
        self.inner.write_all(buf)
    }

    pub fn close(self) -> Result<(), J2kError> {
        self.inner.close()
    }

    /// Reports the stream's fixed byte ordering.
    pub fn byte_ordering(&self) -> ByteOrdering {
        E::ORDERING
    }
}

impl<E: Endianness> BinaryDataInput for EndianBufferedFile<E> {
    fn read_u8(&mut self) -> Result<u8, J2kError> {
        self.inner.read_byte()
    }

    fn read_i8(&mut self) -> Result<i8, J2kError> {
        Ok(self.inner.read_byte()? as i8)
    }

    fn read_u16(&mut self) -> Result<u16, J2kError> {
        let mut b = [0u8; 2];
        self.inner.read_fully(&mut b)?;
        Ok(E::read_u16(&b))
    }

    fn read_i16(&mut self) -> Result<i16, J2kError> {
        let mut b = [0u8; 2];
        self.inner.read_fully(&mut b)?;
        Ok(E::read_i16(&b))
    }

    fn read_u32(&mut self) -> Result<u32, J2kError> {
        let mut b = [0u8; 4];
        self.inner.read_fully(&mut b)?;
        Ok(E::read_u32(&b))
    }

    fn read_i32(&mut self) -> Result<i32, J2kError> {
        let mut b = [0u8; 4];
        self.inner.read_fully(&mut b)?;
        Ok(E::read_i32(&b))
    }

    fn read_u64(&mut self) -> Result<u64, J2kError> {
        let mut b = [0u8; 8];
        self.inner.read_fully(&mut b)?;
        Ok(E::read_u64(&b))
    }

    fn read_i64(&mut self) -> Result<i64, J2kError> {
        let mut b = [0u8; 8];
        self.inner.read_fully(&mut b)?;
        Ok(E::read_i64(&b))
    }

    fn read_f32(&mut self) -> Result<f32, J2kError> {
        let mut b = [0u8; 4];
        self.inner.read_fully(&mut b)?;
        Ok(E::read_f32(&b))
    }

    fn read_f64(&mut self) -> Result<f64, J2kError> {
        let mut b = [0u8; 8];
        self.inner.read_fully(&mut b)?;
        Ok(E::read_f64(&b))
    }

    fn skip_bytes(&mut self, n: i32) -> Result<i32, J2kError> {
        self.inner.skip_bytes(n)
    }

    fn byte_ordering(&self) -> ByteOrdering {
        E::ORDERING
    }
}

impl<E: Endianness> BinaryDataOutput for EndianBufferedFile<E> {
    fn write_u8(&mut self, v: u8) -> Result<(), J2kError> {
        self.inner.write_byte(v)
    }

    fn write_i8(&mut self, v: i8) -> Result<(), J2kError> {
        self.inner.write_byte(v as u8)
    }

    fn write_u16(&mut self, v: u16) -> Result<(), J2kError> {
        let mut b = [0u8; 2];
        E::write_u16(&mut b, v);
        self.inner.write_all(&b)
    }

    fn write_i16(&mut self, v: i16) -> Result<(), J2kError> {
        let mut b = [0u8; 2];
        E::write_i16(&mut b, v);
        self.inner.write_all(&b)
    }

    fn write_u32(&mut self, v: u32) -> Result<(), J2kError> {
        let mut b = [0u8; 4];
        E::write_u32(&mut b, v);
        self.inner.write_all(&b)
    }

    fn write_i32(&mut self, v: i32) -> Result<(), J2kError> {
        let mut b = [0u8; 4];
        E::write_i32(&mut b, v);
        self.inner.write_all(&b)
    }

    fn write_u64(&mut self, v: u64) -> Result<(), J2kError> {
        let mut b = [0u8; 8];
        E::write_u64(&mut b, v);
        self.inner.write_all(&b)
    }

    fn write_i64(&mut self, v: i64) -> Result<(), J2kError> {
        let mut b = [0u8; 8];
        E::write_i64(&mut b, v);
        self.inner.write_all(&b)
    }

    fn write_f32(&mut self, v: f32) -> Result<(), J2kError> {
        let mut b = [0u8; 4];
        E::write_f32(&mut b, v);
        self.inner.write_all(&b)
    }

    fn write_f64(&mut self, v: f64) -> Result<(), J2kError> {
        let mut b = [0u8; 8];
        E::write_f64(&mut b, v);
        self.inner.write_all(&b)
    }

    fn flush(&mut self) -> Result<(), J2kError> {
        self.inner.flush()
    }

    fn byte_ordering(&self) -> ByteOrdering {
        E::ORDERING
    }
}
