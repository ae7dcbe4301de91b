//! Buffered random-access binary I/O.
//!
//! This module contains the byte-buffered file stream the codec reads and
//! writes through:
//!
//! - `buffered`: the endian-agnostic `BufferedFile` (byte-level operations,
//!   window management, EOF and read-only semantics).
//! - `endian`: `EndianBufferedFile<E>` layering big- or little-endian
//!   multi-byte operations over the byte-level primitive, with the
//!   `BeBufferedFile` / `LeBufferedFile` aliases.
//! - `traits`: the `BinaryDataInput` / `BinaryDataOutput` interfaces that
//!   codestream readers and writers are typed against.

pub mod buffered;
pub mod endian;
pub mod traits;

pub use buffered::{BufferedFile, OpenMode};
pub use endian::{BeBufferedFile, ByteOrdering, Endianness, EndianBufferedFile, LeBufferedFile};
pub use traits::{BinaryDataInput, BinaryDataOutput};
