//! Byte-buffered random access to a file.
//!
//! `BufferedFile` keeps one window of the file in memory and services all
//! byte-level reads and writes from it, reloading the window only when an
//! operation lands outside of it. Multi-byte operations are layered on top
//! in `endian`; everything here is byte-granular.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::{debug, trace};

use crate::constants::DEFAULT_BUFFER_SIZE;
use crate::error::J2kError;

/// Access mode for a buffered file stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Open an existing file; all write operations are rejected.
    Read,
    /// Create the file, truncating it if it already exists.
    ReadWrite,
    /// Open an existing file for update, keeping its contents.
    Update,
}

/// A random-access file stream backed by a fixed-size byte buffer.
///
/// The buffer holds the file bytes `[offset, offset + max_byte)` and is the
/// single source of truth for that range: modified windows are written back
/// before the stream is repositioned outside of them and when the stream is
/// flushed, closed, or dropped.
pub struct BufferedFile {
    file: File,
    read_only: bool,
    buffer: Box<[u8]>,
    /// File offset of the first byte held in the buffer.
    offset: u64,
    /// Position of the next byte to read or write, relative to `offset`.
    pos: usize,
    /// Number of valid bytes in the buffer.
    max_byte: usize,
    /// Whether the end of the file falls inside the current window.
    eof_in_buffer: bool,
    /// Whether the buffer holds bytes not yet written back to the file.
    modified: bool,
}

impl BufferedFile {
    /// Opens `path` with the default buffer size (512 bytes).
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self, J2kError> {
        Self::with_buffer_size(path, mode, DEFAULT_BUFFER_SIZE)
    }

    /// Opens `path` with an explicit buffer size.
    ///
    /// The first window is loaded eagerly. In `Read` mode, opening a file
    /// whose length is zero fails with an end-of-file error, since no window
    /// can be loaded.
    pub fn with_buffer_size<P: AsRef<Path>>(
        path: P,
        mode: OpenMode,
        buffer_size: usize,
    ) -> Result<Self, J2kError> {
        if buffer_size == 0 {
            return Err(J2kError::InvalidArgument(
                "buffer size must be at least one byte".to_string(),
            ));
        }

        let (file, read_only) = match mode {
            OpenMode::Read => (OpenOptions::new().read(true).open(&path)?, true),
            OpenMode::ReadWrite => (
                OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&path)?,
                false,
            ),
            OpenMode::Update => (
                OpenOptions::new().read(true).write(true).open(&path)?,
                false,
            ),
        };

        debug!(
            "opened {:?} ({:?}, {} byte buffer)",
            path.as_ref(),
            mode,
            buffer_size
        );

        let mut stream = Self {
            file,
            read_only,
            buffer: vec![0u8; buffer_size].into_boxed_slice(),
            offset: 0,
            pos: 0,
            max_byte: 0,
            eof_in_buffer: true,
            modified: false,
        };
        stream.read_new_buffer(0)?;
        Ok(stream)
    }

    /// Whether this stream rejects write operations.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The stream position the next read or write applies to.
    pub fn position(&self) -> u64 {
        self.offset + self.pos as u64
    }

    /// Length of the stream, including buffered bytes not yet written back
    /// to the file.
    pub fn length(&mut self) -> Result<u64, J2kError> {
        let file_len = self.file.metadata()?.len();
        Ok(file_len.max(self.offset + self.max_byte as u64))
    }

    /// Moves the window so that it holds the file bytes starting at `off`,
    /// writing the current window back first if it was modified.
    fn read_new_buffer(&mut self, off: u64) -> Result<(), J2kError> {
        if self.modified {
            self.flush()?;
        }
        // A read-only stream has nothing to say about bytes past the end of
        // the file, so the window may not start there.
        if self.read_only && off >= self.file.metadata()?.len() {
            return Err(J2kError::EndOfFile);
        }
        trace!("reloading buffer window at offset {off}");

        self.offset = off;
        self.file.seek(SeekFrom::Start(off))?;

        let mut count = 0;
        while count < self.buffer.len() {
            let n = self.file.read(&mut self.buffer[count..])?;
            if n == 0 {
                break;
            }
            count += n;
        }
        self.max_byte = count;
        self.pos = 0;
        self.eof_in_buffer = count != self.buffer.len();
        Ok(())
    }

    /// Reads the byte at the current position and advances past it.
    ///
    /// At the end of the file this fails with `J2kError::EndOfFile` and pins
    /// the position one byte past `max_byte`, so that repeated reads keep
    /// failing instead of silently advancing.
    pub fn read_byte(&mut self) -> Result<u8, J2kError> {
        loop {
            if self.pos < self.max_byte {
                let b = self.buffer[self.pos];
                self.pos += 1;
                return Ok(b);
            }
            if self.eof_in_buffer {
                self.pos = self.max_byte + 1;
                return Err(J2kError::EndOfFile);
            }
            // The position is past the loaded window; reload and retry.
            self.read_new_buffer(self.offset + self.pos as u64)?;
        }
    }

    /// Fills `buf` entirely, failing with an end-of-file error if the stream
    /// is exhausted before the last byte.
    pub fn read_fully(&mut self, buf: &mut [u8]) -> Result<(), J2kError> {
        for b in buf.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(())
    }

    /// Writes one byte at the current position, extending the valid byte
    /// count when writing at or past `max_byte`.
    pub fn write_byte(&mut self, b: u8) -> Result<(), J2kError> {
        loop {
            if self.pos < self.buffer.len() {
                if self.read_only {
                    return Err(J2kError::FileIsReadOnly);
                }
                self.buffer[self.pos] = b;
                if self.pos >= self.max_byte {
                    self.max_byte = self.pos + 1;
                }
                self.pos += 1;
                self.modified = true;
                return Ok(());
            }
            self.read_new_buffer(self.offset + self.pos as u64)?;
        }
    }

    /// Writes every byte of `buf` at the current position.
    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), J2kError> {
        for &b in buf {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Moves the stream position to `off`.
    ///
    /// When `off` falls inside the loaded window only the in-buffer position
    /// changes; otherwise the window is reloaded at `off`. Seeking past the
    /// known end of the file fails in read-only mode.
    pub fn seek(&mut self, off: u64) -> Result<(), J2kError> {
        if off >= self.offset && off < self.offset + self.buffer.len() as u64 {
            if self.read_only && self.eof_in_buffer && off > self.offset + self.max_byte as u64 {
                return Err(J2kError::EndOfFile);
            }
            self.pos = (off - self.offset) as usize;
            Ok(())
        } else {
            self.read_new_buffer(off)
        }
    }

    /// Skips `n` bytes, reloading the window if the skip leaves it.
    /// A negative count is a usage error.
    pub fn skip_bytes(&mut self, n: i32) -> Result<i32, J2kError> {
        if n < 0 {
            return Err(J2kError::InvalidArgument(
                "cannot skip a negative number of bytes".to_string(),
            ));
        }
        if n as usize <= self.max_byte.saturating_sub(self.pos) {
            self.pos += n as usize;
        } else {
            self.seek(self.offset + self.pos as u64 + n as u64)?;
        }
        Ok(n)
    }

    /// Writes the buffer back to the file if it was modified since the last
    /// window load.
    pub fn flush(&mut self) -> Result<(), J2kError> {
        if self.modified {
            self.file.seek(SeekFrom::Start(self.offset))?;
            self.file.write_all(&self.buffer[..self.max_byte])?;
            self.modified = false;
        }
        Ok(())
    }

    /// Flushes pending bytes and consumes the stream.
    ///
    /// Dropping the stream also flushes, but only `close` reports a failing
    /// flush to the caller.
    pub fn close(mut self) -> Result<(), J2kError> {
        self.flush()
    }
}

impl Drop for BufferedFile {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl std::fmt::Debug for BufferedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedFile")
            .field("read_only", &self.read_only)
            .field("offset", &self.offset)
            .field("pos", &self.pos)
            .field("max_byte", &self.max_byte)
            .field("eof_in_buffer", &self.eof_in_buffer)
            .field("modified", &self.modified)
            .finish()
    }
}
