//! Buffered stream integration tests: round-trips across the buffer
//! boundary, EOF semantics, and access-mode enforcement.

use j2kwave_rs::error::J2kError;
use j2kwave_rs::stream::{
    BeBufferedFile, BinaryDataInput, BinaryDataOutput, BufferedFile, ByteOrdering, LeBufferedFile,
    OpenMode,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_round_trip_big_endian_across_buffer_boundary() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("be_roundtrip.bin");

    let mut stream = BeBufferedFile::open(&path, OpenMode::ReadWrite).unwrap();
    assert_eq!(stream.byte_ordering(), ByteOrdering::BigEndian);

    // 600 single bytes push the stream through the 512-byte window.
    for i in 0..600u32 {
        stream.write_byte((i % 251) as u8).unwrap();
    }
    stream.write_u16(0xBEEF).unwrap();
    stream.write_i16(-1234).unwrap();
    stream.write_u32(0xDEAD_BEEF).unwrap();
    stream.write_i32(-7_654_321).unwrap();
    stream.write_u64(0x0123_4567_89AB_CDEF).unwrap();
    stream.write_i64(-1_234_567_890_123).unwrap();
    stream.write_f32(3.25).unwrap();
    stream.write_f64(-2.5e300).unwrap();

    stream.seek(0).unwrap();
    for i in 0..600u32 {
        assert_eq!(stream.read_byte().unwrap(), (i % 251) as u8);
    }
    assert_eq!(stream.read_u16().unwrap(), 0xBEEF);
    assert_eq!(stream.read_i16().unwrap(), -1234);
    assert_eq!(stream.read_u32().unwrap(), 0xDEAD_BEEF);
    assert_eq!(stream.read_i32().unwrap(), -7_654_321);
    assert_eq!(stream.read_u64().unwrap(), 0x0123_4567_89AB_CDEF);
    assert_eq!(stream.read_i64().unwrap(), -1_234_567_890_123);
    assert_eq!(stream.read_f32().unwrap(), 3.25);
    assert_eq!(stream.read_f64().unwrap(), -2.5e300);
    stream.close().unwrap();

    // The multi-byte values must be on disk most significant byte first.
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[600..602], &[0xBE, 0xEF]);
    assert_eq!(&bytes[604..608], &[0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn test_round_trip_little_endian() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("le_roundtrip.bin");

    let mut stream = LeBufferedFile::open(&path, OpenMode::ReadWrite).unwrap();
    assert_eq!(stream.byte_ordering(), ByteOrdering::LittleEndian);

    stream.write_u16(0xBEEF).unwrap();
    stream.write_u32(0xDEAD_BEEF).unwrap();
    stream.write_f64(1.0 / 3.0).unwrap();
    stream.seek(0).unwrap();
    assert_eq!(stream.read_u16().unwrap(), 0xBEEF);
    assert_eq!(stream.read_u32().unwrap(), 0xDEAD_BEEF);
    assert_eq!(stream.read_f64().unwrap(), 1.0 / 3.0);
    stream.close().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..2], &[0xEF, 0xBE]);
    assert_eq!(&bytes[2..6], &[0xEF, 0xBE, 0xAD, 0xDE]);
}

#[test]
fn test_reopen_and_read_with_small_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("small_buffer.bin");

    let mut stream = BeBufferedFile::open(&path, OpenMode::ReadWrite).unwrap();
    for i in 0..100u8 {
        stream.write_byte(i).unwrap();
    }
    stream.close().unwrap();

    // A 7-byte window forces a reload roughly every 7 reads.
    let mut stream = BeBufferedFile::with_buffer_size(&path, OpenMode::Read, 7).unwrap();
    for i in 0..25 {
        assert_eq!(stream.read_u32().unwrap(), u32::from_be_bytes([
            4 * i,
            4 * i + 1,
            4 * i + 2,
            4 * i + 3,
        ]));
    }
    assert!(stream.read_byte().unwrap_err().is_eof());
}

#[test]
fn test_eof_is_sticky() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eof.bin");
    std::fs::write(&path, [1u8, 2, 3]).unwrap();

    let mut stream = BufferedFile::open(&path, OpenMode::Read).unwrap();
    for expected in [1u8, 2, 3] {
        assert_eq!(stream.read_byte().unwrap(), expected);
    }
    // One byte past the end fails, and keeps failing: the position must not
    // silently advance past the failure.
    assert!(stream.read_byte().unwrap_err().is_eof());
    assert!(stream.read_byte().unwrap_err().is_eof());
}

#[test]
fn test_read_only_rejects_writes_without_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("readonly.bin");
    std::fs::write(&path, [9u8, 8, 7]).unwrap();

    let mut stream = BufferedFile::open(&path, OpenMode::Read).unwrap();
    assert!(stream.is_read_only());
    assert!(matches!(
        stream.write_byte(0),
        Err(J2kError::FileIsReadOnly)
    ));
    // The failed write must not have touched the buffer.
    assert_eq!(stream.read_byte().unwrap(), 9);
    stream.close().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), vec![9, 8, 7]);
}

#[test]
fn test_read_only_open_of_empty_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.bin");
    std::fs::write(&path, []).unwrap();

    assert!(matches!(
        BufferedFile::open(&path, OpenMode::Read),
        Err(J2kError::EndOfFile)
    ));
}

#[test]
fn test_seek_past_eof_in_read_only_mode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seek_eof.bin");
    std::fs::write(&path, vec![0u8; 10]).unwrap();

    let mut stream = BufferedFile::open(&path, OpenMode::Read).unwrap();
    // Seeking to the end itself is allowed; the next read fails.
    stream.seek(10).unwrap();
    assert!(stream.read_byte().unwrap_err().is_eof());
    // Seeking beyond the end fails immediately.
    assert!(matches!(stream.seek(11), Err(J2kError::EndOfFile)));
}

#[test]
fn test_in_window_seek_and_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seek.bin");
    std::fs::write(&path, (0u8..=99).collect::<Vec<_>>()).unwrap();

    let mut stream = BufferedFile::open(&path, OpenMode::Read).unwrap();
    stream.seek(42).unwrap();
    assert_eq!(stream.position(), 42);
    assert_eq!(stream.read_byte().unwrap(), 42);
    assert_eq!(stream.position(), 43);

    stream.seek(7).unwrap();
    assert_eq!(stream.read_byte().unwrap(), 7);
}

#[test]
fn test_skip_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("skip.bin");
    std::fs::write(&path, (0u8..=99).collect::<Vec<_>>()).unwrap();

    let mut stream = BeBufferedFile::with_buffer_size(&path, OpenMode::Read, 16).unwrap();
    assert_eq!(stream.skip_bytes(10).unwrap(), 10);
    assert_eq!(stream.read_byte().unwrap(), 10);
    // Skipping past the window forces a reload.
    assert_eq!(stream.skip_bytes(50).unwrap(), 50);
    assert_eq!(stream.read_byte().unwrap(), 61);

    assert!(matches!(
        stream.skip_bytes(-1),
        Err(J2kError::InvalidArgument(_))
    ));
    // The failed skip must not have moved the stream.
    assert_eq!(stream.read_byte().unwrap(), 62);
}

#[test]
fn test_length_includes_pending_buffered_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("length.bin");

    let mut stream = BufferedFile::open(&path, OpenMode::ReadWrite).unwrap();
    stream.write_all(&[1, 2, 3, 4, 5]).unwrap();
    // Nothing has been flushed yet; the length must still count the
    // buffered bytes.
    assert_eq!(stream.length().unwrap(), 5);

    stream.seek(600).unwrap();
    stream.write_byte(0xAA).unwrap();
    assert_eq!(stream.length().unwrap(), 601);
    stream.close().unwrap();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), 601);
}

#[test]
fn test_update_mode_overwrites_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("update.bin");
    std::fs::write(&path, (0u8..=9).collect::<Vec<_>>()).unwrap();

    let mut stream = BufferedFile::open(&path, OpenMode::Update).unwrap();
    stream.seek(4).unwrap();
    stream.write_all(&[0xAB, 0xCD]).unwrap();
    stream.close().unwrap();

    assert_eq!(
        std::fs::read(&path).unwrap(),
        vec![0, 1, 2, 3, 0xAB, 0xCD, 6, 7, 8, 9]
    );
}

#[test]
fn test_read_write_mode_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncate.bin");
    std::fs::write(&path, vec![0xFFu8; 100]).unwrap();

    let mut stream = BufferedFile::open(&path, OpenMode::ReadWrite).unwrap();
    stream.write_byte(1).unwrap();
    stream.close().unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), vec![1]);
}

#[test]
fn test_zero_buffer_size_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero.bin");
    assert!(matches!(
        BufferedFile::with_buffer_size(&path, OpenMode::ReadWrite, 0),
        Err(J2kError::InvalidArgument(_))
    ));
}

#[test]
fn test_read_fully_fails_on_short_stream() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.bin");
    std::fs::write(&path, [1u8, 2, 3]).unwrap();

    let mut stream = BeBufferedFile::open(&path, OpenMode::Read).unwrap();
    // Four bytes requested, three available.
    assert!(stream.read_u32().unwrap_err().is_eof());
}

#[test]
fn test_drop_flushes_pending_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drop.bin");

    {
        let mut stream = BufferedFile::open(&path, OpenMode::ReadWrite).unwrap();
        stream.write_all(b"flushed").unwrap();
        // Dropped without an explicit close.
    }
    assert_eq!(std::fs::read(&path).unwrap(), b"flushed");
}
