use thiserror::Error;

/// Error type shared by the stream and wavelet layers.
///
/// End-of-file is deliberately its own variant: codestream readers probe for
/// the end of the data and must be able to tell "no more bytes" apart from a
/// failing disk or a misuse of the API.
#[derive(Error, Debug)]
pub enum J2kError {
    #[error("unexpected end of file")]
    EndOfFile,
    #[error("file is read only")]
    FileIsReadOnly,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl J2kError {
    /// True for the end-of-file condition, regardless of how it was reached.
    pub fn is_eof(&self) -> bool {
        matches!(self, J2kError::EndOfFile)
    }
}
