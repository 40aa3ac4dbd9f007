use std::io;

use derive_more::Display;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "io error: {}", _0)]
    Io(io::Error),

    #[display(fmt = "malformed archive: {}", _0)]
    Format(FormatError),

    #[display(fmt = "input of {} bytes is too large for a single archive", _0)]
    InputTooLarge(usize),
}

/// Reasons an archive is rejected while decoding. None of them are recoverable,
/// whatever was written to the output before the error should be discarded.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[display(fmt = "archive ended while reading the {}", _0)]
    Truncated(&'static str),

    #[display(fmt = "archive declares {} distinct symbols, at most 256 are possible", _0)]
    TooManySymbols(u16),

    #[display(
        fmt = "archive declares {} symbols but {} distinct symbols",
        total,
        distinct
    )]
    CountMismatch { total: u32, distinct: u16 },

    #[display(fmt = "symbol {} has an empty code", _0)]
    EmptyCode(u8),

    #[display(fmt = "symbol {} is listed more than once", _0)]
    DuplicateSymbol(u8),

    #[display(fmt = "code for symbol {} collides with another code", _0)]
    CodeCollision(u8),

    #[display(fmt = "payload contains a bit sequence with no assigned symbol")]
    UnassignedCode,

    #[display(fmt = "payload continues after the last symbol")]
    TrailingBytes,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Format(err) => Some(err),
            Error::InputTooLarge(_) => None,
        }
    }
}

impl std::error::Error for FormatError {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<FormatError> for Error {
    fn from(err: FormatError) -> Self {
        Error::Format(err)
    }
}

/// Reads exactly `buf.len()` bytes. Running out of input is a malformed archive
/// rather than an i/o failure, `what` names the field being read.
pub(crate) fn read_field<R: io::Read>(
    reader: &mut R,
    buf: &mut [u8],
    what: &'static str,
) -> Result<()> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => Error::Format(FormatError::Truncated(what)),
        _ => Error::Io(err),
    })
}
