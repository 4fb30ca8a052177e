use derive_more::derive::{Display, Error};
use std::{collections::TryReserveError, io, path::PathBuf};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of every [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    ResourceExhausted,
    Io,
    AlreadyReleased,
}

#[derive(Debug, Display, Error)]
pub enum Error {
    /// An input was empty, out of range or had the wrong dimensions
    #[display("invalid argument: {_0}")]
    InvalidArgument(#[error(not(source))] &'static str),

    /// The transport device could not be opened
    #[display("failed to open {}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// A frame or page buffer could not be allocated
    #[display("failed to allocate buffer")]
    ResourceExhausted(TryReserveError),

    /// The transport failed or stopped accepting bytes
    #[display("transport i/o failed")]
    Io(io::Error),

    /// The display handle was already closed
    #[display("display already released")]
    AlreadyReleased,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(..) | Self::Open { .. } => ErrorKind::InvalidArgument,
            Self::ResourceExhausted(..) => ErrorKind::ResourceExhausted,
            Self::Io(..) => ErrorKind::Io,
            Self::AlreadyReleased => ErrorKind::AlreadyReleased,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<TryReserveError> for Error {
    fn from(error: TryReserveError) -> Self {
        Self::ResourceExhausted(error)
    }
}
