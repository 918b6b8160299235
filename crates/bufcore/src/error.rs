use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the engine and its buffers.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Opening or reading a backing file failed.
    #[error("Could not create buffer from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The named buffer operation has no implementation yet.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

impl EngineError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented(_))
    }

    /// Wraps the not-implemented sentinel for the `std::io` traits.
    pub(crate) fn unsupported_io(operation: &'static str) -> io::Error {
        io::Error::new(io::ErrorKind::Unsupported, Self::NotImplemented(operation))
    }
}

/// True when an error returned through `Read`, `Write` or `Seek` is the
/// not-implemented sentinel rather than a real I/O failure.
pub fn is_not_implemented_io(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Unsupported
        && err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<EngineError>())
            .is_some_and(EngineError::is_not_implemented)
}

pub type Result<T> = std::result::Result<T, EngineError>;
