use std::io;
use std::path::PathBuf;

use derive_more::{Display, From};

use crate::bus::BusId;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving a bus or running a transaction.
#[derive(Debug, Display, From)]
pub enum Error {
    /// No bus with this identity was registered.
    #[from(skip)]
    #[display("I2C bus {_0} not found")]
    NotFound(BusId),
    /// The bus device node could not be opened. The bus stays unopened and
    /// the next call will try again.
    #[from(skip)]
    #[display("failed to open {}: {source}", path.display())]
    OpenFailed { path: PathBuf, source: io::Error },
    /// Offsets are at most four bytes wide.
    #[from(skip)]
    #[display("invalid offset width {_0}")]
    InvalidOffsetWidth(u32),
    /// The transport rejected or failed the composed transaction.
    #[from(skip)]
    #[display("I2C transaction failed: {_0}")]
    TransactionFailed(String),

    // External
    #[display("{_0}")]
    Io(io::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenFailed { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}
