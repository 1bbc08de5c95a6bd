#![cfg_attr(not(test), no_std)]

#[macro_use]
mod macros;

pub mod checksum;
pub mod config;
pub mod console;
pub mod reader;
pub mod record;
pub mod sink;
pub mod source;
pub mod sync;

pub use checksum::{checksum, verify_checksum};
pub use config::{ChecksumPolicy, ReaderConfig};
pub use reader::{read_record, try_read_record, RecordReader};
pub use record::{ControlRecord, Endian, FrameError, Record, SensorRecord};
pub use sink::ByteSink;
pub use source::ByteSource;

use core::fmt;

/// Error of a read, generic over the error of the underlying transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bytes were read but don't form a valid record
    Frame(FrameError),
    /// Error with custom transport status
    Transport(E),
}

impl<E> From<FrameError> for Error<E> {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Frame(e) => write!(f, "frame error: {}", e),
            Error::Transport(e) => write!(f, "transport error: {}", e),
        }
    }
}
