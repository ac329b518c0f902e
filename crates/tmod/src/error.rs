//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file does not start with the TMOD magic number
    #[error("file is not a tmod archive")]
    BadMagic,

    /// format version {found} is not supported
    #[error("format version {found} is not supported (newest supported is {supported})")]
    #[diagnostic(help("this archive was produced by a newer tool"))]
    UnsupportedVersion {
        /// Version stored in the archive
        found: u32,
        /// Newest version this library understands
        supported: u32,
    },

    /// archive contents are corrupt
    #[error("archive contents are corrupt")]
    CorruptEntry(#[from] CorruptEntryError),

    /// archive has no main entry
    #[error("archive is missing its main entry {}", crate::table::MAIN_ENTRY)]
    MissingMainEntry,

    /// unable to find requested entry
    #[error("unable to find requested entry {0}")]
    FileNotFound(String),

    /// {0:?} can not be used as a logical name
    #[error("{0:?} can not be used as a logical name")]
    InvalidName(String),

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

/// Error type to provide further information when the archive body fails validation
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum CorruptEntryError {
    /// content hash does not match the body
    #[error("content hash does not match the archive body")]
    HashMismatch,

    /// header ends before the hash or signature is complete
    #[error("unable to parse header: {0}")]
    Header(String),

    /// entry table could not be parsed
    #[error("unable to parse entry table: {0}")]
    Table(String),

    /// entry offset disagrees with the payload layout
    #[error("entry {name} is recorded at offset {found} but should start at {expected}")]
    OffsetMismatch {
        name: String,
        expected: u64,
        found: u64,
    },

    /// entry extends past the payload block
    #[error("entry {0} extends past the end of the payload block")]
    Truncated(String),

    /// payload block is longer than the entry table describes
    #[error("{0} unaccounted bytes after the last entry")]
    TrailingPayload(u64),

    /// deflate stream is malformed
    #[error("unable to inflate entry: {0}")]
    Decompression(String),

    /// inflated size disagrees with the table
    #[error("expected {expected} bytes after inflating, got {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    /// entry name is empty or not a relative path
    #[error("invalid entry name {0:?}")]
    InvalidName(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
