//! Error types that can be emitted from this library

use derive_more::Display;
use miette::Diagnostic;
use thiserror::Error;

/// The part of the archive that was being decoded when a fatal error occurred
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Magic number, versions, comment and declared sizes
    #[display("header")]
    Header,

    /// The fixed size file entry table
    #[display("entry table")]
    EntryTable,

    /// The folder name table
    #[display("folder names")]
    FolderNames,

    /// The file name table
    #[display("file names")]
    FileNames,

    /// The folder parent indices
    #[display("folder hierarchy")]
    FolderHierarchy,

    /// The per entry payload blocks
    #[display("payloads")]
    Payloads,

    /// The reserved value after the last payload
    #[display("trailer")]
    Trailer,
}

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file is not an h2o archive
    #[error("file type found is {found:?}, should be {expected:?}")]
    #[diagnostic(help("only LIQDLH2O archives are supported"))]
    InvalidMagic {
        /// The magic found at the start of the buffer
        found: String,
        /// The magic every h2o archive starts with
        expected: &'static str,
    },

    /// a read ran past the end of the buffer
    #[error("read of {requested} bytes at offset {offset} exceeds the {remaining} remaining bytes")]
    #[diagnostic(help("the archive is truncated or corrupt"))]
    OutOfBounds {
        /// Position of the cursor when the read was attempted
        offset: usize,
        /// Number of bytes the read needed
        requested: usize,
        /// Number of bytes left in the buffer
        remaining: usize,
    },

    /// a block failed to decompress
    #[error(transparent)]
    Decompression(#[from] DecompressionError),

    /// a fatal error along with the stage it was raised in
    #[error("failed to decode {stage}")]
    Decode {
        /// Stage of the pipeline that failed
        stage: Stage,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },

    /// a name would escape the extraction directory
    #[error("refusing to write unsafe path {0}")]
    UnsafePath(String),

    /// {0}
    #[error("{0}")]
    CustomError(String),
}

impl Error {
    /// Strips any [`Error::Decode`] wrapping and returns the error that caused it
    pub fn root(&self) -> &Error {
        match self {
            Error::Decode { source, .. } => source.root(),
            other => other,
        }
    }

    /// The stage a fatal decode error was raised in, if known
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Decode { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Error type for a block whose data could not be recovered
#[derive(Error, Diagnostic, Debug)]
pub enum DecompressionError {
    /// the codec rejected the compressed data
    #[error("data failed to decompress: {0}")]
    Codec(#[from] CodecError),

    /// the codec output does not match the block header
    #[error("decompressed data byte length is {actual}, but header raw size is {expected}")]
    SizeMismatch {
        /// Raw size declared by the block header
        expected: u32,
        /// Number of bytes the codec produced
        actual: usize,
    },
}

/// Error reported by a [`crate::compression::Codec`]
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CodecError(pub String);

/// Tags a result with the stage it came from
pub(crate) trait StageContext<T> {
    fn stage(self, stage: Stage) -> Result<T>;
}

impl<T, E: Into<Error>> StageContext<T> for core::result::Result<T, E> {
    fn stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| Error::Decode {
            stage,
            source: Box::new(e.into()),
        })
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
