//! Base types for structure of H2O file.

use binrw::BinRead;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::cursor::FixedSize;

/// Every H2O archive starts with these eight bytes
pub const MAGIC: &str = "LIQDLH2O";

/// Terminates the free text comment in the header
pub const COMMENT_TERMINATOR: u8 = 0x1A;

/// H2O file header
///
/// The comment makes the header variable length so it is decoded field by
/// field rather than as a single record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ArchiveHeader {
    /// Always [`MAGIC`]
    pub magic: String,

    /// Format version stored as a float
    pub version_float: f32,

    /// Free text comment, usually a copyright line
    pub comment: String,

    /// Format version stored as an integer
    pub version: u32,

    /// The number of entries in the file table
    pub file_count: u32,

    /// Declared size of all compressed data. Informational only.
    pub compressed_size: u64,

    /// Declared size of all data once decompressed. Informational only.
    pub raw_size: u64,
}

/// H2O file table entry
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct FileEntry {
    /// Zero when the payload is stored as is, anything else when it is compressed
    pub compression_tag: u32,

    /// Index into the folder name table, see [`FileEntry::folder`]
    pub folder_name_index: i32,

    /// Index into the file name table, see [`FileEntry::name`]
    pub file_name_index: i32,

    /// Numeric identifier of the file
    pub file_id: i32,

    /// The size of the data for this entry before compression
    pub raw_size: u32,

    /// The size of the data for this entry after compression
    pub compressed_size: u32,

    /// Offset of the payload. Zero on a compressed entry marks a placeholder without data.
    pub offset: u64,

    pub checksum: [u8; 4],

    #[allow(dead_code)]
    pub unknown: i32,
}

impl FixedSize for FileEntry {
    const SIZE: usize = 40;
}

impl FileEntry {
    /// How the payload for this entry is laid out in the payload section
    pub fn payload_kind(&self) -> PayloadKind {
        match (self.compression_tag, self.offset) {
            (0, _) => PayloadKind::Stored,
            (_, 0) => PayloadKind::Unused,
            _ => PayloadKind::Compressed,
        }
    }

    /// The folder this entry belongs to
    pub fn folder(&self) -> FolderRef {
        FolderRef::from(self.folder_name_index)
    }

    /// Where to find the name of this entry
    pub fn name(&self) -> NameRef {
        NameRef::from(self.file_name_index)
    }
}

/// Header in front of every compressed block, used for name tables and payloads
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[br(little)]
pub struct BlockHeader {
    /// The size of the block in the archive
    pub compressed_size: u32,

    /// The size of the block once decompressed
    pub raw_size: u32,

    pub checksum: [u8; 4],
}

impl FixedSize for BlockHeader {
    const SIZE: usize = 12;
}

impl BlockHeader {
    /// A block whose sizes match is stored inline and never goes through the codec
    pub fn is_compressed(&self) -> bool {
        self.compressed_size != self.raw_size
    }
}

/// Payload layout of a [`FileEntry`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PayloadKind {
    /// `raw_size` bytes copied verbatim
    Stored,

    /// A [`BlockHeader`] followed by compressed bytes
    Compressed,

    /// A placeholder that has no bytes in the payload section
    Unused,
}

/// Folder reference of a [`FileEntry`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum FolderRef {
    /// Stored directly in the archive root
    TopLevel,

    /// Stored in the folder at this index
    Folder(usize),

    /// Any negative value other than -1
    Invalid(i32),
}

impl From<i32> for FolderRef {
    fn from(value: i32) -> Self {
        match value {
            -1 => FolderRef::TopLevel,
            i if i >= 0 => FolderRef::Folder(i as usize),
            i => FolderRef::Invalid(i),
        }
    }
}

/// File name reference of a [`FileEntry`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum NameRef {
    /// Index into the file name table
    Index(usize),

    /// The entry was never given a name
    Unnamed(i32),
}

impl From<i32> for NameRef {
    fn from(value: i32) -> Self {
        match usize::try_from(value) {
            Ok(index) => NameRef::Index(index),
            Err(_) => NameRef::Unnamed(value),
        }
    }
}

/// Parent of a folder
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ParentRef {
    /// The archive root
    Root,

    /// The folder at this index
    Folder(usize),

    /// Any negative value other than -1
    Invalid(i32),
}

impl From<i32> for ParentRef {
    fn from(value: i32) -> Self {
        match value {
            -1 => ParentRef::Root,
            i if i >= 0 => ParentRef::Folder(i as usize),
            i => ParentRef::Invalid(i),
        }
    }
}
