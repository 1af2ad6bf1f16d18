//! This library handles reading **H2O** asset archives into a tree of folders and files.
//!
//! # H2O Archive Format Documentation
//!
//! The H2O format is a custom binary container that stores game assets, optionally compressed with the
//! PKWARE DCL *implode* algorithm, together with the folder structure they were packed from. H2O files are
//! typically identified with the `.H2O` extension. The whole archive is loaded into memory and decoded front
//! to back in a single pass.
//!
//! ## File Structure
//!
//! An H2O file consists of a header, the file table, two name blocks, the folder hierarchy, the data blocks
//! and a trailing reserved value.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 8 bytes: "LIQDLH2O"                                        |
//! | 0x0008         | Version                | 4 bytes: Version as a 32 bit float                         |
//! | 0x000C         | Comment                | Variable: Single byte characters terminated by 0x1A        |
//! | ...            | Version                | 4 bytes: Version as an unsigned integer                    |
//! | ...            | File Count             | 4 bytes: Number of entries in the file table               |
//! | ...            | Compressed Size        | 8 bytes: Total compressed size (informational)             |
//! | ...            | Raw Size               | 8 bytes: Total uncompressed size (informational)           |
//!
//! ### File Table
//!
//! After the header come `File Count` entries of 40 bytes each:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Compression            | 4 bytes: 0 when stored, anything else when compressed   |
//! | 0x0004         | Folder Index           | 4 bytes: Signed index into the folder names, -1 is root |
//! | 0x0008         | Name Index             | 4 bytes: Signed index into the file names, <0 unnamed   |
//! | 0x000C         | File ID                | 4 bytes: Signed numeric identifier                      |
//! | 0x0010         | Raw Size               | 4 bytes: Size of the data when uncompressed             |
//! | 0x0014         | Compressed Size        | 4 bytes: Size of the data when compressed               |
//! | 0x0018         | Offset                 | 8 bytes: Zero on a compressed entry means no data       |
//! | 0x0020         | Checksum               | 4 bytes                                                 |
//! | 0x0024         | Unknown                | 4 bytes                                                 |
//!
//! ### Name Blocks
//!
//! Folder names and file names are each stored in a block starting with a 12 byte header:
//!
//! - **Compressed Size**: 4 bytes
//! - **Raw Size**: 4 bytes
//! - **Checksum**: 4 bytes
//!
//! When both sizes match the block body follows uncompressed, otherwise `Compressed Size` bytes of
//! imploded data follow which must inflate to exactly `Raw Size` bytes. The body holds a 4 byte name count,
//! a 4 byte size, then the names as UTF-16 strings each ending with a two byte zero.
//!
//! ### Folder Hierarchy
//!
//! A 4 byte folder count followed by a signed 4 byte parent index for each folder. A parent of -1 is the
//! archive root.
//!
//! ### Data Blocks
//!
//! One block per file table entry, in table order:
//!
//! - stored entries: `Raw Size` bytes as they are,
//! - compressed entries: a 12 byte block header followed by the imploded bytes,
//! - compressed entries with a zero offset: nothing at all.
//!
//! A block that fails to decompress only loses that one file, which is reported as unused.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.H2O`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Compression**: PKWARE DCL implode, see [`compression::Blast`]
//!

pub mod compression;
pub mod cursor;
pub mod error;
pub mod extract;
pub mod names;
pub mod read;
pub mod tree;
pub mod types;

pub use compression::{Blast, Codec};
pub use extract::DirectoryWriter;
pub use read::{read_archive, H2oArchive};
pub use tree::ArchivedData;
