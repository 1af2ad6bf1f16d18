//! Types for reading H2O archives
//!

use tracing::{debug, error, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    compression::{decompress_block, Codec},
    cursor::ByteCursor,
    error::{Error, Result, Stage, StageContext},
    names::NameTable,
    tree::{assemble, ArchivedData},
    types::{
        ArchiveHeader, BlockHeader, FileEntry, ParentRef, PayloadKind, COMMENT_TERMINATOR, MAGIC,
    },
};

/// A fully decoded H2O archive
///
/// ```no_run
/// use h2o_archive::{compression::Blast, H2oArchive};
///
/// fn list_h2o_contents(data: &[u8]) -> h2o_archive::error::Result<()> {
///     let h2o = H2oArchive::decode(data, &Blast)?;
///
///     for (entry, contents) in h2o.entries().iter().zip(h2o.contents()) {
///         println!("{}: {:?} bytes", entry.file_id, contents.as_ref().map(Vec::len));
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct H2oArchive {
    header: ArchiveHeader,
    entries: Vec<FileEntry>,
    folder_names: NameTable,
    file_names: NameTable,
    parents: Vec<ParentRef>,
    contents: Vec<Option<Vec<u8>>>,
    trailer: u32,
}

/// Where one entry's payload sits in the buffer, before any decompression
#[derive(Debug)]
enum Block<'a> {
    Stored(&'a [u8]),
    Compressed(BlockHeader, &'a [u8]),
    Unused,
}

impl H2oArchive {
    /// Decode a complete archive that has already been loaded into memory.
    ///
    /// Any error returned here is fatal and names the [`Stage`] it came from.
    /// Payloads that fail to decompress are not errors, their contents are
    /// simply left empty.
    #[instrument(skip_all, fields(len = data.len()))]
    pub fn decode(data: &[u8], codec: &dyn Codec) -> Result<H2oArchive> {
        let mut cursor = ByteCursor::new(data);

        let header = Self::get_header(&mut cursor).stage(Stage::Header)?;
        let entries = Self::get_entries(&mut cursor, header.file_count).stage(Stage::EntryTable)?;
        let folder_names = NameTable::read(&mut cursor, codec).stage(Stage::FolderNames)?;
        let file_names = NameTable::read(&mut cursor, codec).stage(Stage::FileNames)?;
        let parents = Self::get_parents(&mut cursor).stage(Stage::FolderHierarchy)?;

        let blocks = Self::get_blocks(&mut cursor, &entries).stage(Stage::Payloads)?;
        let contents = Self::recover_all(&entries, blocks, codec);

        let trailer = cursor.read_u32().stage(Stage::Trailer)?;
        if !cursor.is_empty() {
            debug!(remaining = cursor.remaining(), "ignoring bytes after trailer");
        }

        Ok(H2oArchive {
            header,
            entries,
            folder_names,
            file_names,
            parents,
            contents,
            trailer,
        })
    }

    /// The archive header
    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    /// The file table, in archive order
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Recovered data for each entry of [`H2oArchive::entries`], `None` when nothing could be recovered
    pub fn contents(&self) -> &[Option<Vec<u8>>] {
        &self.contents
    }

    pub fn folder_names(&self) -> &NameTable {
        &self.folder_names
    }

    pub fn file_names(&self) -> &NameTable {
        &self.file_names
    }

    /// Parent of each folder, position for position with [`H2oArchive::folder_names`]
    pub fn parents(&self) -> &[ParentRef] {
        &self.parents
    }

    /// The value stored after the last payload. Its meaning is unknown.
    pub fn trailer(&self) -> u32 {
        self.trailer
    }

    /// Number of entries contained in this H2O.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this H2O archive contains no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries whose data could not be recovered
    pub fn unused_count(&self) -> usize {
        self.contents.iter().filter(|c| c.is_none()).count()
    }

    /// Build the folder and file tree for this archive
    pub fn into_tree(self, name: impl Into<String>) -> ArchivedData {
        assemble(
            name.into(),
            self.entries,
            self.contents,
            self.folder_names,
            self.file_names,
            self.parents,
        )
    }

    #[instrument(skip_all, err)]
    fn get_header(cursor: &mut ByteCursor<'_>) -> Result<ArchiveHeader> {
        let magic = cursor.read_string_to(cursor.position() + MAGIC.len())?;
        if magic != MAGIC {
            error!("file type found is {magic:?}, should be {MAGIC:?}");
            return Err(Error::InvalidMagic {
                found: magic,
                expected: MAGIC,
            });
        }

        let header = ArchiveHeader {
            magic,
            version_float: cursor.read_f32()?,
            comment: cursor.read_terminated_string(COMMENT_TERMINATOR)?,
            version: cursor.read_u32()?,
            file_count: cursor.read_u32()?,
            compressed_size: cursor.read_u64()?,
            raw_size: cursor.read_u64()?,
        };
        debug!(?header, "read header");

        Ok(header)
    }

    fn get_entries(cursor: &mut ByteCursor<'_>, count: u32) -> Result<Vec<FileEntry>> {
        (0..count)
            .map(|_| cursor.read_record::<FileEntry>())
            .collect()
    }

    fn get_parents(cursor: &mut ByteCursor<'_>) -> Result<Vec<ParentRef>> {
        let count = cursor.read_u32()?;
        (0..count)
            .map(|_| cursor.read_i32().map(ParentRef::from))
            .collect()
    }

    /// Carve every payload out of the buffer in table order.
    ///
    /// Only the reads happen here so that running past the end of the buffer
    /// stays fatal, decompression is left to [`H2oArchive::recover_all`].
    fn get_blocks<'a>(
        cursor: &mut ByteCursor<'a>,
        entries: &[FileEntry],
    ) -> Result<Vec<Block<'a>>> {
        entries
            .iter()
            .map(|entry| -> Result<Block<'a>> {
                Ok(match entry.payload_kind() {
                    PayloadKind::Stored => Block::Stored(cursor.read_bytes(entry.raw_size as usize)?),
                    PayloadKind::Compressed => {
                        let header = cursor.read_record::<BlockHeader>()?;
                        let data = cursor.read_bytes(header.compressed_size as usize)?;
                        Block::Compressed(header, data)
                    }
                    PayloadKind::Unused => Block::Unused,
                })
            })
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn recover_all(
        entries: &[FileEntry],
        blocks: Vec<Block<'_>>,
        codec: &dyn Codec,
    ) -> Vec<Option<Vec<u8>>> {
        entries
            .iter()
            .zip(blocks)
            .map(|(entry, block)| Self::recover(entry, block, codec))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn recover_all(
        entries: &[FileEntry],
        blocks: Vec<Block<'_>>,
        codec: &dyn Codec,
    ) -> Vec<Option<Vec<u8>>> {
        entries
            .par_iter()
            .zip(blocks.into_par_iter())
            .map(|(entry, block)| Self::recover(entry, block, codec))
            .collect()
    }

    fn recover(entry: &FileEntry, block: Block<'_>, codec: &dyn Codec) -> Option<Vec<u8>> {
        match block {
            Block::Stored(data) => Some(data.to_vec()),
            Block::Compressed(header, data) => match decompress_block(codec, &header, data) {
                Ok(decompressed) => Some(decompressed),
                Err(e) => {
                    warn!(file_id = entry.file_id, "data for file failed to decompress: {e}");
                    None
                }
            },
            Block::Unused => {
                info!(file_id = entry.file_id, "file is unused, so no data to read");
                None
            }
        }
    }
}

/// Decode `data` and assemble it into a tree called `name`
pub fn read_archive(
    name: impl Into<String>,
    data: &[u8],
    codec: &dyn Codec,
) -> Result<ArchivedData> {
    Ok(H2oArchive::decode(data, codec)?.into_tree(name))
}
