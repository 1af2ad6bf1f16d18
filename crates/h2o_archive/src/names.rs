//! Folder and file name tables

use derive_more::derive::{Constructor, Deref, Index, IntoIterator};
use tracing::{debug, instrument};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::compression::{decompress_block, Codec};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::types::BlockHeader;

/// An ordered list of names, addressed by the indices stored in the file table
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Deref, Index, IntoIterator)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[into_iterator(owned, ref)]
pub struct NameTable(Vec<String>);

impl NameTable {
    /// Read a name block, decompressing it first when its sizes differ.
    ///
    /// The codec is only consulted for compressed blocks. A codec failure or a
    /// decompressed length that does not match the block header is an error,
    /// since nothing else in the archive can be placed without its names.
    #[instrument(skip_all, fields(offset = cursor.position()))]
    pub fn read(cursor: &mut ByteCursor<'_>, codec: &dyn Codec) -> Result<NameTable> {
        let header = cursor.read_record::<BlockHeader>()?;

        if !header.is_compressed() {
            debug!(size = header.raw_size, "reading inline name table");
            return Self::read_entries(cursor);
        }

        debug!(
            compressed = header.compressed_size,
            raw = header.raw_size,
            "reading compressed name table"
        );
        let compressed = cursor.read_bytes(header.compressed_size as usize)?;
        let decompressed = decompress_block(codec, &header, compressed)?;

        Self::read_entries(&mut ByteCursor::new(&decompressed))
    }

    fn read_entries(cursor: &mut ByteCursor<'_>) -> Result<NameTable> {
        let count = cursor.read_u32()?;
        let _size = cursor.read_u32()?;

        Ok(NameTable(cursor.read_wide_strings(count as usize)?))
    }

    /// Look up a name, `None` when the index is out of range
    pub fn by_index(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use crate::cursor::ByteCursor;
    use crate::error::{CodecError, DecompressionError, Error, Result};
    use crate::names::NameTable;

    #[rustfmt::skip]
    const ENTRIES: [u8; 34] = [
        0x02, 0x00, 0x00, 0x00, // count
        0x1A, 0x00, 0x00, 0x00, // size
        0x54, 0x00, 0x65, 0x00, 0x73, 0x00, 0x74, 0x00, 0x00, 0x00,
        0x41, 0x00, 0x6E, 0x00, 0x6F, 0x00, 0x74, 0x00, 0x68, 0x00, 0x65, 0x00, 0x72, 0x00, 0x00, 0x00,
    ];

    struct Spy {
        calls: AtomicUsize,
        output: Vec<u8>,
    }

    impl crate::compression::Codec for Spy {
        fn decompress(&self, _: &[u8]) -> core::result::Result<Vec<u8>, CodecError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.output.clone())
        }
    }

    fn block(compressed: u32, raw: u32, body: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&compressed.to_le_bytes());
        out.extend_from_slice(&raw.to_le_bytes());
        out.extend_from_slice(&[0x00; 4]);
        out.extend_from_slice(body);
        out
    }

    #[traced_test]
    #[test]
    fn inline_table_skips_codec() -> Result<()> {
        let input = block(34, 34, &ENTRIES);
        let spy = Spy {
            calls: AtomicUsize::new(0),
            output: Vec::new(),
        };

        let mut cursor = ByteCursor::new(&input);
        let names = NameTable::read(&mut cursor, &spy)?;

        assert_eq!(names, NameTable::new(vec!["Test".into(), "Another".into()]));
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
        assert!(cursor.is_empty());

        Ok(())
    }

    #[traced_test]
    #[test]
    fn compressed_table_uses_codec_output() -> Result<()> {
        let input = block(3, 34, &[0xAA, 0xBB, 0xCC]);
        let spy = Spy {
            calls: AtomicUsize::new(0),
            output: ENTRIES.to_vec(),
        };

        let mut cursor = ByteCursor::new(&input);
        let names = NameTable::read(&mut cursor, &spy)?;

        assert_eq!(names.len(), 2);
        assert_eq!(names[1], "Another");
        assert_eq!(spy.calls.load(Ordering::SeqCst), 1);
        assert!(cursor.is_empty());

        Ok(())
    }

    #[traced_test]
    #[test]
    fn compressed_table_with_wrong_length_fails() {
        let input = block(3, 40, &[0xAA, 0xBB, 0xCC]);
        let spy = Spy {
            calls: AtomicUsize::new(0),
            output: ENTRIES.to_vec(),
        };

        let err = NameTable::read(&mut ByteCursor::new(&input), &spy).unwrap_err();
        assert!(matches!(
            err,
            Error::Decompression(DecompressionError::SizeMismatch {
                expected: 40,
                actual: 34
            })
        ));
    }

    #[traced_test]
    #[test]
    fn compressed_table_with_codec_failure_fails() {
        let input = block(3, 34, &[0xAA, 0xBB, 0xCC]);
        let codec = |_: &[u8]| -> core::result::Result<Vec<u8>, CodecError> {
            Err(CodecError("broken stream".into()))
        };

        let err = NameTable::read(&mut ByteCursor::new(&input), &codec).unwrap_err();
        assert!(matches!(
            err,
            Error::Decompression(DecompressionError::Codec(_))
        ));
    }

    #[test]
    fn by_index_out_of_range() {
        let names = NameTable::new(vec!["Test".into()]);
        assert_eq!(names.by_index(0), Some("Test"));
        assert_eq!(names.by_index(1), None);
    }
}
