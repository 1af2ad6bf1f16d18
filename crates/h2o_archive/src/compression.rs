//! Block decompression handling.

use tracing::instrument;

use crate::error::{CodecError, DecompressionError};
use crate::types::BlockHeader;

/// A decompression algorithm for the blocks inside an H2O file
///
/// Codecs do no framing or length checks of their own, [`decompress_block`]
/// compares the output against the block header.
pub trait Codec: Sync {
    /// Decompress a whole block
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;
}

impl<F> Codec for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>, CodecError> + Sync,
{
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        self(data)
    }
}

/// The PKWARE DCL implode format used by H2O archives
#[derive(Debug, Copy, Clone, Default)]
pub struct Blast;

impl Codec for Blast {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        explode::explode(data).map_err(|e| CodecError(format!("{e:?}")))
    }
}

/// Decompress `data` and check the result against the size declared in `header`
#[instrument(skip(codec, data), err)]
pub fn decompress_block(
    codec: &dyn Codec,
    header: &BlockHeader,
    data: &[u8],
) -> Result<Vec<u8>, DecompressionError> {
    let decompressed = codec.decompress(data)?;
    if decompressed.len() != header.raw_size as usize {
        return Err(DecompressionError::SizeMismatch {
            expected: header.raw_size,
            actual: decompressed.len(),
        });
    }
    Ok(decompressed)
}
