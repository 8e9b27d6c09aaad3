//! Block codec: assembles and disassembles one compressed block.
//!
//! A block is a fixed 40-byte header followed by three concatenated
//! payloads: the rANS-compressed value bitmap, the rANS-compressed auxiliary
//! mask, and the reconstructed stream compressed by either the rANS 2-bit
//! rewrite or the BWT pipeline. No state survives between blocks.

use crate::separate;
use trisplit_core::error::{Result, TriSplitError};

/// Size of the fixed block header.
pub const BLOCK_HEADER_SIZE: usize = 40;

/// Largest raw block the codec accepts (8 MiB).
pub const MAX_BLOCK_SIZE: usize = 8 * 1024 * 1024;

/// Header flag bit: `aux_mask_1_represents_11`.
const FLAG_AUX_MASK_REPRESENTS_11: u8 = 1 << 0;
/// Header flag bit: `is_placeholder_common`.
const FLAG_PLACEHOLDER_COMMON: u8 = 1 << 1;
/// Header flag bit: reconstructed-stream engine (set = rANS, clear = BWT).
const FLAG_RANS_ENGINE: u8 = 1 << 2;

/// Entropy engine for the reconstructed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconEngine {
    /// rANS with the 2-bit rewrite.
    #[default]
    Rans,
    /// BWT -> MTF -> RLE -> Huffman pipeline.
    Bwt,
}

/// Parsed block header.
#[derive(Debug, Clone, Copy)]
struct BlockHeader {
    metadata_flags: u8,
    original_data_size: u64,
    compressed_bitmap_size: u64,
    compressed_mask_size: u64,
    compressed_reconstructed_size: u64,
}

impl BlockHeader {
    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.metadata_flags);
        out.extend_from_slice(&[0u8; 7]);
        out.extend_from_slice(&self.original_data_size.to_le_bytes());
        out.extend_from_slice(&self.compressed_bitmap_size.to_le_bytes());
        out.extend_from_slice(&self.compressed_mask_size.to_le_bytes());
        out.extend_from_slice(&self.compressed_reconstructed_size.to_le_bytes());
    }

    fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < BLOCK_HEADER_SIZE {
            return Err(TriSplitError::invalid_header(
                "compressed block smaller than its header",
            ));
        }
        let read_u64 = |offset: usize| {
            u64::from_le_bytes(
                data[offset..offset + 8]
                    .try_into()
                    .expect("slice is exactly eight bytes"),
            )
        };
        Ok(Self {
            metadata_flags: data[0],
            original_data_size: read_u64(8),
            compressed_bitmap_size: read_u64(16),
            compressed_mask_size: read_u64(24),
            compressed_reconstructed_size: read_u64(32),
        })
    }
}

/// Compress one raw block.
pub fn compress_block(block_data: &[u8], engine: ReconEngine) -> Result<Vec<u8>> {
    if block_data.len() > MAX_BLOCK_SIZE {
        return Err(TriSplitError::unsupported(format!(
            "block of {} bytes exceeds the {} byte limit",
            block_data.len(),
            MAX_BLOCK_SIZE
        )));
    }

    let streams = separate::separate(block_data);

    let compressed_bitmap = trisplit_rans::encode(&streams.value_bitmap);
    let compressed_mask = trisplit_rans::encode(&streams.auxiliary_mask);

    let recon = &streams.reconstructed_stream;
    let n_placeholders = recon.iter().filter(|&&s| s == 1).count();
    let is_placeholder_common = n_placeholders >= recon.len() / 2;

    let compressed_reconstructed = match engine {
        ReconEngine::Rans => {
            trisplit_rans::encode_reconstructed_stream(recon, is_placeholder_common)
        }
        ReconEngine::Bwt => {
            let tokens: Vec<u16> = recon.iter().map(|&s| s as u16).collect();
            trisplit_bwt::process_stream(&tokens)?
        }
    };

    let mut metadata_flags = 0u8;
    if streams.aux_mask_1_represents_11 {
        metadata_flags |= FLAG_AUX_MASK_REPRESENTS_11;
    }
    if is_placeholder_common {
        metadata_flags |= FLAG_PLACEHOLDER_COMMON;
    }
    if engine == ReconEngine::Rans {
        metadata_flags |= FLAG_RANS_ENGINE;
    }

    let header = BlockHeader {
        metadata_flags,
        original_data_size: block_data.len() as u64,
        compressed_bitmap_size: compressed_bitmap.len() as u64,
        compressed_mask_size: compressed_mask.len() as u64,
        compressed_reconstructed_size: compressed_reconstructed.len() as u64,
    };

    let total_size = BLOCK_HEADER_SIZE
        + compressed_bitmap.len()
        + compressed_mask.len()
        + compressed_reconstructed.len();
    let mut final_block = Vec::with_capacity(total_size);
    header.write(&mut final_block);
    final_block.extend_from_slice(&compressed_bitmap);
    final_block.extend_from_slice(&compressed_mask);
    final_block.extend_from_slice(&compressed_reconstructed);

    Ok(final_block)
}

/// Decompress one block produced by [`compress_block`].
pub fn decompress_block(compressed_block: &[u8]) -> Result<Vec<u8>> {
    let header = BlockHeader::parse(compressed_block)?;

    let available = (compressed_block.len() - BLOCK_HEADER_SIZE) as u64;
    let payload_total = header
        .compressed_bitmap_size
        .checked_add(header.compressed_mask_size)
        .and_then(|sum| sum.checked_add(header.compressed_reconstructed_size))
        .ok_or_else(|| TriSplitError::corrupted(0, "payload sizes overflow"))?;
    if payload_total > available {
        return Err(TriSplitError::corrupted(
            BLOCK_HEADER_SIZE as u64,
            "payload sizes overrun the block",
        ));
    }

    let bitmap_start = BLOCK_HEADER_SIZE;
    let mask_start = bitmap_start + header.compressed_bitmap_size as usize;
    let recon_start = mask_start + header.compressed_mask_size as usize;
    let recon_end = recon_start + header.compressed_reconstructed_size as usize;

    let compressed_bitmap = &compressed_block[bitmap_start..mask_start];
    let compressed_mask = &compressed_block[mask_start..recon_start];
    let compressed_reconstructed = &compressed_block[recon_start..recon_end];

    let value_bitmap = trisplit_rans::decode(compressed_bitmap)?;
    let auxiliary_mask = trisplit_rans::decode(compressed_mask)?;

    let aux_mask_1_represents_11 = header.metadata_flags & FLAG_AUX_MASK_REPRESENTS_11 != 0;
    let is_placeholder_common = header.metadata_flags & FLAG_PLACEHOLDER_COMMON != 0;

    let reconstructed_stream = if header.metadata_flags & FLAG_RANS_ENGINE != 0 {
        trisplit_rans::decode_reconstructed_stream(compressed_reconstructed, is_placeholder_common)?
    } else {
        trisplit_bwt::inverse_process_stream(compressed_reconstructed)?
            .into_iter()
            .map(|t| (t != 0) as u8)
            .collect()
    };

    Ok(separate::reconstruct(
        &value_bitmap,
        &auxiliary_mask,
        &reconstructed_stream,
        aux_mask_1_represents_11,
        header.original_data_size,
    ))
}

/// Compress independent blocks in parallel (requires the `parallel`
/// feature). Each 8 MiB chunk is self-contained, so the blocks can be
/// framed in order by the caller afterwards.
#[cfg(feature = "parallel")]
pub fn compress_blocks_parallel(data: &[u8], engine: ReconEngine) -> Result<Vec<Vec<u8>>> {
    use rayon::prelude::*;

    data.par_chunks(MAX_BLOCK_SIZE)
        .map(|chunk| compress_block(chunk, engine))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8], engine: ReconEngine) {
        let compressed = compress_block(data, engine).unwrap();
        let decompressed = decompress_block(&compressed).unwrap();
        assert_eq!(decompressed, data, "block roundtrip failed ({engine:?})");
    }

    #[test]
    fn test_empty_block() {
        for engine in [ReconEngine::Rans, ReconEngine::Bwt] {
            let compressed = compress_block(&[], engine).unwrap();
            assert!(compressed.len() >= BLOCK_HEADER_SIZE);
            assert!(decompress_block(&compressed).unwrap().is_empty());
        }
    }

    #[test]
    fn test_single_byte_blocks() {
        for byte in [0x00, 0xFF, 0x1B, 0xAA, 0x55, 0x42] {
            roundtrip(&[byte], ReconEngine::Rans);
            roundtrip(&[byte], ReconEngine::Bwt);
        }
    }

    #[test]
    fn test_header_fields() {
        let data: Vec<u8> = (0..=255).collect();
        let compressed = compress_block(&data, ReconEngine::Rans).unwrap();

        let original_size = u64::from_le_bytes(compressed[8..16].try_into().unwrap());
        assert_eq!(original_size, 256);
        assert_eq!(compressed[0] & FLAG_RANS_ENGINE, FLAG_RANS_ENGINE);
        // Reserved bytes stay zero
        assert!(compressed[1..8].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_engine_flag_selects_decoder() {
        let data = vec![0x00, 0xFF, 0x00, 0xFF];
        let compressed = compress_block(&data, ReconEngine::Bwt).unwrap();
        assert_eq!(compressed[0] & FLAG_RANS_ENGINE, 0);
        assert_eq!(decompress_block(&compressed).unwrap(), data);
    }

    #[test]
    fn test_roundtrip_both_engines() {
        let cases: Vec<Vec<u8>> = vec![
            (0..=255).collect(),
            vec![0xAA; 4096],
            vec![0x00; 4096],
            (0..4096u32).map(|i| i.wrapping_mul(2654435761) as u8).collect(),
        ];
        for data in cases {
            roundtrip(&data, ReconEngine::Rans);
            roundtrip(&data, ReconEngine::Bwt);
        }
    }

    #[test]
    fn test_truncated_block_rejected() {
        let compressed = compress_block(&[1, 2, 3], ReconEngine::Rans).unwrap();
        assert!(decompress_block(&compressed[..BLOCK_HEADER_SIZE - 1]).is_err());
    }

    #[test]
    fn test_overrunning_sizes_rejected() {
        let mut compressed = compress_block(&[1, 2, 3], ReconEngine::Rans).unwrap();
        // Inflate the bitmap size beyond the block
        compressed[16..24].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            decompress_block(&compressed),
            Err(TriSplitError::CorruptedData { .. })
        ));
    }

    #[test]
    fn test_oversized_block_rejected() {
        let data = vec![0u8; MAX_BLOCK_SIZE + 1];
        assert!(compress_block(&data, ReconEngine::Rans).is_err());
    }
}
