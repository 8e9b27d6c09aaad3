//! Three-way structural decomposition of a byte block.
//!
//! Every byte is viewed as four 2-bit symbols, top bits first. The mapped
//! pair `{10, 01}` carries its value in `value_bitmap`; the exceptional pair
//! `{00, 11}` is distinguished in `auxiliary_mask`, with the rarer of the
//! two encoded as `1`. `reconstructed_stream` records, per symbol position,
//! which pair occurred, and is what makes the split reversible.

/// The three separated streams of one block, plus the mask polarity flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeparatedStreams {
    /// One bit per mapped-pair symbol: `10` -> 0, `01` -> 1.
    pub value_bitmap: Vec<u8>,
    /// One bit per exceptional-pair symbol; `1` marks the rarer value.
    pub auxiliary_mask: Vec<u8>,
    /// One bit per 2-bit input symbol: 0 = mapped pair, 1 = exceptional pair.
    pub reconstructed_stream: Vec<u8>,
    /// True iff a mask bit of `1` stands for `11` (i.e. `freq(11) <= freq(00)`).
    pub aux_mask_1_represents_11: bool,
}

/// The four 2-bit symbols of a byte, top bits first.
#[inline]
fn symbols_of(byte: u8) -> [u8; 4] {
    [
        (byte >> 6) & 0x03,
        (byte >> 4) & 0x03,
        (byte >> 2) & 0x03,
        byte & 0x03,
    ]
}

/// Separate a raw block into the three streams.
///
/// Two passes: the first tallies the 2-bit symbol frequencies to fix the
/// mask polarity and stream capacities, the second emits the streams.
pub fn separate(raw_data: &[u8]) -> SeparatedStreams {
    let mut freqs = [0usize; 4];
    for &byte in raw_data {
        for sym in symbols_of(byte) {
            freqs[sym as usize] += 1;
        }
    }

    let aux_mask_1_represents_11 = freqs[0b11] <= freqs[0b00];

    let mut result = SeparatedStreams {
        value_bitmap: Vec::with_capacity(freqs[0b10] + freqs[0b01]),
        auxiliary_mask: Vec::with_capacity(freqs[0b00] + freqs[0b11]),
        reconstructed_stream: Vec::with_capacity(raw_data.len() * 4),
        aux_mask_1_represents_11,
    };

    for &byte in raw_data {
        for sym in symbols_of(byte) {
            match sym {
                0b10 => {
                    result.value_bitmap.push(0);
                    result.reconstructed_stream.push(0);
                }
                0b01 => {
                    result.value_bitmap.push(1);
                    result.reconstructed_stream.push(0);
                }
                0b00 => {
                    result.reconstructed_stream.push(1);
                    result
                        .auxiliary_mask
                        .push(if aux_mask_1_represents_11 { 0 } else { 1 });
                }
                _ => {
                    result.reconstructed_stream.push(1);
                    result
                        .auxiliary_mask
                        .push(if aux_mask_1_represents_11 { 1 } else { 0 });
                }
            }
        }
    }

    result
}

/// Reassemble the original block from the three streams.
///
/// Walks the reconstructed stream left to right, consuming the value bitmap
/// on `0` entries and the auxiliary mask on `1` entries, then packs every
/// four recovered 2-bit symbols back into a byte. Side-stream exhaustion and
/// a final size mismatch signal corruption: both warn on stderr and the
/// produced bytes are returned as-is.
pub fn reconstruct(
    value_bitmap: &[u8],
    auxiliary_mask: &[u8],
    reconstructed_stream: &[u8],
    aux_mask_1_represents_11: bool,
    original_size: u64,
) -> Vec<u8> {
    let (symbol_for_mask_0, symbol_for_mask_1) = if aux_mask_1_represents_11 {
        (0b00u8, 0b11u8)
    } else {
        (0b11u8, 0b00u8)
    };

    let mut two_bit_chunks = Vec::with_capacity(reconstructed_stream.len());
    let mut bitmap_idx = 0;
    let mut mask_idx = 0;

    for &symbol_type in reconstructed_stream {
        if symbol_type == 0 {
            match value_bitmap.get(bitmap_idx) {
                Some(&bit) => {
                    bitmap_idx += 1;
                    two_bit_chunks.push(if bit == 0 { 0b10 } else { 0b01 });
                }
                None => {
                    eprintln!("warning: value bitmap exhausted before stream end");
                    break;
                }
            }
        } else {
            match auxiliary_mask.get(mask_idx) {
                Some(&bit) => {
                    mask_idx += 1;
                    two_bit_chunks.push(if bit == 0 {
                        symbol_for_mask_0
                    } else {
                        symbol_for_mask_1
                    });
                }
                None => {
                    eprintln!("warning: auxiliary mask exhausted before stream end");
                    break;
                }
            }
        }
    }

    let mut final_bytes = Vec::with_capacity(two_bit_chunks.len() / 4 + 1);
    for group in two_bit_chunks.chunks(4) {
        let mut byte = 0u8;
        for (slot, &chunk) in group.iter().enumerate() {
            byte |= chunk << (6 - 2 * slot);
        }
        final_bytes.push(byte);
    }

    if final_bytes.len() as u64 != original_size {
        eprintln!(
            "warning: reconstructed size ({}) does not match original size ({})",
            final_bytes.len(),
            original_size
        );
    }

    final_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(data: &[u8]) {
        let streams = separate(data);
        let recovered = reconstruct(
            &streams.value_bitmap,
            &streams.auxiliary_mask,
            &streams.reconstructed_stream,
            streams.aux_mask_1_represents_11,
            data.len() as u64,
        );
        assert_eq!(recovered, data, "separation roundtrip failed");
    }

    #[test]
    fn test_separate_empty() {
        let streams = separate(&[]);
        assert!(streams.value_bitmap.is_empty());
        assert!(streams.auxiliary_mask.is_empty());
        assert!(streams.reconstructed_stream.is_empty());
        roundtrip(&[]);
    }

    #[test]
    fn test_separate_all_zero_byte() {
        // 0x00 is four `00` symbols: all exceptional, mask favors `11` as rare
        let streams = separate(&[0x00]);
        assert!(streams.aux_mask_1_represents_11);
        assert!(streams.value_bitmap.is_empty());
        assert_eq!(streams.reconstructed_stream, vec![1, 1, 1, 1]);
        assert_eq!(streams.auxiliary_mask, vec![0, 0, 0, 0]);
        roundtrip(&[0x00]);
    }

    #[test]
    fn test_separate_all_ones_byte() {
        // 0xFF is four `11` symbols; freq(11) <= freq(00) fails, so the
        // flag flips and `11` maps to mask bit 0
        let streams = separate(&[0xFF]);
        assert!(!streams.aux_mask_1_represents_11);
        assert!(streams.value_bitmap.is_empty());
        assert_eq!(streams.reconstructed_stream, vec![1, 1, 1, 1]);
        assert_eq!(streams.auxiliary_mask, vec![0, 0, 0, 0]);
        roundtrip(&[0xFF]);
    }

    #[test]
    fn test_separate_one_of_each_symbol() {
        // 0x1B = 00 01 10 11
        let streams = separate(&[0x1B]);
        assert!(streams.aux_mask_1_represents_11);
        assert_eq!(streams.value_bitmap, vec![1, 0]);
        assert_eq!(streams.reconstructed_stream, vec![1, 0, 0, 1]);
        assert_eq!(streams.auxiliary_mask, vec![0, 1]);
        roundtrip(&[0x1B]);
    }

    #[test]
    fn test_stream_length_invariant() {
        let data: Vec<u8> = (0..=255).collect();
        let streams = separate(&data);
        assert_eq!(
            streams.value_bitmap.len() + streams.auxiliary_mask.len(),
            4 * data.len()
        );
        assert_eq!(streams.reconstructed_stream.len(), 4 * data.len());
        roundtrip(&data);
    }

    #[test]
    fn test_mapped_only_block() {
        // 0xAA is four `10` symbols: bitmap all zeros, mask empty
        let data = vec![0xAA; 64];
        let streams = separate(&data);
        assert!(streams.auxiliary_mask.is_empty());
        assert!(streams.reconstructed_stream.iter().all(|&b| b == 0));
        assert!(streams.value_bitmap.iter().all(|&b| b == 0));
        roundtrip(&data);
    }

    #[test]
    fn test_roundtrip_patterns() {
        let patterns: Vec<Vec<u8>> = vec![
            vec![0x55; 100],
            vec![0x00, 0xFF, 0x00, 0xFF],
            (0..=255).collect(),
            (0..1024u32).map(|i| i.wrapping_mul(2654435761) as u8).collect(),
        ];
        for data in patterns {
            roundtrip(&data);
        }
    }

    #[test]
    fn test_exhausted_bitmap_returns_partial() {
        // A marker entry with an empty bitmap: warn and stop
        let produced = reconstruct(&[], &[], &[0, 0, 0, 0], true, 1);
        assert!(produced.is_empty());
    }
}
