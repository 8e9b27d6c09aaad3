//! High-level binary rANS coding.
//!
//! Three stream flavors share the same 8-byte payload header
//! (`total_symbols: u32 LE`, `norm_freq[0]: u32 LE`) and byte tail:
//!
//! - [`encode`] / [`decode`] work on byte-valued 0/1 streams,
//! - [`encode_bits`] / [`decode_bits`] on bit sequences,
//! - [`encode_reconstructed_stream`] / [`decode_reconstructed_stream`] apply
//!   the 2-bit rewrite that turns the marker/placeholder stream into pairs
//!   of coded bits exploiting the majority/minority skew.
//!
//! When either raw frequency is zero the payload degenerates to the bare
//! header with `norm_freq[0]` set to `0` or `PROB_SCALE`; the decoder then
//! repeats the lone symbol.

use crate::rans_byte::{PROB_SCALE, RansDecoder, RansEncoder};
use trisplit_core::error::{Result, TriSplitError};

/// Size of the payload header: `total_symbols` + `norm_freq[0]`.
pub const PAYLOAD_HEADER_SIZE: usize = 8;

/// Scale raw binary frequencies to `PROB_SCALE` via cumulative counts.
///
/// A positive raw frequency squashed to zero by the integer scaling borrows
/// one slot from the other symbol's band, so every observed symbol stays
/// encodable.
fn normalize_freqs(freqs: [u32; 2]) -> [u32; 2] {
    let total = freqs[0] as u64 + freqs[1] as u64;
    debug_assert!(freqs[0] > 0 && freqs[1] > 0);

    let cum1 = (PROB_SCALE as u64 * freqs[0] as u64) / total;
    let mut f0 = cum1 as u32;
    let mut f1 = PROB_SCALE - f0;

    if f0 == 0 {
        f0 = 1;
        f1 -= 1;
    }
    if f1 == 0 {
        f1 = 1;
        f0 -= 1;
    }

    [f0, f1]
}

fn write_header(out: &mut Vec<u8>, total_symbols: u32, norm_freq0: u32) {
    out.extend_from_slice(&total_symbols.to_le_bytes());
    out.extend_from_slice(&norm_freq0.to_le_bytes());
}

fn read_header(data: &[u8]) -> Result<(u32, u32)> {
    if data.len() < PAYLOAD_HEADER_SIZE {
        return Err(TriSplitError::invalid_header(
            "rANS payload header too small",
        ));
    }
    let total = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let freq0 = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    Ok((total, freq0))
}

/// Decode one binary symbol from the rANS state given the normalized split.
fn decode_symbol(dec: &mut RansDecoder<'_>, freq0: u32, freq1: u32) -> Result<u8> {
    if dec.peek() < freq0 {
        dec.advance(0, freq0)?;
        Ok(0)
    } else {
        dec.advance(freq0, freq1)?;
        Ok(1)
    }
}

/// Shared encode loop over a binary symbol stream.
///
/// The iterator is cloned for the frequency pass; the second pass pushes
/// symbols in reverse so the decoder reads them forward.
fn encode_stream<I>(symbols: I) -> Vec<u8>
where
    I: ExactSizeIterator<Item = u8> + DoubleEndedIterator + Clone,
{
    let total_symbols = symbols.len() as u32;
    if total_symbols == 0 {
        return Vec::new();
    }

    let mut freqs = [0u32; 2];
    for s in symbols.clone() {
        if s < 2 {
            freqs[s as usize] += 1;
        }
    }

    if freqs[0] == 0 || freqs[1] == 0 {
        let freq0 = if freqs[0] == 0 { 0 } else { PROB_SCALE };
        let mut out = Vec::with_capacity(PAYLOAD_HEADER_SIZE);
        write_header(&mut out, total_symbols, freq0);
        return out;
    }

    let norm = normalize_freqs(freqs);

    let mut enc = RansEncoder::new();
    for s in symbols.rev() {
        if s == 0 {
            enc.put(0, norm[0]);
        } else {
            enc.put(norm[0], norm[1]);
        }
    }
    let tail = enc.finish();

    let mut out = Vec::with_capacity(PAYLOAD_HEADER_SIZE + tail.len());
    write_header(&mut out, total_symbols, norm[0]);
    out.extend_from_slice(&tail);
    out
}

/// Compress a stream of bytes holding the values 0 or 1.
pub fn encode(symbol_stream: &[u8]) -> Vec<u8> {
    encode_stream(symbol_stream.iter().copied())
}

/// Decode data produced by [`encode`] back to the original 0/1 byte stream.
pub fn decode(compressed_data: &[u8]) -> Result<Vec<u8>> {
    if compressed_data.is_empty() {
        return Ok(Vec::new());
    }
    let (total_symbols, freq0) = read_header(compressed_data)?;
    if total_symbols == 0 {
        return Ok(Vec::new());
    }
    if freq0 == 0 || freq0 == PROB_SCALE {
        let symbol_to_repeat = (freq0 == 0) as u8;
        return Ok(vec![symbol_to_repeat; total_symbols as usize]);
    }
    if freq0 > PROB_SCALE {
        return Err(TriSplitError::corrupted(
            4,
            "normalized frequency exceeds the probability scale",
        ));
    }
    let freq1 = PROB_SCALE - freq0;

    let mut dec = RansDecoder::new(&compressed_data[PAYLOAD_HEADER_SIZE..])?;
    let mut decoded = Vec::with_capacity(total_symbols as usize);
    for _ in 0..total_symbols {
        decoded.push(decode_symbol(&mut dec, freq0, freq1)?);
    }

    Ok(decoded)
}

/// Compress a bit sequence. The algorithm is identical to [`encode`] modulo
/// interpretation of the symbols.
pub fn encode_bits(bit_stream: &[bool]) -> Vec<u8> {
    encode_stream(bit_stream.iter().map(|&b| b as u8))
}

/// Decode data produced by [`encode_bits`] back to the original bits.
pub fn decode_bits(compressed_data: &[u8]) -> Result<Vec<bool>> {
    Ok(decode(compressed_data)?.into_iter().map(|b| b != 0).collect())
}

/// Compress the reconstructed stream with the 2-bit rewrite.
///
/// Each input symbol becomes two coded bits: the common symbol is the pair
/// `(0, 0)`, the rare one `(0, 1)`. The synthesized frequency model
/// (`freq[0] = 2·n_common + n_rare`, `freq[1] = n_rare`) captures the skew
/// the rewrite creates. The header carries `total_bits = 2 × |stream|`.
pub fn encode_reconstructed_stream(recon_stream: &[u8], is_placeholder_common: bool) -> Vec<u8> {
    if recon_stream.is_empty() {
        return Vec::new();
    }

    let common_symbol = is_placeholder_common as u8;
    let n_common = recon_stream
        .iter()
        .filter(|&&s| s == common_symbol)
        .count();
    let n_rare = recon_stream.len() - n_common;

    let total_bits = (recon_stream.len() * 2) as u32;

    if n_rare == 0 {
        let mut out = Vec::with_capacity(PAYLOAD_HEADER_SIZE);
        write_header(&mut out, total_bits, PROB_SCALE);
        return out;
    }

    let freqs = [(2 * n_common + n_rare) as u32, n_rare as u32];
    let norm = normalize_freqs(freqs);

    let mut enc = RansEncoder::new();
    for &s in recon_stream.iter().rev() {
        if s == common_symbol {
            // pair (0, 0), pushed payload-first
            enc.put(0, norm[0]);
            enc.put(0, norm[0]);
        } else {
            // pair (0, 1)
            enc.put(norm[0], norm[1]);
            enc.put(0, norm[0]);
        }
    }
    let tail = enc.finish();

    let mut out = Vec::with_capacity(PAYLOAD_HEADER_SIZE + tail.len());
    write_header(&mut out, total_bits, norm[0]);
    out.extend_from_slice(&tail);
    out
}

/// Decode data produced by [`encode_reconstructed_stream`].
///
/// Bit pairs are read in forward order; the prefix bit must be `0` and the
/// payload bit selects common (`0`) or rare (`1`). A non-zero prefix bit is
/// flagged as corruption on stderr but decoding continues.
pub fn decode_reconstructed_stream(
    compressed_data: &[u8],
    is_placeholder_common: bool,
) -> Result<Vec<u8>> {
    if compressed_data.is_empty() {
        return Ok(Vec::new());
    }
    let (total_bits, freq0) = read_header(compressed_data)?;
    if total_bits == 0 {
        return Ok(Vec::new());
    }

    let common_symbol = is_placeholder_common as u8;
    let rare_symbol = 1 - common_symbol;

    if freq0 >= PROB_SCALE {
        if total_bits % 2 != 0 {
            return Err(TriSplitError::corrupted(
                0,
                "odd bit count for common-only reconstructed stream",
            ));
        }
        return Ok(vec![common_symbol; (total_bits / 2) as usize]);
    }
    let freq1 = PROB_SCALE - freq0;

    let mut dec = RansDecoder::new(&compressed_data[PAYLOAD_HEADER_SIZE..])?;
    let mut decoded = Vec::with_capacity((total_bits / 2) as usize);
    let mut flagged = false;

    let mut i = 0;
    while i < total_bits {
        let prefix = decode_symbol(&mut dec, freq0, freq1)?;
        let payload = decode_symbol(&mut dec, freq0, freq1)?;

        if prefix != 0 && !flagged {
            eprintln!("warning: non-zero prefix bit in reconstructed stream, continuing");
            flagged = true;
        }

        decoded.push(if payload == 1 { rare_symbol } else { common_symbol });
        i += 2;
    }

    Ok(decoded)
}
