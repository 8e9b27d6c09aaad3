//! Binary rANS coding for TriSplit.
//!
//! This crate provides the order-0 range asymmetric numeral system coder
//! used for the separated streams: a 2-symbol alphabet at 14-bit probability
//! precision with byte-at-a-time renormalization.
//!
//! Two variants share the wire format:
//! 1. Plain coding of 0/1 streams (`encode` / `encode_bits`)
//! 2. The 2-bit rewrite for the reconstructed stream, where every symbol is
//!    emitted as a prefix/payload bit pair (`encode_reconstructed_stream`)

#![warn(missing_docs)]
#![warn(clippy::all)]

mod coder;
/// Low-level byte-oriented rANS state machine.
pub mod rans_byte;

pub use coder::{
    PAYLOAD_HEADER_SIZE, decode, decode_bits, decode_reconstructed_stream, encode, encode_bits,
    encode_reconstructed_stream,
};
pub use rans_byte::{PROB_SCALE, RANS_BYTE_L, RansDecoder, RansEncoder, SCALE_BITS};
