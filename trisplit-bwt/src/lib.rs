//! BWT entropy pipeline for TriSplit.
//!
//! The alternate engine for the reconstructed stream: a four-stage pipeline
//! over 16-bit tokens, each stage an exact inverse of its forward pass.
//!
//! 1. Burrows-Wheeler Transform - groups similar tokens
//! 2. Move-to-Front - turns locality into small indices
//! 3. Zero-run RLE - collapses the zero runs MTF produces
//! 4. Huffman - entropy-codes the result with a serialized codebook
//!
//! The BWT primary index and the MTF initial alphabet travel inside the
//! Huffman header, so the artifact is fully self-describing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bwt;
pub mod huffman;
pub mod mtf;
pub mod rle;

pub use bwt::BwtResult;
pub use mtf::MtfResult;
pub use rle::{RleResult, ZERO_RUN_SENTINEL};

use trisplit_core::error::Result;

/// Run a token block through BWT, MTF, RLE and Huffman.
pub fn process_stream(tokens: &[u16]) -> Result<Vec<u8>> {
    let bwt_result = bwt::apply(tokens);
    let mtf_result = mtf::apply(&bwt_result);
    let rle_result = rle::apply(mtf_result);
    huffman::encode(&rle_result)
}

/// Invert [`process_stream`], recovering the original token block.
pub fn inverse_process_stream(data: &[u8]) -> Result<Vec<u16>> {
    let rle_result = huffman::decode(data)?;
    let mtf_result = rle::inverse_apply(rle_result)?;
    let bwt_result = mtf::inverse_apply(mtf_result)?;
    bwt::inverse_apply(&bwt_result)
}
