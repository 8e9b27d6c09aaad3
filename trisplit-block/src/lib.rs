//! Block container layer for TriSplit.
//!
//! Ties the codecs together: [`separate`] performs the three-way structural
//! decomposition and its inverse, [`block`] assembles and disassembles one
//! compressed block (header plus three payloads), and [`frame`] handles the
//! size-prefixed record format of a compressed file.
//!
//! Blocks are fully self-contained; nothing in this crate keeps state
//! between them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod frame;
pub mod separate;

pub use block::{
    BLOCK_HEADER_SIZE, MAX_BLOCK_SIZE, ReconEngine, compress_block, decompress_block,
};
#[cfg(feature = "parallel")]
pub use block::compress_blocks_parallel;
pub use frame::{read_frame, write_frame};
pub use separate::{SeparatedStreams, reconstruct, separate};
