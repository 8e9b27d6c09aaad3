//! # TriSplit Core
//!
//! Core components shared by the TriSplit compressor crates:
//!
//! - [`error`]: the `TriSplitError` type and `Result` alias
//! - [`bitio`]: MSB-first bit reader/writer for variable-length codes
//!
//! ## Architecture
//!
//! TriSplit is layered like a small protocol stack:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ L4: Driver                                               │
//! │     trisplit-cli: block walking, framing, progress       │
//! ├──────────────────────────────────────────────────────────┤
//! │ L3: Container                                            │
//! │     trisplit-block: separation, block header, framing    │
//! ├──────────────────────────────────────────────────────────┤
//! │ L2: Codec                                                │
//! │     trisplit-rans (binary rANS), trisplit-bwt (pipeline) │
//! ├──────────────────────────────────────────────────────────┤
//! │ L1: Primitives (this crate)                              │
//! │     MsbBitReader/MsbBitWriter, errors                    │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitio;
pub mod error;

// Re-exports for convenience
pub use bitio::{MsbBitReader, MsbBitWriter};
pub use error::{Result, TriSplitError};
