//! Error types for TriSplit operations.
//!
//! This module provides one error type covering every failure mode of the
//! compressor: I/O errors from the driver, malformed headers, and the
//! corruption conditions detected while decoding a block.

use std::io;
use thiserror::Error;

/// The main error type for TriSplit operations.
#[derive(Debug, Error)]
pub enum TriSplitError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid or truncated header.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Corrupted data in a compressed block.
    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },

    /// Symbol index out of range for the recorded alphabet.
    #[error("Symbol index {index} out of range for alphabet of {alphabet_size} entries")]
    InvalidSymbolIndex {
        /// The out-of-range index.
        index: usize,
        /// Size of the alphabet being indexed.
        alphabet_size: usize,
    },

    /// Non-empty symbol stream paired with an empty initial alphabet.
    #[error("Missing initial alphabet for non-empty symbol stream")]
    EmptyAlphabet,

    /// Invalid Huffman code encountered during decoding.
    #[error("Invalid Huffman code at bit position {bit_position}")]
    InvalidHuffmanCode {
        /// Bit position where the invalid code was found.
        bit_position: u64,
    },

    /// Input exceeds a structural limit of the format.
    #[error("Unsupported input: {message}")]
    Unsupported {
        /// Description of the violated limit.
        message: String,
    },
}

/// Result type alias for TriSplit operations.
pub type Result<T> = std::result::Result<T, TriSplitError>;

impl TriSplitError {
    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }

    /// Create a symbol index error.
    pub fn invalid_symbol_index(index: usize, alphabet_size: usize) -> Self {
        Self::InvalidSymbolIndex {
            index,
            alphabet_size,
        }
    }

    /// Create an invalid Huffman code error.
    pub fn invalid_huffman(bit_position: u64) -> Self {
        Self::InvalidHuffmanCode { bit_position }
    }

    /// Create an unsupported input error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TriSplitError::invalid_header("rANS header too small");
        assert!(err.to_string().contains("rANS header too small"));

        let err = TriSplitError::corrupted(40, "size mismatch");
        assert!(err.to_string().contains("offset 40"));

        let err = TriSplitError::invalid_symbol_index(7, 3);
        assert!(err.to_string().contains("7"));
        assert!(err.to_string().contains("3"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: TriSplitError = io_err.into();
        assert!(matches!(err, TriSplitError::Io(_)));
    }
}
