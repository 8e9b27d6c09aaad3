//! Block-file framing.
//!
//! A compressed file is a sequence of records, each a little-endian `u64`
//! size followed by that many payload bytes. Zero-size records are no-ops
//! and skipped on read. EOF between the size word and the end of the payload
//! is an error; EOF at a record boundary ends the file.

use std::io::{Read, Write};
use trisplit_core::error::{Result, TriSplitError};

/// Write one framed block.
pub fn write_frame<W: Write>(writer: &mut W, block: &[u8]) -> Result<()> {
    writer.write_all(&(block.len() as u64).to_le_bytes())?;
    if !block.is_empty() {
        writer.write_all(block)?;
    }
    Ok(())
}

/// Read the size word, distinguishing a clean EOF from a torn one.
fn read_size<R: Read>(reader: &mut R) -> Result<Option<u64>> {
    let mut buf = [0u8; 8];
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(TriSplitError::unexpected_eof(buf.len() - filled));
        }
        filled += n;
    }
    Ok(Some(u64::from_le_bytes(buf)))
}

/// Read the next non-empty framed block, or `None` at end of file.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    loop {
        let Some(size) = read_size(reader)? else {
            return Ok(None);
        };
        if size == 0 {
            continue;
        }

        // Let the reader bound the allocation instead of trusting the size
        // word up front
        let mut payload = Vec::new();
        (&mut *reader).take(size).read_to_end(&mut payload)?;
        if (payload.len() as u64) < size {
            return Err(TriSplitError::unexpected_eof((size - payload.len() as u64) as usize));
        }
        return Ok(Some(payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_frame_roundtrip() {
        let mut file = Vec::new();
        write_frame(&mut file, b"first").unwrap();
        write_frame(&mut file, b"").unwrap();
        write_frame(&mut file, b"second block").unwrap();

        let mut cursor = Cursor::new(file);
        assert_eq!(read_frame(&mut cursor).unwrap().unwrap(), b"first");
        // The empty record is skipped
        assert_eq!(read_frame(&mut cursor).unwrap().unwrap(), b"second block");
        assert!(read_frame(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_empty_file() {
        let mut cursor = Cursor::new(Vec::new());
        assert!(read_frame(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_torn_size_word() {
        let mut cursor = Cursor::new(vec![1, 2, 3]);
        assert!(read_frame(&mut cursor).is_err());
    }

    #[test]
    fn test_eof_mid_payload() {
        let mut file = Vec::new();
        write_frame(&mut file, b"complete").unwrap();
        file.truncate(file.len() - 3);

        let mut cursor = Cursor::new(file);
        assert!(matches!(
            read_frame(&mut cursor),
            Err(TriSplitError::UnexpectedEof { expected: 3 })
        ));
    }

    #[test]
    fn test_huge_size_word_does_not_allocate() {
        let mut file = Vec::new();
        file.extend_from_slice(&u64::MAX.to_le_bytes());
        file.extend_from_slice(b"short");

        let mut cursor = Cursor::new(file);
        assert!(read_frame(&mut cursor).is_err());
    }
}
