//! Streaming code-point reader over any `BufRead`.
//!
//! The frequency counter, the encoding pass and the codebook header parser
//! all consume input one symbol at a time without loading it whole. The
//! reader also hands out single bytes so the header parser can switch to
//! byte-level reads at the sentinel and pass the rest of the stream on to
//! the body decoder.

use crate::error::{HuffError, Result};
use std::io::BufRead;

pub struct Utf8Reader<R> {
    inner: R,
    offset: u64,
}

impl<R: BufRead> Utf8Reader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let byte = match self.inner.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.inner.consume(1);
        self.offset += 1;
        Ok(Some(byte))
    }

    /// Read one code point, or `None` at a clean end of stream.
    pub fn read_char(&mut self) -> Result<Option<char>> {
        let start = self.offset;
        let invalid = || HuffError::InvalidUtf8 { offset: start };

        let Some(first) = self.read_byte()? else {
            return Ok(None);
        };
        let width = sequence_width(first).ok_or_else(invalid)?;
        let mut bytes = [first, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self.read_byte()?.ok_or_else(invalid)?;
        }
        std::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or_else(invalid)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> Iterator for Utf8Reader<R> {
    type Item = Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_char().transpose()
    }
}

/// Length of the UTF-8 sequence introduced by `lead`.
fn sequence_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars_of(bytes: &[u8]) -> Result<Vec<char>> {
        Utf8Reader::new(bytes).collect()
    }

    #[test]
    fn test_reads_mixed_widths() {
        let text = "aé€😀";
        assert_eq!(chars_of(text.as_bytes()).unwrap(), text.chars().collect::<Vec<_>>());
    }

    #[test]
    fn test_offset_tracks_bytes() {
        let mut reader = Utf8Reader::new("é!".as_bytes());
        reader.read_char().unwrap();
        assert_eq!(reader.offset(), 2);
        reader.read_char().unwrap();
        assert_eq!(reader.offset(), 3);
        assert!(reader.read_char().unwrap().is_none());
    }

    #[test]
    fn test_truncated_sequence() {
        let err = chars_of(&[b'a', 0xE2, 0x82]).unwrap_err();
        assert!(matches!(err, HuffError::InvalidUtf8 { offset: 1 }));
    }

    #[test]
    fn test_stray_continuation_byte() {
        assert!(matches!(
            chars_of(&[0x80]),
            Err(HuffError::InvalidUtf8 { offset: 0 })
        ));
    }

    #[test]
    fn test_surrogate_rejected() {
        // U+D800 encoded directly
        assert!(chars_of(&[0xED, 0xA0, 0x80]).is_err());
    }
}
