//! Microcode image loading.
//!
//! Two on-disk forms are accepted:
//! - text: one 16-bit word per line as four hex digits
//! - binary: 8192 bytes of big-endian 16-bit words

use byteorder::{BigEndian, ByteOrder};
use hex::FromHex;
use std::path::Path;
use tracing::debug;

use crate::error::{DisasmError, Result};
use crate::types::IMAGE_WORDS;

/// A full control-store image of exactly [`IMAGE_WORDS`] words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MicrocodeImage {
    words: Vec<u16>,
}

impl MicrocodeImage {
    /// Wrap a word vector, checking its length.
    pub fn from_words(words: Vec<u16>) -> Result<Self> {
        if words.len() != IMAGE_WORDS {
            return Err(DisasmError::ImageSize {
                expected: IMAGE_WORDS,
                actual: words.len(),
            });
        }
        Ok(Self { words })
    }

    /// Parse a text image.
    ///
    /// Blank lines are skipped; surrounding whitespace is ignored. Line
    /// numbers in errors are 1-based.
    pub fn parse_text(text: &str) -> Result<Self> {
        let mut words = Vec::with_capacity(IMAGE_WORDS);
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let bytes = <[u8; 2]>::from_hex(line).map_err(|_| DisasmError::ImageParse {
                line: i + 1,
                text: line.to_string(),
            })?;
            words.push(BigEndian::read_u16(&bytes));
        }
        debug!(words = words.len(), "parsed text image");
        Self::from_words(words)
    }

    /// Parse a raw big-endian image.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != IMAGE_WORDS * 2 {
            return Err(DisasmError::ImageSize {
                expected: IMAGE_WORDS,
                actual: data.len() / 2,
            });
        }
        let mut words = vec![0u16; IMAGE_WORDS];
        BigEndian::read_u16_into(data, &mut words);
        Self::from_words(words)
    }

    /// Read a text image from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_text(&text)
    }

    /// Read a raw big-endian image from disk.
    pub fn load_binary<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Word at `address`, if within the image.
    pub fn word(&self, address: usize) -> Option<u16> {
        self.words.get(address).copied()
    }

    /// All words, address order.
    pub fn words(&self) -> &[u16] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn text_image(words: &[u16]) -> String {
        words.iter().map(|w| format!("{w:04x}\n")).collect()
    }

    #[test]
    fn test_from_words_checks_size() {
        assert!(MicrocodeImage::from_words(vec![0; IMAGE_WORDS]).is_ok());
        match MicrocodeImage::from_words(vec![0; 10]).unwrap_err() {
            DisasmError::ImageSize { expected, actual } => {
                assert_eq!(expected, 4096);
                assert_eq!(actual, 10);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_text() {
        let mut words = vec![0xA0C0; IMAGE_WORDS];
        words[10] = 0xE032;
        let image = MicrocodeImage::parse_text(&text_image(&words)).unwrap();
        assert_eq!(image.word(10), Some(0xE032));
        assert_eq!(image.word(0), Some(0xA0C0));
        assert_eq!(image.word(IMAGE_WORDS), None);
    }

    #[test]
    fn test_parse_text_accepts_upper_case_and_padding() {
        let mut text = String::from("  C042  \r\n\n");
        text.push_str(&text_image(&vec![0; IMAGE_WORDS - 1]));
        let image = MicrocodeImage::parse_text(&text).unwrap();
        assert_eq!(image.word(0), Some(0xC042));
    }

    #[test]
    fn test_parse_text_interior_blank_lines_keep_addresses() {
        let mut words = vec![0xA0C0; IMAGE_WORDS];
        words[1] = 0xC042;
        words[2] = 0xE032;
        let mut text = text_image(&words);
        // blank lines between words 0/1 and 1/2
        text.insert_str(5, "\n");
        text.insert_str(11, "   \n");
        assert!(text.starts_with("a0c0\n\nc042\n   \ne032\n"));

        let image = MicrocodeImage::parse_text(&text).unwrap();
        assert_eq!(image.word(0), Some(0xA0C0));
        assert_eq!(image.word(1), Some(0xC042));
        assert_eq!(image.word(2), Some(0xE032));
        assert_eq!(image.words().len(), IMAGE_WORDS);
    }

    #[test]
    fn test_parse_text_wrong_count() {
        let text = text_image(&vec![0; IMAGE_WORDS + 1]);
        assert!(matches!(
            MicrocodeImage::parse_text(&text),
            Err(DisasmError::ImageSize { actual: 4097, .. })
        ));
    }

    #[test]
    fn test_parse_text_bad_line() {
        let text = "0000\n12g4\n";
        match MicrocodeImage::parse_text(text).unwrap_err() {
            DisasmError::ImageParse { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "12g4");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(MicrocodeImage::parse_text("123\n").is_err());
    }

    #[test]
    fn test_from_bytes_big_endian() {
        let mut data = vec![0u8; IMAGE_WORDS * 2];
        data[2] = 0xC0;
        data[3] = 0x42;
        let image = MicrocodeImage::from_bytes(&data).unwrap();
        assert_eq!(image.word(1), Some(0xC042));
        assert!(MicrocodeImage::from_bytes(&data[..100]).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text_image(&vec![0xF870; IMAGE_WORDS]).as_bytes())
            .unwrap();
        let image = MicrocodeImage::load(file.path()).unwrap();
        assert_eq!(image.words().len(), IMAGE_WORDS);
        assert_eq!(image.word(4095), Some(0xF870));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.hex");
        assert!(matches!(
            MicrocodeImage::load(missing),
            Err(DisasmError::Io(_))
        ));
    }
}
