//! Error types for the microcode disassembler.
//!
//! Every variant here is fatal: it means the static pattern configuration
//! or the supplied microcode image is broken. Undecodable opcodes and
//! unreferenced addresses are ordinary outcomes and never surface as errors.

use thiserror::Error;

/// Primary error type for the microcode disassembler.
#[derive(Debug, Error)]
pub enum DisasmError {
    /// IO error while reading a microcode image.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A bit-pattern string is malformed or has a non-contiguous field.
    #[error("Pattern spec error in entry {index} ('{pattern}'): {message}")]
    PatternSpec {
        index: usize,
        pattern: String,
        message: String,
    },

    /// Two patterns claim the same 16-bit encoding.
    #[error(
        "Decode conflict at opcode 0x{opcode:04X}: '{incoming}' (entry {incoming_index}) \
         overlaps '{existing}' (entry {existing_index})"
    )]
    DecodeConflict {
        opcode: u16,
        existing: String,
        existing_index: usize,
        incoming: String,
        incoming_index: usize,
    },

    /// A microcode image does not contain exactly the expected word count.
    #[error("Image size error: expected {expected} words, got {actual}")]
    ImageSize { expected: usize, actual: usize },

    /// A line of a text image is not a 16-bit hexadecimal word.
    #[error("Image parse error at line {line}: '{text}' is not a 16-bit hex word")]
    ImageParse { line: usize, text: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias for disassembler operations.
pub type Result<T> = std::result::Result<T, DisasmError>;
