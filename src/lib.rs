//! uCode Disasm - iAPX 432 Execution Unit Microcode Disassembler
//!
//! This library decodes and disassembles the 16-bit horizontal
//! microinstructions of the iAPX 432 execution unit, using the bit-level
//! encoding table published in US patent 4,325,120.
//!
//! # Features
//!
//! - **Pattern Compiler**: Turns textual bit patterns such as
//!   `"1100 AAAA AAAA AAAA"` into masks and field descriptors
//! - **Exhaustive Decode Table**: Every one of the 65536 encodings resolves
//!   to at most one pattern; overlapping patterns are a build error
//! - **Field Rendering**: Register, type, size and operation names, with
//!   mnemonic-dependent tables for the `C` and `F` fields
//! - **Cross-Referencing**: Call, branch and conditional-branch targets
//!   across a full 4096-word control store, with block boundaries that
//!   honor the one-instruction delay slot
//!
//! # Quick Start
//!
//! ```rust
//! use ucode_disasm::{Disassembler, DisasmOptions};
//!
//! let disassembler = Disassembler::new(&DisasmOptions::new())?;
//! let inst = disassembler.disassemble(0xC042);
//! assert_eq!(inst.mnemonic, "Branch");
//! assert_eq!(inst.fields, vec!["A=0x042"]);
//! # Ok::<(), ucode_disasm::DisasmError>(())
//! ```
//!
//! # Whole Images
//!
//! ```rust,no_run
//! use ucode_disasm::{disassemble_file, listing::{ListingFormatter, TextFormatter}};
//!
//! let analysis = disassemble_file("ucode.hex")?;
//! print!("{}", TextFormatter::new().format_listing(&analysis));
//! # Ok::<(), ucode_disasm::DisasmError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]

pub mod decode;
pub mod disasm;
pub mod error;
pub mod fields;
pub mod image;
pub mod listing;
pub mod patterns;
pub mod types;
pub mod xref;

pub use decode::{DecodeTable, DecodeTableBuilder};
pub use disasm::Disassembler;
pub use error::{DisasmError, Result};
pub use image::MicrocodeImage;
pub use patterns::{parse_pattern, CompiledPattern, PatternSet};
pub use types::{
    DisasmOptions, DisassembledInstruction, FieldSpec, InstructionPattern, ListingOptions,
    ParsedPattern, RefFlags, TraceFaultResolution, IMAGE_WORDS, OPCODE_SPACE,
};
pub use xref::{analyze, ControlFlow, CrossReferenceMaps, ImageAnalysis, ListingEntry};

use std::path::Path;

/// Disassemble and cross-reference a text image file with default options.
///
/// # Arguments
///
/// * `path` - Path to a text image of 4096 hex words
///
/// # Returns
///
/// * `Ok(ImageAnalysis)` - Per-address listing and cross-reference maps
/// * `Err(DisasmError)` - If the file cannot be read or has the wrong size
pub fn disassemble_file<P: AsRef<Path>>(path: P) -> Result<ImageAnalysis> {
    let image = MicrocodeImage::load(path)?;
    disassemble_image(&image, &DisasmOptions::new())
}

/// Disassemble and cross-reference an image with custom options.
///
/// Builds a fresh [`Disassembler`]; callers analyzing several images should
/// build one and call [`analyze`] directly.
pub fn disassemble_image(image: &MicrocodeImage, options: &DisasmOptions) -> Result<ImageAnalysis> {
    let disassembler = Disassembler::new(options)?;
    Ok(analyze(&disassembler, image, options))
}

/// Get version information for this library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
