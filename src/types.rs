//! Core types for the microcode disassembler.
//!
//! This module defines the configuration records, compiled encoding
//! descriptors, decoded instructions and options shared by the pattern
//! compiler, the decode table, the disassembler and the cross-reference pass.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DisasmError;

/// Number of words in a control-store image.
pub const IMAGE_WORDS: usize = 4096;

/// Number of distinct 16-bit microinstruction encodings.
pub const OPCODE_SPACE: usize = 1 << 16;

/// Transfer instructions carry their target in the low 12 bits.
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Mnemonic reported for encodings no pattern claims.
pub const UNKNOWN_MNEMONIC: &str = "unknown";

/// One row of the patent's microinstruction encoding table.
///
/// `pattern_text` is four groups of four characters separated by single
/// spaces, most significant nibble first. `0`/`1` are fixed bits, `X` is a
/// don't-care bit, any other uppercase letter names a field bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct InstructionPattern {
    /// Fixed-layout bit pattern, e.g. `"1100 AAAA AAAA AAAA"`.
    pub pattern_text: &'static str,
    /// Cycle count as printed in the patent (informational only).
    pub cycle_spec: &'static str,
    /// Instruction name.
    pub mnemonic: &'static str,
}

impl InstructionPattern {
    /// Create a pattern row.
    pub const fn new(
        pattern_text: &'static str,
        cycle_spec: &'static str,
        mnemonic: &'static str,
    ) -> Self {
        Self {
            pattern_text,
            cycle_spec,
            mnemonic,
        }
    }
}

/// A named, contiguous bit field within an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field letter from the pattern text.
    pub letter: char,
    /// Index of the least significant bit (0-15).
    pub offset: u8,
    /// Number of bits (1-16).
    pub width: u8,
}

impl FieldSpec {
    /// Bits covered by this field, in place.
    pub fn mask(&self) -> u16 {
        let low = if self.width >= 16 {
            u16::MAX
        } else {
            (1u16 << self.width) - 1
        };
        low << self.offset
    }

    /// Pull this field's raw value out of an opcode.
    pub fn extract(&self, opcode: u16) -> u16 {
        (opcode & self.mask()) >> self.offset
    }
}

/// A compiled bit pattern.
///
/// `const_mask`, `dont_care_mask` and the field masks partition all sixteen
/// bits. `fields` is ordered by ascending bit offset, which is also the
/// rendering order of a disassembled instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPattern {
    /// Bits that must match `const_bits`.
    pub const_mask: u16,
    /// Required values of the bits in `const_mask`.
    pub const_bits: u16,
    /// Bits ignored by both matching and rendering.
    pub dont_care_mask: u16,
    /// Fields, lowest bit offset first.
    pub fields: Vec<FieldSpec>,
}

impl ParsedPattern {
    /// Union of all field masks.
    pub fn field_mask(&self) -> u16 {
        self.fields.iter().fold(0, |acc, f| acc | f.mask())
    }

    /// Look up a field by letter.
    pub fn field(&self, letter: char) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.letter == letter)
    }

    /// True when `opcode` carries this pattern's constant bits.
    pub fn matches(&self, opcode: u16) -> bool {
        opcode & self.const_mask == self.const_bits
    }

    /// Number of encodings this pattern claims.
    pub fn encoding_count(&self) -> usize {
        1 << (16 - self.const_mask.count_ones())
    }
}

/// The result of disassembling one microinstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisassembledInstruction {
    /// Instruction name, or [`UNKNOWN_MNEMONIC`].
    pub mnemonic: &'static str,
    /// Rendered fields in ascending bit-offset order.
    pub fields: Vec<String>,
}

impl DisassembledInstruction {
    /// The instruction returned for unclaimed encodings.
    pub fn unknown() -> Self {
        Self {
            mnemonic: UNKNOWN_MNEMONIC,
            fields: Vec::new(),
        }
    }

    /// True if no pattern matched.
    pub fn is_unknown(&self) -> bool {
        self.mnemonic == UNKNOWN_MNEMONIC
    }
}

impl fmt::Display for DisassembledInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            write!(f, "{}", self.mnemonic)
        } else {
            write!(f, "{} {}", self.mnemonic, self.fields.join(", "))
        }
    }
}

bitflags! {
    /// Kinds of inbound control transfer seen at an address.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RefFlags: u8 {
        /// Target of a microsubroutine call.
        const SUBROUTINE = 0b001;
        /// Target of an unconditional branch.
        const BRANCH = 0b010;
        /// Target of a conditional branch.
        const CONDITIONAL = 0b100;
    }
}

impl RefFlags {
    /// Render as the listing prefix, always in `S`, `B`, `C` order.
    pub fn render(self) -> String {
        let mut s = String::with_capacity(3);
        if self.contains(Self::SUBROUTINE) {
            s.push('S');
        }
        if self.contains(Self::BRANCH) {
            s.push('B');
        }
        if self.contains(Self::CONDITIONAL) {
            s.push('C');
        }
        s
    }
}

impl fmt::Display for RefFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for RefFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

/// How the overlapping "Set Trace Fault" / "Access Destination" encodings
/// are resolved.
///
/// The patent lists both at `1111 0xx0 1011 xxxx`; only one can be present
/// in a consistent decode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraceFaultResolution {
    /// Keep "Set Trace Fault", omit "Access Destination".
    #[default]
    SetTraceFault,
    /// Keep "Access Destination", omit "Set Trace Fault".
    AccessDestination,
}

impl fmt::Display for TraceFaultResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetTraceFault => write!(f, "set-trace-fault"),
            Self::AccessDestination => write!(f, "access-destination"),
        }
    }
}

impl FromStr for TraceFaultResolution {
    type Err = DisasmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set-trace-fault" => Ok(Self::SetTraceFault),
            "access-destination" => Ok(Self::AccessDestination),
            other => Err(DisasmError::Config {
                message: format!("unknown trace-fault resolution '{other}'"),
            }),
        }
    }
}

/// Options for building a disassembler and running the cross-reference pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisasmOptions {
    /// Which of the two overlapping encodings to keep.
    pub trace_fault: TraceFaultResolution,
    /// Disassemble image words on the rayon pool (needs the `parallel` feature).
    pub parallel: bool,
}

impl DisasmOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options keeping "Access Destination" instead of "Set Trace Fault".
    pub fn access_destination() -> Self {
        Self {
            trace_fault: TraceFaultResolution::AccessDestination,
            ..Self::default()
        }
    }
}

/// Options controlling the text listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOptions {
    /// Insert a blank line at block boundaries
    pub separators: bool,
    /// Emit the S/B/C flag column
    pub flags: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            separators: true,
            flags: true,
        }
    }
}

impl ListingOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// One line per address, nothing else.
    pub fn plain() -> Self {
        Self {
            separators: false,
            flags: false,
        }
    }
}
