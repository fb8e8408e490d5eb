//! Dense decode table over the whole 16-bit opcode space.
//!
//! [`DecodeTableBuilder`] expands each compiled pattern into every encoding
//! it matches and refuses to let two patterns claim the same slot.
//! [`DecodeTableBuilder::build`] freezes the result into a [`DecodeTable`],
//! which has no mutating API.

use tracing::{debug, trace};

use crate::error::{DisasmError, Result};
use crate::patterns::PatternSet;
use crate::types::{ParsedPattern, OPCODE_SPACE};

/// Mutable decode table under construction.
#[derive(Debug, Clone)]
pub struct DecodeTableBuilder {
    slots: Vec<Option<u16>>,
    names: Vec<String>,
}

impl Default for DecodeTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecodeTableBuilder {
    /// An empty table: every encoding undefined.
    pub fn new() -> Self {
        Self {
            slots: vec![None; OPCODE_SPACE],
            names: Vec::new(),
        }
    }

    /// Claim every encoding matched by `pattern` for the next pattern index.
    ///
    /// Patterns must be inserted in table order. Claiming a slot that an
    /// earlier pattern already owns is a [`DisasmError::DecodeConflict`],
    /// and leaves the builder exactly as it was.
    pub fn insert(&mut self, mnemonic: &str, pattern: &ParsedPattern) -> Result<()> {
        let index = self.names.len();
        let tag = u16::try_from(index).map_err(|_| DisasmError::Config {
            message: format!("too many patterns ({index})"),
        })?;

        let low = pattern.const_bits;
        let high = pattern.const_bits | !pattern.const_mask;
        let opcodes: Vec<u16> = (low..=high).filter(|&op| pattern.matches(op)).collect();

        // nothing is written unless every slot is free
        let taken = opcodes
            .iter()
            .find_map(|&op| self.slots[usize::from(op)].map(|owner| (op, usize::from(owner))));
        if let Some((opcode, existing_index)) = taken {
            return Err(DisasmError::DecodeConflict {
                opcode,
                existing: self.names[existing_index].clone(),
                existing_index,
                incoming: mnemonic.to_string(),
                incoming_index: index,
            });
        }

        for &opcode in &opcodes {
            self.slots[usize::from(opcode)] = Some(tag);
        }
        let claimed = opcodes.len();

        trace!(index, mnemonic, claimed, "claimed encodings");
        self.names.push(mnemonic.to_string());
        Ok(())
    }

    /// Freeze the table.
    pub fn build(self) -> DecodeTable {
        let populated = self.slots.iter().filter(|s| s.is_some()).count();
        debug!(
            patterns = self.names.len(),
            populated,
            undefined = OPCODE_SPACE - populated,
            "decode table built"
        );
        DecodeTable {
            slots: self.slots.into_boxed_slice(),
        }
    }
}

/// Read-only map from every 16-bit opcode to the index of the pattern that
/// claims it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable {
    slots: Box<[Option<u16>]>,
}

impl DecodeTable {
    /// Build the table for a compiled pattern set.
    pub fn from_patterns(patterns: &PatternSet) -> Result<Self> {
        let mut builder = DecodeTableBuilder::new();
        for compiled in patterns.iter() {
            builder.insert(compiled.source.mnemonic, &compiled.parsed)?;
        }
        Ok(builder.build())
    }

    /// Pattern index for `opcode`, or `None` for an undefined encoding.
    pub fn lookup(&self, opcode: u16) -> Option<usize> {
        self.slots[usize::from(opcode)].map(usize::from)
    }

    /// Number of defined encodings.
    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
