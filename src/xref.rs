//! Control-flow cross-referencing over a whole image.
//!
//! Every word is disassembled; transfers record their source address under
//! their 12-bit target, and block-boundary hints mark where a listing should
//! break. Branch and return have one delay slot, so their boundary falls
//! after the following word. End of macro instruction ends the block at
//! itself. Conditional branches may fall through and leave no boundary.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::disasm::Disassembler;
use crate::image::MicrocodeImage;
use crate::patterns::mnemonic as m;
use crate::types::{DisasmOptions, DisassembledInstruction, RefFlags, ADDRESS_MASK, IMAGE_WORDS};

/// Control-flow role of a microinstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlFlow {
    /// Falls through to the next word.
    Sequential,
    /// Call Microsubroutine to the target.
    Call(u16),
    /// Unconditional branch to the target.
    Branch(u16),
    /// Conditional branch to the target.
    ConditionalBranch(u16),
    /// Return From Microsubroutine.
    Return,
    /// End of Macro Instruction.
    EndOfMacro,
}

impl ControlFlow {
    /// Classify a decoded word.
    pub fn classify(mnemonic: &str, word: u16) -> Self {
        let target = word & ADDRESS_MASK;
        match mnemonic {
            m::CALL_MICROSUBROUTINE => Self::Call(target),
            m::BRANCH => Self::Branch(target),
            m::CONDITIONAL_BRANCH => Self::ConditionalBranch(target),
            m::RETURN_FROM_MICROSUBROUTINE => Self::Return,
            m::END_OF_MACRO_INSTRUCTION => Self::EndOfMacro,
            _ => Self::Sequential,
        }
    }

    /// Address after which a block ends, for an instruction at `address`.
    pub fn boundary(self, address: u16) -> Option<u16> {
        match self {
            Self::Branch(_) | Self::Return => address.checked_add(1),
            Self::EndOfMacro => Some(address),
            Self::Sequential | Self::Call(_) | Self::ConditionalBranch(_) => None,
        }
    }
}

/// Inbound references, keyed by target address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrossReferenceMaps {
    /// Call Microsubroutine targets.
    pub call_target_ref: BTreeMap<u16, BTreeSet<u16>>,
    /// Branch targets.
    pub branch_target_ref: BTreeMap<u16, BTreeSet<u16>>,
    /// Conditional Branch targets.
    pub cond_branch_target_ref: BTreeMap<u16, BTreeSet<u16>>,
}

impl CrossReferenceMaps {
    fn record(&mut self, source: u16, flow: ControlFlow) {
        let (map, target) = match flow {
            ControlFlow::Call(t) => (&mut self.call_target_ref, t),
            ControlFlow::Branch(t) => (&mut self.branch_target_ref, t),
            ControlFlow::ConditionalBranch(t) => (&mut self.cond_branch_target_ref, t),
            _ => return,
        };
        map.entry(target).or_default().insert(source);
    }

    /// Which kinds of transfer land on `address`.
    pub fn flags(&self, address: u16) -> RefFlags {
        let mut flags = RefFlags::empty();
        flags.set(
            RefFlags::SUBROUTINE,
            self.call_target_ref.contains_key(&address),
        );
        flags.set(RefFlags::BRANCH, self.branch_target_ref.contains_key(&address));
        flags.set(
            RefFlags::CONDITIONAL,
            self.cond_branch_target_ref.contains_key(&address),
        );
        flags
    }

    /// Every address referenced by at least one transfer.
    pub fn targets(&self) -> BTreeSet<u16> {
        self.call_target_ref
            .keys()
            .chain(self.branch_target_ref.keys())
            .chain(self.cond_branch_target_ref.keys())
            .copied()
            .collect()
    }
}

/// One address of an analyzed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    /// Control-store address.
    pub address: u16,
    /// Raw word.
    pub word: u16,
    /// Inbound reference kinds.
    pub flags: RefFlags,
    /// Decoded instruction.
    pub instruction: DisassembledInstruction,
    /// A block ends after this entry.
    pub boundary: bool,
}

/// Result of analyzing a whole image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAnalysis {
    /// Inbound references by target.
    pub refs: CrossReferenceMaps,
    /// Addresses after which a block ends.
    pub boundaries: BTreeSet<u16>,
    /// One entry per address, ascending.
    pub entries: Vec<ListingEntry>,
}

/// Disassemble and cross-reference a whole image.
pub fn analyze(
    disassembler: &Disassembler,
    image: &MicrocodeImage,
    options: &DisasmOptions,
) -> ImageAnalysis {
    let decoded = decode_all(disassembler, image.words(), options.parallel);

    let mut refs = CrossReferenceMaps::default();
    let mut boundaries = BTreeSet::new();

    for (address, (word, instruction)) in (0u16..).zip(&decoded) {
        let flow = ControlFlow::classify(instruction.mnemonic, *word);
        refs.record(address, flow);
        if let Some(b) = flow.boundary(address) {
            // a transfer in the last word has its delay slot outside the image
            if usize::from(b) < IMAGE_WORDS {
                boundaries.insert(b);
            }
        }
    }

    debug!(
        calls = refs.call_target_ref.len(),
        branches = refs.branch_target_ref.len(),
        cond_branches = refs.cond_branch_target_ref.len(),
        boundaries = boundaries.len(),
        "cross-reference pass complete"
    );

    let entries = (0u16..)
        .zip(decoded)
        .map(|(address, (word, instruction))| ListingEntry {
            address,
            word,
            flags: refs.flags(address),
            instruction,
            boundary: boundaries.contains(&address),
        })
        .collect();

    ImageAnalysis {
        refs,
        boundaries,
        entries,
    }
}

#[cfg(feature = "parallel")]
fn decode_all(
    disassembler: &Disassembler,
    words: &[u16],
    parallel: bool,
) -> Vec<(u16, DisassembledInstruction)> {
    use rayon::prelude::*;

    if parallel {
        // indexed collect keeps address order
        words
            .par_iter()
            .map(|&w| (w, disassembler.disassemble(w)))
            .collect()
    } else {
        decode_sequential(disassembler, words)
    }
}

#[cfg(not(feature = "parallel"))]
fn decode_all(
    disassembler: &Disassembler,
    words: &[u16],
    parallel: bool,
) -> Vec<(u16, DisassembledInstruction)> {
    if parallel {
        debug!("built without the parallel feature; decoding sequentially");
    }
    decode_sequential(disassembler, words)
}

fn decode_sequential(
    disassembler: &Disassembler,
    words: &[u16],
) -> Vec<(u16, DisassembledInstruction)> {
    words
        .iter()
        .map(|&w| (w, disassembler.disassemble(w)))
        .collect()
}
