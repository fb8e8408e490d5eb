//! iAPX 432 execution-unit microinstruction encodings.
//!
//! Transcribed from US patent 4,325,120 "Data Processing System",
//! section 11, pp. 106 ff. Fields: `A` address/ROM index, `B` base
//! register, `C` operation or condition, `D` destination, `F` flag,
//! `L` logical function, `R` register, `S` source, `T` operand type,
//! `V` operand size, `W` read/write. Other letters are rendered raw.

use crate::types::{InstructionPattern, TraceFaultResolution};

/// Mnemonics the decoder and the cross-reference pass dispatch on.
pub mod mnemonic {
    pub const ACCESS_DESTINATION: &str = "Access Destination";
    pub const BRANCH: &str = "Branch";
    pub const CALL_MICROSUBROUTINE: &str = "Call Microsubroutine";
    pub const CONDITIONAL_BRANCH: &str = "Conditional Branch";
    pub const CONVERT_FLAG_TO_BOOLEAN: &str = "Convert Flag to Boolean";
    pub const END_OF_MACRO_INSTRUCTION: &str = "End of Macro Instruction";
    pub const MOVE_CONDITION_TO_BRANCH_FLAG: &str = "Move Condition to Branch Flag";
    pub const PERFORM_OPERATION: &str = "Perform Operation";
    pub const RETURN_FLAG: &str = "Return Flag to Instruction Unit Branch Condition";
    pub const RETURN_FROM_MICROSUBROUTINE: &str = "Return From Microsubroutine";
    pub const SET_TRACE_FAULT: &str = "Set Trace Fault";
}

use mnemonic as m;

const fn p(
    pattern_text: &'static str,
    cycle_spec: &'static str,
    mnemonic: &'static str,
) -> InstructionPattern {
    InstructionPattern::new(pattern_text, cycle_spec, mnemonic)
}

/// Encodings before the trace-fault slot.
const HEAD: &[InstructionPattern] = &[
    p("000M PJJQ WVVV BBBB", "var", "Access Memory"),
    p("0010 0010 W001 XXXX", "var", "Local Access"),
    p("0010 1JJQ WVVV MXXX", "var", "Access List Access"),
    p("0011 0XX0 0110 1010", "var", "Instruction Segment Read"),
    p("0011 1JJ0 WVVV 1011", "var", "Operand Stack Access"),
    p("0100 0SSD DTTT 0110", "2-3", "Add"),
    p("0100 0SSD DTTT 1001", "2-3", "Subtract"),
    p("0100 1SSD DTTT 0110", "2-3", "Decrement"),
    p("0100 1SSD DTTT 1001", "2-3", "Increment"),
    p("0101 0SSD DTTT XXX0", "2-3", "Absolute Value"),
    p("0101 0SSD DTTT 1001", "2-3", "Negate"),
    p("0101 1SSX X001 0110", "2", "Add to Displacement Stack"),
    p("0101 1SSX X010 0110", "2", "Add to IP Stack"),
    p("0101 1SSX X100 0110", "2", "Add to Exponent Stack"),
    p("0110 0SSD DRJT AABB", "1", "Extract"),
    p("0110 1SSD DTTT LLLL", "1-2", "Logical Operation"),
    p("0111 0SSD DXXX XXXX", "2", "Significant Bit"),
    p("0111 1SSD DVVV 0100", "2", "Scale Displacement"),
    p("1000 0SS0 RRRR LLLL", "1", "DEQ OP DEQ to Register"),
    p("1000 0DD1 RRRR LLLL", "1", "OP DEQ to DEQ"),
    p("1000 1DDA AAAA LLLL", "1", "ROM OP DEQ to DEQ"),
    p("1001 0SSF FFFI XXXX", "2", m::RETURN_FLAG),
    p("1001 1DDF FFFI 0101", "2", m::CONVERT_FLAG_TO_BOOLEAN),
    p("1010 0SS0 000K KKKK", "1", "Move Constant to Displacement Stack"),
    p("1010 0SS0 001K KKKK", "1", "Move Constant to Extractor Shift Count"),
    p("1010 0SS0 0110 XXXX", "1", "Reset Execution Unit Fault State"),
    p("1010 0SS0 0111 XXXX", "1", "Test Write Rights"),
    p("1010 0SS0 1000 XXXX", "1", "Clear Operand Sign Bits"),
    p("1010 0SS0 1001 XXXX", "1", "Exchange Flags"),
    p("1010 0SS0 1010 XXXX", "1", "Invert SA"),
    p("1010 0SS0 1100 XXXX", "1", "No Operation"),
    p("1010 0SS1 0000 XXXX", "1", "Invalidate Data Segment Cache Register"),
    p("1010 0SS1 0001 XXXX", "1", "Invalidate Data Segment Cache Register Set"),
    p("1010 0SS1 0010 XXXX", "1", "Invalidate Data Segment Cache"),
    p("1010 0SS1 0011 XXXX", "1", "Invalidate Segment Table Cache"),
    p("1010 0SS1 010X XXXX", "1", "Stop Process Timer"),
    p("1010 0SS1 011X XXXX", "1", "Start Process Timer"),
    p("1010 0SS1 1000 BBBB", "1", "Load Rights"),
    p("1010 0SS1 1001 BBBB", "1", "Load Physical Address Lower"),
    p("1010 0SS1 1010 BBBB", "1", "Load Physical Address Upper"),
    p("1010 0SS1 1011 BBBB", "1", "Load Segment Length"),
    p("1010 0001 110C LLLL", "1", "Conditionally Shift by Sixteen"),
    p("1010 0SS1 111U LLLL", "1", "Move to Extractor Shift Count"),
    p("1010 1XXX XXXX CCCC", "var", m::PERFORM_OPERATION),
    p("1011 0SSZ KKKK KKKK", "2", "Test Segment Type"),
    // transfers below have one delay slot
    p("1100 AAAA AAAA AAAA", "1", m::BRANCH),
    p("1101 AAAA AAAA AAAA", "1", m::CONDITIONAL_BRANCH),
    p("1110 AAAA AAAA AAAA", "1", m::CALL_MICROSUBROUTINE),
    p("1111 0XX0 0000 XXXX", "1", "Stop Instruction Decoder and Flush Composer"),
    p("1111 0XX0 0001 XXXX", "1", "Start Instruction Decoder"),
    p("1111 0XX0 0010 XXXX", "1", "Pop Bit Pointer Stack"),
    p("1111 0XX0 0011 XXXX", "1", "Move TBIP to BIP"),
    p("1111 0XX0 0100 XXXX", "1", "Move Bit Pointer Stack to XBUF"),
    p("1111 0XX0 0101 XXXX", "1", "Set Invalid Class Fault"),
    p("1111 0XX0 0110 XXXX", "1", "Issue IPC Function"),
    p("1111 0XX0 0111 XXXX", "1", "Set Processor Fatal Condition Pin"),
    p("1111 0XX0 1000 XXXX", "1", "Restart Current Access Microinstruction"),
    p("1111 0XX0 1001 XXCC", "1", m::MOVE_CONDITION_TO_BRANCH_FLAG),
    p("1111 0XX0 1010 XXXX", "1", m::RETURN_FROM_MICROSUBROUTINE),
];

const SET_TRACE_FAULT: InstructionPattern = p("1111 0XX0 1011 XXXX", "1", m::SET_TRACE_FAULT);

// Translated by the instruction unit into Access Memory or Operand Stack Access.
const ACCESS_DESTINATION: InstructionPattern =
    p("1111 0JJ0 1011 WVVV", "1", m::ACCESS_DESTINATION);

/// Encodings after the trace-fault slot.
const TAIL: &[InstructionPattern] = &[
    p("1111 1SS0 0000 XXXX", "3", "Transfer Operator Fault Encoding"),
    p("1111 1SS0 0001 0000", "3", "Transfer Logical Address"),
    p("1111 1SS0 0010 RRRR", "2", "Transfer Data to Register"),
    p("1111 1SS0 0011 XXXX", "1", "Set Lookahead Mode"),
    p("1111 1SS0 0100 XXXX", "1", "Reset Processor"),
    p("1111 1SS0 0110 XXXX", "1", "End of Branch Macro Instruction"),
    p("1111 1SS0 0111 XXXX", "1", m::END_OF_MACRO_INSTRUCTION),
    p("1111 1SS0 1001 XXXX", "1", "Reset IP and Stack to Instruction Start"),
    p("1111 1SS0 1010 LLLL", "1", "Transfer DEQ to BIP"),
];

/// The ordered encoding table under the given trace-fault resolution.
pub fn instruction_patterns(resolution: TraceFaultResolution) -> Vec<InstructionPattern> {
    let trace_slot = match resolution {
        TraceFaultResolution::SetTraceFault => SET_TRACE_FAULT,
        TraceFaultResolution::AccessDestination => ACCESS_DESTINATION,
    };

    let mut patterns = Vec::with_capacity(HEAD.len() + 1 + TAIL.len());
    patterns.extend_from_slice(HEAD);
    patterns.push(trace_slot);
    patterns.extend_from_slice(TAIL);
    patterns
}
