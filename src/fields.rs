//! Field rendering.
//!
//! Most field letters mean the same thing in every instruction and map to a
//! fixed name table. `C` and `F` depend on the instruction: the mnemonic
//! picks which table applies. Letters without a table render as raw hex.

use crate::patterns::mnemonic as m;
use crate::types::FieldSpec;

/// `B`: segment base registers.
const BASE_REGISTERS: [&str; 16] = [
    "entry-access-list",
    "context",
    "processor",
    "operand-stack",
    "data-seg-cache-0",
    "data-seg-cache-1",
    "data-seg-cache-2",
    "data-seg-cache-3",
    "process",
    "inst-seg",
    "public-access-list",
    "private-access-list",
    "global-constants",
    "seg-table-dir",
    "dispatching-port",
    "carrier",
];

/// `C` in "Perform Operation".
const PERFORM_OPERATIONS: [&str; 16] = [
    "mul-ordinal",
    "mul-integer",
    "div-ordinal",
    "div-integer",
    "rem-ordinal",
    "rem-integer",
    "mul-real",
    "div-real",
    "add-real",
    "sub-real",
    "compare-real",
    "convert-real",
    "sqrt-real",
    "shift-left",
    "shift-right",
    "normalize",
];

/// `C` in "Move Condition to Branch Flag".
const BRANCH_CONDITIONS: [&str; 4] = ["zero", "negative", "carry", "overflow"];

/// `C` everywhere else: source register select.
const SOURCE_SELECT: [&str; 2] = ["deq-a", "deq-b"];

/// `F` in "Convert Flag to Boolean".
const CONVERT_FLAGS: [&str; 16] = [
    "equal",
    "not-equal",
    "less",
    "less-equal",
    "greater",
    "greater-equal",
    "carry",
    "no-carry",
    "zero",
    "not-zero",
    "negative",
    "not-negative",
    "overflow",
    "no-overflow",
    "sign-a",
    "sign-b",
];

/// `F` in "Return Flag to Instruction Unit Branch Condition".
const RETURN_FLAGS: [&str; 16] = [
    "false",
    "true",
    "zero",
    "not-zero",
    "negative",
    "positive",
    "carry",
    "no-carry",
    "overflow",
    "no-overflow",
    "underflow",
    "inexact",
    "invalid",
    "divide-by-zero",
    "unordered",
    "ordered",
];

/// `L`: two-input Boolean functions, indexed by truth table.
const LOGICAL_FUNCTIONS: [&str; 16] = [
    "zero",
    "a-and-b",
    "a-and-not-b",
    "a",
    "not-a-and-b",
    "b",
    "a-xor-b",
    "a-or-b",
    "a-nor-b",
    "a-xnor-b",
    "not-b",
    "a-or-not-b",
    "not-a",
    "not-a-or-b",
    "a-nand-b",
    "ones",
];

/// `R`: execution unit register file.
const REGISTERS: [&str; 16] = [
    "seg-sel-stack",
    "disp-stack",
    "ip-stack",
    "exponent-stack",
    "bit-pointer-stack",
    "extractor-shift-count",
    "deq-a",
    "deq-b",
    "sa",
    "fault-code",
    "process-timer",
    "lookahead",
    "tbip",
    "bip",
    "xbuf",
    "inst-seg-sel",
];

/// `T`: operand types.
const OPERAND_TYPES: [&str; 8] = [
    "char",
    "shortordinal",
    "shortinteger",
    "ordinal",
    "integer",
    "shortreal",
    "real",
    "tempreal",
];

/// `V`: operand sizes in bits, plus two symbolic sizes.
const OPERAND_SIZES: [&str; 8] = ["8", "16", "32", "48", "64", "80", "inst", "segsel"];

/// `W`: access direction.
const DIRECTIONS: [&str; 2] = ["read", "write"];

/// A name table for one field letter, possibly chosen by mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTable {
    /// `B`
    BaseRegister,
    /// `C` in "Perform Operation"
    PerformOperation,
    /// `C` in "Move Condition to Branch Flag"
    BranchCondition,
    /// `C` elsewhere
    SourceSelect,
    /// `F` in "Convert Flag to Boolean"
    ConvertFlag,
    /// `F` in "Return Flag to Instruction Unit Branch Condition"
    ReturnFlag,
    /// `L`
    LogicalFunction,
    /// `R`
    Register,
    /// `T`
    OperandType,
    /// `V`
    OperandSize,
    /// `W`
    Direction,
}

impl FieldTable {
    /// The table that names `letter` within `mnemonic`, if any.
    pub fn select(mnemonic: &str, letter: char) -> Option<Self> {
        let table = match (letter, mnemonic) {
            ('B', _) => Self::BaseRegister,
            ('C', m::PERFORM_OPERATION) => Self::PerformOperation,
            ('C', m::MOVE_CONDITION_TO_BRANCH_FLAG) => Self::BranchCondition,
            ('C', _) => Self::SourceSelect,
            ('F', m::CONVERT_FLAG_TO_BOOLEAN) => Self::ConvertFlag,
            ('F', m::RETURN_FLAG) => Self::ReturnFlag,
            ('L', _) => Self::LogicalFunction,
            ('R', _) => Self::Register,
            ('T', _) => Self::OperandType,
            ('V', _) => Self::OperandSize,
            ('W', _) => Self::Direction,
            _ => return None,
        };
        Some(table)
    }

    /// All names, indexed by raw field value.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Self::BaseRegister => &BASE_REGISTERS,
            Self::PerformOperation => &PERFORM_OPERATIONS,
            Self::BranchCondition => &BRANCH_CONDITIONS,
            Self::SourceSelect => &SOURCE_SELECT,
            Self::ConvertFlag => &CONVERT_FLAGS,
            Self::ReturnFlag => &RETURN_FLAGS,
            Self::LogicalFunction => &LOGICAL_FUNCTIONS,
            Self::Register => &REGISTERS,
            Self::OperandType => &OPERAND_TYPES,
            Self::OperandSize => &OPERAND_SIZES,
            Self::Direction => &DIRECTIONS,
        }
    }

    /// Name for a raw value.
    ///
    /// [`PatternSet::compile`](crate::patterns::PatternSet::compile) rejects
    /// named fields wider than their table, so `raw` is always in range.
    pub fn name(self, raw: u16) -> &'static str {
        self.names()[usize::from(raw)]
    }
}

/// Render one extracted field as `letter=value`.
///
/// Named fields print their table entry; others print `0x` followed by the
/// value in hex, zero-padded to the field's nibble width.
pub fn render(mnemonic: &str, field: &FieldSpec, raw: u16) -> String {
    match FieldTable::select(mnemonic, field.letter) {
        Some(table) => format!("{}={}", field.letter, table.name(raw)),
        None => {
            let digits = (usize::from(field.width) + 3) / 4;
            format!("{}=0x{:0digits$x}", field.letter, raw)
        }
    }
}
