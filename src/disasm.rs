//! Single-word disassembly.

use crate::decode::DecodeTable;
use crate::error::Result;
use crate::fields;
use crate::patterns::{CompiledPattern, PatternSet};
use crate::types::{DisasmOptions, DisassembledInstruction, InstructionPattern};

/// Compiled pattern set plus its frozen decode table.
///
/// Immutable after construction; `disassemble` takes `&self` and may be
/// called from any number of threads.
#[derive(Debug, Clone)]
pub struct Disassembler {
    patterns: PatternSet,
    table: DecodeTable,
}

impl Disassembler {
    /// Build from the patent table under the given options.
    pub fn new(options: &DisasmOptions) -> Result<Self> {
        Self::from_patterns(PatternSet::standard(options.trace_fault)?)
    }

    /// Build from an arbitrary configuration table.
    pub fn from_rows(rows: &[InstructionPattern]) -> Result<Self> {
        Self::from_patterns(PatternSet::compile(rows)?)
    }

    /// Build from an already compiled set.
    pub fn from_patterns(patterns: PatternSet) -> Result<Self> {
        let table = DecodeTable::from_patterns(&patterns)?;
        Ok(Self { patterns, table })
    }

    /// The pattern claiming `opcode`, if any.
    pub fn lookup(&self, opcode: u16) -> Option<&CompiledPattern> {
        self.table
            .lookup(opcode)
            .and_then(|index| self.patterns.get(index))
    }

    /// Disassemble one microinstruction.
    ///
    /// Undefined encodings yield `("unknown", [])`.
    pub fn disassemble(&self, opcode: u16) -> DisassembledInstruction {
        let Some(compiled) = self.lookup(opcode) else {
            return DisassembledInstruction::unknown();
        };

        let mnemonic = compiled.source.mnemonic;
        let fields = compiled
            .parsed
            .fields
            .iter()
            .map(|field| fields::render(mnemonic, field, field.extract(opcode)))
            .collect();

        DisassembledInstruction { mnemonic, fields }
    }

    /// The compiled pattern set.
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// The frozen decode table.
    pub fn table(&self) -> &DecodeTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TraceFaultResolution;
    use pretty_assertions::assert_eq;

    fn standard() -> Disassembler {
        Disassembler::new(&DisasmOptions::new()).unwrap()
    }

    #[test]
    fn test_branch() {
        let inst = standard().disassemble(0xC042);
        assert_eq!(inst.mnemonic, "Branch");
        assert_eq!(inst.fields, vec!["A=0x042".to_string()]);
    }

    #[test]
    fn test_no_operation() {
        let inst = standard().disassemble(0xA0C0);
        assert_eq!(inst.mnemonic, "No Operation");
        assert_eq!(inst.fields, vec!["S=0x0".to_string()]);
    }

    #[test]
    fn test_access_memory_field_order() {
        // 000M PJJQ WVVV BBBB with M=1 P=0 J=2 Q=1 W=1 V=2 B=3
        let inst = standard().disassemble(0b0001_0101_1010_0011);
        assert_eq!(inst.mnemonic, "Access Memory");
        assert_eq!(
            inst.fields,
            vec![
                "B=operand-stack",
                "V=32",
                "W=write",
                "Q=0x1",
                "J=0x2",
                "P=0x0",
                "M=0x1",
            ]
        );
    }

    #[test]
    fn test_mnemonic_dependent_fields() {
        let d = standard();
        // 1010 1xxx xxxx CCCC
        assert_eq!(d.disassemble(0xA80D).to_string(), "Perform Operation C=shift-left");
        // 1111 0xx0 1001 xxCC
        assert_eq!(
            d.disassemble(0xF092).to_string(),
            "Move Condition to Branch Flag C=carry"
        );
        // 1010 0001 110C LLLL
        assert_eq!(
            d.disassemble(0xA1D6).to_string(),
            "Conditionally Shift by Sixteen L=a-xor-b, C=deq-b"
        );
    }

    #[test]
    fn test_unknown() {
        let inst = standard().disassemble(0xF850);
        assert!(inst.is_unknown());
        assert!(inst.fields.is_empty());
    }

    #[test]
    fn test_trace_fault_resolution() {
        let stf = standard();
        let ad = Disassembler::new(&DisasmOptions::access_destination()).unwrap();
        assert_eq!(stf.disassemble(0xF0BA).to_string(), "Set Trace Fault");
        assert_eq!(
            ad.disassemble(0xF0BA).to_string(),
            "Access Destination V=32, W=write, J=0x0"
        );
        assert_eq!(
            PatternSet::standard(TraceFaultResolution::AccessDestination)
                .unwrap()
                .len(),
            stf.patterns().len()
        );
    }

    #[test]
    fn test_full_opcode_space() {
        let d = standard();
        let mut known = 0usize;
        for opcode in 0..=u16::MAX {
            let inst = d.disassemble(opcode);
            match d.lookup(opcode) {
                Some(compiled) => {
                    known += 1;
                    assert_eq!(inst.mnemonic, compiled.source.mnemonic);
                    assert_eq!(inst.fields.len(), compiled.parsed.fields.len());
                    for (text, field) in inst.fields.iter().zip(&compiled.parsed.fields) {
                        assert!(text.starts_with(field.letter), "0x{opcode:04X}: {text}");
                    }
                }
                None => assert_eq!(inst, DisassembledInstruction::unknown()),
            }
        }
        assert_eq!(known, d.table().populated());
    }

    #[test]
    fn test_idempotent() {
        let d = standard();
        for opcode in [0x0000, 0x1234, 0xC042, 0xE032, 0xF870, 0xFFFF] {
            assert_eq!(d.disassemble(opcode), d.disassemble(opcode));
        }
    }

    #[test]
    fn test_custom_rows_with_oversized_named_field_fail_to_build() {
        let rows = [InstructionPattern::new("0000 0000 0000 00WW", "1", "Wide Direction")];
        assert!(matches!(
            Disassembler::from_rows(&rows),
            Err(crate::error::DisasmError::PatternSpec { index: 0, .. })
        ));

        let rows = [InstructionPattern::new("0000 0000 0000 000W", "1", "Narrow Direction")];
        let d = Disassembler::from_rows(&rows).unwrap();
        assert_eq!(d.disassemble(0x0001).to_string(), "Narrow Direction W=write");
        assert!(d.disassemble(0x0003).is_unknown());
    }
}
