//! Pinned disassembly output, including field order.

use pretty_assertions::assert_eq;
use ucode_disasm::{DisasmOptions, Disassembler};

const FIXTURE: &[(u16, &str)] = &[
    (0x0000, "Access Memory B=entry-access-list, V=8, W=read, Q=0x0, J=0x0, P=0x0, M=0x0"),
    (0x15A3, "Access Memory B=operand-stack, V=32, W=write, Q=0x1, J=0x2, P=0x0, M=0x1"),
    (0x2290, "Local Access W=write"),
    (0x306A, "Instruction Segment Read"),
    (0x4036, "Add T=ordinal, D=0x0, S=0x0"),
    (0x655A, "Extract B=processor, A=0x2, T=shortordinal, J=0x0, R=disp-stack, D=0x2, S=0x2"),
    (0x68F6, "Logical Operation L=a-xor-b, T=tempreal, D=0x1, S=0x0"),
    (0x9B25, "Convert Flag to Boolean I=0x0, F=not-zero, D=0x1"),
    (0x93E0, "Return Flag to Instruction Unit Branch Condition I=0x0, F=ordered, S=0x1"),
    (0x7F24, "Scale Displacement V=32, D=0x2, S=0x3"),
    (0x87C4, "OP DEQ to DEQ L=not-a-and-b, R=tbip, D=0x3"),
    (0x8A37, "ROM OP DEQ to DEQ L=a-or-b, A=0x03, D=0x1"),
    (0xA0C0, "No Operation S=0x0"),
    (0xA3B5, "Load Segment Length B=data-seg-cache-1, S=0x1"),
    (0xA80D, "Perform Operation C=shift-left"),
    (0xB3AB, "Test Segment Type K=0xab, Z=0x1, S=0x1"),
    (0xC042, "Branch A=0x042"),
    (0xD7FF, "Conditional Branch A=0x7ff"),
    (0xE032, "Call Microsubroutine A=0x032"),
    (0xF0A5, "Return From Microsubroutine"),
    (0xF82F, "Transfer Data to Register R=inst-seg-sel, S=0x0"),
    (0xF870, "End of Macro Instruction S=0x0"),
    (0xF850, "unknown"),
    (0xFFFF, "unknown"),
];

#[test]
fn pinned_disassembly() {
    let disassembler = Disassembler::new(&DisasmOptions::new()).unwrap();
    for &(opcode, expected) in FIXTURE {
        assert_eq!(
            disassembler.disassemble(opcode).to_string(),
            expected,
            "opcode 0x{opcode:04X}"
        );
    }
}
