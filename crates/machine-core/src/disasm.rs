//! Word-level disassembly for listings and diagnostics.
//!
//! Rendering is canonical: mnemonic, then operands in source order per the
//! operand pattern, comma-separated. Assembling the rendered text yields
//! the original word back for every assigned opcode.

use crate::encoding::{unpack_word, OperandPattern, Operation, RawInstruction};

/// Renders one instruction word as assembly source text.
///
/// Unassigned opcodes render as `<unknown opcode N>`.
#[must_use]
pub fn disassemble_word(word: u32) -> String {
    let raw = unpack_word(word);
    raw.operation().map_or_else(
        || format!("<unknown opcode {}>", raw.opcode),
        |op| render(op, raw),
    )
}

fn render(op: Operation, raw: RawInstruction) -> String {
    let mnemonic = op.mnemonic();
    match op.operand_pattern() {
        OperandPattern::BaseOnly => format!("{mnemonic} {}", raw.operand1),
        OperandPattern::RegBase => {
            format!("{mnemonic} R{}, {}", raw.operand1, raw.operand2)
        }
        OperandPattern::RegToReg => {
            format!("{mnemonic} R{}, R{}", raw.operand1, raw.operand3)
        }
        OperandPattern::RegPair => {
            format!("{mnemonic} R{}, R{}", raw.operand1, raw.operand2)
        }
        OperandPattern::RegTriple => format!(
            "{mnemonic} R{}, R{}, R{}",
            raw.operand1, raw.operand2, raw.operand3
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::disassemble_word;
    use crate::encoding::{pack_word, Operation};

    fn encode(op: Operation, op1: i32, op2: i32, op3: i32) -> u32 {
        pack_word(i32::from(op.opcode()), op1, op2, op3).expect("test word must be in range")
    }

    #[test]
    fn renders_each_operand_pattern() {
        assert_eq!(
            disassemble_word(encode(Operation::PrintRegisters, 16, 0, 0)),
            "PrintRegisters 16"
        );
        assert_eq!(
            disassemble_word(encode(Operation::PrintOperand, 3, 10, 0)),
            "PrintOperand R3, 10"
        );
        assert_eq!(
            disassemble_word(encode(Operation::BitwiseInversion, 1, 0, 2)),
            "BitwiseInversion R1, R2"
        );
        assert_eq!(
            disassemble_word(encode(Operation::Swap, 4, 5, 0)),
            "Swap R4, R5"
        );
        assert_eq!(
            disassemble_word(encode(Operation::Addition, 0, 1, 2)),
            "Addition R0, R1, R2"
        );
    }

    #[test]
    fn unassigned_opcodes_render_as_unknown() {
        assert_eq!(disassemble_word(31), "<unknown opcode 31>");
        assert_eq!(disassemble_word(25), "<unknown opcode 25>");
    }
}
