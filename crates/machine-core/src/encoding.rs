//! Instruction word codec and the closed operation table.
//!
//! An instruction is a single 32-bit word packed low-to-high as a 5-bit
//! opcode followed by three 9-bit operand fields. Packing validates every
//! field against its range; unpacking masks exactly each field's width and
//! therefore always succeeds. Opcode legality is the interpreter's concern,
//! never the codec's.

use thiserror::Error;

/// Bytes per encoded instruction word in a program stream.
pub const WORD_BYTES: usize = 4;

/// Highest encodable opcode value (5-bit field).
pub const OPCODE_MAX: i32 = 31;
/// Highest encodable operand value (9-bit field).
pub const OPERAND_MAX: i32 = 511;

/// Bit offset of operand 1 within the instruction word.
pub const OPERAND1_SHIFT: u32 = 5;
/// Bit offset of operand 2 within the instruction word.
pub const OPERAND2_SHIFT: u32 = 14;
/// Bit offset of operand 3 within the instruction word.
pub const OPERAND3_SHIFT: u32 = 23;

const OPCODE_MASK: u32 = 0x1F;
const OPERAND_MASK: u32 = 0x1FF;

/// Number of assigned operations.
pub const OPERATION_COUNT: usize = 25;

/// The closed set of machine operations with assigned opcode values.
///
/// Declaration order fixes the binary encoding; values 25..=31 are
/// unassigned and fault at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Operation {
    PrintRegisters = 0,
    BitwiseInversion = 1,
    Disjunction = 2,
    Conjunction = 3,
    Xor = 4,
    Implication = 5,
    Coimplication = 6,
    Equivalence = 7,
    PierceArrow = 8,
    ShefferStroke = 9,
    Addition = 10,
    Subtraction = 11,
    Multiplication = 12,
    Division = 13,
    Modulo = 14,
    Swap = 15,
    SetByte = 16,
    PrintOperand = 17,
    InputOperand = 18,
    MaxPowerOfTwo = 19,
    ShiftLeft = 20,
    ShiftRight = 21,
    RotateLeft = 22,
    RotateRight = 23,
    Copy = 24,
}

/// Operand-slot roles shared by the assembler and interpreter.
///
/// The pattern is determined solely by opcode identity and fixes which
/// slots hold register indices, which hold literal numeric bases, and
/// which stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandPattern {
    /// Operand 1 is a literal numeric base; operands 2 and 3 are unused.
    BaseOnly,
    /// Operand 1 is a register, operand 2 a literal numeric base.
    RegBase,
    /// Operand 1 is the source register, operand 3 the destination.
    RegToReg,
    /// Operands 1 and 2 are registers; operand 3 is unused.
    RegPair,
    /// All three operands are registers.
    RegTriple,
}

impl Operation {
    /// Ordered list of every assigned operation.
    pub const ALL: [Self; OPERATION_COUNT] = [
        Self::PrintRegisters,
        Self::BitwiseInversion,
        Self::Disjunction,
        Self::Conjunction,
        Self::Xor,
        Self::Implication,
        Self::Coimplication,
        Self::Equivalence,
        Self::PierceArrow,
        Self::ShefferStroke,
        Self::Addition,
        Self::Subtraction,
        Self::Multiplication,
        Self::Division,
        Self::Modulo,
        Self::Swap,
        Self::SetByte,
        Self::PrintOperand,
        Self::InputOperand,
        Self::MaxPowerOfTwo,
        Self::ShiftLeft,
        Self::ShiftRight,
        Self::RotateLeft,
        Self::RotateRight,
        Self::Copy,
    ];

    /// Returns the assigned 5-bit opcode value.
    #[must_use]
    pub const fn opcode(self) -> u8 {
        self as u8
    }

    /// Converts a decoded 5-bit opcode field into an assigned operation.
    ///
    /// `None` means the value is unassigned (25..=31) or out of field range.
    #[must_use]
    pub const fn from_u5(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::PrintRegisters),
            1 => Some(Self::BitwiseInversion),
            2 => Some(Self::Disjunction),
            3 => Some(Self::Conjunction),
            4 => Some(Self::Xor),
            5 => Some(Self::Implication),
            6 => Some(Self::Coimplication),
            7 => Some(Self::Equivalence),
            8 => Some(Self::PierceArrow),
            9 => Some(Self::ShefferStroke),
            10 => Some(Self::Addition),
            11 => Some(Self::Subtraction),
            12 => Some(Self::Multiplication),
            13 => Some(Self::Division),
            14 => Some(Self::Modulo),
            15 => Some(Self::Swap),
            16 => Some(Self::SetByte),
            17 => Some(Self::PrintOperand),
            18 => Some(Self::InputOperand),
            19 => Some(Self::MaxPowerOfTwo),
            20 => Some(Self::ShiftLeft),
            21 => Some(Self::ShiftRight),
            22 => Some(Self::RotateLeft),
            23 => Some(Self::RotateRight),
            24 => Some(Self::Copy),
            _ => None,
        }
    }

    /// Returns the canonical mnemonic as written in source text.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::PrintRegisters => "PrintRegisters",
            Self::BitwiseInversion => "BitwiseInversion",
            Self::Disjunction => "Disjunction",
            Self::Conjunction => "Conjunction",
            Self::Xor => "Xor",
            Self::Implication => "Implication",
            Self::Coimplication => "Coimplication",
            Self::Equivalence => "Equivalence",
            Self::PierceArrow => "PierceArrow",
            Self::ShefferStroke => "ShefferStroke",
            Self::Addition => "Addition",
            Self::Subtraction => "Subtraction",
            Self::Multiplication => "Multiplication",
            Self::Division => "Division",
            Self::Modulo => "Modulo",
            Self::Swap => "Swap",
            Self::SetByte => "SetByte",
            Self::PrintOperand => "PrintOperand",
            Self::InputOperand => "InputOperand",
            Self::MaxPowerOfTwo => "MaxPowerOfTwo",
            Self::ShiftLeft => "ShiftLeft",
            Self::ShiftRight => "ShiftRight",
            Self::RotateLeft => "RotateLeft",
            Self::RotateRight => "RotateRight",
            Self::Copy => "Copy",
        }
    }

    /// Resolves a source-text mnemonic. Matching is case-sensitive.
    #[must_use]
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.mnemonic() == name)
    }

    /// Returns the operand-slot pattern for this operation.
    #[must_use]
    pub const fn operand_pattern(self) -> OperandPattern {
        match self {
            Self::PrintRegisters => OperandPattern::BaseOnly,
            Self::PrintOperand | Self::InputOperand => OperandPattern::RegBase,
            Self::BitwiseInversion | Self::MaxPowerOfTwo => OperandPattern::RegToReg,
            Self::Swap | Self::Copy => OperandPattern::RegPair,
            Self::Disjunction
            | Self::Conjunction
            | Self::Xor
            | Self::Implication
            | Self::Coimplication
            | Self::Equivalence
            | Self::PierceArrow
            | Self::ShefferStroke
            | Self::Addition
            | Self::Subtraction
            | Self::Multiplication
            | Self::Division
            | Self::Modulo
            | Self::SetByte
            | Self::ShiftLeft
            | Self::ShiftRight
            | Self::RotateLeft
            | Self::RotateRight => OperandPattern::RegTriple,
        }
    }
}

/// Field tuple extracted from one instruction word.
///
/// Every field is masked to its width, so all values are in range by
/// construction; the opcode may still name an unassigned operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RawInstruction {
    /// 5-bit opcode field.
    pub opcode: u8,
    /// First 9-bit operand field.
    pub operand1: u16,
    /// Second 9-bit operand field.
    pub operand2: u16,
    /// Third 9-bit operand field.
    pub operand3: u16,
}

impl RawInstruction {
    /// Resolves the opcode field to an assigned operation, when one exists.
    #[must_use]
    pub const fn operation(self) -> Option<Operation> {
        Operation::from_u5(self.opcode)
    }
}

/// Range violation raised while packing an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PackError {
    /// Opcode outside the 5-bit field range.
    #[error("opcode {0} out of range (0-31)")]
    OpcodeOutOfRange(i32),
    /// An operand outside the 9-bit field range.
    #[error("operand {slot} value {value} out of range (0-511)")]
    OperandOutOfRange {
        /// Operand slot number (1-3).
        slot: u8,
        /// The rejected value.
        value: i32,
    },
}

/// Packs an opcode and three operands into one instruction word.
///
/// # Errors
///
/// Returns [`PackError`] when the opcode or any operand is negative or
/// exceeds its field maximum.
pub const fn pack_word(
    opcode: i32,
    operand1: i32,
    operand2: i32,
    operand3: i32,
) -> Result<u32, PackError> {
    if opcode < 0 || opcode > OPCODE_MAX {
        return Err(PackError::OpcodeOutOfRange(opcode));
    }
    if operand1 < 0 || operand1 > OPERAND_MAX {
        return Err(PackError::OperandOutOfRange {
            slot: 1,
            value: operand1,
        });
    }
    if operand2 < 0 || operand2 > OPERAND_MAX {
        return Err(PackError::OperandOutOfRange {
            slot: 2,
            value: operand2,
        });
    }
    if operand3 < 0 || operand3 > OPERAND_MAX {
        return Err(PackError::OperandOutOfRange {
            slot: 3,
            value: operand3,
        });
    }

    Ok((opcode as u32)
        | ((operand1 as u32) << OPERAND1_SHIFT)
        | ((operand2 as u32) << OPERAND2_SHIFT)
        | ((operand3 as u32) << OPERAND3_SHIFT))
}

/// Unpacks one instruction word into its field tuple. Never fails.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn unpack_word(word: u32) -> RawInstruction {
    RawInstruction {
        opcode: (word & OPCODE_MASK) as u8,
        operand1: ((word >> OPERAND1_SHIFT) & OPERAND_MASK) as u16,
        operand2: ((word >> OPERAND2_SHIFT) & OPERAND_MASK) as u16,
        operand3: ((word >> OPERAND3_SHIFT) & OPERAND_MASK) as u16,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{
        pack_word, unpack_word, OperandPattern, Operation, PackError, OPERATION_COUNT,
    };

    #[test]
    fn assigned_opcode_values_are_unique_and_dense() {
        let opcodes: HashSet<_> = Operation::ALL.iter().map(|op| op.opcode()).collect();
        assert_eq!(opcodes.len(), OPERATION_COUNT);
        for op in Operation::ALL {
            assert!(usize::from(op.opcode()) < OPERATION_COUNT);
        }
    }

    #[test]
    fn every_operation_roundtrips_through_from_u5() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_u5(op.opcode()), Some(op));
        }
    }

    #[test]
    fn unassigned_opcode_values_resolve_to_none() {
        for bits in 25_u8..=31 {
            assert_eq!(Operation::from_u5(bits), None);
        }
        assert_eq!(Operation::from_u5(32), None);
        assert_eq!(Operation::from_u5(u8::MAX), None);
    }

    #[test]
    fn mnemonic_lookup_is_case_sensitive() {
        assert_eq!(
            Operation::from_mnemonic("Addition"),
            Some(Operation::Addition)
        );
        assert_eq!(Operation::from_mnemonic("addition"), None);
        assert_eq!(Operation::from_mnemonic("ADDITION"), None);
        assert_eq!(Operation::from_mnemonic(""), None);
        assert_eq!(Operation::from_mnemonic("NotAnOp"), None);
    }

    #[test]
    fn every_mnemonic_roundtrips() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_mnemonic(op.mnemonic()), Some(op));
        }
    }

    #[test]
    fn operand_patterns_match_the_contract_table() {
        assert_eq!(
            Operation::PrintRegisters.operand_pattern(),
            OperandPattern::BaseOnly
        );
        assert_eq!(
            Operation::PrintOperand.operand_pattern(),
            OperandPattern::RegBase
        );
        assert_eq!(
            Operation::InputOperand.operand_pattern(),
            OperandPattern::RegBase
        );
        assert_eq!(
            Operation::BitwiseInversion.operand_pattern(),
            OperandPattern::RegToReg
        );
        assert_eq!(
            Operation::MaxPowerOfTwo.operand_pattern(),
            OperandPattern::RegToReg
        );
        assert_eq!(Operation::Swap.operand_pattern(), OperandPattern::RegPair);
        assert_eq!(Operation::Copy.operand_pattern(), OperandPattern::RegPair);
        for op in [
            Operation::SetByte,
            Operation::Addition,
            Operation::Division,
            Operation::ShiftLeft,
            Operation::RotateRight,
            Operation::ShefferStroke,
        ] {
            assert_eq!(op.operand_pattern(), OperandPattern::RegTriple);
        }
    }

    #[test]
    fn pack_places_each_field_at_its_documented_offset() {
        let word = pack_word(24, 1, 2, 3).expect("in-range fields must pack");
        assert_eq!(word, 24 | (1 << 5) | (2 << 14) | (3 << 23));
    }

    #[test]
    fn pack_then_unpack_preserves_all_fields() {
        let word = pack_word(13, 511, 0, 257).expect("in-range fields must pack");
        let raw = unpack_word(word);
        assert_eq!(raw.opcode, 13);
        assert_eq!(raw.operand1, 511);
        assert_eq!(raw.operand2, 0);
        assert_eq!(raw.operand3, 257);
        assert_eq!(raw.operation(), Some(Operation::Division));
    }

    #[test]
    fn pack_rejects_out_of_range_opcode() {
        assert_eq!(pack_word(32, 0, 0, 0), Err(PackError::OpcodeOutOfRange(32)));
        assert_eq!(pack_word(-1, 0, 0, 0), Err(PackError::OpcodeOutOfRange(-1)));
    }

    #[test]
    fn pack_rejects_out_of_range_operands() {
        assert_eq!(
            pack_word(0, 512, 0, 0),
            Err(PackError::OperandOutOfRange {
                slot: 1,
                value: 512
            })
        );
        assert_eq!(
            pack_word(0, 0, -3, 0),
            Err(PackError::OperandOutOfRange { slot: 2, value: -3 })
        );
        assert_eq!(
            pack_word(0, 0, 0, 1024),
            Err(PackError::OperandOutOfRange {
                slot: 3,
                value: 1024
            })
        );
    }

    #[test]
    fn unpack_masks_every_field_into_range() {
        let raw = unpack_word(u32::MAX);
        assert_eq!(raw.opcode, 31);
        assert_eq!(raw.operand1, 511);
        assert_eq!(raw.operand2, 511);
        assert_eq!(raw.operand3, 511);
    }
}
