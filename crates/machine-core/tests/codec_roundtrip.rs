//! Property tests for the instruction word codec.

use machine_core::{pack_word, unpack_word, Operation, PackError, OPCODE_MAX, OPERAND_MAX};
use proptest::prelude::*;

use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

proptest! {
    #[test]
    fn every_in_range_tuple_roundtrips(
        opcode in 0_i32..=OPCODE_MAX,
        op1 in 0_i32..=OPERAND_MAX,
        op2 in 0_i32..=OPERAND_MAX,
        op3 in 0_i32..=OPERAND_MAX,
    ) {
        let word = pack_word(opcode, op1, op2, op3).expect("in-range tuple must pack");
        let raw = unpack_word(word);
        prop_assert_eq!(i32::from(raw.opcode), opcode);
        prop_assert_eq!(i32::from(raw.operand1), op1);
        prop_assert_eq!(i32::from(raw.operand2), op2);
        prop_assert_eq!(i32::from(raw.operand3), op3);
    }

    #[test]
    fn oversized_opcodes_are_rejected(opcode in (OPCODE_MAX + 1)..=i32::MAX) {
        prop_assert_eq!(
            pack_word(opcode, 0, 0, 0),
            Err(PackError::OpcodeOutOfRange(opcode))
        );
    }

    #[test]
    fn oversized_operands_are_rejected(value in (OPERAND_MAX + 1)..=i32::MAX) {
        prop_assert!(pack_word(0, value, 0, 0).is_err());
        prop_assert!(pack_word(0, 0, value, 0).is_err());
        prop_assert!(pack_word(0, 0, 0, value).is_err());
    }

    #[test]
    fn negative_fields_are_rejected(value in i32::MIN..0) {
        prop_assert!(pack_word(value, 0, 0, 0).is_err());
        prop_assert!(pack_word(0, value, 0, 0).is_err());
        prop_assert!(pack_word(0, 0, value, 0).is_err());
        prop_assert!(pack_word(0, 0, 0, value).is_err());
    }

    #[test]
    fn any_word_decodes_to_in_range_fields(word in any::<u32>()) {
        let raw = unpack_word(word);
        prop_assert!(i32::from(raw.opcode) <= OPCODE_MAX);
        prop_assert!(i32::from(raw.operand1) <= OPERAND_MAX);
        prop_assert!(i32::from(raw.operand2) <= OPERAND_MAX);
        prop_assert!(i32::from(raw.operand3) <= OPERAND_MAX);
    }

    #[test]
    fn decode_then_encode_reproduces_the_word(word in any::<u32>()) {
        let raw = unpack_word(word);
        let repacked = pack_word(
            i32::from(raw.opcode),
            i32::from(raw.operand1),
            i32::from(raw.operand2),
            i32::from(raw.operand3),
        )
        .expect("decoded fields are in range by construction");
        prop_assert_eq!(repacked, word);
    }

    #[test]
    fn assigned_operations_survive_a_wire_trip(index in 0_usize..Operation::ALL.len()) {
        let op = Operation::ALL[index];
        let word = pack_word(i32::from(op.opcode()), 1, 2, 3).expect("must pack");
        prop_assert_eq!(unpack_word(word).operation(), Some(op));
    }
}
