//! Instruction dispatch and execution.
//!
//! Execution is strictly linear: the run loop reads one 32-bit word at a
//! time, decodes it, dispatches on opcode, and moves to the next word.
//! There is no program counter to redirect and no halt instruction.
//!
//! The central resilience contract is per-instruction fault isolation:
//! a handler that faults appends exactly one error line to the output,
//! performs no register mutation, and the run continues with the next
//! word. A run as a whole never fails.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use std::fmt::Write as _;

use crate::api::InputPort;
use crate::encoding::{unpack_word, Operation, RawInstruction, WORD_BYTES};
use crate::fault::ExecFault;
use crate::radix::{format_in_base, parse_in_base, supported_base};
use crate::state::RegisterFile;

/// Executes a compiled program against the register file.
///
/// Words are consumed sequentially, little-endian, until the stream is
/// exhausted. Run-time faults become lines in the returned output text;
/// the run itself never fails. A trailing partial word appends one error
/// line and ends the run.
pub fn run(program: &[u8], registers: &mut RegisterFile, input: &mut dyn InputPort) -> String {
    let mut output = String::new();

    let mut words = program.chunks_exact(WORD_BYTES);
    for chunk in words.by_ref() {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        step(unpack_word(word), registers, input, &mut output);
    }

    let trailing = words.remainder().len();
    if trailing != 0 {
        append_fault(&mut output, &ExecFault::TruncatedWord(trailing));
    }

    output
}

fn step(
    raw: RawInstruction,
    registers: &mut RegisterFile,
    input: &mut dyn InputPort,
    output: &mut String,
) {
    let result = raw.operation().map_or(
        Err(ExecFault::UnknownOpcode(raw.opcode)),
        |op| dispatch(op, raw, registers, input, output),
    );

    if let Err(fault) = result {
        append_fault(output, &fault);
    }
}

fn dispatch(
    op: Operation,
    raw: RawInstruction,
    registers: &mut RegisterFile,
    input: &mut dyn InputPort,
    output: &mut String,
) -> Result<(), ExecFault> {
    let op1 = usize::from(raw.operand1);
    let op2 = usize::from(raw.operand2);
    let op3 = usize::from(raw.operand3);

    match op {
        Operation::PrintRegisters => print_registers(registers, raw.operand1, output),
        Operation::PrintOperand => print_operand(registers, op1, raw.operand2, output),
        Operation::InputOperand => input_operand(registers, op1, raw.operand2, input, output),
        Operation::BitwiseInversion => unary(registers, op1, op3, |value| !value),
        Operation::MaxPowerOfTwo => unary(registers, op1, op3, max_power_of_two),
        Operation::Swap => swap(registers, op1, op2),
        Operation::Copy => copy(registers, op1, op2),
        Operation::SetByte => set_byte(registers, op1, op2, op3),
        Operation::Disjunction => binary(registers, op1, op2, op3, BinaryOp::Disjunction),
        Operation::Conjunction => binary(registers, op1, op2, op3, BinaryOp::Conjunction),
        Operation::Xor => binary(registers, op1, op2, op3, BinaryOp::Xor),
        Operation::Implication => binary(registers, op1, op2, op3, BinaryOp::Implication),
        Operation::Coimplication => binary(registers, op1, op2, op3, BinaryOp::Coimplication),
        Operation::Equivalence => binary(registers, op1, op2, op3, BinaryOp::Equivalence),
        Operation::PierceArrow => binary(registers, op1, op2, op3, BinaryOp::PierceArrow),
        Operation::ShefferStroke => binary(registers, op1, op2, op3, BinaryOp::ShefferStroke),
        Operation::Addition => binary(registers, op1, op2, op3, BinaryOp::Addition),
        Operation::Subtraction => binary(registers, op1, op2, op3, BinaryOp::Subtraction),
        Operation::Multiplication => binary(registers, op1, op2, op3, BinaryOp::Multiplication),
        Operation::Division => binary(registers, op1, op2, op3, BinaryOp::Division),
        Operation::Modulo => binary(registers, op1, op2, op3, BinaryOp::Modulo),
        Operation::ShiftLeft => binary(registers, op1, op2, op3, BinaryOp::ShiftLeft),
        Operation::ShiftRight => binary(registers, op1, op2, op3, BinaryOp::ShiftRight),
        Operation::RotateLeft => binary(registers, op1, op2, op3, BinaryOp::RotateLeft),
        Operation::RotateRight => binary(registers, op1, op2, op3, BinaryOp::RotateRight),
    }
}

fn append_fault(output: &mut String, fault: &ExecFault) {
    let _ = writeln!(output, "Error: {fault}");
}

fn checked_base(base: u16) -> Result<u32, ExecFault> {
    let radix = u32::from(base);
    if supported_base(radix) {
        Ok(radix)
    } else {
        Err(ExecFault::InvalidBase(base))
    }
}

fn print_registers(
    registers: &RegisterFile,
    base: u16,
    output: &mut String,
) -> Result<(), ExecFault> {
    let radix = checked_base(base)?;
    output.push_str("Register Values:\n");
    for (index, value) in registers.all().iter().enumerate() {
        let _ = writeln!(output, "R{index}: {}", format_in_base(*value, radix));
    }
    Ok(())
}

fn print_operand(
    registers: &RegisterFile,
    reg: usize,
    base: u16,
    output: &mut String,
) -> Result<(), ExecFault> {
    let radix = checked_base(base)?;
    let value = registers.get(reg)?;
    let _ = writeln!(output, "R{reg}: {}", format_in_base(value, radix));
    Ok(())
}

fn input_operand(
    registers: &mut RegisterFile,
    reg: usize,
    base: u16,
    input: &mut dyn InputPort,
    output: &mut String,
) -> Result<(), ExecFault> {
    let radix = checked_base(base)?;

    let message = format!("Enter value for R{reg} in base {radix}:");
    let Some(answer) = input.prompt(&message) else {
        output.push_str("Input cancelled.\n");
        return Ok(());
    };

    let Some(value) = parse_in_base(&answer, radix) else {
        return Err(ExecFault::InvalidInput(answer));
    };
    registers.set(reg, value)?;
    Ok(())
}

fn unary(
    registers: &mut RegisterFile,
    src: usize,
    dst: usize,
    op: fn(i32) -> i32,
) -> Result<(), ExecFault> {
    let value = registers.get(src)?;
    registers.set(dst, op(value))?;
    Ok(())
}

const fn max_power_of_two(value: i32) -> i32 {
    if value <= 0 {
        0
    } else {
        1_i32 << (31 - value.leading_zeros())
    }
}

fn swap(registers: &mut RegisterFile, first: usize, second: usize) -> Result<(), ExecFault> {
    let a = registers.get(first)?;
    let b = registers.get(second)?;
    registers.set(first, b)?;
    registers.set(second, a)?;
    Ok(())
}

fn copy(registers: &mut RegisterFile, dst: usize, src: usize) -> Result<(), ExecFault> {
    let value = registers.get(src)?;
    registers.set(dst, value)?;
    Ok(())
}

fn set_byte(
    registers: &mut RegisterFile,
    reg: usize,
    index_reg: usize,
    value_reg: usize,
) -> Result<(), ExecFault> {
    let current = registers.get(reg)?;
    let index = registers.get(index_reg)?;
    let value = registers.get(value_reg)?;

    if !(0..=3).contains(&index) {
        return Err(ExecFault::ByteIndexOutOfRange(index));
    }
    if !(0..=255).contains(&value) {
        return Err(ExecFault::ByteValueOutOfRange(value));
    }

    let mut bytes = current.to_le_bytes();
    bytes[index as usize] = value as u8;
    registers.set(reg, i32::from_le_bytes(bytes))?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Disjunction,
    Conjunction,
    Xor,
    Implication,
    Coimplication,
    Equivalence,
    PierceArrow,
    ShefferStroke,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    ShiftLeft,
    ShiftRight,
    RotateLeft,
    RotateRight,
}

fn binary(
    registers: &mut RegisterFile,
    lhs_reg: usize,
    rhs_reg: usize,
    dst: usize,
    op: BinaryOp,
) -> Result<(), ExecFault> {
    let lhs = registers.get(lhs_reg)?;
    let rhs = registers.get(rhs_reg)?;
    let result = apply_binary(op, lhs, rhs)?;
    registers.set(dst, result)?;
    Ok(())
}

fn apply_binary(op: BinaryOp, lhs: i32, rhs: i32) -> Result<i32, ExecFault> {
    Ok(match op {
        BinaryOp::Disjunction => lhs | rhs,
        BinaryOp::Conjunction => lhs & rhs,
        BinaryOp::Xor => lhs ^ rhs,
        BinaryOp::Implication => !lhs | rhs,
        BinaryOp::Coimplication => lhs | !rhs,
        BinaryOp::Equivalence => (!lhs & !rhs) | (lhs & rhs),
        BinaryOp::PierceArrow => !(lhs | rhs),
        BinaryOp::ShefferStroke => !(lhs & rhs),
        BinaryOp::Addition => lhs.wrapping_add(rhs),
        BinaryOp::Subtraction => lhs.wrapping_sub(rhs),
        BinaryOp::Multiplication => lhs.wrapping_mul(rhs),
        BinaryOp::Division => {
            if rhs == 0 {
                return Err(ExecFault::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
        BinaryOp::Modulo => {
            if rhs == 0 {
                return Err(ExecFault::DivisionByZero);
            }
            lhs.wrapping_rem(rhs)
        }
        BinaryOp::ShiftLeft => lhs.wrapping_shl(shift_amount(rhs)),
        BinaryOp::ShiftRight => lhs.wrapping_shr(shift_amount(rhs)),
        BinaryOp::RotateLeft => (lhs as u32).rotate_left(rotate_amount(rhs)) as i32,
        BinaryOp::RotateRight => (lhs as u32).rotate_right(rotate_amount(rhs)) as i32,
    })
}

// Low five bits, matching native fixed-width shift semantics.
const fn shift_amount(count: i32) -> u32 {
    (count & 0x1F) as u32
}

// Euclidean remainder keeps negative counts inside 0..=31.
fn rotate_amount(count: i32) -> u32 {
    count.rem_euclid(32) as u32
}
