//! Core register machine for the Straightline toolchain.

/// Instruction word codec and the closed operation table.
pub mod encoding;
pub use encoding::{
    pack_word, unpack_word, OperandPattern, Operation, PackError, RawInstruction, OPCODE_MAX,
    OPERAND1_SHIFT, OPERAND2_SHIFT, OPERAND3_SHIFT, OPERAND_MAX, OPERATION_COUNT, WORD_BYTES,
};

/// Architectural machine state model.
pub mod state;
pub use state::{RegisterError, RegisterFile, REGISTER_COUNT};

/// Recoverable run-time fault taxonomy.
pub mod fault;
pub use fault::ExecFault;

/// Positional numeral formatting and parsing for bases 2 through 36.
pub mod radix;
pub use radix::{format_in_base, parse_in_base, MAX_BASE, MIN_BASE};

/// Host-facing collaborator ports and scripted implementations.
pub mod api;
pub use api::{CancelledInput, DiscardProgress, InputPort, ProgressSink, ScriptedInput};

/// Instruction dispatch and execution.
pub mod execute;
pub use execute::run;

/// Word-level disassembly for listings and diagnostics.
pub mod disasm;
pub use disasm::disassemble_word;

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
