//! Recoverable run-time fault taxonomy.
//!
//! Every fault raised inside an instruction handler is converted by the
//! run loop into one appended output line; the faulting instruction
//! performs no register mutation and execution continues with the next
//! word. A run therefore never fails as a whole.

use thiserror::Error;

use crate::state::RegisterError;

/// Faults recoverable at an instruction boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecFault {
    /// Decoded opcode value with no assigned operation.
    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),
    /// Numeric base outside the supported formatting range.
    #[error("invalid base {0} (expected 2-36)")]
    InvalidBase(u16),
    /// Division or modulo with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,
    /// Byte index register value outside a 32-bit word.
    #[error("byte index {0} out of range (0-3)")]
    ByteIndexOutOfRange(i32),
    /// Byte value register value that does not fit one byte.
    #[error("byte value {0} out of range (0-255)")]
    ByteValueOutOfRange(i32),
    /// Interactive input text that does not parse in the requested base.
    #[error("invalid input {0:?}")]
    InvalidInput(String),
    /// Register access outside the bank (host-driven access only).
    #[error(transparent)]
    Register(#[from] RegisterError),
    /// Program stream ended in the middle of an instruction word.
    #[error("truncated instruction word ({0} trailing bytes)")]
    TruncatedWord(usize),
}

#[cfg(test)]
mod tests {
    use super::ExecFault;
    use crate::state::RegisterError;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(ExecFault::UnknownOpcode(27).to_string(), "unknown opcode 27");
        assert_eq!(
            ExecFault::InvalidBase(1).to_string(),
            "invalid base 1 (expected 2-36)"
        );
        assert_eq!(
            ExecFault::ByteIndexOutOfRange(4).to_string(),
            "byte index 4 out of range (0-3)"
        );
        assert_eq!(
            ExecFault::ByteValueOutOfRange(300).to_string(),
            "byte value 300 out of range (0-255)"
        );
        assert_eq!(
            ExecFault::InvalidInput("abc".to_string()).to_string(),
            "invalid input \"abc\""
        );
    }

    #[test]
    fn register_faults_pass_through_transparently() {
        let fault = ExecFault::from(RegisterError::IndexOutOfRange(600));
        assert_eq!(fault.to_string(), "register index 600 out of range (0-511)");
    }
}
