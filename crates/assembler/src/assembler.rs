//! Top-level line-by-line assembly pipeline.
//!
//! Assembly is all-or-nothing: the first failing line aborts the whole
//! pass with an error naming that line, and no partial program is
//! produced. Successful lines encode to 32-bit words appended in source
//! order, little-endian, to the output stream.

use machine_core::{pack_word, PackError};

use crate::parser::{parse_line, ParseError};

/// Fatal assembly failure with the offending source line attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleError {
    /// 1-indexed line number of the offending line.
    pub line: usize,
    /// Original text of the offending line.
    pub source: String,
    /// Underlying cause.
    pub kind: AssembleErrorKind,
}

/// Classification of assembly failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleErrorKind {
    /// Mnemonic or operand token failed to parse.
    Parse(ParseError),
    /// Parsed field failed the codec's range check.
    Encode(PackError),
}

impl std::fmt::Display for AssembleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: `{}`: {}", self.line, self.source, self.kind)
    }
}

impl std::fmt::Display for AssembleErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::Encode(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AssembleError {}

/// Assembles source text into a binary instruction stream.
///
/// Blank lines and `//` comment lines are skipped. Output is
/// deterministic: the same source always yields a byte-identical stream.
///
/// # Errors
///
/// Returns an [`AssembleError`] carrying the first offending line's number
/// and text, for an unknown mnemonic, a malformed operand, or a field
/// outside its encodable range.
pub fn assemble(source: &str) -> Result<Vec<u8>, AssembleError> {
    let mut binary = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let parsed = parse_line(line).map_err(|e| AssembleError {
            line: index + 1,
            source: line.to_owned(),
            kind: AssembleErrorKind::Parse(e),
        })?;

        let Some(instruction) = parsed else {
            continue;
        };

        let word = pack_word(
            i32::from(instruction.operation.opcode()),
            instruction.operand1,
            instruction.operand2,
            instruction.operand3,
        )
        .map_err(|e| AssembleError {
            line: index + 1,
            source: line.to_owned(),
            kind: AssembleErrorKind::Encode(e),
        })?;

        binary.extend_from_slice(&word.to_le_bytes());
    }

    Ok(binary)
}
