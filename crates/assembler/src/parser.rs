//! Source line parser for Straightline assembly.
//!
//! Each non-blank, non-comment line is one instruction: a case-sensitive
//! mnemonic followed by operand tokens separated by spaces and/or commas.
//! Which tokens are registers and which are literal numeric bases is fixed
//! by the mnemonic's operand pattern; missing trailing operands default
//! their slot to zero, and tokens beyond the pattern are ignored.

use machine_core::{OperandPattern, Operation, OPERAND_MAX};

/// A parsed instruction ready for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedInstruction {
    /// The resolved operation.
    pub operation: Operation,
    /// First operand field value.
    pub operand1: i32,
    /// Second operand field value.
    pub operand2: i32,
    /// Third operand field value.
    pub operand3: i32,
}

/// Classification of line parse failures. All are fatal to assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// First token does not name a known mnemonic.
    UnknownOpcode(String),
    /// Register token with a malformed or out-of-range index.
    InvalidRegister(String),
    /// Token that does not parse in its expected operand role.
    OperandParseFailure(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOpcode(token) => write!(f, "unknown opcode: {token}"),
            Self::InvalidRegister(token) => write!(f, "invalid register: {token}"),
            Self::OperandParseFailure(token) => write!(f, "invalid operand: {token}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses one source line.
///
/// Returns `Ok(None)` for blank lines and `//` comment lines.
///
/// # Errors
///
/// Returns a [`ParseError`] for an unknown mnemonic or a malformed
/// operand token.
pub fn parse_line(line: &str) -> Result<Option<ParsedInstruction>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") {
        return Ok(None);
    }

    let tokens = tokenize(trimmed);
    let Some((mnemonic, operands)) = tokens.split_first() else {
        // Separator-only lines have no mnemonic token.
        return Err(ParseError::OperandParseFailure(trimmed.to_owned()));
    };

    let operation = Operation::from_mnemonic(mnemonic)
        .ok_or_else(|| ParseError::UnknownOpcode(mnemonic.clone()))?;

    let (operand1, operand2, operand3) = parse_operands(operation.operand_pattern(), operands)?;

    Ok(Some(ParsedInstruction {
        operation,
        operand1,
        operand2,
        operand3,
    }))
}

fn tokenize(text: &str) -> Vec<String> {
    text.split([' ', ','])
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_operands(
    pattern: OperandPattern,
    tokens: &[String],
) -> Result<(i32, i32, i32), ParseError> {
    let mut operand1 = 0;
    let mut operand2 = 0;
    let mut operand3 = 0;

    match pattern {
        OperandPattern::BaseOnly => {
            if let Some(token) = tokens.first() {
                operand1 = parse_literal(token)?;
            }
        }
        OperandPattern::RegBase => {
            if let Some(token) = tokens.first() {
                operand1 = parse_register(token)?;
            }
            if let Some(token) = tokens.get(1) {
                operand2 = parse_literal(token)?;
            }
        }
        OperandPattern::RegToReg => {
            if let Some(token) = tokens.first() {
                operand1 = parse_register(token)?;
            }
            if let Some(token) = tokens.get(1) {
                operand3 = parse_register(token)?;
            }
        }
        OperandPattern::RegPair => {
            if let Some(token) = tokens.first() {
                operand1 = parse_register(token)?;
            }
            if let Some(token) = tokens.get(1) {
                operand2 = parse_register(token)?;
            }
        }
        OperandPattern::RegTriple => {
            if let Some(token) = tokens.first() {
                operand1 = parse_register(token)?;
            }
            if let Some(token) = tokens.get(1) {
                operand2 = parse_register(token)?;
            }
            if let Some(token) = tokens.get(2) {
                operand3 = parse_register(token)?;
            }
        }
    }

    Ok((operand1, operand2, operand3))
}

fn parse_register(token: &str) -> Result<i32, ParseError> {
    let index = token
        .strip_prefix(['R', 'r'])
        .ok_or_else(|| ParseError::OperandParseFailure(token.to_owned()))?;

    let index: i32 = index
        .parse()
        .map_err(|_| ParseError::InvalidRegister(token.to_owned()))?;

    if (0..=OPERAND_MAX).contains(&index) {
        Ok(index)
    } else {
        Err(ParseError::InvalidRegister(token.to_owned()))
    }
}

fn parse_literal(token: &str) -> Result<i32, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::OperandParseFailure(token.to_owned()))
}
