//! Straightline assembler library.

use machine_core as _;
#[cfg(test)]
use tempfile as _;

/// Top-level line-by-line assembly pipeline.
pub mod assembler;
/// Source line parsing for mnemonics and operands.
pub mod parser;
