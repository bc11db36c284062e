/// Bounds-checked register file model.
pub mod registers;

pub use registers::{RegisterError, RegisterFile, REGISTER_COUNT};
