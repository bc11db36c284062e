//! The machine's only mutable state: a fixed bank of signed 32-bit slots.

use thiserror::Error;

/// Number of architecturally visible registers (`R0..R511`).
pub const REGISTER_COUNT: usize = 512;

/// Access to an index beyond the register bank.
///
/// Unreachable through decoded instruction words, whose 9-bit operand
/// fields cover exactly the valid index range; reachable only from
/// host-driven access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RegisterError {
    /// Index at or beyond [`REGISTER_COUNT`].
    #[error("register index {0} out of range (0-511)")]
    IndexOutOfRange(usize),
}

/// Fixed bank of 512 signed 32-bit registers.
///
/// Owned exclusively by one run at a time; the driver clears it before
/// every run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    #[cfg_attr(feature = "serde", serde(with = "serde_slots"))]
    slots: [i32; REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file with every slot zeroed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [0; REGISTER_COUNT],
        }
    }

    /// Reads one register.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::IndexOutOfRange`] when `index` is at or
    /// beyond [`REGISTER_COUNT`].
    pub const fn get(&self, index: usize) -> Result<i32, RegisterError> {
        if index < REGISTER_COUNT {
            Ok(self.slots[index])
        } else {
            Err(RegisterError::IndexOutOfRange(index))
        }
    }

    /// Overwrites one register.
    ///
    /// # Errors
    ///
    /// Returns [`RegisterError::IndexOutOfRange`] when `index` is at or
    /// beyond [`REGISTER_COUNT`].
    pub const fn set(&mut self, index: usize, value: i32) -> Result<(), RegisterError> {
        if index < REGISTER_COUNT {
            self.slots[index] = value;
            Ok(())
        } else {
            Err(RegisterError::IndexOutOfRange(index))
        }
    }

    /// Read-only view of every slot, for bulk printing.
    #[must_use]
    pub const fn all(&self) -> &[i32; REGISTER_COUNT] {
        &self.slots
    }

    /// Resets every slot to zero.
    pub fn clear(&mut self) {
        self.slots = [0; REGISTER_COUNT];
    }
}

#[cfg(feature = "serde")]
mod serde_slots {
    //! Fixed-length slot array as a plain sequence on the wire.

    use super::REGISTER_COUNT;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        slots: &[i32; REGISTER_COUNT],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(slots.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[i32; REGISTER_COUNT], D::Error> {
        let values = Vec::<i32>::deserialize(deserializer)?;
        let len = values.len();
        values
            .try_into()
            .map_err(|_| D::Error::invalid_length(len, &"exactly 512 register slots"))
    }
}
