use util::EnumFromStr;
use util_derive::EnumFromStr;

/// Identifies one of the nine COMET II registers.
///
/// `GR0`..`GR7` are the general registers addressable from assembly; `GR8` is the
/// stack pointer `SP`, which instructions only ever touch implicitly (`PUSH`, `POP`,
/// `CALL`, `RET`, `RPUSH`, `RPOP`).
///
/// # Examples
/// ```
/// use std::str::FromStr;
/// use comet2::RegisterId;
///
/// assert_eq!(RegisterId::from_str("GR3"), Ok(RegisterId::GR3));
/// assert_eq!(RegisterId::GR3.index(), 3);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromStr)]
pub enum RegisterId {
    GR0,
    GR1,
    GR2,
    GR3,
    GR4,
    GR5,
    GR6,
    GR7,
    GR8,
}

/// Number of hardware registers, `GR0`..`GR8` inclusive.
pub const REGISTER_COUNT: usize = 9;

/// Index of the stack pointer within the register file.
pub const SP_INDEX: usize = 8;

impl RegisterId {
    /// The general-purpose registers a `RADRX`/`R1R2` operand can name (`GR0`..`GR7`).
    pub const GENERAL: [RegisterId; 8] = [
        RegisterId::GR0,
        RegisterId::GR1,
        RegisterId::GR2,
        RegisterId::GR3,
        RegisterId::GR4,
        RegisterId::GR5,
        RegisterId::GR6,
        RegisterId::GR7,
    ];

    /// Builds a `RegisterId` from a register-file index (`0..=8`).
    ///
    /// # Panics
    /// Panics if `index > 8`.
    pub fn from_index(index: u8) -> RegisterId {
        match index {
            0 => RegisterId::GR0,
            1 => RegisterId::GR1,
            2 => RegisterId::GR2,
            3 => RegisterId::GR3,
            4 => RegisterId::GR4,
            5 => RegisterId::GR5,
            6 => RegisterId::GR6,
            7 => RegisterId::GR7,
            8 => RegisterId::GR8,
            _ => panic!("register index {} out of range", index),
        }
    }

    /// Index of this register within the register file.
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// The nine-word register file: `GR0`..`GR7` plus `SP` aliased at index 8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registers {
    gr: [u16; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Registers {
        let mut gr = [0u16; REGISTER_COUNT];
        gr[SP_INDEX] = crate::constants::INITIAL_SP;
        Registers { gr }
    }

    pub fn get(&self, id: RegisterId) -> u16 {
        self.gr[id.index() as usize]
    }

    pub fn set(&mut self, id: RegisterId, value: u16) {
        self.gr[id.index() as usize] = value;
    }

    pub fn sp(&self) -> u16 {
        self.gr[SP_INDEX]
    }

    pub fn set_sp(&mut self, value: u16) {
        self.gr[SP_INDEX] = value;
    }
}

impl Default for Registers {
    fn default() -> Registers {
        Registers::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sp_aliases_gr8() {
        let mut regs = Registers::new();
        regs.set(RegisterId::GR8, 0x1234);
        assert_eq!(regs.sp(), 0x1234);
        regs.set_sp(0x4321);
        assert_eq!(regs.get(RegisterId::GR8), 0x4321);
    }

    #[test]
    fn initializes_sp_to_high_memory() {
        assert_eq!(Registers::new().sp(), crate::constants::INITIAL_SP);
    }
}
