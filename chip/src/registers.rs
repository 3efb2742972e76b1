use crate::definitions::cpu::{self, register};

/// `8-bit` data registers named `V0` to `VF`, the `12-bit` index register `I` and the program
/// counter.
///
/// The `VF` register doubles as a flag for some instructions. In an addition operation, `VF` is
/// the carry flag, while in subtraction, it is the "no borrow" flag. In the draw instruction `VF`
/// is set upon pixel collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    v: [u8; register::SIZE],
    index: u16,
    program_counter: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            v: [0; register::SIZE],
            index: 0,
            program_counter: cpu::PROGRAM_COUNTER as u16,
        }
    }
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, x: usize) -> u8 {
        self.v[x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, value: u8) {
        self.v[x] = value;
    }

    /// Will write the flag register `VF`.
    #[inline]
    pub fn set_flag(&mut self, flag: bool) {
        self.v[register::LAST] = u8::from(flag);
    }

    #[inline]
    pub fn flag(&self) -> u8 {
        self.v[register::LAST]
    }

    pub fn all(&self) -> &[u8] {
        &self.v
    }

    pub fn all_mut(&mut self) -> &mut [u8] {
        &mut self.v
    }

    #[inline]
    pub fn index(&self) -> u16 {
        self.index
    }

    /// The index register is masked to its 12 bits.
    #[inline]
    pub fn set_index(&mut self, value: u16) {
        self.index = value & register::ADDRESS_MASK;
    }

    #[inline]
    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    #[inline]
    pub fn set_program_counter(&mut self, value: u16) {
        self.program_counter = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let reg = Registers::new();
        assert!(reg.all().iter().all(|v| *v == 0));
        assert_eq!(reg.index(), 0);
        assert_eq!(reg.program_counter(), 0x200);
    }

    #[test]
    fn test_flag_and_index_mask() {
        let mut reg = Registers::new();
        reg.set_flag(true);
        assert_eq!(reg.get(0xF), 1);
        reg.set_flag(false);
        assert_eq!(reg.flag(), 0);

        reg.set_index(0x1234);
        assert_eq!(reg.index(), 0x234);
    }
}
