//! The 4 KiB address space of the machine.
use crate::{
    definitions::{cpu, display::fontset, memory},
    error::MemoryError,
    opcode::{self, Opcode},
};

/// - `0x000-0x1FF` - Chip 8 interpreter (contains font set in emu)
/// - `0x050-0x09F` - Used for the built in `4x5` pixel font set (`0-F`)
/// - `0x200-0xFFF` - Program ROM and work RAM
#[derive(Clone)]
pub struct Memory {
    data: Box<[u8; memory::SIZE]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Will create zeroed memory with the font set loaded.
    pub fn new() -> Self {
        let mut data = Box::new([0; memory::SIZE]);
        data[fontset::LOCATION..(fontset::LOCATION + fontset::FONTSET.len())]
            .copy_from_slice(&fontset::FONTSET);
        Self { data }
    }

    /// Will write the program into the program area starting at `0x200`.
    /// Programs that do not fit are rejected as a whole.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), MemoryError> {
        if program.len() > cpu::PROGRAM_SIZE {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                max: cpu::PROGRAM_SIZE,
            });
        }
        self.data[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + program.len())]
            .copy_from_slice(program);
        Ok(())
    }

    /// Will build the opcode stored at the given address.
    pub fn opcode(&self, address: usize) -> Result<Opcode, MemoryError> {
        opcode::build_opcode(&self.data[..], address)
    }

    pub fn read(&self, address: usize) -> Result<u8, MemoryError> {
        self.data
            .get(address)
            .copied()
            .ok_or(MemoryError::AddressOutOfRange { address, len: 1 })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), MemoryError> {
        let cell = self
            .data
            .get_mut(address)
            .ok_or(MemoryError::AddressOutOfRange { address, len: 1 })?;
        *cell = value;
        Ok(())
    }

    /// Will return `len` bytes starting at `address`.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], MemoryError> {
        Self::check(address, len)?;
        Ok(&self.data[address..(address + len)])
    }

    /// Will return `len` mutable bytes starting at `address`.
    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8], MemoryError> {
        Self::check(address, len)?;
        Ok(&mut self.data[address..(address + len)])
    }

    /// The full raw address space.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..]
    }

    fn check(address: usize, len: usize) -> Result<(), MemoryError> {
        match address.checked_add(len) {
            Some(end) if end <= memory::SIZE => Ok(()),
            _ => Err(MemoryError::AddressOutOfRange { address, len }),
        }
    }
}
