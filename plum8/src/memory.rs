//! 4K of byte addressable memory with the font loaded at the bottom.
//!
//! ```text
//! 0x000 - 0x04F  font glyphs
//! 0x050 - 0x1FF  reserved for the interpreter
//! 0x200 - 0xFFF  program and data
//! ```

use crate::error::Error;
use crate::font::{FONT, FONT_ADDR};

pub const MEM_LENGTH: usize = 4096;
/// Address a program image gets loaded at, and the initial pc
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_IMAGE_LENGTH: usize = MEM_LENGTH - PROGRAM_START as usize;

#[derive(Clone)]
pub struct Memory([u8; MEM_LENGTH]);

impl Memory {
    pub fn new() -> Self {
        let mut memory = Self([0; MEM_LENGTH]);
        memory.reset();
        memory
    }

    /// Zero the whole memory and rewrite the font
    pub fn reset(&mut self) {
        self.0 = [0; MEM_LENGTH];
        self.0[FONT_ADDR..FONT_ADDR + FONT.len()].copy_from_slice(&FONT);
    }

    /// Copy program image to memory from 0x200 (_start address)
    ///
    /// Callers check the image against `MAX_IMAGE_LENGTH`, bytes past the end
    /// of memory fail like any other out of range write.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), Error> {
        self.slice_mut(PROGRAM_START as usize, image.len())?
            .copy_from_slice(image);
        Ok(())
    }

    pub fn read(&self, address: usize) -> Result<u8, Error> {
        self.0
            .get(address)
            .copied()
            .ok_or(Error::AddressOutOfRange { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Error> {
        self.0
            .get_mut(address)
            .map(|byte| *byte = value)
            .ok_or(Error::AddressOutOfRange { address })
    }

    /// Read big-endian word at `pc`, this is how opcodes are stored
    pub fn read_word(&self, pc: u16) -> Result<u16, Error> {
        let at = pc as usize;
        match (self.0.get(at), self.0.get(at + 1)) {
            (Some(&hi), Some(&lo)) => Ok(u16::from(hi) << 8 | u16::from(lo)),
            _ => Err(Error::ProgramCounterOutOfRange { pc }),
        }
    }

    /// Borrow `len` bytes starting at `address`
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], Error> {
        self.0
            .get(address..address + len)
            .ok_or(Error::AddressOutOfRange { address: address + len.saturating_sub(1) })
    }

    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8], Error> {
        self.0
            .get_mut(address..address + len)
            .ok_or(Error::AddressOutOfRange { address: address + len.saturating_sub(1) })
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.0
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
