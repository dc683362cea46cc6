//! 23-series SRAM command framing
//!
//! Every transaction starts with a four byte header: the op-code, a fixed
//! reserved byte, then the 16-bit address high byte first. Data follows the
//! header in the same chip-select window.

use crate::internal::constants::{
    COMMAND_HEADER_LEN, MODE_REGISTER_MASK, RESERVED_ADDRESS_BYTE,
};

/// SRAM op-codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Instruction {
    /// Write the mode register
    WriteMode = 0x01,
    /// Write data to memory
    Write = 0x02,
    /// Read data from memory
    Read = 0x03,
    /// Read the mode register
    ReadMode = 0x05,
}

impl Instruction {
    /// Op-code byte
    #[inline(always)]
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

/// SRAM operating modes (mode register bits 7:6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OperatingMode {
    /// One byte per transaction
    #[default]
    Byte = 0b0000_0000,
    /// Whole array accessible, address auto-increments
    Sequential = 0b0100_0000,
    /// Address auto-increments within a 32-byte page
    Page = 0b1000_0000,
}

impl OperatingMode {
    /// Mode register value
    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a mode register read-back
    ///
    /// Bits outside 7:6 are ignored. Returns `None` for the reserved `0b11`
    /// pattern.
    pub const fn from_register(value: u8) -> Option<Self> {
        match value & MODE_REGISTER_MASK {
            0b0000_0000 => Some(OperatingMode::Byte),
            0b0100_0000 => Some(OperatingMode::Sequential),
            0b1000_0000 => Some(OperatingMode::Page),
            _ => None,
        }
    }
}

/// An addressed memory command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Operation performed
    pub instruction: Instruction,
    /// Target address
    pub address: u16,
}

impl Command {
    /// Read one byte at `address`
    pub const fn read(address: u16) -> Self {
        Self {
            instruction: Instruction::Read,
            address,
        }
    }

    /// Write one byte at `address`
    pub const fn write(address: u16) -> Self {
        Self {
            instruction: Instruction::Write,
            address,
        }
    }

    /// Header bytes in wire order
    pub const fn header(&self) -> [u8; COMMAND_HEADER_LEN] {
        let [high, low] = self.address.to_be_bytes();
        [self.instruction.opcode(), RESERVED_ADDRESS_BYTE, high, low]
    }
}
