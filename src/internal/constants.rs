//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers used
//! throughout the SRAM driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Critical sections**: nesting limits
//! - **SRAM framing**: fixed bytes of the command header
//! - **Address space**: size of the 16-bit window this driver addresses
//!
//! # Note
//!
//! Hardware register addresses and bit definitions remain in
//! `internal/register/` as they are specific to one MCU.

// =============================================================================
// Critical Sections
// =============================================================================

/// Deepest legal critical-section nesting (the counter is a `u8`)
pub const MAX_NESTING_DEPTH: u8 = u8::MAX;

// =============================================================================
// SRAM Command Framing
// =============================================================================

/// Byte clocked out when only the reply matters
pub const DUMMY_BYTE: u8 = 0xFF;

/// Fixed byte sent between the op-code and the 16-bit address
///
/// On the 23LC1024 this is address bits A23:A16. It stays 0, so the driver
/// only reaches the lowest 64 KiB.
pub const RESERVED_ADDRESS_BYTE: u8 = 0x00;

/// Number of header bytes (op-code, reserved byte, address high, address low)
pub const COMMAND_HEADER_LEN: usize = 4;

// =============================================================================
// Address Space
// =============================================================================

/// Bytes addressable through a `u16` address
pub const ADDRESS_SPACE_SIZE: usize = 1 << 16;

/// Mask of the mode bits in the SRAM mode register (bits 7:6)
pub const MODE_REGISTER_MASK: u8 = 0b1100_0000;
