//! Hardware Abstraction Layer
//!
//! This module defines the seams between the driver and the hardware it
//! touches, plus the byte-exchange transport built on top of them.
//!
//! # Modules
//!
//! - [`interrupt`]: global interrupt-enable and scheduler-tick gates
//! - [`spi`]: SPI controller registers and the byte-exchange transport
//!
//! # Chip Select
//!
//! The chip-select line is any `embedded_hal::digital::OutputPin`. It is
//! driven low to select the SRAM.

pub mod interrupt;
pub mod spi;

// Re-export commonly used types
pub use interrupt::{InterruptControl, InterruptMask, SchedulerTick};
pub use spi::{SpiRegisters, SpiTransport};
