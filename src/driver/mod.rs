//! Core driver components for a 23-series SPI SRAM.
//!
//! This module contains the building blocks for configuring the bus and
//! talking to the chip:
//!
//! - [`command`] - Instruction opcodes, operating modes, command framing
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`sram`] - The SRAM device driver
//!
//! # Example
//!
//! ```ignore
//! use spi_sram::driver::{ClockDivider, BusConfig, SramConfig, Sram};
//!
//! let config = SramConfig::new()
//!     .with_bus(BusConfig::new().with_clock(ClockDivider::Div4));
//! ```

// Submodules
pub mod command;
pub mod config;
pub mod error;
pub mod sram;

// Re-exports for convenience
pub use command::{Command, Instruction, OperatingMode};
pub use config::{BitOrder, BusConfig, ClockDivider, PollLimit, SramConfig, State};
pub use error::{
    BusError, BusResult, DeviceError, DeviceResult, Error, Result, SectionError, SectionResult,
};
pub use sram::Sram;
