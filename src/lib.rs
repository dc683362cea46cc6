//! Serial SRAM Driver
//!
//! A `no_std`, `no_alloc` Rust driver for 23-series SPI SRAM chips, with the
//! nestable, scheduler-aware critical section that makes each transaction
//! atomic.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Sync Layer** ([`sync`]): [`CriticalSection`] nesting counter gating the
//!    scheduler tick
//! 2. **HAL Layer** ([`hal`]): interrupt and tick gates, SPI registers, and the
//!    byte-exchange [`SpiTransport`]
//! 3. **Device Layer** ([`driver`]): [`Sram`] with addressed read and write
//!
//! Hardware is reached only through the traits in [`hal`], so the same driver
//! runs against real registers ([`boards`]) or a simulated bus in host tests.
//!
//! ## Transaction Framing
//!
//! ```text
//! enter section
//!   CS low
//!     opcode (0x03 read / 0x02 write), 0x00, addr high, addr low
//!     data byte
//!   CS high
//! leave section
//! ```
//!
//! # Features
//!
//! - `atmega644` (default): Register-level backend for the ATmega644
//! - `defmt`: Enable defmt logging and formatting for public types
//!
//! # Example
//!
//! ```ignore
//! use spi_sram::boards::atmega644::{Atmega644Spi, SECTION, SramSelect};
//! use spi_sram::{Sram, SramConfig};
//!
//! // One section per system, shared by reference
//! let mut sram = Sram::new(
//!     Atmega644Spi::new(),
//!     SramSelect::new(),
//!     &SECTION,
//!     SramConfig::new(),
//! );
//!
//! sram.initialize()?;
//! sram.write(0x0010, 0xAB)?;
//! assert_eq!(sram.read(0x0010)?, 0xAB);
//! ```
//!
//! # Error Handling
//!
//! Nesting overflow is the only fatal error; check [`Error::is_fatal`] and
//! halt or reset. Everything else leaves the driver usable.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

#[cfg(feature = "atmega644")]
#[cfg_attr(docsrs, doc(cfg(feature = "atmega644")))]
pub mod boards;
pub mod driver;
pub mod hal;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::command::{Command, Instruction, OperatingMode};
pub use driver::config::{BitOrder, BusConfig, ClockDivider, PollLimit, SramConfig, State};
pub use driver::error::{
    BusError, BusResult, DeviceError, DeviceResult, Error, Result, SectionError, SectionResult,
};
pub use driver::sram::Sram;
pub use hal::interrupt::{InterruptControl, InterruptMask, SchedulerTick};
pub use hal::spi::{SpiRegisters, SpiTransport};
pub use sync::{CriticalSection, SectionGuard};

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types.
pub mod constants {
    pub use crate::internal::constants::{
        // Addressing
        ADDRESS_SPACE_SIZE,
        COMMAND_HEADER_LEN,
        // Bus
        DUMMY_BYTE,
        // Nesting
        MAX_NESTING_DEPTH,
        MODE_REGISTER_MASK,
        RESERVED_ADDRESS_BYTE,
    };
}
