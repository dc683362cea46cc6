//! ATmega644 backend (23LC1024 SRAM on the hardware SPI port).
//!
//! This module binds the driver's hardware traits to the ATmega644's
//! memory-mapped registers:
//!
//! - [`Atmega644Gate`]: `SREG.I` and the Timer2 compare A interrupt that
//!   drives the scheduler tick, reachable only through [`SECTION`]
//! - [`Atmega644Spi`]: the SPI controller (`SPCR`, `SPSR`, `SPDR`)
//! - [`SramSelect`]: the SRAM's chip-select on PB4
//!
//! # Example
//!
//! ```ignore
//! use spi_sram::boards::atmega644::{Atmega644, Atmega644Spi, SECTION, SramSelect};
//! use spi_sram::Sram;
//!
//! let mut sram = Sram::new(
//!     Atmega644Spi::new(),
//!     SramSelect::new(),
//!     &SECTION,
//!     Atmega644::sram_config(),
//! );
//! sram.initialize()?;
//! ```

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal::spi::{Phase, Polarity};

use crate::driver::config::{BitOrder, BusConfig, ClockDivider, SramConfig};
use crate::hal::interrupt::{InterruptControl, SchedulerTick};
use crate::hal::spi::SpiRegisters;
use crate::sync::CriticalSection;
use crate::internal::register::atmega644::{
    CpuRegs, PortBRegs, SPCR_CPHA, SPCR_CPOL, SPCR_DORD, SPCR_MSTR, SPCR_SPE, SPCR_SPR_MASK,
    SPSR_SPI2X, SpiRegs,
};

/// ATmega644 board constants and helpers.
pub struct Atmega644;

impl Atmega644 {
    // =========================================================================
    // SPI Pins (Port B)
    // =========================================================================

    /// SRAM chip select (SS)
    pub const SS_PIN: u8 = 4;

    /// Master out, slave in
    pub const MOSI_PIN: u8 = 5;

    /// Master in, slave out (pulled up)
    pub const MISO_PIN: u8 = 6;

    /// Serial clock
    pub const SCK_PIN: u8 = 7;

    // =========================================================================
    // Board Identification
    // =========================================================================

    /// MCU name.
    pub const MCU_NAME: &'static str = "ATmega644";

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Return the default SRAM configuration for this board.
    ///
    /// SPI mode 0, MSB first, f_osc/2, byte operating mode.
    #[must_use]
    pub const fn sram_config() -> SramConfig {
        SramConfig::new()
    }
}

// =============================================================================
// Register Encoding
// =============================================================================

/// `SPR1:0` and `SPI2X` for a clock divider
const fn clock_bits(clock: ClockDivider) -> (u8, bool) {
    match clock {
        ClockDivider::Div2 => (0b00, true),
        ClockDivider::Div4 => (0b00, false),
        ClockDivider::Div8 => (0b01, true),
        ClockDivider::Div16 => (0b01, false),
        ClockDivider::Div32 => (0b10, true),
        ClockDivider::Div64 => (0b10, false),
        ClockDivider::Div128 => (0b11, false),
    }
}

/// SPI control register value for a bus configuration.
///
/// Always enables the controller as master with the SPI interrupt off.
#[must_use]
pub const fn spcr_value(config: &BusConfig) -> u8 {
    let mut value = SPCR_SPE | SPCR_MSTR;

    if matches!(config.bit_order, BitOrder::LsbFirst) {
        value |= SPCR_DORD;
    }
    if matches!(config.mode.polarity, Polarity::IdleHigh) {
        value |= SPCR_CPOL;
    }
    if matches!(config.mode.phase, Phase::CaptureOnSecondTransition) {
        value |= SPCR_CPHA;
    }

    let (spr, _) = clock_bits(config.clock);
    value | (spr & SPCR_SPR_MASK)
}

/// SPI status register bits to set for a bus configuration (only `SPI2X`).
#[must_use]
pub const fn spsr_value(config: &BusConfig) -> u8 {
    match clock_bits(config.clock) {
        (_, true) => SPSR_SPI2X,
        (_, false) => 0,
    }
}

// =============================================================================
// Interrupt Gate
// =============================================================================

/// Global interrupt enable and scheduler tick gate
///
/// Not constructible outside this module; the only instance lives in
/// [`SECTION`], so a single nesting counter drives `TIMSK2`.
#[derive(Debug)]
pub struct Atmega644Gate {
    _private: (),
}

/// The board's critical section, shared by mainline code and interrupt
/// handlers.
pub static SECTION: CriticalSection<Atmega644Gate> =
    CriticalSection::new(Atmega644Gate { _private: () });

impl InterruptControl for Atmega644Gate {
    #[inline(always)]
    fn interrupts_enabled(&self) -> bool {
        CpuRegs::interrupts_enabled()
    }

    #[inline(always)]
    fn disable_interrupts(&self) {
        CpuRegs::disable_interrupts();
    }

    #[inline(always)]
    fn enable_interrupts(&self) {
        CpuRegs::enable_interrupts();
    }
}

impl SchedulerTick for Atmega644Gate {
    #[inline(always)]
    fn set_tick_enabled(&self, enabled: bool) {
        if enabled {
            CpuRegs::enable_tick();
        } else {
            CpuRegs::disable_tick();
        }
    }
}

// =============================================================================
// SPI Controller
// =============================================================================

/// Hardware SPI controller in master mode
#[derive(Debug, Default)]
pub struct Atmega644Spi {
    _private: (),
}

impl Atmega644Spi {
    /// Create the controller handle. Registers are untouched until
    /// [`SpiRegisters::configure`].
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Whether the controller is enabled (`SPCR.SPE`)
    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        SpiRegs::control() & SPCR_SPE != 0
    }
}

impl SpiRegisters for Atmega644Spi {
    fn configure(&mut self, config: &BusConfig) {
        PortBRegs::configure_spi_pins();
        // SS low would drop the controller out of master mode
        PortBRegs::ss_high();

        SpiRegs::set_control(spcr_value(config));
        SpiRegs::set_status((SpiRegs::status() & !SPSR_SPI2X) | spsr_value(config));

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "SPI configured: SPCR={=u8:#x} SPSR={=u8:#x}",
            SpiRegs::control(),
            SpiRegs::status()
        );
    }

    #[inline(always)]
    fn write_data(&mut self, byte: u8) {
        SpiRegs::set_data(byte);
    }

    #[inline(always)]
    fn transfer_complete(&self) -> bool {
        SpiRegs::transfer_complete()
    }

    #[inline(always)]
    fn read_data(&mut self) -> u8 {
        SpiRegs::data()
    }
}

// =============================================================================
// Chip Select
// =============================================================================

/// SRAM chip-select on PB4 (active low)
#[derive(Debug, Default)]
pub struct SramSelect {
    _private: (),
}

impl SramSelect {
    /// Create the pin handle. Direction is set by [`SpiRegisters::configure`].
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl ErrorType for SramSelect {
    type Error = Infallible;
}

impl OutputPin for SramSelect {
    #[inline(always)]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        PortBRegs::ss_low();
        Ok(())
    }

    #[inline(always)]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        PortBRegs::ss_high();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
