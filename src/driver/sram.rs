//! 23-series SPI SRAM device
//!
//! [`Sram`] turns byte exchanges into addressed reads and writes. Every
//! transaction runs under one critical section with chip-select asserted for
//! its whole length:
//!
//! ```text
//! CS low → opcode → 0x00 → addr[15:8] → addr[7:0] → data → CS high
//! ```

use embedded_hal::digital::OutputPin;

use super::command::{Command, Instruction, OperatingMode};
use super::config::{SramConfig, State};
use super::error::{DeviceError, Result};
use crate::hal::interrupt::{InterruptControl, SchedulerTick};
use crate::hal::spi::{SpiRegisters, SpiTransport};
use crate::sync::CriticalSection;

/// Byte-addressable SRAM on a dedicated chip-select line
///
/// # Type Parameters
///
/// * `B` - SPI controller registers
/// * `CS` - Chip-select pin (active low)
/// * `P` - Interrupt and scheduler-tick gate shared with the critical section
///
/// # Example
///
/// ```ignore
/// let mut sram = Sram::new(Atmega644Spi::new(), SramSelect::new(), &SECTION, SramConfig::new());
/// sram.initialize()?;
///
/// sram.write(0x0010, 0xAB)?;
/// assert_eq!(sram.read(0x0010)?, 0xAB);
/// ```
#[derive(Debug)]
pub struct Sram<'cs, B, CS, P>
where
    P: InterruptControl + SchedulerTick,
{
    /// Byte exchange over the SPI controller
    transport: SpiTransport<'cs, B, P>,
    /// Chip-select pin
    cs: CS,
    /// Configuration applied at `initialize()`
    config: SramConfig,
    /// Driver state
    state: State,
}

impl<'cs, B, CS, P> Sram<'cs, B, CS, P>
where
    B: SpiRegisters,
    CS: OutputPin,
    P: InterruptControl + SchedulerTick,
{
    /// Create a driver in the `Uninitialized` state.
    ///
    /// No hardware is touched until [`initialize`](Self::initialize).
    pub fn new(bus: B, cs: CS, section: &'cs CriticalSection<P>, config: SramConfig) -> Self {
        Self {
            transport: SpiTransport::new(bus, section, config.poll_limit),
            cs,
            config,
            state: State::Uninitialized,
        }
    }

    // =========================================================================
    // State Accessors
    // =========================================================================

    /// Current driver state
    #[inline(always)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether `initialize()` has completed
    #[inline(always)]
    pub fn is_initialized(&self) -> bool {
        self.state == State::Ready
    }

    /// Configuration this driver was created with
    #[inline(always)]
    pub fn config(&self) -> &SramConfig {
        &self.config
    }

    /// Give back the SPI registers and the chip-select pin
    pub fn release(self) -> (B, CS) {
        (self.transport.release(), self.cs)
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Configure the bus and put the chip into the configured operating mode.
    ///
    /// Safe to call again; each call repeats the same register writes and
    /// mode command.
    ///
    /// # Errors
    /// - `Section(Overflow)` - nesting limit reached
    /// - `Bus(Timeout)` - poll limit exhausted
    /// - `Device(ChipSelect)` - chip-select pin failed
    pub fn initialize(&mut self) -> Result<()> {
        let section = self.transport.section();
        let _guard = section.lock()?;

        self.transport.configure(&self.config.bus);

        let header = [Instruction::WriteMode.opcode(), self.config.mode.bits()];
        self.transaction(&header, |_| Ok(()))?;

        self.state = State::Ready;

        #[cfg(feature = "defmt")]
        defmt::debug!("SRAM initialized: {}", self.config);

        Ok(())
    }

    // =========================================================================
    // Data Access
    // =========================================================================

    /// Read the byte at `address`.
    ///
    /// # Errors
    /// - `Device(NotInitialized)` - `initialize()` has not run
    /// - `Device(ChipSelect)` - chip-select pin failed
    /// - `Bus(Timeout)` - poll limit exhausted
    /// - `Section(Overflow)` - nesting limit reached
    pub fn read(&mut self, address: u16) -> Result<u8> {
        self.ensure_ready()?;

        let value = self.transaction(&Command::read(address).header(), |transport| {
            transport.receive()
        })?;

        #[cfg(feature = "defmt")]
        defmt::trace!("SRAM read {=u16:#x} -> {=u8:#x}", address, value);

        Ok(value)
    }

    /// Write `value` to `address`.
    ///
    /// # Errors
    /// - `Device(NotInitialized)` - `initialize()` has not run
    /// - `Device(ChipSelect)` - chip-select pin failed
    /// - `Bus(Timeout)` - poll limit exhausted
    /// - `Section(Overflow)` - nesting limit reached
    pub fn write(&mut self, address: u16, value: u8) -> Result<()> {
        self.ensure_ready()?;

        self.transaction(&Command::write(address).header(), |transport| {
            transport.send(value)
        })?;

        #[cfg(feature = "defmt")]
        defmt::trace!("SRAM write {=u16:#x} <- {=u8:#x}", address, value);

        Ok(())
    }

    /// Read the chip's mode register.
    ///
    /// Works before `initialize()`; the chip powers up in sequential mode.
    ///
    /// # Errors
    /// - `Device(InvalidMode)` - register holds the reserved pattern
    /// - `Device(ChipSelect)` - chip-select pin failed
    /// - `Bus(Timeout)` - poll limit exhausted
    /// - `Section(Overflow)` - nesting limit reached
    pub fn read_mode(&mut self) -> Result<OperatingMode> {
        let raw = self.transaction(&[Instruction::ReadMode.opcode()], |transport| {
            transport.receive()
        })?;

        OperatingMode::from_register(raw).ok_or_else(|| {
            #[cfg(feature = "defmt")]
            defmt::warn!("SRAM mode register reads {=u8:#x}", raw);
            DeviceError::InvalidMode.into()
        })
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn ensure_ready(&self) -> Result<()> {
        if self.state != State::Ready {
            return Err(DeviceError::NotInitialized.into());
        }
        Ok(())
    }

    /// Run one chip-select framed transaction: send `header`, then `body`.
    ///
    /// Chip-select is driven high again on every path out.
    fn transaction<R, F>(&mut self, header: &[u8], body: F) -> Result<R>
    where
        F: FnOnce(&mut SpiTransport<'cs, B, P>) -> Result<R>,
    {
        let section = self.transport.section();
        let _guard = section.lock()?;

        if let Err(e) = self.select() {
            let _ = self.deselect();
            return Err(e);
        }

        let result = Self::frame(&mut self.transport, header, body);
        let deselected = self.deselect();

        let value = result?;
        deselected?;
        Ok(value)
    }

    fn frame<R, F>(transport: &mut SpiTransport<'cs, B, P>, header: &[u8], body: F) -> Result<R>
    where
        F: FnOnce(&mut SpiTransport<'cs, B, P>) -> Result<R>,
    {
        for &byte in header {
            transport.send(byte)?;
        }
        body(transport)
    }

    fn select(&mut self) -> Result<()> {
        self.cs.set_low().map_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "chip-select assert failed: {}",
                embedded_hal::digital::Error::kind(&_e)
            );
            DeviceError::ChipSelect.into()
        })
    }

    fn deselect(&mut self) -> Result<()> {
        self.cs.set_high().map_err(|_e| {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "chip-select release failed: {}",
                embedded_hal::digital::Error::kind(&_e)
            );
            DeviceError::ChipSelect.into()
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
