//! SPI byte-exchange transport
//!
//! This module provides the single primitive the SRAM protocol is built on:
//! shift one byte out, spin until the controller reports the transfer done,
//! and return the byte that was shifted in at the same time. A pure receive
//! is an exchange of [`DUMMY_BYTE`].

use crate::driver::config::{BusConfig, PollLimit};
use crate::driver::error::{BusError, Result};
use crate::hal::interrupt::{InterruptControl, SchedulerTick};
use crate::internal::constants::DUMMY_BYTE;
use crate::sync::CriticalSection;

// =============================================================================
// SPI Register Trait
// =============================================================================

/// Trait for the SPI controller registers
///
/// This trait can be implemented by different backends, allowing the
/// transport to run against real registers or a simulated bus.
pub trait SpiRegisters {
    /// One-time setup of pin directions, mode, clock polarity and rate
    fn configure(&mut self, config: &BusConfig);

    /// Load the data register, starting a transfer
    fn write_data(&mut self, byte: u8);

    /// Whether the last transfer has completed
    fn transfer_complete(&self) -> bool;

    /// Read the byte shifted in by the last transfer
    fn read_data(&mut self) -> u8;
}

// =============================================================================
// Transport
// =============================================================================

/// Half-duplex byte exchange over an SPI controller
///
/// Each exchange runs inside its own critical section, nested within whatever
/// section the caller already holds.
#[derive(Debug)]
pub struct SpiTransport<'cs, B, P>
where
    P: InterruptControl + SchedulerTick,
{
    /// SPI controller registers
    bus: B,
    /// Shared nesting gate
    section: &'cs CriticalSection<P>,
    /// Transfer-complete polling budget
    poll_limit: PollLimit,
}

impl<'cs, B, P> SpiTransport<'cs, B, P>
where
    B: SpiRegisters,
    P: InterruptControl + SchedulerTick,
{
    /// Create a transport over `bus`, gated by `section`
    pub fn new(bus: B, section: &'cs CriticalSection<P>, poll_limit: PollLimit) -> Self {
        Self {
            bus,
            section,
            poll_limit,
        }
    }

    /// The critical section guarding this transport
    #[inline(always)]
    pub fn section(&self) -> &'cs CriticalSection<P> {
        self.section
    }

    /// Current polling budget
    #[inline(always)]
    pub fn poll_limit(&self) -> PollLimit {
        self.poll_limit
    }

    /// Change the polling budget
    pub fn set_poll_limit(&mut self, limit: PollLimit) {
        self.poll_limit = limit;
    }

    /// Hand the bus configuration to the hardware
    pub fn configure(&mut self, config: &BusConfig) {
        self.bus.configure(config);
    }

    /// Exchange one byte
    ///
    /// With [`PollLimit::Unbounded`] this spins until the hardware completes
    /// the transfer; a hung bus hangs the caller. A finite limit returns
    /// [`BusError::Timeout`] instead.
    ///
    /// # Errors
    /// - `Section(Overflow)` - nesting limit reached on entry
    /// - `Bus(Timeout)` - poll limit exhausted
    pub fn exchange(&mut self, out: u8) -> Result<u8> {
        let _guard = self.section.lock()?;

        self.bus.write_data(out);
        self.wait_complete()?;
        Ok(self.bus.read_data())
    }

    /// Exchange one byte and discard the reply
    #[inline]
    pub fn send(&mut self, out: u8) -> Result<()> {
        self.exchange(out).map(|_| ())
    }

    /// Clock in one byte by sending [`DUMMY_BYTE`]
    pub fn receive(&mut self) -> Result<u8> {
        let _guard = self.section.lock()?;
        self.exchange(DUMMY_BYTE)
    }

    /// Give back the underlying registers
    pub fn release(self) -> B {
        self.bus
    }

    fn wait_complete(&self) -> Result<()> {
        let mut polls = 0u32;
        while !self.bus.transfer_complete() {
            polls = polls.saturating_add(1);
            if self.poll_limit.is_exhausted(polls) {
                #[cfg(feature = "defmt")]
                defmt::warn!("SPI transfer not complete after {} polls", polls);
                return Err(BusError::Timeout.into());
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
