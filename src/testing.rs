//! Testing utilities and simulated hardware
//!
//! This module provides a simulated board for testing the driver on the host
//! without hardware access. One shared state backs three handles:
//!
//! - [`SimGate`]: global interrupt-enable bit and scheduler tick enable
//! - [`SimSpi`]: SPI registers wired to a 64 KiB 23-series SRAM model
//! - [`SimSelect`]: the SRAM's chip-select pin
//!
//! Every pin edge and bus exchange is recorded together with whether a
//! critical section was active at that instant, so tests can assert on
//! ordering.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use core::convert::Infallible;
use std::rc::Rc;
use std::vec;
use std::vec::Vec;

use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin};

use crate::driver::command::Instruction;
use crate::driver::config::BusConfig;
use crate::hal::interrupt::{InterruptControl, SchedulerTick};
use crate::hal::spi::SpiRegisters;
use crate::internal::constants::{ADDRESS_SPACE_SIZE, COMMAND_HEADER_LEN, DUMMY_BYTE};

// =============================================================================
// Event Log
// =============================================================================

/// One observable hardware action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// Chip-select driven low
    Select { in_section: bool },
    /// Chip-select driven high
    Deselect { in_section: bool },
    /// One byte exchanged on the bus
    Exchange {
        out: u8,
        reply: u8,
        selected: bool,
        in_section: bool,
    },
}

impl BusEvent {
    /// Whether the scheduler tick was gated off when this happened
    pub fn in_section(&self) -> bool {
        match *self {
            BusEvent::Select { in_section }
            | BusEvent::Deselect { in_section }
            | BusEvent::Exchange { in_section, .. } => in_section,
        }
    }
}

/// One write to the scheduler tick enable bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickWrite {
    pub enabled: bool,
    /// Global interrupt-enable bit at the moment of the write
    pub interrupts_enabled: bool,
}

// =============================================================================
// Shared State
// =============================================================================

#[derive(Debug)]
struct SimState {
    // Interrupt gate
    interrupts_enabled: bool,
    interrupt_disables: u32,
    tick_enabled: bool,
    tick_writes: Vec<TickWrite>,

    // SPI controller
    configure_calls: u32,
    last_config: Option<BusConfig>,
    rx: u8,
    polls_before_complete: u32,
    polls_remaining: u32,
    total_polls: u32,
    hang: bool,

    // Chip
    selected: bool,
    select_fails: bool,
    frame: Vec<u8>,
    memory: Vec<u8>,
    mode: u8,

    events: Vec<BusEvent>,
}

impl SimState {
    fn new() -> Self {
        Self {
            interrupts_enabled: true,
            interrupt_disables: 0,
            tick_enabled: true,
            tick_writes: Vec::new(),
            configure_calls: 0,
            last_config: None,
            rx: 0,
            polls_before_complete: 0,
            polls_remaining: 0,
            total_polls: 0,
            hang: false,
            // Chip-select idles high
            selected: false,
            select_fails: false,
            frame: Vec::new(),
            memory: vec![0; ADDRESS_SPACE_SIZE],
            // Power-on mode of the 23LC parts is sequential
            mode: 0x40,
            events: Vec::new(),
        }
    }

    fn in_section(&self) -> bool {
        !self.tick_enabled
    }

    /// Feed one byte to the chip and return what it shifts back
    fn clock_byte(&mut self, out: u8) -> u8 {
        const READ: u8 = Instruction::Read.opcode();
        const WRITE: u8 = Instruction::Write.opcode();
        const WRITE_MODE: u8 = Instruction::WriteMode.opcode();
        const READ_MODE: u8 = Instruction::ReadMode.opcode();

        if !self.selected {
            return DUMMY_BYTE;
        }

        let index = self.frame.len();
        self.frame.push(out);

        // Data bytes follow the header; the address auto-increments
        let data_address = index.checked_sub(COMMAND_HEADER_LEN).map(|offset| {
            let base = u16::from_be_bytes([self.frame[2], self.frame[3]]) as usize;
            (base + offset) % ADDRESS_SPACE_SIZE
        });

        match (self.frame[0], data_address) {
            (READ, Some(addr)) => self.memory[addr],
            (WRITE, Some(addr)) => {
                self.memory[addr] = out;
                DUMMY_BYTE
            }
            (WRITE_MODE, _) if index == 1 => {
                self.mode = out;
                DUMMY_BYTE
            }
            (READ_MODE, _) if index == 1 => self.mode,
            _ => DUMMY_BYTE,
        }
    }
}

// =============================================================================
// Simulated Board
// =============================================================================

/// Owner of the simulated hardware state
///
/// # Example
///
/// ```ignore
/// let board = SimBoard::new();
/// let section = CriticalSection::new(board.gate());
/// let mut sram = Sram::new(board.spi(), board.select(), &section, SramConfig::new());
///
/// sram.initialize().unwrap();
/// sram.write(0x0010, 0xAB).unwrap();
/// assert_eq!(board.peek(0x0010), 0xAB);
/// ```
#[derive(Debug, Clone)]
pub struct SimBoard {
    state: Rc<RefCell<SimState>>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    /// Interrupts enabled, tick running, chip deselected, memory zeroed
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState::new())),
        }
    }

    pub fn gate(&self) -> SimGate {
        SimGate {
            state: Rc::clone(&self.state),
        }
    }

    pub fn spi(&self) -> SimSpi {
        SimSpi {
            state: Rc::clone(&self.state),
        }
    }

    pub fn select(&self) -> SimSelect {
        SimSelect {
            state: Rc::clone(&self.state),
        }
    }

    // -------------------------------------------------------------------------
    // Fault injection
    // -------------------------------------------------------------------------

    /// Number of `transfer_complete` polls that report busy before each
    /// exchange completes
    pub fn set_polls_before_complete(&self, polls: u32) {
        self.state.borrow_mut().polls_before_complete = polls;
    }

    /// Never raise the transfer-complete flag
    pub fn set_hang(&self, hang: bool) {
        self.state.borrow_mut().hang = hang;
    }

    /// Make every chip-select pin operation fail
    pub fn fail_select(&self, fail: bool) {
        self.state.borrow_mut().select_fails = fail;
    }

    pub fn set_interrupts_enabled(&self, enabled: bool) {
        self.state.borrow_mut().interrupts_enabled = enabled;
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn events(&self) -> Vec<BusEvent> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Bytes clocked out while the chip was selected, in order
    pub fn sent_bytes(&self) -> Vec<u8> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match *e {
                BusEvent::Exchange {
                    out,
                    selected: true,
                    ..
                } => Some(out),
                _ => None,
            })
            .collect()
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.state.borrow().interrupts_enabled
    }

    pub fn interrupt_disables(&self) -> u32 {
        self.state.borrow().interrupt_disables
    }

    pub fn tick_enabled(&self) -> bool {
        self.state.borrow().tick_enabled
    }

    /// Every `set_tick_enabled` call, in order
    pub fn tick_history(&self) -> Vec<bool> {
        self.state
            .borrow()
            .tick_writes
            .iter()
            .map(|write| write.enabled)
            .collect()
    }

    /// Every `set_tick_enabled` call with the interrupt state it saw
    pub fn tick_writes(&self) -> Vec<TickWrite> {
        self.state.borrow().tick_writes.clone()
    }

    /// Number of tick writes made while interrupts were enabled
    pub fn unmasked_tick_writes(&self) -> usize {
        self.state
            .borrow()
            .tick_writes
            .iter()
            .filter(|write| write.interrupts_enabled)
            .count()
    }

    pub fn is_selected(&self) -> bool {
        self.state.borrow().selected
    }

    pub fn configure_calls(&self) -> u32 {
        self.state.borrow().configure_calls
    }

    pub fn last_config(&self) -> Option<BusConfig> {
        self.state.borrow().last_config
    }

    pub fn total_polls(&self) -> u32 {
        self.state.borrow().total_polls
    }

    pub fn mode(&self) -> u8 {
        self.state.borrow().mode
    }

    pub fn set_mode(&self, mode: u8) {
        self.state.borrow_mut().mode = mode;
    }

    /// Read chip memory directly, bypassing the bus
    pub fn peek(&self, address: u16) -> u8 {
        self.state.borrow().memory[address as usize]
    }

    /// Write chip memory directly, bypassing the bus
    pub fn poke(&self, address: u16, value: u8) {
        self.state.borrow_mut().memory[address as usize] = value;
    }
}

// =============================================================================
// Interrupt Gate
// =============================================================================

#[derive(Debug)]
pub struct SimGate {
    state: Rc<RefCell<SimState>>,
}

impl InterruptControl for SimGate {
    fn interrupts_enabled(&self) -> bool {
        self.state.borrow().interrupts_enabled
    }

    fn disable_interrupts(&self) {
        let mut state = self.state.borrow_mut();
        state.interrupts_enabled = false;
        state.interrupt_disables += 1;
    }

    fn enable_interrupts(&self) {
        self.state.borrow_mut().interrupts_enabled = true;
    }
}

impl SchedulerTick for SimGate {
    fn set_tick_enabled(&self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.tick_enabled = enabled;
        let interrupts_enabled = state.interrupts_enabled;
        state.tick_writes.push(TickWrite {
            enabled,
            interrupts_enabled,
        });
    }
}

// =============================================================================
// SPI Registers
// =============================================================================

#[derive(Debug)]
pub struct SimSpi {
    state: Rc<RefCell<SimState>>,
}

impl SpiRegisters for SimSpi {
    fn configure(&mut self, config: &BusConfig) {
        let mut state = self.state.borrow_mut();
        state.configure_calls += 1;
        state.last_config = Some(*config);
    }

    fn write_data(&mut self, byte: u8) {
        let mut state = self.state.borrow_mut();
        let reply = state.clock_byte(byte);
        state.rx = reply;
        state.polls_remaining = state.polls_before_complete;
        let event = BusEvent::Exchange {
            out: byte,
            reply,
            selected: state.selected,
            in_section: state.in_section(),
        };
        state.events.push(event);
    }

    fn transfer_complete(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.total_polls += 1;
        if state.hang {
            return false;
        }
        if state.polls_remaining == 0 {
            return true;
        }
        state.polls_remaining -= 1;
        false
    }

    fn read_data(&mut self) -> u8 {
        self.state.borrow().rx
    }
}

// =============================================================================
// Chip Select
// =============================================================================

/// Error reported when pin failure is injected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug)]
pub struct SimSelect {
    state: Rc<RefCell<SimState>>,
}

impl ErrorType for SimSelect {
    type Error = SimPinError;
}

impl OutputPin for SimSelect {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.select_fails {
            return Err(SimPinError);
        }
        // Falling edge starts a new command frame
        state.selected = true;
        state.frame.clear();
        let event = BusEvent::Select {
            in_section: state.in_section(),
        };
        state.events.push(event);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.select_fails {
            return Err(SimPinError);
        }
        state.selected = false;
        let event = BusEvent::Deselect {
            in_section: state.in_section(),
        };
        state.events.push(event);
        Ok(())
    }
}

/// A chip-select pin that cannot fail, for tests that only need the type
#[derive(Debug, Default)]
pub struct NoopPin;

impl ErrorType for NoopPin {
    type Error = Infallible;
}

impl OutputPin for NoopPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// =============================================================================
// Test Assertions
// =============================================================================

/// Assert that every chip-select edge and selected exchange happened inside
/// a critical section
#[macro_export]
macro_rules! assert_all_in_section {
    ($board:expr) => {
        let events = $board.events();
        assert!(
            events.iter().all(|e| e.in_section()),
            "Expected all bus activity inside a critical section, but got: {:?}",
            events
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::command::Command;

    fn exchange(spi: &mut SimSpi, byte: u8) -> u8 {
        spi.write_data(byte);
        while !spi.transfer_complete() {}
        spi.read_data()
    }

    #[test]
    fn sim_chip_ignores_bytes_while_deselected() {
        let board = SimBoard::new();
        let mut spi = board.spi();

        for byte in Command::write(0x0001).header() {
            exchange(&mut spi, byte);
        }
        exchange(&mut spi, 0x55);

        assert_eq!(board.peek(0x0001), 0x00);
        assert!(board.sent_bytes().is_empty());
    }

    #[test]
    fn sim_chip_write_then_read() {
        let board = SimBoard::new();
        let mut spi = board.spi();
        let mut cs = board.select();

        cs.set_low().unwrap();
        for byte in Command::write(0x0102).header() {
            exchange(&mut spi, byte);
        }
        exchange(&mut spi, 0x5A);
        cs.set_high().unwrap();
        assert_eq!(board.peek(0x0102), 0x5A);

        cs.set_low().unwrap();
        for byte in Command::read(0x0102).header() {
            exchange(&mut spi, byte);
        }
        assert_eq!(exchange(&mut spi, DUMMY_BYTE), 0x5A);
        cs.set_high().unwrap();
    }

    #[test]
    fn sim_polls_before_complete() {
        let board = SimBoard::new();
        board.set_polls_before_complete(3);
        let mut spi = board.spi();

        spi.write_data(0x00);
        assert!(!spi.transfer_complete());
        assert!(!spi.transfer_complete());
        assert!(!spi.transfer_complete());
        assert!(spi.transfer_complete());
        assert_eq!(board.total_polls(), 4);
    }

    #[test]
    fn sim_select_failure_injection() {
        let board = SimBoard::new();
        let mut cs = board.select();

        board.fail_select(true);
        assert_eq!(cs.set_low(), Err(SimPinError));
        assert!(!board.is_selected());
    }

    #[test]
    fn sim_gate_records_tick_history() {
        let board = SimBoard::new();
        let gate = board.gate();

        gate.set_tick_enabled(false);
        gate.set_tick_enabled(true);

        assert_eq!(board.tick_history(), vec![false, true]);
        assert!(board.tick_enabled());
    }

    #[test]
    fn sim_gate_records_interrupt_state_of_tick_writes() {
        let board = SimBoard::new();
        let gate = board.gate();

        gate.set_tick_enabled(false);
        gate.disable_interrupts();
        gate.set_tick_enabled(true);

        assert_eq!(
            board.tick_writes(),
            vec![
                TickWrite {
                    enabled: false,
                    interrupts_enabled: true,
                },
                TickWrite {
                    enabled: true,
                    interrupts_enabled: false,
                },
            ]
        );
        assert_eq!(board.unmasked_tick_writes(), 1);
    }
}
