//! Configuration types for the serial SRAM driver

use embedded_hal::spi::{MODE_0, Mode};

use super::command::OperatingMode;

/// SPI clock divider relative to the MCU clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDivider {
    /// f_osc / 2 (fastest, double-speed mode)
    #[default]
    Div2,
    /// f_osc / 4
    Div4,
    /// f_osc / 8
    Div8,
    /// f_osc / 16
    Div16,
    /// f_osc / 32
    Div32,
    /// f_osc / 64
    Div64,
    /// f_osc / 128
    Div128,
}

impl ClockDivider {
    /// Integer divisor applied to the MCU clock
    #[must_use]
    pub const fn divisor(self) -> u8 {
        match self {
            ClockDivider::Div2 => 2,
            ClockDivider::Div4 => 4,
            ClockDivider::Div8 => 8,
            ClockDivider::Div16 => 16,
            ClockDivider::Div32 => 32,
            ClockDivider::Div64 => 64,
            ClockDivider::Div128 => 128,
        }
    }

    /// SPI clock frequency produced from a given MCU clock
    #[must_use]
    pub const fn sck_hz(self, f_osc_hz: u32) -> u32 {
        f_osc_hz / self.divisor() as u32
    }
}

/// Order in which bits of a byte are shifted onto the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first (what 23-series SRAMs expect)
    #[default]
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// How long an exchange spins on the transfer-complete flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollLimit {
    /// Spin until the hardware completes the transfer, however long it takes
    #[default]
    Unbounded,
    /// Give up with `BusError::Timeout` after this many polls
    Iterations(u32),
}

impl PollLimit {
    /// Whether `polls` checks have used up the budget
    #[inline(always)]
    pub const fn is_exhausted(self, polls: u32) -> bool {
        match self {
            PollLimit::Unbounded => false,
            PollLimit::Iterations(limit) => polls >= limit,
        }
    }
}

/// One-time bus setup handed to the hardware configuration routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Clock polarity and phase
    pub mode: Mode,
    /// SPI clock rate
    pub clock: ClockDivider,
    /// Bit order on the wire
    pub bit_order: BitOrder,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BusConfig {
    /// SPI mode 0, MSB first, f_osc/2
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: MODE_0,
            clock: ClockDivider::Div2,
            bit_order: BitOrder::MsbFirst,
        }
    }

    /// Set the clock polarity and phase
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the clock divider
    #[must_use]
    pub const fn with_clock(mut self, clock: ClockDivider) -> Self {
        self.clock = clock;
        self
    }

    /// Set the bit order
    #[must_use]
    pub const fn with_bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }
}

/// SRAM driver configuration
///
/// Use the builder methods to customize:
///
/// ```ignore
/// let config = SramConfig::new()
///     .with_bus(BusConfig::new().with_clock(ClockDivider::Div4))
///     .with_mode(OperatingMode::Byte);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SramConfig {
    /// Bus setup applied during `initialize()`
    pub bus: BusConfig,
    /// Transfer-complete polling budget
    pub poll_limit: PollLimit,
    /// Operating mode written to the chip during `initialize()`
    pub mode: OperatingMode,
}

impl Default for SramConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SramConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bus: BusConfig::new(),
            poll_limit: PollLimit::Unbounded,
            mode: OperatingMode::Byte,
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the bus configuration
    #[must_use]
    pub const fn with_bus(mut self, bus: BusConfig) -> Self {
        self.bus = bus;
        self
    }

    /// Set the transfer-complete polling budget
    ///
    /// Production code should leave this [`PollLimit::Unbounded`]; a finite
    /// budget is meant for bring-up and host tests.
    #[must_use]
    pub const fn with_poll_limit(mut self, limit: PollLimit) -> Self {
        self.poll_limit = limit;
        self
    }

    /// Set the operating mode written at initialization
    #[must_use]
    pub const fn with_mode(mut self, mode: OperatingMode) -> Self {
        self.mode = mode;
        self
    }
}

/// SRAM driver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// `initialize()` has not run; reads and writes are rejected
    #[default]
    Uninitialized,
    /// Chip mode set, ready for transactions
    Ready,
}

// =============================================================================
// Unit Tests
// =============================================================================
