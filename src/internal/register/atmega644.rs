//! ATmega644 Register Definitions
//!
//! The registers the driver touches, by data-space address:
//!
//! | Register | Address | Used for |
//! |----------|---------|----------|
//! | SREG     | 0x5F    | Global interrupt enable (I) |
//! | TIMSK2   | 0x70    | Scheduler tick (Timer2 compare A) |
//! | SPCR     | 0x4C    | SPI control |
//! | SPSR     | 0x4D    | SPI status, double speed |
//! | SPDR     | 0x4E    | SPI data |
//! | DDRB     | 0x24    | Port B direction |
//! | PORTB    | 0x25    | Port B output / pull-ups |

use super::{reg_bit_check, reg_bit_ops, reg_rw, set_bits};

// =============================================================================
// Register Addresses
// =============================================================================

/// Status register
pub const SREG: usize = 0x5F;
/// Timer/Counter2 interrupt mask register
pub const TIMSK2: usize = 0x70;
/// SPI control register
pub const SPCR: usize = 0x4C;
/// SPI status register
pub const SPSR: usize = 0x4D;
/// SPI data register
pub const SPDR: usize = 0x4E;
/// Port B data direction register
pub const DDRB: usize = 0x24;
/// Port B data register
pub const PORTB: usize = 0x25;

// =============================================================================
// SREG / TIMSK2 Bits
// =============================================================================

/// Global interrupt enable (bit 7)
pub const SREG_I: u8 = 1 << 7;
/// Timer2 output compare A match interrupt enable (bit 1)
pub const TIMSK2_OCIE2A: u8 = 1 << 1;

// =============================================================================
// SPCR Bits
// =============================================================================

/// SPI enable (bit 6)
pub const SPCR_SPE: u8 = 1 << 6;
/// Data order, 1 = LSB first (bit 5)
pub const SPCR_DORD: u8 = 1 << 5;
/// Master select (bit 4)
pub const SPCR_MSTR: u8 = 1 << 4;
/// Clock polarity, 1 = SCK idles high (bit 3)
pub const SPCR_CPOL: u8 = 1 << 3;
/// Clock phase, 1 = sample on trailing edge (bit 2)
pub const SPCR_CPHA: u8 = 1 << 2;
/// Clock rate select (bits 1:0)
pub const SPCR_SPR_MASK: u8 = 0b11;

// =============================================================================
// SPSR Bits
// =============================================================================

/// Transfer complete flag (bit 7)
pub const SPSR_SPIF: u8 = 1 << 7;
/// Double-speed mode (bit 0)
pub const SPSR_SPI2X: u8 = 1 << 0;

// =============================================================================
// Port B Pins
// =============================================================================

/// SRAM chip select (PB4, also the SPI SS pin)
pub const PB_SS: u8 = 1 << 4;
/// SPI MOSI (PB5)
pub const PB_MOSI: u8 = 1 << 5;
/// SPI MISO (PB6)
pub const PB_MISO: u8 = 1 << 6;
/// SPI SCK (PB7)
pub const PB_SCK: u8 = 1 << 7;

/// Pins driven as outputs for SPI master operation
pub const PB_SPI_OUTPUTS: u8 = PB_SS | PB_MOSI | PB_SCK;

// =============================================================================
// Register Access Functions
// =============================================================================

/// CPU status and timer interrupt mask registers
pub struct CpuRegs;

impl CpuRegs {
    reg_bit_check!(
        interrupts_enabled,
        SREG,
        SREG_I,
        "Whether global interrupts are enabled"
    );
    reg_bit_ops!(
        enable_interrupts,
        disable_interrupts,
        SREG,
        SREG_I,
        "global interrupts",
        "Enable",
        "Disable"
    );
    reg_bit_ops!(
        enable_tick,
        disable_tick,
        TIMSK2,
        TIMSK2_OCIE2A,
        "the Timer2 compare A scheduler tick",
        "Enable",
        "Disable"
    );
}

/// SPI controller registers
pub struct SpiRegs;

impl SpiRegs {
    reg_rw!(control, set_control, SPCR, "SPI Control Register");
    reg_rw!(status, set_status, SPSR, "SPI Status Register");
    reg_rw!(data, set_data, SPDR, "SPI Data Register");
    reg_bit_check!(
        transfer_complete,
        SPSR,
        SPSR_SPIF,
        "Whether the last transfer completed (SPIF)"
    );
}

/// Port B registers
pub struct PortBRegs;

impl PortBRegs {
    /// Drive SS, MOSI and SCK as outputs and pull MISO up
    #[inline(always)]
    pub fn configure_spi_pins() {
        unsafe {
            set_bits(DDRB, PB_SPI_OUTPUTS);
            set_bits(PORTB, PB_MISO);
        }
    }

    reg_bit_ops!(
        ss_high,
        ss_low,
        PORTB,
        PB_SS,
        "the SRAM chip-select line",
        "Drive high",
        "Drive low"
    );
}

// =============================================================================
// Unit Tests
// =============================================================================
