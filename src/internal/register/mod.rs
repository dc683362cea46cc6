//! Memory-mapped register access for the ATmega644
//!
//! The AVR maps its I/O registers into data space, so every register is a
//! plain byte address. All register access is volatile to ensure proper
//! hardware interaction.

pub mod atmega644;

/// Read an 8-bit register at the given data-space address
///
/// # Safety
/// The caller must ensure the address is a valid I/O register.
#[inline(always)]
pub unsafe fn read_reg(addr: usize) -> u8 {
    unsafe { core::ptr::read_volatile(addr as *const u8) }
}

/// Write an 8-bit value to a register at the given data-space address
///
/// # Safety
/// The caller must ensure the address is a valid I/O register.
#[inline(always)]
pub unsafe fn write_reg(addr: usize, value: u8) {
    unsafe { core::ptr::write_volatile(addr as *mut u8, value) }
}

/// Modify a register using a read-modify-write operation
///
/// # Safety
/// The caller must ensure the address is a valid I/O register.
#[inline(always)]
pub unsafe fn modify_reg<F>(addr: usize, f: F)
where
    F: FnOnce(u8) -> u8,
{
    // SAFETY: caller guarantees address validity
    let value = unsafe { read_reg(addr) };
    unsafe { write_reg(addr, f(value)) }
}

/// Set bits in a register (read-modify-write)
///
/// # Safety
/// The caller must ensure the address is a valid I/O register.
#[inline(always)]
pub unsafe fn set_bits(addr: usize, bits: u8) {
    // SAFETY: caller guarantees address validity
    unsafe { modify_reg(addr, |v| v | bits) }
}

/// Clear bits in a register (read-modify-write)
///
/// # Safety
/// The caller must ensure the address is a valid I/O register.
#[inline(always)]
pub unsafe fn clear_bits(addr: usize, bits: u8) {
    // SAFETY: caller guarantees address validity
    unsafe { modify_reg(addr, |v| v & !bits) }
}

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read/write accessor methods for a register.
///
/// # Example
/// ```ignore
/// impl SpiRegs {
///     reg_rw!(control, set_control, SPCR, "SPI Control Register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $addr:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn() -> u8 {
            unsafe { $crate::internal::register::read_reg($addr) }
        }

        #[doc = concat!("Write ", $doc)]
        #[inline(always)]
        pub fn $write_fn(value: u8) {
            unsafe { $crate::internal::register::write_reg($addr, value) }
        }
    };
}

/// Generate set/clear bit operation methods for a register.
///
/// # Example
/// ```ignore
/// impl CpuRegs {
///     reg_bit_ops!(enable_interrupts, disable_interrupts, SREG, SREG_I,
///                  "global interrupts", "Enable", "Disable");
/// }
/// ```
macro_rules! reg_bit_ops {
    ($set_fn:ident, $clear_fn:ident, $addr:expr, $bit:expr, $what:expr, $set_verb:expr, $clear_verb:expr) => {
        #[doc = concat!($set_verb, " ", $what)]
        #[inline(always)]
        pub fn $set_fn() {
            unsafe { $crate::internal::register::set_bits($addr, $bit) }
        }

        #[doc = concat!($clear_verb, " ", $what)]
        #[inline(always)]
        pub fn $clear_fn() {
            unsafe { $crate::internal::register::clear_bits($addr, $bit) }
        }
    };
}

/// Generate a bit check method (true when bit is set).
macro_rules! reg_bit_check {
    ($fn:ident, $addr:expr, $bit:expr, $doc:expr) => {
        #[doc = $doc]
        #[inline(always)]
        pub fn $fn() -> bool {
            unsafe { ($crate::internal::register::read_reg($addr) & $bit) != 0 }
        }
    };
}

// Export macros for use in submodules
pub(crate) use reg_bit_check;
pub(crate) use reg_bit_ops;
pub(crate) use reg_rw;
