//! Error types for the serial SRAM driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`SectionError`]: Critical-section nesting violations
//! - [`BusError`]: Byte-exchange failures on the serial bus
//! - [`DeviceError`]: SRAM protocol and chip-select failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by the device operations.

// =============================================================================
// Critical Section Errors
// =============================================================================

/// Critical-section nesting errors
///
/// The two variants have very different consequences. [`Overflow`] is fatal:
/// the nesting counter can no longer track the real depth, so the system must
/// halt or reset. [`Underflow`] is a caller bug that the section survives by
/// refusing to go below zero.
///
/// [`Overflow`]: SectionError::Overflow
/// [`Underflow`]: SectionError::Underflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SectionError {
    /// More than 255 nested sections were entered
    Overflow,
    /// A section was left that was never entered
    Underflow,
}

impl core::fmt::Display for SectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SectionError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SectionError::Overflow => "too many nested critical sections",
            SectionError::Underflow => "unbalanced critical section leave",
        }
    }

    /// Whether the system must stop after this error
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, SectionError::Overflow)
    }
}

// =============================================================================
// Bus Errors
// =============================================================================

/// Serial bus errors
///
/// With the default unbounded polling the bus never reports an error; a hung
/// transfer hangs the caller. These only appear when a poll limit is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Transfer-complete flag was not raised within the poll limit
    Timeout,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BusError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BusError::Timeout => "transfer did not complete",
        }
    }
}

// =============================================================================
// Device Errors
// =============================================================================

/// SRAM device errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// Read or write attempted before `initialize()`
    NotInitialized,
    /// The chip-select pin could not be driven
    ChipSelect,
    /// Mode register holds the reserved bit pattern
    InvalidMode,
}

impl core::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DeviceError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeviceError::NotInitialized => "device not initialized",
            DeviceError::ChipSelect => "chip-select pin error",
            DeviceError::InvalidMode => "invalid operating mode",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match sram.read(0x0010) {
///     Err(Error::Section(e)) if e.is_fatal() => halt(),
///     Err(Error::Device(DeviceError::NotInitialized)) => { /* ... */ }
///     Err(Error::Bus(BusError::Timeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Critical-section error
    Section(SectionError),
    /// Bus error
    Bus(BusError),
    /// Device error
    Device(DeviceError),
}

impl Error {
    /// Whether the system must stop after this error
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Error::Section(e) => e.is_fatal(),
            Error::Bus(_) | Error::Device(_) => false,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Section(e) => write!(f, "section: {}", e.as_str()),
            Error::Bus(e) => write!(f, "bus: {}", e.as_str()),
            Error::Device(e) => write!(f, "device: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<SectionError> for Error {
    fn from(e: SectionError) -> Self {
        Error::Section(e)
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Error::Device(e)
    }
}

/// Result type alias for SRAM operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for critical-section operations
pub type SectionResult<T> = core::result::Result<T, SectionError>;

/// Result type alias for bus operations
pub type BusResult<T> = core::result::Result<T, BusError>;

/// Result type alias for device operations
pub type DeviceResult<T> = core::result::Result<T, DeviceError>;

// =============================================================================
// Unit Tests
// =============================================================================
