//! Board-specific backends and pin mappings.
//!
//! This module binds the driver's hardware traits to a concrete MCU so that
//! bring-up code does not have to touch registers itself.
//!
//! # Supported Boards
//!
//! - ATmega644 (hardware SPI on port B, SRAM chip-select on PB4)
//!
//! # See Also
//!
//! - [`crate::hal`] - the traits implemented here

#[cfg(feature = "atmega644")]
#[cfg_attr(docsrs, doc(cfg(feature = "atmega644")))]
pub mod atmega644;
