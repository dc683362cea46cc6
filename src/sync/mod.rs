//! Synchronization Support
//!
//! This module provides the one synchronization primitive the driver relies
//! on:
//!
//! - **Section** (`section`): nestable critical section
//!   - [`CriticalSection`] - nesting counter gating the scheduler tick
//!   - [`SectionGuard`] - RAII level, left on drop
//!
//! The target is a single core with interrupt-driven preemption and a
//! cooperative scheduler woken by a timer interrupt. There are no threads;
//! [`CriticalSection`] is deliberately `!Sync`.
//!
//! # Example
//!
//! ```ignore
//! use spi_sram::sync::CriticalSection;
//!
//! let section = CriticalSection::new(gate);
//!
//! section.with(|| {
//!     // runs with the scheduler tick gated off
//! })?;
//! ```

mod section;

pub use section::{CriticalSection, SectionGuard};
