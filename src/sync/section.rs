//! Nestable, scheduler-aware critical section.
//!
//! A [`CriticalSection`] counts how deeply callers have nested. While the
//! count is nonzero the scheduler's periodic tick is gated off, so the
//! guarded code runs to completion with respect to the scheduler. The tick
//! toggles only at the outermost boundary: off on the 0 → 1 enter, back on
//! when a leave finds the count at 0.
//!
//! Every enter and leave body runs with global interrupts masked and puts
//! the caller's interrupt-enable bit back on exit, so the counter's
//! read-modify-write cannot be torn by an interrupt handler.

use core::cell::Cell;

use crate::driver::error::{SectionError, SectionResult};
use crate::hal::interrupt::{InterruptControl, InterruptMask, SchedulerTick};
use crate::internal::constants::MAX_NESTING_DEPTH;

/// Nesting counter plus the hardware gate it drives.
///
/// There is one per system, usually a `static` shared by mainline code and
/// interrupt handlers, so every caller nests through the same counter.
///
/// # Example
///
/// ```ignore
/// use spi_sram::boards::atmega644::SECTION;
///
/// {
///     let _guard = SECTION.lock()?;
///     // scheduler tick is off here
/// }
/// // and back on here
/// ```
#[derive(Debug)]
pub struct CriticalSection<P> {
    /// Current nesting depth
    depth: Cell<u8>,
    /// Interrupt and tick enable bits
    gate: P,
}

// SAFETY: the depth counter is only modified inside enter() and leave(),
// which run their whole read-modify-write with global interrupts masked
// through the gate. On a single core with interrupts as the only source of
// preemption no other context can observe or change it mid-update.
unsafe impl<P: Sync> Sync for CriticalSection<P> {}

impl<P> CriticalSection<P> {
    /// Create a section at depth 0 (const, suitable for static initialization).
    pub const fn new(gate: P) -> Self {
        Self {
            depth: Cell::new(0),
            gate,
        }
    }

    /// Current nesting depth
    #[inline(always)]
    pub fn depth(&self) -> u8 {
        self.depth.get()
    }

    /// Whether at least one section is entered
    #[inline(always)]
    pub fn is_active(&self) -> bool {
        self.depth.get() != 0
    }

    /// The injected hardware gate
    #[inline(always)]
    pub fn gate(&self) -> &P {
        &self.gate
    }

    /// Give back the hardware gate
    pub fn release(self) -> P {
        self.gate
    }
}

impl<P> CriticalSection<P>
where
    P: InterruptControl + SchedulerTick,
{
    /// Enter one level.
    ///
    /// Gates the scheduler tick off when the depth goes from 0 to 1.
    ///
    /// # Errors
    ///
    /// `Overflow` if 255 levels are already entered. The depth is left
    /// unchanged. This is fatal: the count no longer tracks the real nesting,
    /// so the caller must halt or reset.
    pub fn enter(&self) -> SectionResult<()> {
        let mask = InterruptMask::capture(&self.gate);

        let depth = self.depth.get();
        let result = if depth < MAX_NESTING_DEPTH {
            self.depth.set(depth + 1);
            if depth == 0 {
                self.gate.set_tick_enabled(false);
            }
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::error!("critical section overflow: depth {}", depth);
            Err(SectionError::Overflow)
        };

        mask.restore(&self.gate);
        result
    }

    /// Leave one level.
    ///
    /// Re-enables the scheduler tick whenever the depth is 0 afterwards.
    ///
    /// # Errors
    ///
    /// `Underflow` if nothing was entered. The depth stays at 0 and the leave
    /// otherwise completes normally, so the system can keep running.
    pub fn leave(&self) -> SectionResult<()> {
        let mask = InterruptMask::capture(&self.gate);

        let depth = self.depth.get();
        let result = if depth > 0 {
            self.depth.set(depth - 1);
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("critical section left without matching enter");
            Err(SectionError::Underflow)
        };

        if self.depth.get() == 0 {
            self.gate.set_tick_enabled(true);
        }

        mask.restore(&self.gate);
        result
    }

    /// Enter one level and return a guard that leaves it on drop.
    ///
    /// # Errors
    ///
    /// `Overflow` as for [`enter`](Self::enter); no guard is created.
    pub fn lock(&self) -> SectionResult<SectionGuard<'_, P>> {
        self.enter()?;
        Ok(SectionGuard { section: self })
    }

    /// Run a closure inside one level.
    ///
    /// # Errors
    ///
    /// `Overflow` as for [`enter`](Self::enter); the closure does not run.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> SectionResult<R>
    where
        F: FnOnce() -> R,
    {
        let _guard = self.lock()?;
        Ok(f())
    }
}

/// RAII guard for one level of a [`CriticalSection`].
///
/// Leaves the level when dropped, on every exit path.
#[must_use = "the section is left as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SectionGuard<'a, P>
where
    P: InterruptControl + SchedulerTick,
{
    section: &'a CriticalSection<P>,
}

impl<P> SectionGuard<'_, P>
where
    P: InterruptControl + SchedulerTick,
{
    /// Depth including this guard's level
    #[inline(always)]
    pub fn depth(&self) -> u8 {
        self.section.depth()
    }
}

impl<P> Drop for SectionGuard<'_, P>
where
    P: InterruptControl + SchedulerTick,
{
    fn drop(&mut self) {
        if let Err(_e) = self.section.leave() {
            #[cfg(feature = "defmt")]
            defmt::error!("section guard dropped after its level was left: {}", _e);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
