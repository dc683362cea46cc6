//! Interrupt and scheduler-tick gates
//!
//! The critical section needs exactly two pieces of global hardware state:
//! the CPU's global interrupt-enable bit and the enable bit of the timer
//! interrupt that drives the scheduler. These traits expose only the
//! semantic operations on those bits, so a board backend or a simulated one
//! can be injected.
//!
//! Methods take `&self` and may be called from interrupt context.

/// Global interrupt-enable flag
pub trait InterruptControl {
    /// Whether maskable interrupts are currently enabled
    fn interrupts_enabled(&self) -> bool;

    /// Mask all maskable interrupts
    fn disable_interrupts(&self);

    /// Unmask interrupts
    fn enable_interrupts(&self);
}

/// Enable switch for the scheduler's periodic tick
pub trait SchedulerTick {
    /// Enable or disable the tick interrupt source
    fn set_tick_enabled(&self, enabled: bool);
}

/// Snapshot of the global interrupt-enable bit
///
/// Taken at the start of every critical-section enter/leave body and handed
/// back at its end, so the body can run with interrupts off regardless of
/// the caller's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use = "interrupts stay masked unless the snapshot is restored"]
pub struct InterruptMask {
    was_enabled: bool,
}

impl InterruptMask {
    /// Capture the current enable bit, then mask interrupts
    #[inline]
    pub fn capture<I: InterruptControl + ?Sized>(gate: &I) -> Self {
        let was_enabled = gate.interrupts_enabled();
        gate.disable_interrupts();
        Self { was_enabled }
    }

    /// Re-enable interrupts if they were enabled when captured
    ///
    /// Never disables: if they were off at capture they stay off.
    #[inline]
    pub fn restore<I: InterruptControl + ?Sized>(self, gate: &I) {
        if self.was_enabled {
            gate.enable_interrupts();
        }
    }

    /// Whether interrupts were enabled at capture time
    #[inline(always)]
    pub const fn was_enabled(&self) -> bool {
        self.was_enabled
    }
}
