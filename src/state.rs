//! Shared beacon state
//!
//! The original hardware shared four registers between the interrupt handler
//! and the main loop and relied on single-register writes being atomic. This
//! module makes that contract explicit: one small struct, every field
//! atomic, and a documented single writer per field per phase.
//!
//! Write ownership:
//! - The Beacon Loop writes `index` (reset), `reload` and `enabled` only
//!   while the clock is disarmed (phase start).
//! - The Sample Clock writes `index` (increment), `reload` (tick reload) and
//!   `enabled` (clear at end of table) only while armed.
//!
//! No locks. Correctness rests on the enable flag gating the clock and on
//! the loop never re-arming inside an active playback window (the ~3 ms
//! window vs. the 998 ms idle budget).

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use crate::config::TIMER_RELOAD;
use crate::wavetable::TABLE_LEN;

/// Shared state between the Sample Clock and the Beacon Loop.
///
/// Designed for `static` placement; all methods take `&self`.
pub struct BeaconState {
    /// Playback index into the sinc table.
    ///
    /// Incremented only by the Sample Clock; reset to 0 only by the Beacon
    /// Loop at the top of a cycle. Rests at `TABLE_LEN` between pulses.
    index: AtomicU16,

    /// Sample-clock enable flag, the sole synchronization primitive.
    ///
    /// Set by the Beacon Loop on arm, cleared by the Sample Clock when the
    /// table is exhausted. Ticks that arrive while clear are no-ops.
    enabled: AtomicBool,

    /// Model of the 16-bit countdown reload register.
    ///
    /// Rewritten with [`TIMER_RELOAD`] by the Sample Clock at the top of
    /// every tick and by the Beacon Loop on arm, mirroring the hardware's
    /// reload-before-work discipline that keeps ticks evenly spaced.
    reload: AtomicU16,

    /// Beacon cycles armed since boot. Diagnostic only.
    pulses: AtomicU32,
}

impl BeaconState {
    /// Create the power-on state: disarmed, index at 0, reload unset.
    pub const fn new() -> Self {
        Self {
            index: AtomicU16::new(0),
            enabled: AtomicBool::new(false),
            reload: AtomicU16::new(0),
            pulses: AtomicU32::new(0),
        }
    }

    /// Arm one playback window (Beacon Loop only, once per second).
    ///
    /// Resets the playback index, reloads the countdown so the first tick is
    /// correctly spaced, then sets the enable flag. The flag store is
    /// `Release` so the Sample Clock's `Acquire` load observes the index and
    /// reload writes that precede it.
    pub fn arm(&self) {
        self.index.store(0, Ordering::Relaxed);
        self.reload.store(TIMER_RELOAD as u16, Ordering::Relaxed);
        self.pulses.fetch_add(1, Ordering::Relaxed);
        self.enabled.store(true, Ordering::Release);
    }

    /// Clear the enable flag (Sample Clock at end of table, or fault path).
    ///
    /// Does not touch the index: exhaustion and the next arm are distinct
    /// events, and the index rests at `TABLE_LEN` in between.
    pub fn disarm(&self) {
        self.enabled.store(false, Ordering::Release);
    }

    /// Whether the Sample Clock should play on the next tick.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Current playback index, in `[0, TABLE_LEN]`.
    #[inline]
    pub fn index(&self) -> usize {
        self.index.load(Ordering::Relaxed) as usize
    }

    /// Advance the playback index (Sample Clock only).
    #[inline]
    pub fn set_index(&self, idx: usize) {
        debug_assert!(idx <= TABLE_LEN);
        self.index.store(idx as u16, Ordering::Relaxed);
    }

    /// Rewrite the countdown reload register (top of every tick).
    #[inline]
    pub fn reload_period(&self) {
        self.reload.store(TIMER_RELOAD as u16, Ordering::Relaxed);
    }

    /// Last value written into the countdown reload register.
    #[inline]
    pub fn reload(&self) -> u16 {
        self.reload.load(Ordering::Relaxed)
    }

    /// Beacon cycles armed since boot.
    #[inline]
    pub fn pulses(&self) -> u32 {
        self.pulses.load(Ordering::Relaxed)
    }
}

impl Default for BeaconState {
    fn default() -> Self {
        Self::new()
    }
}
