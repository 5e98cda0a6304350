//! Fault state for the beacon.
//!
//! The original design had no diagnostic channel at all: a corrupted index
//! was undefined behavior and a missed pulse was invisible. Here the sample
//! path reports hard failures through an atomic fault cell instead, and the
//! Beacon Loop logs them. A beacon that emits a corrupted envelope is worse
//! than one that skips a pulse.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Reason the sample path stopped playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Playback index found at or past the table end while still armed.
    /// Only possible through external corruption of the shared state; the
    /// original design would have read out of bounds here.
    IndexOverrun = 1,

    /// The PWM peripheral rejected a duty write.
    DutyWrite = 2,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::IndexOverrun,
            2 => FaultCode::DutyWrite,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault cell shared between the sample tick and the main loop.
///
/// The tick context sets it and never blocks; the loop polls it once per
/// cycle and logs transitions. The total count survives `clear()` so fault
/// history is never lost.
pub struct FaultState {
    active: AtomicBool,
    code: AtomicU8,
    /// Context for the code: the offending index for `IndexOverrun`.
    data: AtomicU32,
    /// Total faults since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Raise a fault. Safe from the tick context, never blocks.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Whether a fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Fault code (meaningful only while `is_active()`).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Context data for the current code.
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Total faults since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Acknowledge the fault. Keeps the counter.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}
