//! Sample Clock: the per-tick playback step.
//!
//! On hardware this was a timer interrupt: reload the countdown, move one
//! table entry into the PWM duty register, self-disarm at end of table. Here
//! the periodic timer callback keeps firing and the enable flag is the gate,
//! standing in for the interrupt-enable bit; ticks that arrive disarmed are
//! no-ops.
//!
//! Contract:
//! - Runs to completion, never blocks, never allocates, no logging.
//! - Touches only the shared state, the fault cell and the duty output.
//! - Must finish well inside one sample period (18.875 us).

use crate::duty::DutyOutput;
use crate::fault::{FaultCode, FaultState};
use crate::state::BeaconState;
use crate::wavetable::{SINC_TABLE, TABLE_LEN};

/// The high-priority sample tick, driven at the sample rate.
pub struct SampleClock<'a> {
    state: &'a BeaconState,
    fault: &'a FaultState,
}

impl<'a> SampleClock<'a> {
    pub fn new(state: &'a BeaconState, fault: &'a FaultState) -> Self {
        Self { state, fault }
    }

    /// Play one sample if armed.
    ///
    /// Returns the sample that was written, or `None` if the clock is
    /// disarmed or a fault was raised.
    ///
    /// Post-increment semantics: the sample played corresponds to the index
    /// value at entry. When the incremented index reaches the table length,
    /// the enable flag is cleared in the same invocation; no extra tick is
    /// emitted and the index rests at `TABLE_LEN` until the next arm.
    #[inline]
    pub fn tick(&mut self, out: &mut impl DutyOutput) -> Option<u8> {
        if !self.state.is_enabled() {
            return None;
        }

        // Reload at the top of the tick so sample spacing does not depend
        // on how long the rest of the handler takes.
        self.state.reload_period();

        let idx = self.state.index();
        if idx >= TABLE_LEN {
            // Enable flag and index have desynchronized. The original
            // firmware would read past the table here; we disarm instead.
            self.fault.set(FaultCode::IndexOverrun, idx as u32);
            self.state.disarm();
            return None;
        }

        let sample = SINC_TABLE[idx];
        if out.set_duty_low(sample).is_err() {
            self.fault.set(FaultCode::DutyWrite, idx as u32);
            self.state.disarm();
            return None;
        }

        let next = idx + 1;
        self.state.set_index(next);
        if next == TABLE_LEN {
            self.state.disarm();
        }

        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duty::DutyError;

    /// Recording duty sink.
    struct RecordedDuty {
        writes: std::vec::Vec<u8>,
        fail: bool,
    }

    impl RecordedDuty {
        fn new() -> Self {
            Self { writes: std::vec::Vec::new(), fail: false }
        }
    }

    impl DutyOutput for RecordedDuty {
        fn set_duty(&mut self, duty: u16) -> Result<(), DutyError> {
            self.set_duty_low(duty as u8)
        }

        fn set_duty_low(&mut self, duty: u8) -> Result<(), DutyError> {
            if self.fail {
                return Err(DutyError);
            }
            self.writes.push(duty);
            Ok(())
        }
    }

    #[test]
    fn test_disarmed_tick_is_noop() {
        let state = BeaconState::new();
        let fault = FaultState::new();
        let mut clock = SampleClock::new(&state, &fault);
        let mut duty = RecordedDuty::new();

        for _ in 0..10 {
            assert_eq!(clock.tick(&mut duty), None);
        }
        assert!(duty.writes.is_empty());
        assert!(!fault.is_active());
    }

    #[test]
    fn test_full_playback_is_the_table() {
        let state = BeaconState::new();
        let fault = FaultState::new();
        let mut clock = SampleClock::new(&state, &fault);
        let mut duty = RecordedDuty::new();

        state.arm();
        while clock.tick(&mut duty).is_some() {}

        assert_eq!(duty.writes, SINC_TABLE);
        assert_eq!(state.index(), TABLE_LEN);
        assert!(!state.is_enabled());
        assert!(!fault.is_active());
    }

    #[test]
    fn test_last_sample_disarms_in_same_tick() {
        let state = BeaconState::new();
        let fault = FaultState::new();
        let mut clock = SampleClock::new(&state, &fault);
        let mut duty = RecordedDuty::new();

        state.arm();
        state.set_index(TABLE_LEN - 1);

        let played = clock.tick(&mut duty);
        assert_eq!(played, Some(SINC_TABLE[TABLE_LEN - 1]));
        assert_eq!(state.index(), TABLE_LEN);
        assert!(!state.is_enabled());

        // And no extra tick after that
        assert_eq!(clock.tick(&mut duty), None);
        assert_eq!(duty.writes.len(), 1);
    }

    #[test]
    fn test_corrupted_index_faults_instead_of_overrunning() {
        let state = BeaconState::new();
        let fault = FaultState::new();
        let mut clock = SampleClock::new(&state, &fault);
        let mut duty = RecordedDuty::new();

        state.arm();
        state.set_index(TABLE_LEN); // desync: armed but exhausted

        assert_eq!(clock.tick(&mut duty), None);
        assert!(fault.is_active());
        assert_eq!(fault.code(), FaultCode::IndexOverrun);
        assert_eq!(fault.data(), TABLE_LEN as u32);
        assert!(!state.is_enabled());
        assert!(duty.writes.is_empty());
    }

    #[test]
    fn test_duty_write_failure_disarms_and_faults() {
        let state = BeaconState::new();
        let fault = FaultState::new();
        let mut clock = SampleClock::new(&state, &fault);
        let mut duty = RecordedDuty::new();
        duty.fail = true;

        state.arm();
        assert_eq!(clock.tick(&mut duty), None);
        assert!(fault.is_active());
        assert_eq!(fault.code(), FaultCode::DutyWrite);
        assert!(!state.is_enabled());
        // Index untouched: the failed sample was never played
        assert_eq!(state.index(), 0);
    }

    #[test]
    fn test_tick_rewrites_reload_register() {
        let state = BeaconState::new();
        let fault = FaultState::new();
        let mut clock = SampleClock::new(&state, &fault);
        let mut duty = RecordedDuty::new();

        state.arm();
        clock.tick(&mut duty);
        assert_eq!(state.reload(), crate::config::TIMER_RELOAD as u16);
    }
}
