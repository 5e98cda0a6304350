//! Beacon Loop: the one-pulse-per-second cadence.
//!
//! Lowest priority, runs forever. Each cycle raises the status indicator,
//! arms one playback window, holds the indicator for 2 ms, then idles out
//! the remainder of the second. Playback itself runs asynchronously in the
//! Sample Clock and is over (~3 ms) long before the idle delay ends, so the
//! loop never re-arms into an active window.
//!
//! The indicator-high window (2 ms) and the playback window (~3 ms) are
//! independently timed; they overlap but neither gates the other.
//!
//! The pin and delay primitives are platform services supplied by the
//! binary; this module only owns the ordering.

use crate::config::{BEACON_IDLE_MS, INDICATOR_PULSE_MS};
use crate::state::BeaconState;

/// Status indicator line, high for 2 ms at the top of each cycle.
pub trait Indicator {
    fn set_high(&mut self);
    fn set_low(&mut self);
}

/// Blocking delay primitive (FreeRTOS delay on target).
pub trait BeaconDelay {
    fn delay_ms(&mut self, ms: u32);
}

/// Run one beacon cycle: indicator up, arm, 2 ms hold, indicator down,
/// 998 ms idle. Total 1000 ms.
///
/// The arm happens while the indicator is already high, matching the
/// original sequencing: LED, index reset, countdown reload, enable.
pub fn run_cycle<I, D>(state: &BeaconState, indicator: &mut I, delay: &mut D)
where
    I: Indicator,
    D: BeaconDelay,
{
    indicator.set_high();
    state.arm();
    delay.delay_ms(INDICATOR_PULSE_MS);
    indicator.set_low();
    delay.delay_ms(BEACON_IDLE_MS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::vec::Vec;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        High,
        Low,
        Delay(u32),
    }

    /// Handle to a shared event trace; indicator and delay record into the
    /// same list so the interleaving is observable.
    struct Trace<'a>(&'a RefCell<Vec<Event>>);

    impl Indicator for Trace<'_> {
        fn set_high(&mut self) {
            self.0.borrow_mut().push(Event::High);
        }
        fn set_low(&mut self) {
            self.0.borrow_mut().push(Event::Low);
        }
    }

    impl BeaconDelay for Trace<'_> {
        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().push(Event::Delay(ms));
        }
    }

    #[test]
    fn test_cycle_ordering_and_timing() {
        let state = BeaconState::new();
        let events = RefCell::new(Vec::new());

        run_cycle(&state, &mut Trace(&events), &mut Trace(&events));

        assert_eq!(
            *events.borrow(),
            [Event::High, Event::Delay(2), Event::Low, Event::Delay(998)]
        );
        assert!(state.is_enabled());
        assert_eq!(state.index(), 0);
        assert_eq!(state.pulses(), 1);
    }
}
