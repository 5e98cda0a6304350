//! # SincBeacon
//!
//! One-pulse-per-second analog beacon: a 158-sample sinc envelope played
//! through a free-running PWM carrier, re-armed every second by a
//! low-priority loop.
//!
//! ## Architecture
//!
//! Two contexts share one explicit state struct:
//! - [`SampleClock`] runs at the sample rate in a high-priority timer
//!   callback: one table entry into the PWM duty register per tick,
//!   self-disarming at end of table.
//! - The Beacon Loop ([`beacon::run_cycle`]) runs forever at low priority:
//!   re-arms one playback window per second and pulses the status LED.
//!
//! All coordination is atomic fields in [`BeaconState`]; no locks, and the
//! tick path never blocks, allocates or logs through a blocking backend.
//!
//! The library is platform-free and host-testable; `src/main.rs` binds it
//! to ESP-IDF (LEDC PWM, GPIO, esp_timer).

#![cfg_attr(not(test), no_std)]

pub mod beacon;
pub mod config;
pub mod duty;
pub mod fault;
pub mod logging;
pub mod sampler;
pub mod state;
pub mod wavetable;

pub use beacon::{BeaconDelay, Indicator};
pub use duty::{DutyError, DutyOutput};
pub use fault::{FaultCode, FaultState};
pub use logging::LogRing;
pub use sampler::SampleClock;
pub use state::BeaconState;
pub use wavetable::{SINC_TABLE, TABLE_LEN};
