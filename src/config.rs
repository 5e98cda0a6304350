//! Module: config
//!
//! Purpose: Timing and amplitude constants for the beacon, with their
//! derivation formulas. The original design buried these in raw register
//! writes; here every number is named so the timing contract can be audited
//! without a datasheet open.
//!
//! Safety: Safe. Constants only.

/// Reference oscillator frequency the timing contract is derived from, in Hz.
///
/// The instruction clock feeding the sample timer runs at FOSC/4, so one
/// timer tick is `4 / FOSC_HZ` seconds = 125 ns.
pub const FOSC_HZ: u64 = 32_000_000;

/// Overflow point of the 16-bit sample countdown timer.
pub const TIMER_MAX: u32 = 65_536;

/// Reload value written into the sample countdown timer at the top of every
/// sample tick and on each per-second arm.
///
/// The timer counts up from this value and fires on overflow, so the tick
/// interval is `(TIMER_MAX - TIMER_RELOAD) * 4 / FOSC_HZ`.
///
/// NOTE: the original firmware labels this value "48 kHz", but the reload
/// arithmetic gives 151 ticks * 125 ns = 18.875 us, i.e. ~52.98 kHz. The
/// reload value is the authoritative, output-compatible quantity; the label
/// is kept here only as a flagged discrepancy. Do not "fix" either number
/// without verifying against downstream receivers.
pub const TIMER_RELOAD: u32 = 65_385;

/// Sample tick period in nanoseconds, derived from [`TIMER_RELOAD`].
///
/// `(65536 - 65385) * 4 / 32 MHz` = 151 * 125 ns = 18_875 ns.
pub const SAMPLE_PERIOD_NS: u64 =
    (TIMER_MAX - TIMER_RELOAD) as u64 * 4 * 1_000_000_000 / FOSC_HZ;

/// Effective sample rate in Hz, derived from [`SAMPLE_PERIOD_NS`] (~52.9 kHz).
///
/// See the discrepancy note on [`TIMER_RELOAD`].
pub const SAMPLE_RATE_HZ: u64 = 1_000_000_000 / SAMPLE_PERIOD_NS;

/// PWM carrier frequency in Hz (~124.3 kHz at 8-bit duty resolution).
///
/// Original derivation: `Tpwm = (PR + 1) * 4 * Tosc` with `PR = 0x3F`,
/// giving 256 instruction cycles per carrier period. The carrier is free
/// running and much faster than the sample rate; playback only modulates
/// its duty cycle.
pub const CARRIER_FREQ_HZ: u32 = 124_300;

/// Duty cycle resolution of the PWM carrier, in bits.
///
/// The hardware register pair is 10 bits wide (8 low + 2 high), but at this
/// carrier period only 8 bits are usable and the table never exceeds them.
pub const DUTY_BITS: u32 = 8;

/// Number of distinct duty steps (256).
pub const DUTY_RANGE: u16 = 1 << DUTY_BITS;

/// Duty value held whenever no playback is active: 43/255, ~16.9 %.
///
/// Written once at startup, before the first beacon cycle. Playback ends on
/// the table's last value (44) and the duty rests there until the next
/// pulse; the original firmware behaves the same way.
pub const BASELINE_DUTY: u8 = 43;

/// Status indicator high time at the top of each beacon cycle, in ms.
pub const INDICATOR_PULSE_MS: u32 = 2;

/// Beacon repetition period, in ms (1 Hz).
pub const BEACON_PERIOD_MS: u32 = 1000;

/// Idle time after the indicator pulse, completing one 1000 ms cycle.
pub const BEACON_IDLE_MS: u32 = BEACON_PERIOD_MS - INDICATOR_PULSE_MS;

/// Duration of one full playback window in microseconds.
///
/// 158 samples * 18.875 us ~= 2.98 ms, far inside the 998 ms idle budget,
/// which is what lets the loop re-arm without ever racing an active window.
pub const PLAYBACK_WINDOW_US: u64 =
    crate::wavetable::TABLE_LEN as u64 * SAMPLE_PERIOD_NS / 1000;
