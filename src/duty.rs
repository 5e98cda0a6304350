//! PWM duty-cycle output abstraction
//!
//! Seam between the beacon core and the PWM peripheral. The hardware duty
//! register is a split 8-bit/2-bit pair forming a right-aligned 10-bit
//! value; the playback hot path only ever touches the low byte because the
//! amplitude table never exceeds 8 bits.

/// Opaque peripheral write failure.
///
/// The tick path cannot do anything with the underlying error; it disarms
/// and raises a fault, and the main loop logs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DutyError;

/// Sink for PWM duty-cycle writes.
///
/// Implemented by the LEDC channel wrapper on target and by a recording
/// double in tests. Both methods are called from the sample-tick context
/// and must not block.
pub trait DutyOutput {
    /// Full 10-bit right-aligned duty write (low byte + high 2 bits).
    ///
    /// Used outside playback, e.g. to preset the baseline level at startup.
    /// Writing the same value twice leaves the output unchanged.
    fn set_duty(&mut self, duty: u16) -> Result<(), DutyError>;

    /// Low-byte-only duty write, the per-sample playback path.
    ///
    /// The high bits are implicitly zero during playback: amplitude samples
    /// are 8-bit by construction.
    fn set_duty_low(&mut self, duty: u8) -> Result<(), DutyError>;
}

impl<T: DutyOutput + ?Sized> DutyOutput for &mut T {
    fn set_duty(&mut self, duty: u16) -> Result<(), DutyError> {
        (**self).set_duty(duty)
    }

    fn set_duty_low(&mut self, duty: u8) -> Result<(), DutyError> {
        (**self).set_duty_low(duty)
    }
}
