//! SincBeacon - ESP-IDF entry point.
//!
//! Binds the platform-free beacon core to the hardware:
//! - LEDC channel 0 @ ~124.3 kHz / 8-bit duty on GPIO4 carries the waveform
//! - GPIO2 is the status indicator (high 2 ms per cycle)
//! - an esp_timer periodic callback at the sample period drives the
//!   Sample Clock (high-priority esp_timer task, preempts the main loop)
//! - the main task runs the Beacon Loop forever on FreeRTOS delays
//!
//! Startup order matters: carrier and baseline duty are configured before
//! the sample timer starts, and the timer starts before the first arm.

#[cfg(target_os = "espidf")]
use std::time::Duration;

#[cfg(target_os = "espidf")]
use anyhow::Context;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::delay::FreeRtos;
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, OutputPin, PinDriver};
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::prelude::*;
#[cfg(target_os = "espidf")]
use esp_idf_svc::timer::EspTaskTimerService;

#[cfg(target_os = "espidf")]
use sinc_beacon::beacon::{self, BeaconDelay, Indicator};
#[cfg(target_os = "espidf")]
use sinc_beacon::config::{
    BASELINE_DUTY, CARRIER_FREQ_HZ, PLAYBACK_WINDOW_US, SAMPLE_PERIOD_NS, SAMPLE_RATE_HZ,
};
#[cfg(target_os = "espidf")]
use sinc_beacon::duty::{DutyError, DutyOutput};
#[cfg(target_os = "espidf")]
use sinc_beacon::logging::LogRing;
#[cfg(target_os = "espidf")]
use sinc_beacon::{rt_info, BeaconState, FaultState, SampleClock};

// Shared state, static so both contexts can reach it without locking.
#[cfg(target_os = "espidf")]
static STATE: BeaconState = BeaconState::new();
#[cfg(target_os = "espidf")]
static FAULT: FaultState = FaultState::new();
#[cfg(target_os = "espidf")]
static RT_LOG: LogRing = LogRing::new();

/// LEDC channel as the beacon's duty sink.
///
/// LEDC takes the full duty value in one write, so the low-byte path and
/// the 10-bit path collapse into the same register update here; the 8/2
/// split only exists on the original silicon.
#[cfg(target_os = "espidf")]
struct LedcDuty<'d>(LedcDriver<'d>);

#[cfg(target_os = "espidf")]
impl DutyOutput for LedcDuty<'_> {
    fn set_duty(&mut self, duty: u16) -> Result<(), DutyError> {
        self.0.set_duty(duty as u32).map_err(|_| DutyError)
    }

    fn set_duty_low(&mut self, duty: u8) -> Result<(), DutyError> {
        self.0.set_duty(duty as u32).map_err(|_| DutyError)
    }
}

/// Status LED on a push-pull output.
#[cfg(target_os = "espidf")]
struct StatusLed<'d>(PinDriver<'d, AnyOutputPin, Output>);

#[cfg(target_os = "espidf")]
impl Indicator for StatusLed<'_> {
    fn set_high(&mut self) {
        // GPIO writes on this target cannot fail
        let _ = self.0.set_high();
    }

    fn set_low(&mut self) {
        let _ = self.0.set_low();
    }
}

/// FreeRTOS blocking delay for the low-priority loop.
#[cfg(target_os = "espidf")]
struct FreeRtosDelay;

#[cfg(target_os = "espidf")]
impl BeaconDelay for FreeRtosDelay {
    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}

#[cfg(target_os = "espidf")]
fn timestamp_us() -> i64 {
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!(
        "{} up: sample rate {} Hz, carrier {} Hz, window {} us",
        env!("VERSION_STRING"),
        SAMPLE_RATE_HZ,
        CARRIER_FREQ_HZ,
        PLAYBACK_WINDOW_US,
    );

    let peripherals = Peripherals::take().context("peripherals already taken")?;

    // PWM carrier: free running, duty preset to baseline before anything
    // else may touch it.
    let carrier_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::new()
            .frequency(CARRIER_FREQ_HZ.Hz())
            .resolution(Resolution::Bits8),
    )
    .context("LEDC carrier timer init")?;
    let channel = LedcDriver::new(
        peripherals.ledc.channel0,
        carrier_timer,
        peripherals.pins.gpio4,
    )
    .context("LEDC channel init")?;

    let mut duty = LedcDuty(channel);
    duty.set_duty(BASELINE_DUTY as u16)
        .map_err(|_| anyhow::anyhow!("baseline duty write failed"))?;

    let led_pin = peripherals.pins.gpio2.downgrade_output();
    let mut led = StatusLed(PinDriver::output(led_pin).context("status LED init")?);
    led.set_low();

    // Sample Clock: periodic callback at the sample period. The callback
    // keeps firing between pulses; the enable flag gates it. esp_timer has
    // 1 us resolution, so the 18.875 us period is rounded by the service.
    let timer_service = EspTaskTimerService::new().context("timer service init")?;
    let sample_timer = {
        let mut clock = SampleClock::new(&STATE, &FAULT);
        timer_service.timer(move || {
            if clock.tick(&mut duty).is_some() && !STATE.is_enabled() {
                // Just played the last sample of a window
                rt_info!(RT_LOG, timestamp_us(), "pulse {} complete", STATE.pulses());
            }
        })?
    };
    sample_timer.every(Duration::from_nanos(SAMPLE_PERIOD_NS))?;

    log::info!("beacon armed, 1 pulse/s");

    // Beacon Loop: never exits.
    let mut delay = FreeRtosDelay;
    let mut was_faulted = false;
    loop {
        beacon::run_cycle(&STATE, &mut led, &mut delay);

        // Housekeeping between cycles, off the RT path.
        RT_LOG.drain_to_log();

        let faulted = FAULT.is_active();
        if faulted && !was_faulted {
            log::error!(
                "beacon fault: {:?} (data={}, total={})",
                FAULT.code(),
                FAULT.data(),
                FAULT.count(),
            );
        }
        was_faulted = faulted;
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    // Firmware entry point; only meaningful on ESP-IDF targets.
}
