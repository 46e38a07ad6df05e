//! Shutdown guard implementation
//!
//! `Armed` until the first fresh reading that is both below the battery
//! threshold and discharging. Then the warning page, the alarm pattern,
//! the settle delay and the power-off call run to completion, and the
//! guard stays `Triggered` for the rest of the process.

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::config::ShutdownConfig;
use crate::panel::PageContent;
use crate::power::{PowerReading, Telemetry};
use crate::traits::{AlarmOutput, BusError, PageSink, PowerOff};

/// Guard lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShutdownState {
    Armed,
    /// Terminal
    Triggered,
}

/// Result of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuardOutcome {
    /// Predicate false or telemetry stale; nothing happened
    Armed,
    /// This evaluation ran the shutdown sequence
    Triggered,
    /// A previous evaluation already ran it; nothing happened
    AlreadyTriggered,
}

/// One-shot low-battery shutdown
#[derive(Debug, Clone)]
pub struct ShutdownGuard {
    state: ShutdownState,
    config: ShutdownConfig,
}

impl ShutdownGuard {
    pub fn new(config: ShutdownConfig) -> Self {
        Self {
            state: ShutdownState::Armed,
            config,
        }
    }

    pub fn state(&self) -> ShutdownState {
        self.state
    }

    pub fn is_triggered(&self) -> bool {
        self.state == ShutdownState::Triggered
    }

    /// Battery below threshold while discharging
    pub fn is_low_battery(&self, reading: &PowerReading) -> bool {
        reading.battery_percent < self.config.threshold_percent && reading.current_ma < 0.0
    }

    /// Evaluate this cycle's telemetry, running the shutdown sequence if due
    ///
    /// Stale telemetry never triggers. Once triggered, further calls
    /// return [`GuardOutcome::AlreadyTriggered`] without side effects.
    pub fn evaluate<A, S, P, D>(
        &mut self,
        telemetry: &Telemetry,
        alarm: &mut A,
        sink: &mut S,
        power_off: &mut P,
        delay: &mut D,
    ) -> GuardOutcome
    where
        A: AlarmOutput,
        S: PageSink,
        P: PowerOff,
        D: DelayNs,
    {
        if self.is_triggered() {
            return GuardOutcome::AlreadyTriggered;
        }

        let reading = match telemetry.fresh() {
            Some(reading) => reading,
            None => return GuardOutcome::Armed,
        };

        if !self.is_low_battery(reading) {
            return GuardOutcome::Armed;
        }

        warn!(
            "Low battery: {:.1}% at {:.1} mA, shutting down",
            reading.battery_percent, reading.current_ma
        );
        self.state = ShutdownState::Triggered;
        self.run_sequence(alarm, sink, power_off, delay);
        GuardOutcome::Triggered
    }

    fn run_sequence<A, S, P, D>(&self, alarm: &mut A, sink: &mut S, power_off: &mut P, delay: &mut D)
    where
        A: AlarmOutput,
        S: PageSink,
        P: PowerOff,
        D: DelayNs,
    {
        if let Err(e) = sink.show(&PageContent::low_battery_warning()) {
            error!("Failed to show low battery warning: {:?}", e);
        }

        for cycle in 0..self.config.alarm_cycles {
            if let Err(e) = Self::alarm_on(alarm) {
                warn!("Alarm cycle {} on: {}", cycle, e);
            }
            delay.delay_ms(self.config.alarm_on_ms);

            if let Err(e) = Self::alarm_off(alarm) {
                warn!("Alarm cycle {} off: {}", cycle, e);
            }
            delay.delay_ms(self.config.alarm_off_ms);
        }

        delay.delay_ms(self.config.settle_ms);

        info!("Requesting power-off");
        match power_off.power_off() {
            Ok(()) => info!("Power-off requested"),
            Err(e) => error!("Power-off failed: {:?}", e),
        }
    }

    /// Buzzer and LED on; both writes are attempted even if the first fails
    pub fn alarm_on<A: AlarmOutput>(port: &mut A) -> Result<(), BusError> {
        let buzzer = port.set_buzzer(true);
        let led = port.set_led(true);
        buzzer.and(led)
    }

    /// Buzzer and LED off; both writes are attempted even if the first fails
    pub fn alarm_off<A: AlarmOutput>(port: &mut A) -> Result<(), BusError> {
        let buzzer = port.set_buzzer(false);
        let led = port.set_led(false);
        buzzer.and(led)
    }
}
