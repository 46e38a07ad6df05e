//! Home-cycle controller
//!
//! One call to [`Panel::run_cycle`] is one pass of the main loop:
//!
//! 1. sample the power monitor and host statistics once
//! 2. render Home and let it stand for the refresh period
//! 3. show the QR page while the center key is held
//! 4. show the directional page while a joystick input is held
//! 5. return to Home and let the shutdown guard look at the sample
//!
//! Holding is level based. A held page is re-polled every dwell period
//! until the input releases or the hold limit is reached.

use embedded_hal::delay::DelayNs;
use heapless::String;
use log::{debug, info, warn};

use super::content::PageContent;
use super::snapshot::SystemSnapshot;
use crate::config::{PanelConfig, TimingConfig, MAX_URL_LEN};
use crate::power::{BatteryRange, PowerReading, Telemetry};
use crate::safety::{GuardOutcome, ShutdownGuard};
use crate::state::{ButtonEvent, Event, Page};
use crate::traits::{
    AlarmOutput, ButtonInput, CenterButton, PageSink, PowerMonitor, PowerOff, SystemStats,
};

/// Everything the panel drives, handed over at construction
pub struct PanelParts<M, K, C, S, D, P, Y> {
    /// Power-monitoring sense chip
    pub monitor: M,
    /// Port expander: directional inputs plus buzzer/LED outputs
    pub keypad: K,
    /// Joystick center key
    pub center: C,
    /// Host statistics collector
    pub stats: S,
    /// Display
    pub sink: D,
    pub power_off: P,
    pub delay: Y,
}

/// What happened during one home cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub telemetry: Telemetry,
    /// Directional or QR page held during the cycle, if any
    pub held: Option<Page>,
    /// Whether a hold was cut short by the hold limit
    pub hold_timed_out: bool,
    pub guard: GuardOutcome,
}

/// The status panel
pub struct Panel<M, K, C, S, D, P, Y> {
    parts: PanelParts<M, K, C, S, D, P, Y>,
    page: Page,
    guard: ShutdownGuard,
    timing: TimingConfig,
    battery: BatteryRange,
    connect_url: String<MAX_URL_LEN>,
    last_reading: Option<PowerReading>,
    monitor_ready: bool,
}

impl<M, K, C, S, D, P, Y> Panel<M, K, C, S, D, P, Y>
where
    M: PowerMonitor,
    K: ButtonInput + AlarmOutput,
    C: CenterButton,
    S: SystemStats,
    D: PageSink,
    P: PowerOff,
    Y: DelayNs,
{
    pub fn new(parts: PanelParts<M, K, C, S, D, P, Y>, config: &PanelConfig) -> Self {
        Self {
            parts,
            page: Page::Home,
            guard: ShutdownGuard::new(config.shutdown),
            timing: config.timing,
            battery: config.battery,
            connect_url: config.connect.url.clone(),
            last_reading: None,
            monitor_ready: false,
        }
    }

    /// Current page
    pub fn page(&self) -> Page {
        self.page
    }

    pub fn guard(&self) -> &ShutdownGuard {
        &self.guard
    }

    /// Most recent successful power reading
    pub fn last_reading(&self) -> Option<&PowerReading> {
        self.last_reading.as_ref()
    }

    /// Access the owned collaborators
    pub fn parts(&self) -> &PanelParts<M, K, C, S, D, P, Y> {
        &self.parts
    }

    pub fn parts_mut(&mut self) -> &mut PanelParts<M, K, C, S, D, P, Y> {
        &mut self.parts
    }

    /// Sample the power monitor, (re)initializing it first if needed
    pub fn refresh_telemetry(&mut self) -> Telemetry {
        if !self.monitor_ready {
            match self.parts.monitor.initialize() {
                Ok(profile) => {
                    info!(
                        "Power monitor initialized, calibration {}",
                        profile.calibration_value
                    );
                    self.monitor_ready = true;
                }
                Err(e) => {
                    warn!("Power monitor init failed: {}", e);
                    return self.stale();
                }
            }
        }

        match self.parts.monitor.read(&self.battery) {
            Ok(reading) => {
                debug!(
                    "Power: {:.2} V {:.1} mA {:.3} W {:.1}%",
                    reading.bus_voltage_v,
                    reading.current_ma,
                    reading.power_w,
                    reading.battery_percent
                );
                self.last_reading = Some(reading);
                Telemetry::Fresh(reading)
            }
            Err(e) => {
                warn!("Power sample failed: {}", e);
                // Reprogram on the next cycle in case the chip was reset
                self.monitor_ready = false;
                self.stale()
            }
        }
    }

    fn stale(&self) -> Telemetry {
        Telemetry::Stale {
            last: self.last_reading,
        }
    }

    /// Run one home cycle
    pub fn run_cycle(&mut self) -> CycleReport {
        self.page = self.page.transition(Event::HomeCycle);

        let telemetry = self.refresh_telemetry();
        let snapshot = self.parts.stats.snapshot();

        self.show(Page::Home, &snapshot, &telemetry);
        self.parts.delay.delay_ms(self.timing.home_refresh_ms);

        let mut held = None;
        let mut hold_timed_out = false;

        if let Some((page, timed_out)) = self.hold_center(&snapshot, &telemetry) {
            held = Some(page);
            hold_timed_out |= timed_out;
        }
        if let Some((page, timed_out)) = self.hold_buttons(&snapshot, &telemetry) {
            held = Some(page);
            hold_timed_out |= timed_out;
        }

        let guard = self.guard.evaluate(
            &telemetry,
            &mut self.parts.keypad,
            &mut self.parts.sink,
            &mut self.parts.power_off,
            &mut self.parts.delay,
        );

        CycleReport {
            telemetry,
            held,
            hold_timed_out,
            guard,
        }
    }

    /// Show the QR page for as long as the center key stays down
    fn hold_center(
        &mut self,
        snapshot: &SystemSnapshot,
        telemetry: &Telemetry,
    ) -> Option<(Page, bool)> {
        if !self.parts.center.is_pressed() {
            return None;
        }

        info!("Center key held, showing connect code");
        self.page = self.page.transition(Event::CenterHeld);
        self.show(self.page, snapshot, telemetry);

        let mut elapsed: u32 = 0;
        let mut timed_out = false;
        loop {
            self.parts.delay.delay_ms(self.timing.qr_dwell_ms);
            elapsed = elapsed.saturating_add(self.timing.qr_dwell_ms);

            if !self.parts.center.is_pressed() {
                break;
            }
            if elapsed >= self.timing.max_hold_ms {
                warn!("Center key held for {} ms, returning home", elapsed);
                timed_out = true;
                break;
            }
        }

        self.page = self.page.transition(Event::CenterReleased);
        Some((Page::ConnectQr, timed_out))
    }

    /// Show the page for the held joystick direction until release
    fn hold_buttons(
        &mut self,
        snapshot: &SystemSnapshot,
        telemetry: &Telemetry,
    ) -> Option<(Page, bool)> {
        let mut event = self.poll_buttons();
        if !event.is_pressed() {
            return None;
        }

        let mut last_held = self.page;
        let mut elapsed: u32 = 0;
        let mut timed_out = false;

        while event.is_pressed() {
            let next = self.page.transition(Event::Button(event));
            if next != self.page {
                info!("{:?} held, showing {:?}", event, next);
                self.page = next;
                self.show(next, snapshot, telemetry);
            }
            last_held = self.page;

            self.parts.delay.delay_ms(self.timing.dwell_ms);
            event = self.poll_buttons();
            self.parts.delay.delay_ms(self.timing.release_poll_ms);

            elapsed = elapsed
                .saturating_add(self.timing.dwell_ms)
                .saturating_add(self.timing.release_poll_ms);
            if event.is_pressed() && elapsed >= self.timing.max_hold_ms {
                warn!("{:?} held for {} ms, returning home", event, elapsed);
                timed_out = true;
                break;
            }
        }

        self.page = self.page.transition(Event::Button(ButtonEvent::None));
        Some((last_held, timed_out))
    }

    /// Poll the port; a failed read counts as released
    fn poll_buttons(&mut self) -> ButtonEvent {
        match self.parts.keypad.poll() {
            Ok(event) => event,
            Err(e) => {
                warn!("Button poll failed: {}", e);
                ButtonEvent::None
            }
        }
    }

    fn show(&mut self, page: Page, snapshot: &SystemSnapshot, telemetry: &Telemetry) {
        let content = PageContent::for_page(page, snapshot, telemetry, &self.connect_url);
        if let Err(e) = self.parts.sink.show(&content) {
            warn!("Failed to render {:?}: {:?}", page, e);
        }
    }
}
