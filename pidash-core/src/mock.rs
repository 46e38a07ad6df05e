//! Test doubles for the panel collaborators

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::panel::{PageContent, SystemSnapshot};
use crate::power::{CalibrationProfile, RawSample};
use crate::state::ButtonEvent;
use crate::traits::{
    AlarmOutput, BusError, ButtonInput, CenterButton, PageSink, PowerMonitor, PowerOff,
    PowerOffError, RenderError, SystemStats,
};

/// Power monitor replaying scripted samples, then repeating `idle`
pub struct MockMonitor {
    pub samples: VecDeque<Result<RawSample, BusError>>,
    pub idle: RawSample,
    pub init_error: Option<BusError>,
    pub init_calls: usize,
    pub sample_calls: usize,
    calibration: CalibrationProfile,
}

impl MockMonitor {
    pub fn new(idle: RawSample) -> Self {
        Self {
            samples: VecDeque::new(),
            idle,
            init_error: None,
            init_calls: 0,
            sample_calls: 0,
            calibration: CalibrationProfile::RANGE_32V_2A,
        }
    }
}

impl PowerMonitor for MockMonitor {
    fn initialize(&mut self) -> Result<CalibrationProfile, BusError> {
        self.init_calls += 1;
        match self.init_error {
            Some(e) => Err(e),
            None => Ok(self.calibration),
        }
    }

    fn sample(&mut self) -> Result<RawSample, BusError> {
        self.sample_calls += 1;
        self.samples.pop_front().unwrap_or(Ok(self.idle))
    }

    fn calibration(&self) -> &CalibrationProfile {
        &self.calibration
    }
}

/// Port expander stand-in: scripted polls plus an alarm write log
pub struct MockKeypad {
    pub polls: VecDeque<Result<ButtonEvent, BusError>>,
    pub poll_calls: usize,
    pub alarm_log: Vec<(&'static str, bool)>,
    pub alarm_error: Option<BusError>,
}

impl MockKeypad {
    pub fn new() -> Self {
        Self {
            polls: VecDeque::new(),
            poll_calls: 0,
            alarm_log: Vec::new(),
            alarm_error: None,
        }
    }

    pub fn script(&mut self, events: &[ButtonEvent]) {
        self.polls.extend(events.iter().copied().map(Ok));
    }

    fn record(&mut self, what: &'static str, on: bool) -> Result<(), BusError> {
        self.alarm_log.push((what, on));
        match self.alarm_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ButtonInput for MockKeypad {
    fn poll(&mut self) -> Result<ButtonEvent, BusError> {
        self.poll_calls += 1;
        self.polls.pop_front().unwrap_or(Ok(ButtonEvent::None))
    }
}

impl AlarmOutput for MockKeypad {
    fn set_buzzer(&mut self, on: bool) -> Result<(), BusError> {
        self.record("buzzer", on)
    }

    fn set_led(&mut self, on: bool) -> Result<(), BusError> {
        self.record("led", on)
    }
}

/// Center key replaying scripted levels, released once exhausted
pub struct MockCenter {
    pub levels: VecDeque<bool>,
    pub reads: usize,
}

impl MockCenter {
    pub fn new(levels: &[bool]) -> Self {
        Self {
            levels: levels.iter().copied().collect(),
            reads: 0,
        }
    }
}

impl CenterButton for MockCenter {
    fn is_pressed(&mut self) -> bool {
        self.reads += 1;
        self.levels.pop_front().unwrap_or(false)
    }
}

/// Returns the same snapshot every time
pub struct MockStats {
    pub snapshot: SystemSnapshot,
    pub calls: usize,
}

impl MockStats {
    pub fn new() -> Self {
        Self {
            snapshot: SystemSnapshot::default(),
            calls: 0,
        }
    }
}

impl SystemStats for MockStats {
    fn snapshot(&mut self) -> SystemSnapshot {
        self.calls += 1;
        self.snapshot.clone()
    }
}

/// Records every page it is asked to show
pub struct MockSink {
    pub shown: Vec<PageContent>,
    pub fail: bool,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            shown: Vec::new(),
            fail: false,
        }
    }

    pub fn titles(&self) -> Vec<&str> {
        self.shown.iter().map(|c| c.title.as_str()).collect()
    }
}

impl PageSink for MockSink {
    fn show(&mut self, content: &PageContent) -> Result<(), RenderError> {
        self.shown.push(content.clone());
        if self.fail {
            Err(RenderError::Communication)
        } else {
            Ok(())
        }
    }
}

/// Counts power-off requests
pub struct MockPowerOff {
    pub calls: usize,
    pub fail: bool,
}

impl MockPowerOff {
    pub fn new() -> Self {
        Self {
            calls: 0,
            fail: false,
        }
    }
}

impl PowerOff for MockPowerOff {
    fn power_off(&mut self) -> Result<(), PowerOffError> {
        self.calls += 1;
        if self.fail {
            Err(PowerOffError::ExitStatus(1))
        } else {
            Ok(())
        }
    }
}

/// Records requested sleeps instead of sleeping
pub struct MockDelay {
    pub calls: Vec<u32>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self { calls: Vec::new() }
    }

    pub fn total_ms(&self) -> u64 {
        self.calls.iter().map(|&ms| ms as u64).sum()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(ms);
    }
}
