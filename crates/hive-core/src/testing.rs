//! Fakes shared by the unit tests

use std::string::String as StdString;
use std::vec::Vec as StdVec;

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;

use crate::app::{Platform, PlatformSensors, SensorSet};
use crate::calibration::CalibrationEngine;
use crate::config::{BatteryFrontEnd, DeviceConfig};
use crate::display::TextDisplay;
use crate::screens::ScreenContext;
use crate::sensors::{AccelSample, SampleSource};
use crate::storage::MemoryStore;
use crate::telemetry::{
    ClockReading, Connectivity, Environment, ForecastEntry, Location, TelemetrySource, TimeSource,
};
use crate::text::Language;

/// Delay that returns immediately and tallies what was asked for.
#[derive(Debug, Default)]
pub struct NoDelay {
    pub total_ms: u64,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ms += u64::from(ns) / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}

/// Sample source replaying a fixed script, cycling when exhausted.
#[derive(Debug)]
pub struct Scripted<T: Copy + 'static> {
    samples: StdVec<T>,
    next: usize,
    pub ready: bool,
    pub reads: usize,
}

impl<T: Copy + 'static> Scripted<T> {
    pub fn new(samples: &[T]) -> Self {
        Self {
            samples: samples.to_vec(),
            next: 0,
            ready: true,
            reads: 0,
        }
    }

    pub fn not_ready(samples: &[T]) -> Self {
        Self {
            ready: false,
            ..Self::new(samples)
        }
    }

    pub fn set(&mut self, samples: &[T]) {
        self.samples = samples.to_vec();
        self.next = 0;
    }
}

impl<T: Copy + 'static> SampleSource for Scripted<T> {
    type Sample = T;
    const NAME: &'static str = "scripted";

    fn ready(&self) -> bool {
        self.ready
    }

    fn read_one(&mut self) -> T {
        let sample = self.samples[self.next % self.samples.len()];
        self.next += 1;
        self.reads += 1;
        sample
    }
}

/// Character grid that remembers what was written where.
#[derive(Debug)]
pub struct RecordingDisplay {
    pub rows: [StdString; 4],
    pub clears: usize,
    pub writes: usize,
    /// Text of the most recent `write_line`, as passed in.
    pub last_text: StdString,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self {
            rows: Default::default(),
            clears: 0,
            writes: 0,
            last_text: StdString::new(),
        }
    }
}

impl RecordingDisplay {
    /// Row contents with trailing padding removed.
    pub fn row(&self, row: usize) -> &str {
        self.rows[row].trim_end()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.rows.iter().any(|r| r.contains(needle))
    }
}

impl TextDisplay for RecordingDisplay {
    fn clear(&mut self) {
        self.clears += 1;
        for row in self.rows.iter_mut() {
            row.clear();
        }
    }

    fn write_line(&mut self, column: u8, row: u8, text: &str) {
        self.writes += 1;
        self.last_text = StdString::from(text);
        let Some(line) = self.rows.get_mut(usize::from(row)) else {
            return;
        };

        let mut chars: StdVec<char> = line.chars().collect();
        let start = usize::from(column);
        if chars.len() < start {
            chars.resize(start, ' ');
        }
        for (i, c) in text.chars().enumerate() {
            let at = start + i;
            if at >= 20 {
                break;
            }
            if at < chars.len() {
                chars[at] = c;
            } else {
                chars.push(c);
            }
        }
        *line = chars.into_iter().collect();
    }
}

/// Telemetry with fixed, editable values.
#[derive(Debug, Clone)]
pub struct FixedTelemetry {
    pub clock: ClockReading,
    pub environment: Environment,
    pub connectivity: Connectivity,
    pub sd_card: bool,
    pub location: Location,
    pub forecast: StdVec<ForecastEntry>,
}

impl Default for FixedTelemetry {
    fn default() -> Self {
        Self {
            clock: ClockReading::new("19-10-2026", "12:00:00", TimeSource::Wifi),
            environment: Environment {
                temperature_internal: 34.5,
                humidity_internal: 61.0,
                temperature_external: 18.0,
                humidity_external: 72.0,
                pressure_hpa: 1012.0,
            },
            connectivity: Connectivity::Offline,
            sd_card: true,
            location: Location::default(),
            forecast: StdVec::new(),
        }
    }
}

impl TelemetrySource for FixedTelemetry {
    fn clock(&mut self) -> ClockReading {
        self.clock.clone()
    }

    fn environment(&mut self) -> Environment {
        self.environment
    }

    fn connectivity(&mut self) -> Connectivity {
        self.connectivity.clone()
    }

    fn sd_card_present(&mut self) -> bool {
        self.sd_card
    }

    fn location(&mut self) -> Location {
        self.location.clone()
    }

    fn forecast_len(&self) -> usize {
        self.forecast.len()
    }

    fn forecast(&self, index: usize) -> Option<ForecastEntry> {
        self.forecast.get(index).cloned()
    }
}

/// Platform made of the fakes above.
pub struct TestPlatform;

impl Platform for TestPlatform {
    type Store = MemoryStore;
    type Delay = NoDelay;
    type Scale = Scripted<i32>;
    type Battery = Scripted<u16>;
    type Accel = Scripted<AccelSample>;
    type Display = RecordingDisplay;
    type Telemetry = FixedTelemetry;
}

pub fn test_sensors() -> SensorSet<Scripted<i32>, Scripted<u16>, Scripted<AccelSample>> {
    SensorSet {
        scale: Scripted::new(&[100_000]),
        battery: Scripted::new(&[2048]),
        accel: Scripted::new(&[AccelSample::new(0.1, -0.2, 9.8)]),
    }
}

/// Owns one of everything a screen needs, for driving screens directly.
pub struct Rig {
    pub engine: CalibrationEngine<MemoryStore, NoDelay>,
    pub sensors: PlatformSensors<TestPlatform>,
    pub telemetry: FixedTelemetry,
    pub display: RecordingDisplay,
    pub config: DeviceConfig,
    pub language: Language,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            engine: CalibrationEngine::new(
                MemoryStore::open("calib"),
                NoDelay::default(),
                BatteryFrontEnd::default(),
            ),
            sensors: test_sensors(),
            telemetry: FixedTelemetry::default(),
            display: RecordingDisplay::default(),
            config: DeviceConfig::default(),
            language: Language::default(),
        }
    }

    pub fn ctx(&mut self, now_ms: u64) -> ScreenContext<'_, TestPlatform> {
        ScreenContext {
            engine: &mut self.engine,
            sensors: &mut self.sensors,
            telemetry: &mut self.telemetry,
            display: &mut self.display,
            config: &self.config,
            language: &mut self.language,
            now: Instant::from_millis(now_ms),
        }
    }
}
