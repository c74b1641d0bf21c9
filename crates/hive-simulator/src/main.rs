//! Terminal simulator for the beehive monitor.
//!
//! Runs the hive-core application against synthetic sensors and prints the
//! 20x4 character display to stdout whenever it changes. Calibration values
//! are kept in a snapshot file so they survive restarts, just like the
//! flash-backed store on the device.
//!
//! # Key bindings
//!
//! Type a key and press Enter. Several keys on one line are replayed in order.
//!
//! | Key       | Action                          |
//! |-----------|---------------------------------|
//! | w / k     | UP                              |
//! | s / j     | DOWN                            |
//! | d / l / ⏎ | SELECT                          |
//! | a / h     | BACK                            |
//! | + / -     | Put / take 1 kg on the scale    |
//! | q         | Quit                            |
//!
//! # Options
//!
//! Run with `--help` for the command line.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use chrono::{Local, TimeDelta};
use clap::Parser;
use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use hive_core::config::{CALIBRATION_NAMESPACE, LCD_COLUMNS, LCD_ROWS};
use hive_core::display::TextDisplay;
use hive_core::sensors::{AccelSample, SampleSource};
use hive_core::storage::MemoryStore;
use hive_core::telemetry::{
    ClockReading, Connectivity, Environment, ForecastEntry, Location, TelemetrySource, TimeSource,
};
use hive_core::{Button, ButtonLevels, ButtonPoller, DeviceConfig, HiveApp, Platform, SensorSet};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Period of the application poll loop.
const TICK: Duration = Duration::from_millis(50);

const DEFAULT_STORE_PATH: &str = "hive-calib.bin";

/// Room for the encoded calibration snapshot.
const SNAPSHOT_CAPACITY: usize = 1024;

/// Load cell counts with nothing on the platform.
const SCALE_OFFSET: i32 = 84_210;

/// Load cell counts per kilogram.
const COUNTS_PER_KG: f32 = 21_450.0;

// ---------------------------------------------------------------------------
// Synthetic sensors
// ---------------------------------------------------------------------------

/// xorshift32 noise, enough to make averaging visible.
struct Noise(u32);

impl Noise {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Uniform in `-amplitude..=amplitude`.
    fn around(&mut self, amplitude: f32) -> f32 {
        let unit = self.next() as f32 / u32::MAX as f32;
        (unit * 2.0 - 1.0) * amplitude
    }
}

struct MockScale {
    load_kg: f32,
    noise: Noise,
}

impl SampleSource for MockScale {
    type Sample = i32;
    const NAME: &'static str = "load cell";

    fn ready(&self) -> bool {
        true
    }

    fn read_one(&mut self) -> i32 {
        let counts = self.load_kg * COUNTS_PER_KG + self.noise.around(40.0);
        SCALE_OFFSET + counts as i32
    }
}

struct MockBattery {
    noise: Noise,
}

impl SampleSource for MockBattery {
    type Sample = u16;
    const NAME: &'static str = "battery";

    fn ready(&self) -> bool {
        true
    }

    fn read_one(&mut self) -> u16 {
        (2_300.0 + self.noise.around(12.0)) as u16
    }
}

struct MockAccel {
    noise: Noise,
}

impl SampleSource for MockAccel {
    type Sample = AccelSample;
    const NAME: &'static str = "accelerometer";

    fn ready(&self) -> bool {
        true
    }

    fn read_one(&mut self) -> AccelSample {
        AccelSample::new(
            0.12 + self.noise.around(0.05),
            -0.08 + self.noise.around(0.05),
            9.79 + self.noise.around(0.05),
        )
    }
}

/// Blocking delay, as on the device.
struct ThreadDelay;

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

/// Local wall clock plus slowly drifting weather.
struct MockTelemetry {
    started: std::time::Instant,
}

impl MockTelemetry {
    fn elapsed_secs(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

impl TelemetrySource for MockTelemetry {
    fn clock(&mut self) -> ClockReading {
        let now = Local::now();
        let date = now.format("%d-%m-%Y").to_string();
        let time = now.format("%H:%M:%S").to_string();
        ClockReading::new(&date, &time, TimeSource::Wifi)
    }

    fn environment(&mut self) -> Environment {
        let t = self.elapsed_secs();
        Environment {
            temperature_internal: 34.5 + 0.4 * (t / 60.0).sin(),
            humidity_internal: 62.0 + 2.0 * (t / 90.0).cos(),
            temperature_external: 18.0 + 3.0 * (t / 120.0).sin(),
            humidity_external: 70.0 + 8.0 * (t / 150.0).cos(),
            pressure_hpa: 1012.0 + 2.0 * (t / 300.0).sin(),
        }
    }

    fn connectivity(&mut self) -> Connectivity {
        let rssi = -60 - (self.elapsed_secs() as i16 % 7);
        Connectivity::wifi("apiary-sim", rssi)
    }

    fn sd_card_present(&mut self) -> bool {
        true
    }

    fn location(&mut self) -> Location {
        let mut location = Location::default();
        if location.place.push_str("Athens").is_err() {
            debug!("Place name does not fit, left empty");
        }
        if location.country.push_str("GR").is_err() {
            debug!("Country code does not fit, left empty");
        }
        location
    }

    fn forecast_len(&self) -> usize {
        4
    }

    fn forecast(&self, index: usize) -> Option<ForecastEntry> {
        const SKIES: [&str; 4] = ["clear sky", "few clouds", "light rain", "overcast clouds"];

        let sky = SKIES.get(index)?;
        let at = Local::now() + TimeDelta::hours(3 * (index as i64 + 1));
        let step = index as f32;
        Some(ForecastEntry::new(
            &at.format("%d-%m %H:00").to_string(),
            sky,
            17.0 - 1.5 * step,
            65.0 + 6.0 * step,
            1013.0 - step,
        ))
    }
}

// ---------------------------------------------------------------------------
// Terminal display
// ---------------------------------------------------------------------------

/// 20x4 character grid printed as a framed block.
struct TerminalLcd {
    rows: [[char; LCD_COLUMNS as usize]; LCD_ROWS as usize],
    dirty: bool,
}

impl TerminalLcd {
    fn new() -> Self {
        Self {
            rows: [[' '; LCD_COLUMNS as usize]; LCD_ROWS as usize],
            dirty: true,
        }
    }

    fn present(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let border: String = "-".repeat(usize::from(LCD_COLUMNS));
        let mut out = std::io::stdout().lock();
        let mut frame = format!("+{border}+\n");
        for row in &self.rows {
            frame.push('|');
            frame.extend(row.iter());
            frame.push_str("|\n");
        }
        frame.push_str(&format!("+{border}+\n"));

        if let Err(e) = out.write_all(frame.as_bytes()).and_then(|_| out.flush()) {
            error!("Failed to print display: {}", e);
        }
    }
}

impl TextDisplay for TerminalLcd {
    fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(' ');
        }
        self.dirty = true;
    }

    fn write_line(&mut self, column: u8, row: u8, text: &str) {
        let Some(line) = self.rows.get_mut(usize::from(row)) else {
            return;
        };
        for (cell, c) in line.iter_mut().skip(usize::from(column)).zip(text.chars()) {
            *cell = c;
        }
        self.dirty = true;
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

struct Simulator;

impl Platform for Simulator {
    type Store = MemoryStore;
    type Delay = ThreadDelay;
    type Scale = MockScale;
    type Battery = MockBattery;
    type Accel = MockAccel;
    type Display = TerminalLcd;
    type Telemetry = MockTelemetry;
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

enum Key {
    Press(Button),
    AddLoad(f32),
    Quit,
}

fn key_for(c: char) -> Option<Key> {
    match c {
        'w' | 'k' => Some(Key::Press(Button::Up)),
        's' | 'j' => Some(Key::Press(Button::Down)),
        'd' | 'l' => Some(Key::Press(Button::Select)),
        'a' | 'h' => Some(Key::Press(Button::Back)),
        '+' => Some(Key::AddLoad(1.0)),
        '-' => Some(Key::AddLoad(-1.0)),
        'q' => Some(Key::Quit),
        _ => None,
    }
}

/// Read stdin on its own thread so the poll loop never blocks.
fn spawn_keyboard() -> Receiver<Key> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            let keys: Vec<Key> = if line.is_empty() {
                vec![Key::Press(Button::Select)]
            } else {
                line.chars().filter_map(key_for).collect()
            };
            for key in keys {
                if tx.send(key).is_err() {
                    return;
                }
            }
        }
        if tx.send(Key::Quit).is_err() {
            debug!("Key channel closed before end of input");
        }
    });
    rx
}

/// Turns queued key presses into pin levels the way a finger would: held
/// until the poller reports it, then released for one debounce window.
struct Keypad {
    queue: VecDeque<Button>,
    held: Option<Button>,
    released_until: Option<Instant>,
    debounce: embassy_time::Duration,
}

impl Keypad {
    fn new(debounce_ms: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            held: None,
            released_until: None,
            // One extra tick so the release is sampled.
            debounce: embassy_time::Duration::from_millis(
                u64::from(debounce_ms) + TICK.as_millis() as u64,
            ),
        }
    }

    fn push(&mut self, button: Button) {
        self.queue.push_back(button);
    }

    fn levels(&mut self, now: Instant) -> ButtonLevels {
        if self.released_until.is_some_and(|until| now < until) {
            return ButtonLevels::RELEASED;
        }
        self.released_until = None;
        if self.held.is_none() {
            self.held = self.queue.pop_front();
        }
        self.held.map_or(ButtonLevels::RELEASED, ButtonLevels::only)
    }

    fn reported(&mut self, button: Button, now: Instant) {
        if !button.is_none() && self.held == Some(button) {
            self.held = None;
            self.released_until = Some(now + self.debounce);
        }
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Terminal simulator for the beehive monitor.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Options {
    /// Calibration snapshot file, created on the first calibration write.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_STORE_PATH)]
    store: PathBuf,

    /// Postcard-encoded device configuration. Defaults are used without it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> DeviceConfig {
    let Some(path) = path else {
        return DeviceConfig::default();
    };
    match std::fs::read(path) {
        Ok(bytes) => DeviceConfig::decode(&bytes).unwrap_or_else(|e| {
            warn!("Config {} unusable ({}), using defaults", path.display(), e);
            DeviceConfig::default()
        }),
        Err(e) => {
            warn!("Cannot read config {}: {}", path.display(), e);
            DeviceConfig::default()
        }
    }
}

fn load_store(path: &Path) -> MemoryStore {
    match std::fs::read(path) {
        Ok(bytes) => match MemoryStore::restore(&bytes) {
            Ok(store) => {
                info!("Restored {} calibration values from {}", store.len(), path.display());
                store
            }
            Err(e) => {
                warn!(
                    "Calibration snapshot {} unusable ({}), starting empty",
                    path.display(),
                    e
                );
                MemoryStore::open(CALIBRATION_NAMESPACE)
            }
        },
        Err(_) => {
            info!("No calibration snapshot at {}, starting empty", path.display());
            MemoryStore::open(CALIBRATION_NAMESPACE)
        }
    }
}

fn save_store(store: &MemoryStore, path: &Path) {
    let mut buf = [0u8; SNAPSHOT_CAPACITY];
    match store.snapshot(&mut buf) {
        Ok(bytes) => {
            if let Err(e) = std::fs::write(path, bytes) {
                error!("Failed to write {}: {}", path.display(), e);
            }
        }
        Err(e) => error!("Failed to encode calibration snapshot: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let options = Options::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    info!("Starting hive monitor simulator");
    info!("Keys: w=UP  s=DOWN  d/Enter=SELECT  a=BACK  +/-=load  q=Quit");

    let config = load_config(options.config.as_deref());
    let store = load_store(&options.store);

    let sensors = SensorSet {
        scale: MockScale {
            load_kg: 0.0,
            noise: Noise(0x1234_5678),
        },
        battery: MockBattery {
            noise: Noise(0x9e37_79b9),
        },
        accel: MockAccel {
            noise: Noise(0x2545_f491),
        },
    };
    let telemetry = MockTelemetry {
        started: std::time::Instant::now(),
    };

    let mut keypad = Keypad::new(config.debounce_ms);
    let mut poller = ButtonPoller::new(config.debounce_ms);

    let mut app: HiveApp<Simulator> = match HiveApp::new(
        config,
        store,
        ThreadDelay,
        sensors,
        telemetry,
        TerminalLcd::new(),
    ) {
        Ok(app) => app,
        Err(e) => {
            error!("Menu construction failed: {}", e);
            return;
        }
    };

    let keys = spawn_keyboard();
    let mut saved_writes = app.engine().store().writes();

    app.start();

    'running: loop {
        let tick_start = std::time::Instant::now();
        let now = Instant::now();

        // --- Keyboard ------------------------------------------------------
        loop {
            match keys.try_recv() {
                Ok(Key::Press(button)) => keypad.push(button),
                Ok(Key::AddLoad(kg)) => {
                    let scale = &mut app.sensors_mut().scale;
                    scale.load_kg = (scale.load_kg + kg).max(0.0);
                    info!("Scale load now {:.1} kg", scale.load_kg);
                }
                Ok(Key::Quit) | Err(TryRecvError::Disconnected) => break 'running,
                Err(TryRecvError::Empty) => break,
            }
        }

        // --- Application tick ---------------------------------------------
        let button = poller.poll(keypad.levels(now), now);
        keypad.reported(button, now);
        app.tick(button, now);

        // --- Persist calibration writes -----------------------------------
        let writes = app.engine().store().writes();
        if writes != saved_writes {
            save_store(app.engine().store(), &options.store);
            saved_writes = writes;
        }

        // --- Render --------------------------------------------------------
        app.display_mut().present();

        // --- Pacing -------------------------------------------------------
        let elapsed = tick_start.elapsed();
        if elapsed < TICK {
            std::thread::sleep(TICK - elapsed);
        }
    }

    info!("Simulator exiting");
}
