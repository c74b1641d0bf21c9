//! End-to-end menu flows driven through the public API only.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;

use hive_core::display::TextDisplay;
use hive_core::sensors::{AccelSample, SampleSource};
use hive_core::storage::{CalibrationStore, MemoryStore, keys};
use hive_core::telemetry::{
    ClockReading, Connectivity, Environment, ForecastEntry, Location, TelemetrySource, TimeSource,
};
use hive_core::text::{Language, TextId};
use hive_core::{
    AppMode, Button, ButtonLevels, ButtonPoller, DeviceConfig, HiveApp, Platform, SensorSet,
};

struct NoWait;

impl DelayNs for NoWait {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Load cell that always reads `raw`.
struct Cell {
    raw: i32,
    ready: bool,
}

impl SampleSource for Cell {
    type Sample = i32;
    const NAME: &'static str = "load cell";

    fn ready(&self) -> bool {
        self.ready
    }

    fn read_one(&mut self) -> i32 {
        self.raw
    }
}

struct Adc(u16);

impl SampleSource for Adc {
    type Sample = u16;
    const NAME: &'static str = "battery";

    fn ready(&self) -> bool {
        true
    }

    fn read_one(&mut self) -> u16 {
        self.0
    }
}

struct Level(AccelSample);

impl SampleSource for Level {
    type Sample = AccelSample;
    const NAME: &'static str = "accelerometer";

    fn ready(&self) -> bool {
        true
    }

    fn read_one(&mut self) -> AccelSample {
        self.0
    }
}

#[derive(Default)]
struct Lcd {
    rows: [String; 4],
}

impl Lcd {
    fn row(&self, row: usize) -> &str {
        self.rows[row].trim_end()
    }
}

impl TextDisplay for Lcd {
    fn clear(&mut self) {
        self.rows = Default::default();
    }

    fn write_line(&mut self, column: u8, row: u8, text: &str) {
        let line = &mut self.rows[usize::from(row)];
        let mut chars: Vec<char> = line.chars().collect();
        chars.resize(chars.len().max(usize::from(column)), ' ');
        for (i, c) in text.chars().enumerate() {
            let at = usize::from(column) + i;
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

struct Feed;

impl TelemetrySource for Feed {
    fn clock(&mut self) -> ClockReading {
        ClockReading::new("19-10-2026", "08:30:00", TimeSource::Lte)
    }

    fn environment(&mut self) -> Environment {
        Environment {
            temperature_internal: 35.0,
            humidity_internal: 60.0,
            temperature_external: 12.0,
            humidity_external: 80.0,
            pressure_hpa: 1015.0,
        }
    }

    fn connectivity(&mut self) -> Connectivity {
        Connectivity::Lte { rssi_dbm: -79 }
    }

    fn sd_card_present(&mut self) -> bool {
        false
    }

    fn location(&mut self) -> Location {
        Location::default()
    }

    fn forecast_len(&self) -> usize {
        1
    }

    fn forecast(&self, index: usize) -> Option<ForecastEntry> {
        (index == 0).then(|| ForecastEntry::new("20-10 09:00", "fog", 9.0, 95.0, 1016.0))
    }
}

struct Hive;

impl Platform for Hive {
    type Store = MemoryStore;
    type Delay = NoWait;
    type Scale = Cell;
    type Battery = Adc;
    type Accel = Level;
    type Display = Lcd;
    type Telemetry = Feed;
}

struct Device {
    app: HiveApp<Hive>,
    now: u64,
}

impl Device {
    fn boot() -> Self {
        let sensors = SensorSet {
            scale: Cell {
                raw: 50_000,
                ready: true,
            },
            battery: Adc(2048),
            accel: Level(AccelSample::new(0.25, -0.5, 9.81)),
        };
        let mut app = HiveApp::new(
            DeviceConfig::default(),
            MemoryStore::open("calib"),
            NoWait,
            sensors,
            Feed,
            Lcd::default(),
        )
        .unwrap();
        app.start();
        Self { app, now: 0 }
    }

    fn press(&mut self, button: Button) {
        self.now += 50;
        self.app.tick(button, Instant::from_millis(self.now));
    }

    fn idle(&mut self, ms: u64) {
        self.now += ms;
        self.app.tick(Button::None, Instant::from_millis(self.now));
    }

    fn current(&self) -> TextId {
        let nav = self.app.navigator();
        nav.tree().label(nav.current())
    }

    fn goto(&mut self, label: TextId) {
        for _ in 0..16 {
            if self.current() == label {
                return;
            }
            self.press(Button::Down);
        }
        panic!("{:?} not in the current group", label);
    }

    fn open(&mut self, label: TextId) {
        self.goto(label);
        self.press(Button::Select);
    }

    fn row(&self, row: usize) -> &str {
        self.app.display().row(row)
    }

    fn rows_contain(&self, needle: &str) -> bool {
        (0..4).any(|row| self.row(row).contains(needle))
    }
}

#[test]
fn test_tare_then_one_point_calibration() {
    let mut device = Device::boot();
    device.open(TextId::Calibration);
    device.open(TextId::Tare);

    assert_eq!(device.app.engine().scale_params().zero, 50_000);
    assert_eq!(device.app.engine().store().get_float(keys::SCALE_FACTOR, 0.0), 1.0);
    device.idle(1000);
    assert_eq!(device.app.mode(), AppMode::Menu);

    device.app.sensors_mut().scale.raw = 70_000;
    device.open(TextId::Calibrate);
    assert_eq!(device.row(1), "> 1.0 kg");
    for _ in 0..10 {
        device.press(Button::Up);
    }
    assert_eq!(device.row(1), "> 2.0 kg");
    device.press(Button::Select);
    assert_eq!(device.row(1), "DONE");

    let factor = device.app.engine().scale_params().factor;
    assert!((factor - 0.0001).abs() < 1e-9);
    device.idle(1000);
    assert_eq!(device.app.mode(), AppMode::Menu);

    device.open(TextId::Back);
    device.open(TextId::Status);
    assert!(device.row(1).contains("2.0 kg"));
}

#[test]
fn test_calibration_refused_when_reading_equals_zero() {
    let mut device = Device::boot();
    device.open(TextId::Calibration);
    device.open(TextId::Tare);
    device.idle(1000);

    device.open(TextId::Calibrate);
    device.press(Button::Select);
    assert_eq!(device.row(1), "FAILED");
    assert_eq!(device.app.engine().store().get_float(keys::SCALE_FACTOR, 0.0), 1.0);
}

#[test]
fn test_unready_scale_leaves_store_untouched() {
    let mut device = Device::boot();
    device.app.sensors_mut().scale.ready = false;
    device.open(TextId::Calibration);
    device.open(TextId::Tare);

    assert_eq!(device.row(1), "FAILED");
    assert_eq!(device.row(2), "SENSOR NOT READY");
    assert!(device.app.engine().store().is_empty());
}

#[test]
fn test_editor_back_cancels() {
    let mut device = Device::boot();
    device.open(TextId::Calibration);
    device.open(TextId::TempOffset);
    device.press(Button::Up);
    device.press(Button::Back);

    assert_eq!(device.app.mode(), AppMode::Menu);
    assert_eq!(device.current(), TextId::TempOffset);
    assert!(!device.app.engine().store().contains(keys::TEMPERATURE_OFFSET));
}

#[test]
fn test_accel_zero_then_summary() {
    let mut device = Device::boot();
    device.open(TextId::Calibration);
    device.open(TextId::AccelZero);
    device.idle(1000);

    let bias = device.app.engine().accel_bias();
    assert!((bias.x - 0.25).abs() < 1e-3);
    assert!((bias.z - 9.81).abs() < 1e-3);

    device.open(TextId::Summary);
    assert!(device.row(0).starts_with("Zero:0"));
    device.press(Button::Back);
    assert_eq!(device.current(), TextId::Summary);
}

#[test]
fn test_greek_menu_after_toggle() {
    let mut device = Device::boot();
    device.open(TextId::Language);
    device.idle(600);

    assert_eq!(device.app.language(), Language::Greek);
    assert_eq!(device.app.mode(), AppMode::Menu);
    assert!(device.rows_contain(">ΓΛΩΣΣΑ"));
}

#[test]
fn test_back_from_top_level_stays() {
    let mut device = Device::boot();
    device.press(Button::Back);
    assert_eq!(device.current(), TextId::Status);

    device.open(TextId::Back);
    assert_eq!(device.app.mode(), AppMode::Menu);
    assert_eq!(device.current(), TextId::Back);
}

#[test]
fn test_debounced_buttons_drive_the_menu() {
    let mut device = Device::boot();
    let mut poller = ButtonPoller::new(device.app.config().debounce_ms);

    let mut feed = |levels: ButtonLevels, at: u64, device: &mut Device| {
        let button = poller.poll(levels, Instant::from_millis(at));
        device.app.tick(button, Instant::from_millis(at));
    };

    feed(ButtonLevels::only(Button::Down), 0, &mut device);
    feed(ButtonLevels::only(Button::Down), 40, &mut device);
    feed(ButtonLevels::RELEASED, 200, &mut device);
    assert_eq!(device.current(), TextId::Time);

    feed(ButtonLevels::only(Button::Select), 400, &mut device);
    assert_eq!(device.app.mode(), AppMode::Screen);
    assert_eq!(device.row(2), "SRC:  LTE");
}
