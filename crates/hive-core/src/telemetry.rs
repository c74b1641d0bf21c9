//! Read-only data coming from the rest of the device
//!
//! Clock, environment sensors, network state and the weather feed are
//! produced elsewhere (RTC/NTP, BME280/SHT, Wi-Fi and modem stacks, HTTP
//! client). The screens only read snapshots of them through
//! [`TelemetrySource`].

use heapless::String;

/// Fallback weather location (Athens).
pub const DEFAULT_LATITUDE: f32 = 37.983_81;
pub const DEFAULT_LONGITUDE: f32 = 23.727_539;

/// Where the wall clock was last synchronized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeSource {
    Wifi,
    Lte,
    #[default]
    None,
}

impl TimeSource {
    pub fn name(self) -> &'static str {
        match self {
            TimeSource::Wifi => "WIFI",
            TimeSource::Lte => "LTE",
            TimeSource::None => "NONE",
        }
    }
}

/// Formatted wall clock reading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClockReading {
    /// `DD-MM-YYYY`
    pub date: String<10>,
    /// `HH:MM:SS`
    pub time: String<8>,
    pub source: TimeSource,
    /// False until the clock was synchronized once.
    pub valid: bool,
}

impl ClockReading {
    /// A synchronized reading. Over-long fields are truncated.
    pub fn new(date: &str, time: &str, source: TimeSource) -> Self {
        Self {
            date: truncated(date),
            time: truncated(time),
            source,
            valid: true,
        }
    }

    pub fn invalid() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Environment {
    /// Inside the hive, °C.
    pub temperature_internal: f32,
    /// Inside the hive, %RH.
    pub humidity_internal: f32,
    /// Outside the hive, °C, before offset correction.
    pub temperature_external: f32,
    /// Outside the hive, %RH, before offset correction.
    pub humidity_external: f32,
    pub pressure_hpa: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Connectivity {
    Wifi {
        ssid: String<32>,
        rssi_dbm: i16,
    },
    Lte {
        rssi_dbm: i16,
    },
    #[default]
    Offline,
}

impl Connectivity {
    pub fn wifi(ssid: &str, rssi_dbm: i16) -> Self {
        Connectivity::Wifi {
            ssid: truncated(ssid),
            rssi_dbm,
        }
    }
}

/// Weather location as provisioned.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f32,
    pub longitude: f32,
    pub place: String<24>,
    pub country: String<4>,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            place: String::new(),
            country: String::new(),
        }
    }
}

/// One sample of the forecast feed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastEntry {
    pub date: String<20>,
    pub description: String<32>,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_hpa: f32,
}

impl ForecastEntry {
    pub fn new(
        date: &str,
        description: &str,
        temperature_c: f32,
        humidity_pct: f32,
        pressure_hpa: f32,
    ) -> Self {
        Self {
            date: truncated(date),
            description: truncated(description),
            temperature_c,
            humidity_pct,
            pressure_hpa,
        }
    }
}

/// Snapshot access to everything the screens show besides calibration.
pub trait TelemetrySource {
    fn clock(&mut self) -> ClockReading;
    fn environment(&mut self) -> Environment;
    fn connectivity(&mut self) -> Connectivity;
    fn sd_card_present(&mut self) -> bool;
    fn location(&mut self) -> Location;

    /// Number of forecast entries currently held. Zero means no data.
    fn forecast_len(&self) -> usize;
    fn forecast(&self, index: usize) -> Option<ForecastEntry>;
}

/// Copy as many whole characters of `s` as fit.
pub(crate) fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
