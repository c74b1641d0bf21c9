//! Device configuration
//!
//! Every tunable constant of the monitor lives in [`DeviceConfig`]. The
//! defaults match the shipped hardware; a board may keep an encoded copy
//! and load it with [`DeviceConfig::decode`].

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::calibration::BatchSpec;

/// Character columns of the LCD.
pub const LCD_COLUMNS: u8 = 20;

/// Character rows of the LCD. The menu shows one entry per row.
pub const LCD_ROWS: u8 = 4;

/// Namespace the calibration store is opened under.
pub const CALIBRATION_NAMESPACE: &str = "calib";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config does not fit the output buffer")]
    Encode,
    #[error("config blob is malformed")]
    Decode,
}

/// Resistor divider and ADC front end of the battery sense line.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BatteryFrontEnd {
    /// ADC full-scale count (12-bit on the ESP32).
    pub adc_full_scale: f32,
    /// ADC reference voltage.
    pub reference_volts: f32,
    /// Upper divider resistor, ohms.
    pub r1_ohms: f32,
    /// Lower divider resistor, ohms.
    pub r2_ohms: f32,
    /// Voltage shown as 0 %.
    pub empty_volts: f32,
    /// Voltage shown as 100 %.
    pub full_volts: f32,
}

impl Default for BatteryFrontEnd {
    fn default() -> Self {
        Self {
            adc_full_scale: 4095.0,
            reference_volts: 3.3,
            r1_ohms: 10_000.0,
            r2_ohms: 10_000.0,
            empty_volts: 3.30,
            full_volts: 4.20,
        }
    }
}

/// Sample count and spacing for each calibration operation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BatchProfile {
    pub tare: BatchSpec,
    pub raw_read: BatchSpec,
    pub one_point: BatchSpec,
    pub battery_calibrate: BatchSpec,
    pub battery_read: BatchSpec,
    pub accel_zero: BatchSpec,
}

impl Default for BatchProfile {
    fn default() -> Self {
        Self {
            tare: BatchSpec::new(32, 20),
            raw_read: BatchSpec::new(32, 10),
            one_point: BatchSpec::new(32, 10),
            battery_calibrate: BatchSpec::new(8, 20),
            battery_read: BatchSpec::new(8, 10),
            accel_zero: BatchSpec::new(128, 5),
        }
    }
}

/// Refresh and hold periods of the screens, in milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTiming {
    /// Status, time and measurement views.
    pub live_refresh_ms: u32,
    /// Connectivity view.
    pub connectivity_refresh_ms: u32,
    /// Result message after a calibration action.
    pub notice_hold_ms: u32,
    /// Confirmation after switching language.
    pub language_hold_ms: u32,
    /// Weather location card before the forecast pages.
    pub location_card_ms: u32,
}

impl Default for ScreenTiming {
    fn default() -> Self {
        Self {
            live_refresh_ms: 1000,
            connectivity_refresh_ms: 200,
            notice_hold_ms: 800,
            language_hold_ms: 500,
            location_card_ms: 2000,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DeviceConfig {
    /// Menu rows visible at once.
    pub visible_rows: u8,
    /// Minimum spacing between two reported button presses.
    pub debounce_ms: u32,
    pub battery: BatteryFrontEnd,
    pub batches: BatchProfile,
    pub timing: ScreenTiming,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            visible_rows: LCD_ROWS,
            debounce_ms: 120,
            battery: BatteryFrontEnd::default(),
            batches: BatchProfile::default(),
            timing: ScreenTiming::default(),
        }
    }
}

impl DeviceConfig {
    /// Encode into `buf`, returning the used prefix.
    pub fn encode<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|e| {
            log::error!("Failed to encode device config: {:?}", e);
            ConfigError::Encode
        })
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|e| {
            log::error!("Failed to decode device config: {:?}", e);
            ConfigError::Decode
        })
    }
}
