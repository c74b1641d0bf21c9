//! Typed persistent key-value storage for calibration parameters
//!
//! The board backs [`CalibrationStore`] with its non-volatile preferences
//! partition; [`MemoryStore`] is the RAM implementation used by the
//! simulator and tests, and can be snapshotted to bytes to survive a
//! simulated power cycle.

pub mod memory;

pub use memory::MemoryStore;

use thiserror_no_std::Error;

/// Longest key the preferences backend accepts.
pub const MAX_KEY_LEN: usize = 15;

/// Stable key names of the persisted calibration parameters.
pub mod keys {
    pub const SCALE_ZERO: &str = "scale_zero";
    pub const SCALE_FACTOR: &str = "scale_fac";
    pub const BATTERY_FACTOR: &str = "batt_fac";
    pub const ACCEL_BIAS_X: &str = "acc_bx";
    pub const ACCEL_BIAS_Y: &str = "acc_by";
    pub const ACCEL_BIAS_Z: &str = "acc_bz";
    pub const TEMPERATURE_OFFSET: &str = "temp_off";
    pub const HUMIDITY_OFFSET: &str = "hum_off";
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("key exceeds 15 bytes")]
    KeyTooLong,
    #[error("store has no room for another key")]
    Full,
    #[error("store snapshot does not fit the buffer")]
    Encode,
    #[error("store snapshot is malformed")]
    Decode,
}

/// Persistent typed storage.
///
/// Reads never fail: a missing key (or a key holding the other type)
/// yields the caller's default. A successful write is durable when it
/// returns; there is no flush step.
pub trait CalibrationStore {
    fn get_int(&self, key: &str, default: i32) -> i32;

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), StoreError>;

    fn get_float(&self, key: &str, default: f32) -> f32;

    fn put_float(&mut self, key: &str, value: f32) -> Result<(), StoreError>;
}

impl<T: CalibrationStore + ?Sized> CalibrationStore for &mut T {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        (**self).get_int(key, default)
    }

    fn put_int(&mut self, key: &str, value: i32) -> Result<(), StoreError> {
        (**self).put_int(key, value)
    }

    fn get_float(&self, key: &str, default: f32) -> f32 {
        (**self).get_float(key, default)
    }

    fn put_float(&mut self, key: &str, value: f32) -> Result<(), StoreError> {
        (**self).put_float(key, value)
    }
}
