//! Raw sample sources
//!
//! The drivers for the load cell amplifier, the battery ADC and the
//! accelerometer live with the board. The core only needs one raw reading
//! at a time plus a readiness flag that is checked before any batch starts.

use core::ops::{Add, Sub};

/// A sensor channel producing raw readings.
pub trait SampleSource {
    /// The raw reading type.
    type Sample: Copy;

    /// Short name used in logs and errors.
    const NAME: &'static str;

    /// Whether the sensor initialized and can be sampled.
    fn ready(&self) -> bool;

    /// Take one raw reading.
    fn read_one(&mut self) -> Self::Sample;
}

impl<T: SampleSource> SampleSource for &mut T {
    type Sample = T::Sample;
    const NAME: &'static str = T::NAME;

    fn ready(&self) -> bool {
        (**self).ready()
    }

    fn read_one(&mut self) -> Self::Sample {
        (**self).read_one()
    }
}

/// Marker for load cell sources (24-bit signed counts).
pub trait WeightSource: SampleSource<Sample = i32> {}
impl<T: SampleSource<Sample = i32>> WeightSource for T {}

/// Marker for the battery divider ADC (raw counts).
pub trait BatterySource: SampleSource<Sample = u16> {}
impl<T: SampleSource<Sample = u16>> BatterySource for T {}

/// Marker for the accelerometer (m/s² per axis).
pub trait MotionSource: SampleSource<Sample = AccelSample> {}
impl<T: SampleSource<Sample = AccelSample>> MotionSource for T {}

/// One accelerometer reading in m/s².
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl Add for AccelSample {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for AccelSample {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}
