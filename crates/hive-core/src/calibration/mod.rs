//! Calibration engine
//!
//! Turns batches of raw, noisy sensor readings into persisted correction
//! parameters, and applies those parameters when converting raw readings
//! into physical values.
//!
//! Every operation follows the same pattern: check the sensor is ready,
//! average a batch, then write each resulting parameter straight through to
//! the [`CalibrationStore`]. Nothing is cached here; the store is the only
//! source of truth, so a crash between two writes leaves each key at either
//! its old or its new value.
//!
//! | Parameter          | Key          | Default when absent |
//! |--------------------|--------------|---------------------|
//! | scale zero         | `scale_zero` | 0                   |
//! | scale factor       | `scale_fac`  | 0.0 (uncalibrated)  |
//! | battery factor     | `batt_fac`   | 1.0                 |
//! | accel bias x/y/z   | `acc_b*`     | 0.0                 |
//! | temperature offset | `temp_off`   | 0.0                 |
//! | humidity offset    | `hum_off`    | 0.0                 |

pub mod batch;
pub mod battery;

pub use batch::BatchSpec;
pub use battery::BatteryDivider;

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use log::{info, warn};
use thiserror_no_std::Error;

use crate::config::BatteryFrontEnd;
use crate::sensors::{AccelSample, BatterySource, MotionSource, SampleSource, WeightSource};
use crate::storage::{CalibrationStore, StoreError, keys};

/// Capacity of the formatted calibration summary.
pub const SUMMARY_LEN: usize = 128;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("{sensor} sensor is not ready")]
    SensorNotReady { sensor: &'static str },
    #[error("reference reading {raw} equals the stored zero")]
    InvalidReference { raw: i32 },
    #[error("calibration store write failed: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CalibrationError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Load cell parameters as currently persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    pub zero: i32,
    pub factor: f32,
}

impl ScaleParams {
    /// A zero factor is the "never calibrated" marker.
    pub fn is_calibrated(&self) -> bool {
        self.factor != 0.0
    }
}

/// Stateless calibration math over an injected store.
pub struct CalibrationEngine<S, D> {
    store: S,
    delay: D,
    divider: BatteryDivider,
}

impl<S, D> CalibrationEngine<S, D>
where
    S: CalibrationStore,
    D: DelayNs,
{
    pub fn new(store: S, delay: D, battery: BatteryFrontEnd) -> Self {
        Self {
            store,
            delay,
            divider: BatteryDivider::new(battery),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn divider(&self) -> &BatteryDivider {
        &self.divider
    }

    pub fn into_parts(self) -> (S, D) {
        (self.store, self.delay)
    }

    fn ensure_ready<T: SampleSource>(source: &T) -> Result<(), CalibrationError> {
        if source.ready() {
            Ok(())
        } else {
            warn!("{} sensor not ready, calibration refused", T::NAME);
            Err(CalibrationError::SensorNotReady { sensor: T::NAME })
        }
    }

    // ------------------------------------------------------------------
    // Load cell
    // ------------------------------------------------------------------

    /// Capture the zero baseline and persist it.
    ///
    /// Seeds a neutral scale factor of 1.0 when none was ever stored so that
    /// weight conversion has something to multiply by. Returns the zero.
    pub fn tare<W: WeightSource>(
        &mut self,
        scale: &mut W,
        batch: BatchSpec,
    ) -> Result<i32, CalibrationError> {
        Self::ensure_ready(scale)?;

        let zero = batch::average_counts(scale, &mut self.delay, batch);
        self.store.put_int(keys::SCALE_ZERO, zero)?;

        if self.store.get_float(keys::SCALE_FACTOR, f32::NAN).is_nan() {
            self.store.put_float(keys::SCALE_FACTOR, 1.0)?;
            info!("No scale factor stored yet, seeded 1.0");
        }

        info!("Tare complete, zero = {}", zero);
        Ok(zero)
    }

    /// Averaged raw load cell reading. Nothing is persisted.
    pub fn read_scale_raw<W: WeightSource>(
        &mut self,
        scale: &mut W,
        batch: BatchSpec,
    ) -> Result<i32, CalibrationError> {
        Self::ensure_ready(scale)?;
        Ok(batch::average_counts(scale, &mut self.delay, batch))
    }

    /// One-point calibration against a reference weight on the scale.
    ///
    /// `factor = known_kg / (raw_known - zero)`. Refused without writing when
    /// the reading equals the stored zero. The zero is rewritten unchanged
    /// alongside the new factor. Returns the factor.
    pub fn calibrate_one_point<W: WeightSource>(
        &mut self,
        scale: &mut W,
        known_kg: f32,
        batch: BatchSpec,
    ) -> Result<f32, CalibrationError> {
        Self::ensure_ready(scale)?;

        let zero = self.store.get_int(keys::SCALE_ZERO, 0);
        let raw_known = batch::average_counts(scale, &mut self.delay, batch);

        if raw_known == zero {
            warn!("One-point calibration refused: reading {} equals zero", raw_known);
            return Err(CalibrationError::InvalidReference { raw: raw_known });
        }

        let factor = known_kg / (i64::from(raw_known) - i64::from(zero)) as f32;
        self.store.put_float(keys::SCALE_FACTOR, factor)?;
        self.store.put_int(keys::SCALE_ZERO, zero)?;

        info!(
            "Scale calibrated: {} kg at raw {} (zero {}), factor = {}",
            known_kg, raw_known, zero, factor
        );
        Ok(factor)
    }

    /// `(raw - zero) * factor`, or 0.0 while uncalibrated.
    pub fn weight_from_raw(&self, raw: i32) -> f32 {
        let params = self.scale_params();
        if !params.is_calibrated() {
            return 0.0;
        }
        (i64::from(raw) - i64::from(params.zero)) as f32 * params.factor
    }

    pub fn scale_params(&self) -> ScaleParams {
        ScaleParams {
            zero: self.store.get_int(keys::SCALE_ZERO, 0),
            factor: self.store.get_float(keys::SCALE_FACTOR, 0.0),
        }
    }

    // ------------------------------------------------------------------
    // Battery
    // ------------------------------------------------------------------

    /// Derive and persist the battery correction from a meter reading.
    /// Returns the factor.
    pub fn calibrate_battery<B: BatterySource>(
        &mut self,
        adc: &mut B,
        known_volts: f32,
        batch: BatchSpec,
    ) -> Result<f32, CalibrationError> {
        Self::ensure_ready(adc)?;

        let average = batch::average_adc(adc, &mut self.delay, batch);
        let estimate = self.divider.estimate(average);
        let factor = self.divider.correction(known_volts, estimate);

        self.store.put_float(keys::BATTERY_FACTOR, factor)?;
        info!(
            "Battery calibrated: {} V measured as {} V, factor = {}",
            known_volts, estimate, factor
        );
        Ok(factor)
    }

    /// Corrected battery voltage.
    pub fn read_battery_voltage<B: BatterySource>(
        &mut self,
        adc: &mut B,
        batch: BatchSpec,
    ) -> Result<f32, CalibrationError> {
        Self::ensure_ready(adc)?;

        let average = batch::average_adc(adc, &mut self.delay, batch);
        Ok(self.divider.estimate(average) * self.battery_factor())
    }

    pub fn battery_factor(&self) -> f32 {
        self.store.get_float(keys::BATTERY_FACTOR, 1.0)
    }

    pub fn battery_percent(&self, volts: f32) -> u8 {
        self.divider.percent(volts)
    }

    // ------------------------------------------------------------------
    // Accelerometer
    // ------------------------------------------------------------------

    /// Capture the resting reading of each axis as its bias.
    pub fn calibrate_accel_zero<M: MotionSource>(
        &mut self,
        accel: &mut M,
        batch: BatchSpec,
    ) -> Result<AccelSample, CalibrationError> {
        Self::ensure_ready(accel)?;

        let bias = batch::average_accel(accel, &mut self.delay, batch);
        self.store.put_float(keys::ACCEL_BIAS_X, bias.x)?;
        self.store.put_float(keys::ACCEL_BIAS_Y, bias.y)?;
        self.store.put_float(keys::ACCEL_BIAS_Z, bias.z)?;

        info!("Accel bias captured: {:?}", bias);
        Ok(bias)
    }

    pub fn accel_bias(&self) -> AccelSample {
        AccelSample::new(
            self.store.get_float(keys::ACCEL_BIAS_X, 0.0),
            self.store.get_float(keys::ACCEL_BIAS_Y, 0.0),
            self.store.get_float(keys::ACCEL_BIAS_Z, 0.0),
        )
    }

    // ------------------------------------------------------------------
    // Environment offsets
    // ------------------------------------------------------------------

    pub fn set_temperature_offset(&mut self, delta_c: f32) -> Result<(), CalibrationError> {
        self.store.put_float(keys::TEMPERATURE_OFFSET, delta_c)?;
        info!("Temperature offset set to {} C", delta_c);
        Ok(())
    }

    pub fn temperature_offset(&self) -> f32 {
        self.store.get_float(keys::TEMPERATURE_OFFSET, 0.0)
    }

    pub fn set_humidity_offset(&mut self, delta_pct: f32) -> Result<(), CalibrationError> {
        self.store.put_float(keys::HUMIDITY_OFFSET, delta_pct)?;
        info!("Humidity offset set to {} %", delta_pct);
        Ok(())
    }

    pub fn humidity_offset(&self) -> f32 {
        self.store.get_float(keys::HUMIDITY_OFFSET, 0.0)
    }

    /// One-line dump of every parameter, for display and logs.
    pub fn summary(&self) -> heapless::String<SUMMARY_LEN> {
        let scale = self.scale_params();
        let bias = self.accel_bias();

        let mut out = heapless::String::new();
        let written = write!(
            out,
            "Zero:{} Scale:{:.6} Bfac:{:.4} Toff:{:.2} Hoff:{:.2} Acc:{:.2},{:.2},{:.2}",
            scale.zero,
            scale.factor,
            self.battery_factor(),
            self.temperature_offset(),
            self.humidity_offset(),
            bias.x,
            bias.y,
            bias.z,
        );
        if written.is_err() {
            // Only reachable with absurd stored floats.
            warn!("Calibration summary cut at {} bytes", out.len());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::{NoDelay, Scripted};

    type Engine = CalibrationEngine<MemoryStore, NoDelay>;

    fn engine() -> Engine {
        CalibrationEngine::new(
            MemoryStore::open("calib"),
            NoDelay::default(),
            BatteryFrontEnd::default(),
        )
    }

    fn close(a: f32, b: f32, eps: f32) -> bool {
        let d = a - b;
        d < eps && d > -eps
    }

    const ONE: BatchSpec = BatchSpec::new(1, 0);

    #[test]
    fn test_tare_persists_zero_and_seeds_factor() {
        let mut engine = engine();
        let mut scale = Scripted::new(&[99_990, 100_010]);

        assert_eq!(engine.tare(&mut scale, BatchSpec::new(2, 20)), Ok(100_000));
        assert_eq!(engine.scale_params(), ScaleParams { zero: 100_000, factor: 1.0 });
        assert_eq!(scale.reads, 2);
    }

    #[test]
    fn test_tare_keeps_existing_factor() {
        let mut engine = engine();
        engine.store_mut().put_float(keys::SCALE_FACTOR, 0.02).unwrap();

        let mut scale = Scripted::new(&[5_000]);
        engine.tare(&mut scale, ONE).unwrap();

        assert_eq!(engine.scale_params().factor, 0.02);
    }

    #[test]
    fn test_tare_then_zero_reads_no_weight() {
        let mut engine = engine();
        engine.store_mut().put_float(keys::SCALE_FACTOR, 123.0).unwrap();

        let mut scale = Scripted::new(&[42_424]);
        let zero = engine.tare(&mut scale, ONE).unwrap();

        assert_eq!(engine.weight_from_raw(zero), 0.0);
    }

    #[test]
    fn test_tare_refused_when_scale_not_ready() {
        let mut engine = engine();
        let mut scale = Scripted::not_ready(&[1]);

        assert_eq!(
            engine.tare(&mut scale, ONE),
            Err(CalibrationError::SensorNotReady { sensor: "scripted" })
        );
        assert_eq!(scale.reads, 0);
        assert_eq!(engine.store().writes(), 0);
    }

    #[test]
    fn test_one_point_calibration() {
        let mut engine = engine();
        engine.store_mut().put_int(keys::SCALE_ZERO, 100_000).unwrap();
        let mut scale = Scripted::new(&[100_500]);

        let factor = engine.calibrate_one_point(&mut scale, 5.0, ONE).unwrap();

        assert!(close(factor, 0.01, 1e-7));
        assert!(close(engine.weight_from_raw(100_500), 5.0, 1e-4));
        assert_eq!(engine.scale_params().zero, 100_000);
    }

    #[test]
    fn test_one_point_rewrites_zero() {
        let mut engine = engine();
        engine.store_mut().put_int(keys::SCALE_ZERO, 100_000).unwrap();
        let before = engine.store().writes();

        let mut scale = Scripted::new(&[100_500]);
        engine.calibrate_one_point(&mut scale, 5.0, ONE).unwrap();

        assert_eq!(engine.store().writes(), before + 2);
    }

    #[test]
    fn test_one_point_refused_at_zero_keeps_factor() {
        let mut engine = engine();
        engine.store_mut().put_int(keys::SCALE_ZERO, 100_000).unwrap();
        engine.store_mut().put_float(keys::SCALE_FACTOR, 0.03).unwrap();
        let before = engine.store().writes();

        let mut scale = Scripted::new(&[100_000]);
        assert_eq!(
            engine.calibrate_one_point(&mut scale, 5.0, ONE),
            Err(CalibrationError::InvalidReference { raw: 100_000 })
        );
        assert_eq!(engine.scale_params().factor, 0.03);
        assert_eq!(engine.store().writes(), before);
    }

    #[test]
    fn test_one_point_refused_when_scale_not_ready() {
        let mut engine = engine();
        let mut scale = Scripted::not_ready(&[100_500]);
        assert!(matches!(
            engine.calibrate_one_point(&mut scale, 5.0, ONE),
            Err(CalibrationError::SensorNotReady { .. })
        ));
        assert_eq!(engine.store().writes(), 0);
    }

    #[test]
    fn test_uncalibrated_weight_is_zero() {
        let mut engine = engine();
        engine.store_mut().put_int(keys::SCALE_ZERO, 10).unwrap();

        for raw in [i32::MIN, -1, 0, 10, 500_000, i32::MAX] {
            assert_eq!(engine.weight_from_raw(raw), 0.0);
        }
        assert!(!engine.scale_params().is_calibrated());
    }

    #[test]
    fn test_raw_read_has_no_side_effects() {
        let mut engine = engine();
        let mut scale = Scripted::new(&[10, 20, 30]);

        assert_eq!(engine.read_scale_raw(&mut scale, BatchSpec::new(3, 10)), Ok(20));
        assert_eq!(engine.store().writes(), 0);
    }

    #[test]
    fn test_battery_calibration_round_trip() {
        let mut engine = engine();
        let mut adc = Scripted::new(&[2048u16]);

        let factor = engine
            .calibrate_battery(&mut adc, 3.0, BatchSpec::new(8, 20))
            .unwrap();
        assert!(close(factor, 0.909, 0.001));

        let volts = engine
            .read_battery_voltage(&mut adc, BatchSpec::new(8, 10))
            .unwrap();
        assert!(close(volts, 3.0, 0.001));
    }

    #[test]
    fn test_battery_calibration_with_dead_input_is_neutral() {
        let mut engine = engine();
        let mut adc = Scripted::new(&[0u16]);

        assert_eq!(engine.calibrate_battery(&mut adc, 3.7, ONE), Ok(1.0));
        assert_eq!(engine.battery_factor(), 1.0);
    }

    #[test]
    fn test_battery_uncalibrated_factor_is_neutral() {
        let mut engine = engine();
        let mut adc = Scripted::new(&[2048u16]);
        let volts = engine.read_battery_voltage(&mut adc, ONE).unwrap();
        assert!(close(volts, 3.3008, 0.001));
    }

    #[test]
    fn test_accel_single_sample_is_the_bias() {
        let mut engine = engine();
        let mut accel = Scripted::new(&[AccelSample::new(0.12, -0.34, 9.79)]);

        engine.calibrate_accel_zero(&mut accel, ONE).unwrap();

        assert_eq!(engine.accel_bias(), AccelSample::new(0.12, -0.34, 9.79));
    }

    #[test]
    fn test_accel_refused_when_not_ready() {
        let mut engine = engine();
        let mut accel = Scripted::not_ready(&[AccelSample::default()]);

        assert!(engine.calibrate_accel_zero(&mut accel, ONE).is_err());
        assert_eq!(engine.store().writes(), 0);
        assert_eq!(engine.accel_bias(), AccelSample::default());
    }

    #[test]
    fn test_offsets_are_persisted() {
        let mut engine = engine();
        assert_eq!(engine.temperature_offset(), 0.0);

        engine.set_temperature_offset(-0.5).unwrap();
        engine.set_humidity_offset(2.5).unwrap();

        assert_eq!(engine.temperature_offset(), -0.5);
        assert_eq!(engine.humidity_offset(), 2.5);
        assert_eq!(engine.store().get_float(keys::TEMPERATURE_OFFSET, 0.0), -0.5);
    }

    #[test]
    fn test_store_full_surfaces_as_error() {
        let mut engine = CalibrationEngine::new(
            MemoryStore::<1>::open("calib"),
            NoDelay::default(),
            BatteryFrontEnd::default(),
        );
        let mut scale = Scripted::new(&[7]);

        assert_eq!(
            engine.tare(&mut scale, ONE),
            Err(CalibrationError::Store(StoreError::Full))
        );
        assert_eq!(engine.scale_params().zero, 7);
    }

    #[test]
    fn test_summary_lists_every_parameter() {
        let mut engine = engine();
        engine.store_mut().put_int(keys::SCALE_ZERO, 100_000).unwrap();
        engine.store_mut().put_float(keys::SCALE_FACTOR, 0.01).unwrap();

        assert_eq!(
            engine.summary().as_str(),
            "Zero:100000 Scale:0.010000 Bfac:1.0000 Toff:0.00 Hoff:0.00 Acc:0.00,0.00,0.00"
        );
    }

    #[test]
    fn test_oversized_summary_is_cut_cleanly() {
        let mut engine = engine();
        engine.store_mut().put_int(keys::SCALE_ZERO, i32::MIN).unwrap();
        engine.store_mut().put_float(keys::SCALE_FACTOR, f32::MAX).unwrap();
        engine.store_mut().put_float(keys::BATTERY_FACTOR, f32::MAX).unwrap();

        let full = std::format!(
            "Zero:{} Scale:{:.6} Bfac:{:.4} Toff:0.00 Hoff:0.00 Acc:0.00,0.00,0.00",
            i32::MIN,
            f32::MAX,
            f32::MAX
        );
        assert!(full.len() > SUMMARY_LEN);

        let summary = engine.summary();
        assert!(summary.len() <= SUMMARY_LEN);
        assert!(full.starts_with(summary.as_str()));
        assert!(summary.starts_with("Zero:-2147483648 Scale:"));
    }
}
