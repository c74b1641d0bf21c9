//! Batch sampling: N readings with a fixed gap, reduced by arithmetic mean

use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};

use crate::sensors::{AccelSample, SampleSource};

/// How many readings a batch takes and how long it waits after each.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSpec {
    samples: u16,
    delay_ms: u16,
}

impl BatchSpec {
    /// A batch of `samples` readings (at least one) spaced `delay_ms` apart.
    pub const fn new(samples: u16, delay_ms: u16) -> Self {
        Self {
            samples: if samples == 0 { 1 } else { samples },
            delay_ms,
        }
    }

    pub const fn samples(&self) -> u16 {
        // Decoded configs bypass `new`.
        if self.samples == 0 { 1 } else { self.samples }
    }

    pub const fn delay_ms(&self) -> u16 {
        self.delay_ms
    }
}

/// Feed every reading of one batch to `accumulate`.
fn run_batch<S, D, F>(source: &mut S, delay: &mut D, batch: BatchSpec, mut accumulate: F)
where
    S: SampleSource,
    D: DelayNs,
    F: FnMut(S::Sample),
{
    for _ in 0..batch.samples() {
        accumulate(source.read_one());
        delay.delay_ms(u32::from(batch.delay_ms()));
    }
}

/// Mean of a batch of signed counts, truncated toward zero.
pub fn average_counts<S, D>(source: &mut S, delay: &mut D, batch: BatchSpec) -> i32
where
    S: SampleSource<Sample = i32>,
    D: DelayNs,
{
    let mut sum: i64 = 0;
    run_batch(source, delay, batch, |raw| sum += i64::from(raw));
    (sum / i64::from(batch.samples())) as i32
}

/// Mean of a batch of ADC counts.
pub fn average_adc<S, D>(source: &mut S, delay: &mut D, batch: BatchSpec) -> f32
where
    S: SampleSource<Sample = u16>,
    D: DelayNs,
{
    let mut sum: u32 = 0;
    run_batch(source, delay, batch, |raw| sum += u32::from(raw));
    sum as f32 / f32::from(batch.samples())
}

/// Per-axis mean of a batch of accelerometer readings.
pub fn average_accel<S, D>(source: &mut S, delay: &mut D, batch: BatchSpec) -> AccelSample
where
    S: SampleSource<Sample = AccelSample>,
    D: DelayNs,
{
    let mut sum = AccelSample::default();
    run_batch(source, delay, batch, |sample| sum = sum + sample);
    sum.scaled(1.0 / f32::from(batch.samples()))
}
