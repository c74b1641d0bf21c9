//! Battery voltage estimation through the sense divider

use crate::config::BatteryFrontEnd;

/// Estimates below this are treated as "no battery seen".
pub const MIN_ESTIMATE_VOLTS: f32 = 0.0001;

/// Converts averaged ADC counts into the uncorrected battery voltage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryDivider {
    front_end: BatteryFrontEnd,
}

impl BatteryDivider {
    pub const fn new(front_end: BatteryFrontEnd) -> Self {
        Self { front_end }
    }

    /// Vbat = Vadc * (R1 + R2) / R2
    pub fn ratio(&self) -> f32 {
        (self.front_end.r1_ohms + self.front_end.r2_ohms) / self.front_end.r2_ohms
    }

    /// Voltage at the ADC pin for an averaged count.
    pub fn pin_volts(&self, average_counts: f32) -> f32 {
        average_counts / self.front_end.adc_full_scale * self.front_end.reference_volts
    }

    /// Battery voltage implied by an averaged count, before correction.
    pub fn estimate(&self, average_counts: f32) -> f32 {
        self.pin_volts(average_counts) * self.ratio()
    }

    /// Correction factor mapping `estimate` onto `known_volts`.
    ///
    /// Falls back to the neutral 1.0 when the estimate is too small to
    /// divide by.
    pub fn correction(&self, known_volts: f32, estimate: f32) -> f32 {
        if estimate > MIN_ESTIMATE_VOLTS {
            known_volts / estimate
        } else {
            1.0
        }
    }

    /// Charge level in percent, linear over the configured span.
    pub fn percent(&self, volts: f32) -> u8 {
        let span = self.front_end.full_volts - self.front_end.empty_volts;
        if span <= 0.0 {
            return 0;
        }
        let fraction = (volts - self.front_end.empty_volts) / span;
        (fraction.clamp(0.0, 1.0) * 100.0 + 0.5) as u8
    }
}
