//! Collaborator types of one device build

use embedded_hal::delay::DelayNs;

use crate::display::TextDisplay;
use crate::sensors::{BatterySource, MotionSource, WeightSource};
use crate::storage::CalibrationStore;
use crate::telemetry::TelemetrySource;

/// Names the concrete collaborator types a [`HiveApp`](super::HiveApp) runs
/// on. The firmware, the simulator and the tests each provide one.
pub trait Platform {
    type Store: CalibrationStore;
    type Delay: DelayNs;
    type Scale: WeightSource;
    type Battery: BatterySource;
    type Accel: MotionSource;
    type Display: TextDisplay;
    type Telemetry: TelemetrySource;
}

/// The raw sample sources, owned together.
pub struct SensorSet<W, B, M> {
    pub scale: W,
    pub battery: B,
    pub accel: M,
}

/// Sensor set of a platform.
pub type PlatformSensors<P> = SensorSet<
    <P as Platform>::Scale,
    <P as Platform>::Battery,
    <P as Platform>::Accel,
>;
