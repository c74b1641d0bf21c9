//! Screens behind the menu actions
//!
//! A screen owns the display from the moment its action is selected until
//! it reports [`ScreenControl::Exit`]. It never blocks: [`Screen::enter`]
//! runs once, then [`Screen::tick`] runs on every poll of the application
//! with the latest button and the current time. Live views refresh
//! themselves on a [`RefreshTimer`]; transient messages hold until a
//! deadline passes.
//!
//! [`ScreenWrapper`] stores any of the concrete screens so the application
//! can keep the active one without trait objects.

pub mod calibration;
pub mod clock;
pub mod connectivity;
pub mod info;
pub mod measurements;
pub mod status;
pub mod weather;

pub use calibration::{EditorKind, EditorScreen, RawValueScreen, TaskKind, TaskScreen};
pub use clock::ClockScreen;
pub use connectivity::ConnectivityScreen;
pub use info::{SdInfoScreen, SummaryScreen};
pub use measurements::MeasurementsScreen;
pub use status::StatusScreen;
pub use weather::WeatherScreen;

use embassy_time::{Duration, Instant};

use crate::app::{Platform, PlatformSensors};
use crate::calibration::CalibrationEngine;
use crate::config::DeviceConfig;
use crate::display::{TextDisplay, write_row};
use crate::input::Button;
use crate::menu::MenuAction;
use crate::sensors::SampleSource;
use crate::text::{Language, TextId, text};

/// Whether a screen keeps the display after a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenControl {
    Continue,
    Exit,
}

/// Everything a screen may touch during one call.
pub struct ScreenContext<'a, P: Platform> {
    pub engine: &'a mut CalibrationEngine<P::Store, P::Delay>,
    pub sensors: &'a mut PlatformSensors<P>,
    pub telemetry: &'a mut P::Telemetry,
    pub display: &'a mut P::Display,
    pub config: &'a DeviceConfig,
    pub language: &'a mut Language,
    pub now: Instant,
}

impl<P: Platform> ScreenContext<'_, P> {
    pub fn text(&self, id: TextId) -> &'static str {
        text(id, *self.language)
    }

    pub fn clear(&mut self) {
        self.display.clear();
    }

    /// Replace a whole display row.
    pub fn row(&mut self, row: u8, line: &str) {
        write_row(self.display, row, line);
    }

    pub fn back_hint(&mut self, row: u8) {
        let hint = self.text(TextId::BackHint);
        self.row(row, hint);
    }

    /// Point in time `ms` from now.
    pub fn after_ms(&self, ms: u32) -> Instant {
        self.now + Duration::from_millis(u64::from(ms))
    }

    /// One raw load cell reading through the stored calibration.
    pub fn live_weight(&mut self) -> Option<f32> {
        if !self.sensors.scale.ready() {
            return None;
        }
        let raw = self.sensors.scale.read_one();
        Some(self.engine.weight_from_raw(raw))
    }

    /// Calibrated battery voltage and charge percent.
    pub fn live_battery(&mut self) -> Option<(f32, u8)> {
        let volts = self
            .engine
            .read_battery_voltage(&mut self.sensors.battery, self.config.batches.battery_read)
            .ok()?;
        Some((volts, self.engine.battery_percent(volts)))
    }
}

pub trait Screen {
    /// Draw the first frame and run any on-entry work.
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl;

    /// Handle one poll.
    fn tick<P: Platform>(&mut self, button: Button, ctx: &mut ScreenContext<'_, P>)
    -> ScreenControl;
}

/// Periodic redraw trigger.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTimer {
    period: Duration,
    last: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period: Duration::from_millis(u64::from(period_ms)),
            last: None,
        }
    }

    /// True once per period. The first call is always due.
    pub fn due(&mut self, now: Instant) -> bool {
        let due = match self.last {
            None => true,
            // A clock that jumped backwards restarts the period.
            Some(last) => now
                .checked_duration_since(last)
                .is_none_or(|elapsed| elapsed >= self.period),
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

/// Whether a displayed reading moved enough to be rewritten.
pub(crate) fn changed(old: Option<f32>, new: Option<f32>) -> bool {
    match (old, new) {
        (Some(a), Some(b)) => {
            let d = a - b;
            d > 0.01 || d < -0.01
        }
        (None, None) => false,
        _ => true,
    }
}

/// Stores the concrete screen behind the active menu action.
pub enum ScreenWrapper {
    Status(StatusScreen),
    Clock(ClockScreen),
    Measurements(MeasurementsScreen),
    Weather(WeatherScreen),
    Connectivity(ConnectivityScreen),
    SdInfo(SdInfoScreen),
    Summary(SummaryScreen),
    Task(TaskScreen),
    RawValue(RawValueScreen),
    Editor(EditorScreen),
}

impl ScreenWrapper {
    /// Screen that runs `action`. `Back` has none; the navigator handles it.
    pub fn for_action(action: MenuAction, config: &DeviceConfig) -> Option<Self> {
        let timing = &config.timing;
        let screen = match action {
            MenuAction::Status => Self::Status(StatusScreen::new(timing.live_refresh_ms)),
            MenuAction::Time => Self::Clock(ClockScreen::new(timing.live_refresh_ms)),
            MenuAction::Measurements => {
                Self::Measurements(MeasurementsScreen::new(timing.live_refresh_ms))
            }
            MenuAction::Weather => Self::Weather(WeatherScreen::new(timing.location_card_ms)),
            MenuAction::Connectivity => {
                Self::Connectivity(ConnectivityScreen::new(timing.connectivity_refresh_ms))
            }
            MenuAction::SdInfo => Self::SdInfo(SdInfoScreen),
            MenuAction::Summary => Self::Summary(SummaryScreen::default()),
            MenuAction::ToggleLanguage => {
                Self::Task(TaskScreen::new(TaskKind::ToggleLanguage, timing.language_hold_ms))
            }
            MenuAction::Tare => Self::Task(TaskScreen::new(TaskKind::Tare, timing.notice_hold_ms)),
            MenuAction::AccelZero => {
                Self::Task(TaskScreen::new(TaskKind::AccelZero, timing.notice_hold_ms))
            }
            MenuAction::RawValue => Self::RawValue(RawValueScreen::default()),
            MenuAction::CalibrateKnownWeight => Self::Editor(EditorScreen::new(
                EditorKind::KnownWeight,
                timing.notice_hold_ms,
            )),
            MenuAction::CalibrateBattery => Self::Editor(EditorScreen::new(
                EditorKind::BatteryVolts,
                timing.notice_hold_ms,
            )),
            MenuAction::TemperatureOffset => Self::Editor(EditorScreen::new(
                EditorKind::TemperatureOffset,
                timing.notice_hold_ms,
            )),
            MenuAction::HumidityOffset => Self::Editor(EditorScreen::new(
                EditorKind::HumidityOffset,
                timing.notice_hold_ms,
            )),
            MenuAction::Back => return None,
        };
        Some(screen)
    }
}

impl Screen for ScreenWrapper {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        match self {
            ScreenWrapper::Status(screen) => screen.enter(ctx),
            ScreenWrapper::Clock(screen) => screen.enter(ctx),
            ScreenWrapper::Measurements(screen) => screen.enter(ctx),
            ScreenWrapper::Weather(screen) => screen.enter(ctx),
            ScreenWrapper::Connectivity(screen) => screen.enter(ctx),
            ScreenWrapper::SdInfo(screen) => screen.enter(ctx),
            ScreenWrapper::Summary(screen) => screen.enter(ctx),
            ScreenWrapper::Task(screen) => screen.enter(ctx),
            ScreenWrapper::RawValue(screen) => screen.enter(ctx),
            ScreenWrapper::Editor(screen) => screen.enter(ctx),
        }
    }

    fn tick<P: Platform>(
        &mut self,
        button: Button,
        ctx: &mut ScreenContext<'_, P>,
    ) -> ScreenControl {
        match self {
            ScreenWrapper::Status(screen) => screen.tick(button, ctx),
            ScreenWrapper::Clock(screen) => screen.tick(button, ctx),
            ScreenWrapper::Measurements(screen) => screen.tick(button, ctx),
            ScreenWrapper::Weather(screen) => screen.tick(button, ctx),
            ScreenWrapper::Connectivity(screen) => screen.tick(button, ctx),
            ScreenWrapper::SdInfo(screen) => screen.tick(button, ctx),
            ScreenWrapper::Summary(screen) => screen.tick(button, ctx),
            ScreenWrapper::Task(screen) => screen.tick(button, ctx),
            ScreenWrapper::RawValue(screen) => screen.tick(button, ctx),
            ScreenWrapper::Editor(screen) => screen.tick(button, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_timer_fires_once_per_period() {
        let mut timer = RefreshTimer::new(1000);
        assert!(timer.due(Instant::from_millis(0)));
        assert!(!timer.due(Instant::from_millis(999)));
        assert!(timer.due(Instant::from_millis(1000)));
        assert!(!timer.due(Instant::from_millis(1500)));
        assert!(timer.due(Instant::from_millis(2100)));
    }

    #[test]
    fn test_refresh_timer_recovers_from_backward_clock() {
        let mut timer = RefreshTimer::new(1000);
        assert!(timer.due(Instant::from_millis(5000)));
        assert!(timer.due(Instant::from_millis(10)));
        assert!(!timer.due(Instant::from_millis(20)));
    }

    #[test]
    fn test_changed_threshold() {
        assert!(!changed(Some(1.0), Some(1.005)));
        assert!(changed(Some(1.0), Some(1.02)));
        assert!(changed(None, Some(0.0)));
        assert!(changed(Some(0.0), None));
        assert!(!changed(None, None));
    }

    #[test]
    fn test_back_action_has_no_screen() {
        let config = DeviceConfig::default();
        assert!(ScreenWrapper::for_action(MenuAction::Back, &config).is_none());
        assert!(ScreenWrapper::for_action(MenuAction::Tare, &config).is_some());
    }
}
