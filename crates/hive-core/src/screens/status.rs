//! Live status: clock, weight and battery

use heapless::String;

use super::{RefreshTimer, Screen, ScreenContext, ScreenControl, changed};
use crate::telemetry::TelemetrySource;
use crate::app::Platform;
use crate::display::{Line, format_line};
use crate::input::Button;
use crate::text::TextId;

/// Shown while the wall clock was never synchronized.
pub const EPOCH_LINE: &str = "01-01-1970  00:00:00";

pub struct StatusScreen {
    timer: RefreshTimer,
    clock: Option<String<24>>,
    weight: Option<Option<f32>>,
    battery: Option<Option<(f32, u8)>>,
}

impl StatusScreen {
    pub fn new(refresh_ms: u32) -> Self {
        Self {
            timer: RefreshTimer::new(refresh_ms),
            clock: None,
            weight: None,
            battery: None,
        }
    }

    fn refresh<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) {
        let reading = ctx.telemetry.clock();
        let mut clock = String::<24>::new();
        if reading.valid {
            clock.push_str(&reading.date).ok();
            clock.push(' ').ok();
            clock.push_str(&reading.time).ok();
        } else {
            clock.push_str(EPOCH_LINE).ok();
        }
        if self.clock.as_ref() != Some(&clock) {
            ctx.row(0, &clock);
            self.clock = Some(clock);
        }

        let weight = ctx.live_weight();
        if self.weight.is_none_or(|old| changed(old, weight)) {
            let line = weight_line(ctx.text(TextId::WeightLabel), weight);
            ctx.row(1, &line);
            self.weight = Some(weight);
        }

        let battery = ctx.live_battery();
        let battery_changed = match (self.battery, battery) {
            (Some(Some((old_v, old_p))), Some((v, p))) => {
                changed(Some(old_v), Some(v)) || old_p != p
            }
            (Some(None), None) => false,
            _ => true,
        };
        if battery_changed {
            let line = battery_line(ctx.text(TextId::BatteryLabel), battery);
            ctx.row(2, &line);
            self.battery = Some(battery);
        }
    }
}

pub(crate) fn weight_line(label: &str, weight: Option<f32>) -> Line {
    match weight {
        Some(kg) => format_line(format_args!("{} {:5.1} kg", label, kg)),
        None => format_line(format_args!("{}   ---", label)),
    }
}

pub(crate) fn battery_line(label: &str, battery: Option<(f32, u8)>) -> Line {
    match battery {
        Some((volts, percent)) => format_line(format_args!("{}{:.2}V {:3}%", label, volts, percent)),
        None => format_line(format_args!("{} ---", label)),
    }
}

impl Screen for StatusScreen {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        ctx.clear();
        ctx.back_hint(3);
        self.timer.due(ctx.now);
        self.refresh(ctx);
        ScreenControl::Continue
    }

    fn tick<P: Platform>(
        &mut self,
        button: Button,
        ctx: &mut ScreenContext<'_, P>,
    ) -> ScreenControl {
        if button.closes_view() {
            return ScreenControl::Exit;
        }
        if self.timer.due(ctx.now) {
            self.refresh(ctx);
        }
        ScreenControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CalibrationStore, keys};
    use crate::telemetry::ClockReading;
    use crate::testing::Rig;

    #[test]
    fn test_first_frame() {
        let mut rig = Rig::new();
        rig.engine.store_mut().put_int(keys::SCALE_ZERO, 99_000).unwrap();
        rig.engine.store_mut().put_float(keys::SCALE_FACTOR, 0.01).unwrap();

        let mut screen = StatusScreen::new(1000);
        assert_eq!(screen.enter(&mut rig.ctx(0)), ScreenControl::Continue);

        assert_eq!(rig.display.row(0), "19-10-2026 12:00:00");
        assert_eq!(rig.display.row(1), "WEIGHT:  10.0 kg");
        assert_eq!(rig.display.row(2), "BATTERY:3.30V   0%");
        assert_eq!(rig.display.row(3), "< BACK");
    }

    #[test]
    fn test_invalid_clock_shows_epoch() {
        let mut rig = Rig::new();
        rig.telemetry.clock = ClockReading::invalid();

        let mut screen = StatusScreen::new(1000);
        screen.enter(&mut rig.ctx(0));
        assert_eq!(rig.display.row(0), EPOCH_LINE);
    }

    #[test]
    fn test_unchanged_rows_are_not_rewritten() {
        let mut rig = Rig::new();
        let mut screen = StatusScreen::new(1000);
        screen.enter(&mut rig.ctx(0));
        let writes = rig.display.writes;

        screen.tick(Button::None, &mut rig.ctx(1000));
        assert_eq!(rig.display.writes, writes);

        rig.telemetry.clock = ClockReading::new("19-10-2026", "12:00:01", Default::default());
        screen.tick(Button::None, &mut rig.ctx(2000));
        assert_eq!(rig.display.writes, writes + 1);
        assert_eq!(rig.display.row(0), "19-10-2026 12:00:01");
    }

    #[test]
    fn test_refresh_waits_for_period() {
        let mut rig = Rig::new();
        let mut screen = StatusScreen::new(1000);
        screen.enter(&mut rig.ctx(0));

        rig.telemetry.clock = ClockReading::new("20-10-2026", "00:00:00", Default::default());
        screen.tick(Button::None, &mut rig.ctx(500));
        assert_eq!(rig.display.row(0), "19-10-2026 12:00:00");

        screen.tick(Button::None, &mut rig.ctx(1000));
        assert_eq!(rig.display.row(0), "20-10-2026 00:00:00");
    }

    #[test]
    fn test_back_and_select_exit() {
        let mut rig = Rig::new();
        let mut screen = StatusScreen::new(1000);
        screen.enter(&mut rig.ctx(0));

        assert_eq!(screen.tick(Button::Up, &mut rig.ctx(10)), ScreenControl::Continue);
        assert_eq!(screen.tick(Button::Select, &mut rig.ctx(20)), ScreenControl::Exit);
        assert_eq!(screen.tick(Button::Back, &mut rig.ctx(30)), ScreenControl::Exit);
    }

    #[test]
    fn test_scale_not_ready_shows_dashes() {
        let mut rig = Rig::new();
        rig.sensors.scale.ready = false;

        let mut screen = StatusScreen::new(1000);
        screen.enter(&mut rig.ctx(0));
        assert_eq!(rig.display.row(1), "WEIGHT:   ---");
    }
}
