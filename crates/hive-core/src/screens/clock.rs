//! Date, time and time source

use super::{RefreshTimer, Screen, ScreenContext, ScreenControl};
use crate::telemetry::TelemetrySource;
use crate::app::Platform;
use crate::display::format_line;
use crate::input::Button;
use crate::telemetry::ClockReading;
use crate::text::TextId;

pub struct ClockScreen {
    timer: RefreshTimer,
    shown: Option<ClockReading>,
}

impl ClockScreen {
    pub fn new(refresh_ms: u32) -> Self {
        Self {
            timer: RefreshTimer::new(refresh_ms),
            shown: None,
        }
    }

    fn refresh<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) {
        let reading = ctx.telemetry.clock();
        let old = self.shown.as_ref();

        if old.is_none_or(|o| o.date != reading.date) {
            let line = format_line(format_args!("{} {}", ctx.text(TextId::DateLabel), reading.date));
            ctx.row(0, &line);
        }
        if old.is_none_or(|o| o.time != reading.time) {
            let line = format_line(format_args!("{} {}", ctx.text(TextId::TimeLabel), reading.time));
            ctx.row(1, &line);
        }
        if old.is_none_or(|o| o.source != reading.source) {
            let line = format_line(format_args!(
                "{}  {}",
                ctx.text(TextId::SourceLabel),
                reading.source.name()
            ));
            ctx.row(2, &line);
        }

        self.shown = Some(reading);
    }
}

impl Screen for ClockScreen {
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
