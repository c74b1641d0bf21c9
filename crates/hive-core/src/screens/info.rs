//! Static information screens: SD card and calibration summary

use log::info;

use super::{Screen, ScreenContext, ScreenControl};
use crate::telemetry::TelemetrySource;
use crate::app::Platform;
use crate::calibration::SUMMARY_LEN;
use crate::config::{LCD_COLUMNS, LCD_ROWS};
use crate::input::Button;
use crate::text::TextId;

pub struct SdInfoScreen;

impl Screen for SdInfoScreen {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        let present = ctx.telemetry.sd_card_present();

        ctx.clear();
        let title = ctx.text(TextId::SdCardInfo);
        ctx.row(0, title);
        let state = ctx.text(if present { TextId::SdOk } else { TextId::NoCard });
        ctx.row(1, state);
        ctx.back_hint(3);
        ScreenControl::Continue
    }

    fn tick<P: Platform>(
        &mut self,
        button: Button,
        _ctx: &mut ScreenContext<'_, P>,
    ) -> ScreenControl {
        if button.closes_view() {
            ScreenControl::Exit
        } else {
            ScreenControl::Continue
        }
    }
}

/// Calibration summary wrapped over the display rows. UP/DOWN scroll by
/// one row when it does not fit.
#[derive(Default)]
pub struct SummaryScreen {
    summary: heapless::String<SUMMARY_LEN>,
    first_row: usize,
}

impl SummaryScreen {
    fn wrapped_rows(&self) -> usize {
        self.summary.chars().count().div_ceil(usize::from(LCD_COLUMNS))
    }

    fn draw<P: Platform>(&self, ctx: &mut ScreenContext<'_, P>) {
        let width = usize::from(LCD_COLUMNS);
        for row in 0..LCD_ROWS {
            let skip = (self.first_row + usize::from(row)) * width;
            let mut chunk = heapless::String::<SUMMARY_LEN>::new();
            for c in self.summary.chars().skip(skip).take(width) {
                if chunk.push(c).is_err() {
                    break;
                }
            }
            ctx.row(row, &chunk);
        }
    }
}

impl Screen for SummaryScreen {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        self.summary = ctx.engine.summary();
        self.first_row = 0;
        info!("Calibration summary: {}", self.summary);

        ctx.clear();
        self.draw(ctx);
        ScreenControl::Continue
    }

    fn tick<P: Platform>(
        &mut self,
        button: Button,
        ctx: &mut ScreenContext<'_, P>,
    ) -> ScreenControl {
        let last_start = self.wrapped_rows().saturating_sub(usize::from(LCD_ROWS));
        match button {
            Button::Back | Button::Select => return ScreenControl::Exit,
            Button::Up if self.first_row > 0 => self.first_row -= 1,
            Button::Down if self.first_row < last_start => self.first_row += 1,
            _ => return ScreenControl::Continue,
        }
        self.draw(ctx);
        ScreenControl::Continue
    }
}
