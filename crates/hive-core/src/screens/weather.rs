//! Weather location card and forecast pages

use embassy_time::Instant;

use super::{Screen, ScreenContext, ScreenControl};
use crate::telemetry::TelemetrySource;
use crate::app::Platform;
use crate::display::{Line, format_line};
use crate::input::Button;
use crate::text::TextId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Location card until the deadline.
    Card { until: Instant },
    Forecast { page: usize },
}

pub struct WeatherScreen {
    card_ms: u32,
    phase: Phase,
}

impl WeatherScreen {
    pub fn new(card_ms: u32) -> Self {
        Self {
            card_ms,
            phase: Phase::Forecast { page: 0 },
        }
    }

    /// Current forecast page, once past the location card.
    pub fn page(&self) -> Option<usize> {
        match self.phase {
            Phase::Card { .. } => None,
            Phase::Forecast { page } => Some(page),
        }
    }

    fn draw_card<P: Platform>(ctx: &mut ScreenContext<'_, P>) {
        let location = ctx.telemetry.location();

        let header = ctx.text(TextId::WeatherHeader);
        ctx.row(0, header);
        let line = format_line(format_args!(
            "LAT:{:.2} LON:{:.2}",
            location.latitude, location.longitude
        ));
        ctx.row(1, &line);
        let place: Line = if location.country.is_empty() {
            format_line(format_args!("{}", location.place))
        } else {
            format_line(format_args!("{}, {}", location.place, location.country))
        };
        ctx.row(2, &place);
        ctx.back_hint(3);
    }

    fn draw_forecast<P: Platform>(page: usize, ctx: &mut ScreenContext<'_, P>) {
        let Some(entry) = ctx.telemetry.forecast(page) else {
            ctx.clear();
            let no_data = ctx.text(TextId::WeatherNoData);
            ctx.row(0, no_data);
            ctx.back_hint(3);
            return;
        };

        ctx.row(0, &entry.date);
        ctx.row(1, &entry.description);
        let line = format_line(format_args!(
            "T:{:5.1}C H:{:3.0}%",
            entry.temperature_c, entry.humidity_pct
        ));
        ctx.row(2, &line);
        let line = format_line(format_args!(
            "P:{:5.0}hPa {}",
            entry.pressure_hpa,
            ctx.text(TextId::BackHint)
        ));
        ctx.row(3, &line);
    }
}

impl Screen for WeatherScreen {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        ctx.clear();
        Self::draw_card(ctx);
        self.phase = Phase::Card {
            until: ctx.after_ms(self.card_ms),
        };
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

        match self.phase {
            Phase::Card { until } => {
                if ctx.now >= until {
                    self.phase = Phase::Forecast { page: 0 };
                    Self::draw_forecast(0, ctx);
                }
            }
            Phase::Forecast { page } => {
                let count = ctx.telemetry.forecast_len();
                if count == 0 {
                    return ScreenControl::Continue;
                }
                let next = match button {
                    Button::Up => (page + count - 1) % count,
                    Button::Down => (page + 1) % count,
                    _ => return ScreenControl::Continue,
                };
                self.phase = Phase::Forecast { page: next };
                Self::draw_forecast(next, ctx);
            }
        }
        ScreenControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{ForecastEntry, Location};
    use crate::testing::Rig;

    fn with_forecast() -> Rig {
        let mut rig = Rig::new();
        rig.telemetry.forecast = std::vec![
            ForecastEntry::new("19-10 12:00", "light rain", 17.3, 80.0, 1009.0),
            ForecastEntry::new("19-10 18:00", "clear sky", 14.0, 70.0, 1011.0),
            ForecastEntry::new("20-10 00:00", "clouds", 11.5, 88.0, 1012.0),
        ];
        rig
    }

    #[test]
    fn test_location_card_first() {
        let mut rig = Rig::new();
        let mut location = Location::default();
        location.place.push_str("Athens").unwrap();
        location.country.push_str("GR").unwrap();
        rig.telemetry.location = location;

        let mut screen = WeatherScreen::new(2000);
        screen.enter(&mut rig.ctx(0));

        assert_eq!(screen.page(), None);
        assert_eq!(rig.display.row(1), "LAT:37.98 LON:23.73");
        assert_eq!(rig.display.row(2), "Athens, GR");
        assert_eq!(rig.display.row(3), "< BACK");
    }

    #[test]
    fn test_card_holds_then_forecast() {
        let mut rig = with_forecast();
        let mut screen = WeatherScreen::new(2000);
        screen.enter(&mut rig.ctx(0));

        screen.tick(Button::Down, &mut rig.ctx(1999));
        assert_eq!(screen.page(), None);

        screen.tick(Button::None, &mut rig.ctx(2000));
        assert_eq!(screen.page(), Some(0));
        assert_eq!(rig.display.row(0), "19-10 12:00");
        assert_eq!(rig.display.row(1), "light rain");
        assert_eq!(rig.display.row(2), "T: 17.3C H: 80%");
    }

    #[test]
    fn test_forecast_pages_wrap() {
        let mut rig = with_forecast();
        let mut screen = WeatherScreen::new(0);
        screen.enter(&mut rig.ctx(0));
        screen.tick(Button::None, &mut rig.ctx(0));

        screen.tick(Button::Up, &mut rig.ctx(100));
        assert_eq!(screen.page(), Some(2));
        assert_eq!(rig.display.row(1), "clouds");

        screen.tick(Button::Down, &mut rig.ctx(200));
        assert_eq!(screen.page(), Some(0));
    }

    #[test]
    fn test_empty_feed_shows_no_data() {
        let mut rig = Rig::new();
        let mut screen = WeatherScreen::new(0);
        screen.enter(&mut rig.ctx(0));
        screen.tick(Button::None, &mut rig.ctx(0));

        assert_eq!(rig.display.row(0), "NO DATA");
        assert_eq!(screen.tick(Button::Down, &mut rig.ctx(100)), ScreenControl::Continue);
        assert_eq!(screen.tick(Button::Back, &mut rig.ctx(200)), ScreenControl::Exit);
    }
}
