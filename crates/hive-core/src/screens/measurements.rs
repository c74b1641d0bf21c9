//! Paged sensor readings
//!
//! | Page | Rows                                            |
//! |------|-------------------------------------------------|
//! | 0    | weight, inside temperature, inside humidity     |
//! | 1    | outside temperature, humidity (offsets applied), pressure |
//! | 2    | acceleration minus stored bias, battery         |

use super::status::{battery_line, weight_line};
use super::{RefreshTimer, Screen, ScreenContext, ScreenControl};
use crate::telemetry::TelemetrySource;
use crate::app::Platform;
use crate::display::format_line;
use crate::input::Button;
use crate::sensors::SampleSource;
use crate::text::TextId;

pub const PAGE_COUNT: u8 = 3;

pub struct MeasurementsScreen {
    timer: RefreshTimer,
    page: u8,
}

impl MeasurementsScreen {
    pub fn new(refresh_ms: u32) -> Self {
        Self {
            timer: RefreshTimer::new(refresh_ms),
            page: 0,
        }
    }

    pub fn page(&self) -> u8 {
        self.page
    }

    fn draw<P: Platform>(&self, ctx: &mut ScreenContext<'_, P>) {
        let header = ctx.text(TextId::Measurements);
        ctx.row(0, header);

        let env = ctx.telemetry.environment();
        match self.page {
            0 => {
                let weight = ctx.live_weight();
                let line = weight_line(ctx.text(TextId::WeightLabel), weight);
                ctx.row(1, &line);
                let line = format_line(format_args!(
                    "{} {:4.1}C",
                    ctx.text(TextId::InternalTemp),
                    env.temperature_internal
                ));
                ctx.row(2, &line);
                let line = format_line(format_args!(
                    "{} {:3.0}%",
                    ctx.text(TextId::InternalHumidity),
                    env.humidity_internal
                ));
                ctx.row(3, &line);
            }
            1 => {
                let temperature = env.temperature_external + ctx.engine.temperature_offset();
                let humidity = env.humidity_external + ctx.engine.humidity_offset();
                let line = format_line(format_args!(
                    "{} {:4.1}C",
                    ctx.text(TextId::ExternalTemp),
                    temperature
                ));
                ctx.row(1, &line);
                let line = format_line(format_args!(
                    "{} {:3.0}%",
                    ctx.text(TextId::ExternalHumidity),
                    humidity
                ));
                ctx.row(2, &line);
                let line = format_line(format_args!(
                    "{}{:4.0}hPa",
                    ctx.text(TextId::Pressure),
                    env.pressure_hpa
                ));
                ctx.row(3, &line);
            }
            _ => {
                if ctx.sensors.accel.ready() {
                    let accel = ctx.sensors.accel.read_one() - ctx.engine.accel_bias();
                    let line = format_line(format_args!(
                        "{}X{:.2} Y{:.2}",
                        ctx.text(TextId::Accel),
                        accel.x,
                        accel.y
                    ));
                    ctx.row(1, &line);
                    let line = format_line(format_args!("Z: {:.2}", accel.z));
                    ctx.row(2, &line);
                } else {
                    let line = format_line(format_args!("{} ---", ctx.text(TextId::Accel)));
                    ctx.row(1, &line);
                    ctx.row(2, "");
                }
                let battery = ctx.live_battery();
                let line = battery_line(ctx.text(TextId::BatteryLabel), battery);
                ctx.row(3, &line);
            }
        }
    }
}

impl Screen for MeasurementsScreen {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        ctx.clear();
        self.timer.due(ctx.now);
        self.draw(ctx);
        ScreenControl::Continue
    }

    fn tick<P: Platform>(
        &mut self,
        button: Button,
        ctx: &mut ScreenContext<'_, P>,
    ) -> ScreenControl {
        match button {
            Button::Back | Button::Select => return ScreenControl::Exit,
            Button::Up => self.page = (self.page + PAGE_COUNT - 1) % PAGE_COUNT,
            Button::Down => self.page = (self.page + 1) % PAGE_COUNT,
            Button::None => {
                if !self.timer.due(ctx.now) {
                    return ScreenControl::Continue;
                }
            }
        }
        self.draw(ctx);
        ScreenControl::Continue
    }
}
