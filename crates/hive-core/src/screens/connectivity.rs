//! Network link state

use super::{RefreshTimer, Screen, ScreenContext, ScreenControl};
use crate::telemetry::TelemetrySource;
use crate::app::Platform;
use crate::display::format_line;
use crate::input::Button;
use crate::telemetry::Connectivity;
use crate::text::TextId;

pub struct ConnectivityScreen {
    timer: RefreshTimer,
}

impl ConnectivityScreen {
    pub fn new(refresh_ms: u32) -> Self {
        Self {
            timer: RefreshTimer::new(refresh_ms),
        }
    }

    fn draw<P: Platform>(ctx: &mut ScreenContext<'_, P>) {
        match ctx.telemetry.connectivity() {
            Connectivity::Wifi { ssid, rssi_dbm } => {
                let title = ctx.text(TextId::WifiConnected);
                ctx.row(0, title);
                let line = format_line(format_args!("SSID: {}", ssid));
                ctx.row(1, &line);
                let line = format_line(format_args!("RSSI: {}dBm", rssi_dbm));
                ctx.row(2, &line);
            }
            Connectivity::Lte { rssi_dbm } => {
                let title = ctx.text(TextId::LteRegistered);
                ctx.row(0, title);
                let line = format_line(format_args!("RSSI: {}dBm", rssi_dbm));
                ctx.row(1, &line);
                ctx.row(2, "MODE: LTE");
            }
            Connectivity::Offline => {
                let title = ctx.text(TextId::NoConnectivity);
                ctx.row(0, title);
                ctx.row(1, "");
                ctx.row(2, "");
            }
        }
        ctx.back_hint(3);
    }
}

impl Screen for ConnectivityScreen {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        ctx.clear();
        self.timer.due(ctx.now);
        Self::draw(ctx);
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
            Self::draw(ctx);
        }
        ScreenControl::Continue
    }
}
