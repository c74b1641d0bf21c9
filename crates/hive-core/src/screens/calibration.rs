//! Calibration screens
//!
//! [`TaskScreen`] runs a one-shot job on entry and shows the outcome for a
//! fixed time. [`EditorScreen`] lets the user dial in a reference value with
//! UP/DOWN and commits it on SELECT. [`RawValueScreen`] is a diagnostic read.

use embassy_time::Instant;
use log::{info, warn};

use super::{Screen, ScreenContext, ScreenControl};
use crate::app::Platform;
use crate::calibration::CalibrationError;
use crate::display::format_line;
use crate::input::Button;
use crate::text::TextId;

/// Write the result of a calibration step to rows 1 and 2.
fn show_outcome<P: Platform>(ctx: &mut ScreenContext<'_, P>, result: Result<(), CalibrationError>) {
    match result {
        Ok(()) => {
            let done = ctx.text(TextId::Done);
            ctx.row(1, done);
        }
        Err(e) => {
            warn!("Calibration step failed: {}", e);
            let failed = ctx.text(TextId::Failed);
            ctx.row(1, failed);
            if matches!(e, CalibrationError::SensorNotReady { .. }) {
                let reason = ctx.text(TextId::NotReady);
                ctx.row(2, reason);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Tare,
    AccelZero,
    ToggleLanguage,
}

/// Runs its job once, then holds the result on screen.
pub struct TaskScreen {
    kind: TaskKind,
    hold_ms: u32,
    until: Option<Instant>,
}

impl TaskScreen {
    pub fn new(kind: TaskKind, hold_ms: u32) -> Self {
        Self {
            kind,
            hold_ms,
            until: None,
        }
    }

    fn run<P: Platform>(&self, ctx: &mut ScreenContext<'_, P>) {
        match self.kind {
            TaskKind::ToggleLanguage => {
                *ctx.language = ctx.language.toggled();
                info!("Language switched to {:?}", ctx.language);
                let name = ctx.language.name();
                ctx.row(0, name);
            }
            TaskKind::Tare => {
                let title = ctx.text(TextId::Tare);
                ctx.row(0, title);
                let wait = ctx.text(TextId::Working);
                ctx.row(1, wait);

                let batch = ctx.config.batches.tare;
                let result = ctx.engine.tare(&mut ctx.sensors.scale, batch);
                if let Ok(zero) = result {
                    let line = format_line(format_args!("ZERO: {}", zero));
                    ctx.row(2, &line);
                }
                show_outcome(ctx, result.map(|_| ()));
            }
            TaskKind::AccelZero => {
                let title = ctx.text(TextId::AccelZero);
                ctx.row(0, title);
                let wait = ctx.text(TextId::Working);
                ctx.row(1, wait);

                let batch = ctx.config.batches.accel_zero;
                let result = ctx.engine.calibrate_accel_zero(&mut ctx.sensors.accel, batch);
                if let Ok(bias) = result {
                    let line =
                        format_line(format_args!("{:.2} {:.2} {:.2}", bias.x, bias.y, bias.z));
                    ctx.row(2, &line);
                }
                show_outcome(ctx, result.map(|_| ()));
            }
        }
    }
}

impl Screen for TaskScreen {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        ctx.clear();
        self.run(ctx);
        self.until = Some(ctx.after_ms(self.hold_ms));
        ScreenControl::Continue
    }

    fn tick<P: Platform>(
        &mut self,
        _button: Button,
        ctx: &mut ScreenContext<'_, P>,
    ) -> ScreenControl {
        match self.until {
            Some(until) if ctx.now < until => ScreenControl::Continue,
            _ => ScreenControl::Exit,
        }
    }
}

/// Averaged raw load cell reading; UP/DOWN take a fresh batch.
#[derive(Default)]
pub struct RawValueScreen {
    raw: Option<i32>,
}

impl RawValueScreen {
    pub fn raw(&self) -> Option<i32> {
        self.raw
    }

    fn sample<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) {
        let batch = ctx.config.batches.raw_read;
        self.raw = ctx.engine.read_scale_raw(&mut ctx.sensors.scale, batch).ok();

        match self.raw {
            Some(raw) => {
                let line = format_line(format_args!("RAW: {}", raw));
                ctx.row(1, &line);
            }
            None => {
                let reason = ctx.text(TextId::NotReady);
                ctx.row(1, reason);
            }
        }
    }
}

impl Screen for RawValueScreen {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        ctx.clear();
        let title = ctx.text(TextId::RawValue);
        ctx.row(0, title);
        ctx.back_hint(3);
        self.sample(ctx);
        ScreenControl::Continue
    }

    fn tick<P: Platform>(
        &mut self,
        button: Button,
        ctx: &mut ScreenContext<'_, P>,
    ) -> ScreenControl {
        match button {
            Button::Back | Button::Select => ScreenControl::Exit,
            Button::Up | Button::Down => {
                self.sample(ctx);
                ScreenControl::Continue
            }
            Button::None => ScreenControl::Continue,
        }
    }
}

/// The value an [`EditorScreen`] edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    /// Reference weight for one-point calibration, kg.
    KnownWeight,
    /// Multimeter reading of the battery, volts.
    BatteryVolts,
    /// Outside temperature offset, °C.
    TemperatureOffset,
    /// Outside humidity offset, %RH.
    HumidityOffset,
}

impl EditorKind {
    fn title(self) -> TextId {
        match self {
            EditorKind::KnownWeight => TextId::KnownWeight,
            EditorKind::BatteryVolts => TextId::MeasuredVolts,
            EditorKind::TemperatureOffset => TextId::TempOffset,
            EditorKind::HumidityOffset => TextId::HumidityOffset,
        }
    }

    /// Step and bounds, in hundredths.
    fn step(self) -> i32 {
        match self {
            EditorKind::BatteryVolts => 5,
            _ => 10,
        }
    }

    fn bounds(self) -> (i32, i32) {
        match self {
            EditorKind::KnownWeight => (10, 100_00),
            EditorKind::BatteryVolts => (5, 5_00),
            EditorKind::TemperatureOffset => (-20_00, 20_00),
            EditorKind::HumidityOffset => (-50_00, 50_00),
        }
    }

    fn unit(self) -> &'static str {
        match self {
            EditorKind::KnownWeight => "kg",
            EditorKind::BatteryVolts => "V",
            EditorKind::TemperatureOffset => "C",
            EditorKind::HumidityOffset => "%",
        }
    }

    fn initial<P: Platform>(self, ctx: &ScreenContext<'_, P>) -> i32 {
        match self {
            EditorKind::KnownWeight => 1_00,
            EditorKind::BatteryVolts => 3_70,
            EditorKind::TemperatureOffset => to_centi(ctx.engine.temperature_offset()),
            EditorKind::HumidityOffset => to_centi(ctx.engine.humidity_offset()),
        }
    }
}

fn to_centi(value: f32) -> i32 {
    if value >= 0.0 {
        (value * 100.0 + 0.5) as i32
    } else {
        (value * 100.0 - 0.5) as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorPhase {
    Editing,
    Result { until: Instant },
}

/// UP/DOWN adjust, SELECT commits, BACK cancels without writing.
pub struct EditorScreen {
    kind: EditorKind,
    hold_ms: u32,
    centi: i32,
    phase: EditorPhase,
}

impl EditorScreen {
    pub fn new(kind: EditorKind, hold_ms: u32) -> Self {
        Self {
            kind,
            hold_ms,
            centi: 0,
            phase: EditorPhase::Editing,
        }
    }

    pub fn value(&self) -> f32 {
        self.centi as f32 / 100.0
    }

    fn draw_value<P: Platform>(&self, ctx: &mut ScreenContext<'_, P>) {
        let line = match self.kind {
            EditorKind::BatteryVolts => {
                format_line(format_args!("> {:.2} {}", self.value(), self.kind.unit()))
            }
            _ => format_line(format_args!("> {:.1} {}", self.value(), self.kind.unit())),
        };
        ctx.row(1, &line);
    }

    fn commit<P: Platform>(&self, ctx: &mut ScreenContext<'_, P>) -> Result<(), CalibrationError> {
        let value = self.value();
        let batches = ctx.config.batches;
        match self.kind {
            EditorKind::KnownWeight => ctx
                .engine
                .calibrate_one_point(&mut ctx.sensors.scale, value, batches.one_point)
                .map(|_| ()),
            EditorKind::BatteryVolts => ctx
                .engine
                .calibrate_battery(&mut ctx.sensors.battery, value, batches.battery_calibrate)
                .map(|_| ()),
            EditorKind::TemperatureOffset => ctx.engine.set_temperature_offset(value),
            EditorKind::HumidityOffset => ctx.engine.set_humidity_offset(value),
        }
    }
}

impl Screen for EditorScreen {
    fn enter<P: Platform>(&mut self, ctx: &mut ScreenContext<'_, P>) -> ScreenControl {
        self.centi = self.kind.initial(ctx);
        self.phase = EditorPhase::Editing;

        ctx.clear();
        let title = ctx.text(self.kind.title());
        ctx.row(0, title);
        self.draw_value(ctx);
        let hint = ctx.text(TextId::SelectToSave);
        ctx.row(2, hint);
        ctx.back_hint(3);
        ScreenControl::Continue
    }

    fn tick<P: Platform>(
        &mut self,
        button: Button,
        ctx: &mut ScreenContext<'_, P>,
    ) -> ScreenControl {
        if let EditorPhase::Result { until } = self.phase {
            return if ctx.now < until {
                ScreenControl::Continue
            } else {
                ScreenControl::Exit
            };
        }

        let (min, max) = self.kind.bounds();
        match button {
            Button::Back => return ScreenControl::Exit,
            Button::Up => self.centi = (self.centi + self.kind.step()).min(max),
            Button::Down => self.centi = (self.centi - self.kind.step()).max(min),
            Button::Select => {
                ctx.clear();
                let title = ctx.text(self.kind.title());
                ctx.row(0, title);
                let result = self.commit(ctx);
                show_outcome(ctx, result);
                self.phase = EditorPhase::Result {
                    until: ctx.after_ms(self.hold_ms),
                };
                return ScreenControl::Continue;
            }
            Button::None => return ScreenControl::Continue,
        }
        self.draw_value(ctx);
        ScreenControl::Continue
    }
}
