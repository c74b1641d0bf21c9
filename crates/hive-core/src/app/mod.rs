//! Application state and the outer poll loop
//!
//! [`HiveApp`] owns every collaborator and routes each polled button either
//! to the active screen or to the menu navigator. The board calls
//! [`HiveApp::tick`] every few tens of milliseconds; no call ever waits for
//! input.

mod platform;

pub use platform::*;

use embassy_time::Instant;
use log::{debug, info};

use crate::calibration::CalibrationEngine;
use crate::config::DeviceConfig;
use crate::display::TextDisplay;
use crate::input::Button;
use crate::menu::{MenuAction, MenuError, build_hive_menu};
use crate::navigator::{Navigator, Transition};
use crate::screens::{Screen, ScreenContext, ScreenControl, ScreenWrapper};
use crate::text::Language;

/// Whether the menu or a screen currently owns the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Menu,
    Screen,
}

pub struct HiveApp<P: Platform> {
    config: DeviceConfig,
    navigator: Navigator<MenuAction>,
    engine: CalibrationEngine<P::Store, P::Delay>,
    sensors: PlatformSensors<P>,
    telemetry: P::Telemetry,
    display: P::Display,
    language: Language,
    screen: Option<ScreenWrapper>,
}

/// Borrow the collaborators of `$app` as a [`ScreenContext`].
macro_rules! screen_context {
    ($app:ident, $now:expr) => {
        ScreenContext::<P> {
            engine: &mut $app.engine,
            sensors: &mut $app.sensors,
            telemetry: &mut $app.telemetry,
            display: &mut $app.display,
            config: &$app.config,
            language: &mut $app.language,
            now: $now,
        }
    };
}

impl<P: Platform> HiveApp<P> {
    /// Wire up the application. Fails only if the built-in menu is broken.
    pub fn new(
        config: DeviceConfig,
        store: P::Store,
        delay: P::Delay,
        sensors: PlatformSensors<P>,
        telemetry: P::Telemetry,
        display: P::Display,
    ) -> Result<Self, MenuError> {
        let navigator = Navigator::new(build_hive_menu()?, config.visible_rows);
        let engine = CalibrationEngine::new(store, delay, config.battery);

        Ok(Self {
            config,
            navigator,
            engine,
            sensors,
            telemetry,
            display,
            language: Language::default(),
            screen: None,
        })
    }

    /// Draw the menu for the first time.
    pub fn start(&mut self) {
        info!("Hive monitor started");
        self.display.clear();
        self.draw_menu();
    }

    /// Process one poll of the buttons.
    pub fn tick(&mut self, button: Button, now: Instant) {
        if let Some(screen) = self.screen.as_mut() {
            let mut ctx = screen_context!(self, now);
            if screen.tick(button, &mut ctx) == ScreenControl::Exit {
                self.close_screen();
            }
            return;
        }

        match self.navigator.handle(button) {
            Transition::Ignored => {}
            Transition::Moved => self.draw_menu(),
            Transition::Invoke(action) => self.launch(action, now),
        }
    }

    fn launch(&mut self, action: MenuAction, now: Instant) {
        debug!("Menu action {:?}", action);

        let Some(mut screen) = ScreenWrapper::for_action(action, &self.config) else {
            // Only `Back` has no screen.
            if self.navigator.back() == Transition::Moved {
                self.draw_menu();
            }
            return;
        };

        let mut ctx = screen_context!(self, now);
        match screen.enter(&mut ctx) {
            ScreenControl::Continue => self.screen = Some(screen),
            ScreenControl::Exit => self.close_screen(),
        }
    }

    fn close_screen(&mut self) {
        self.screen = None;
        self.display.clear();
        self.draw_menu();
    }

    fn draw_menu(&mut self) {
        self.navigator.draw(&mut self.display, self.language);
    }

    pub fn mode(&self) -> AppMode {
        if self.screen.is_some() {
            AppMode::Screen
        } else {
            AppMode::Menu
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn navigator(&self) -> &Navigator<MenuAction> {
        &self.navigator
    }

    pub fn engine(&self) -> &CalibrationEngine<P::Store, P::Delay> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut CalibrationEngine<P::Store, P::Delay> {
        &mut self.engine
    }

    pub fn sensors_mut(&mut self) -> &mut PlatformSensors<P> {
        &mut self.sensors
    }

    pub fn telemetry_mut(&mut self) -> &mut P::Telemetry {
        &mut self.telemetry
    }

    pub fn display(&self) -> &P::Display {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut P::Display {
        &mut self.display
    }
}
