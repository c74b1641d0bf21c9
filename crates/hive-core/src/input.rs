//! Button input with edge detection and debouncing
//!
//! The board samples its four push buttons and hands the pressed levels to
//! [`ButtonPoller::poll`] together with the current time. The poller reports
//! at most one press per call, and nothing at all while inside the debounce
//! window that follows a sampled poll.

use embassy_time::{Duration, Instant};
use log::debug;

/// One discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    #[default]
    None,
    Up,
    Down,
    Select,
    Back,
}

impl Button {
    pub fn is_none(self) -> bool {
        self == Button::None
    }

    /// BACK and SELECT both close a live view.
    pub fn closes_view(self) -> bool {
        matches!(self, Button::Back | Button::Select)
    }
}

/// Instantaneous pressed state of every button (`true` = held down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonLevels {
    pub up: bool,
    pub down: bool,
    pub select: bool,
    pub back: bool,
}

impl ButtonLevels {
    pub const RELEASED: Self = Self {
        up: false,
        down: false,
        select: false,
        back: false,
    };

    /// Levels with exactly one button held.
    pub fn only(button: Button) -> Self {
        let mut levels = Self::RELEASED;
        match button {
            Button::Up => levels.up = true,
            Button::Down => levels.down = true,
            Button::Select => levels.select = true,
            Button::Back => levels.back = true,
            Button::None => {}
        }
        levels
    }
}

/// Edge-triggered, debounced button reader.
#[derive(Debug)]
pub struct ButtonPoller {
    debounce: Duration,
    last_sample: Option<Instant>,
    held: ButtonLevels,
}

impl ButtonPoller {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            debounce: Duration::from_millis(u64::from(debounce_ms)),
            last_sample: None,
            held: ButtonLevels::RELEASED,
        }
    }

    /// Report the newest press, if any.
    ///
    /// Presses are edges: a button must be seen released before it can be
    /// reported again. When several edges arrive together the first of
    /// Up, Down, Select, Back wins and the others stay pending for the next
    /// sampled poll.
    pub fn poll(&mut self, levels: ButtonLevels, now: Instant) -> Button {
        if let Some(last) = self.last_sample {
            let inside_window = now
                .checked_duration_since(last)
                .is_none_or(|elapsed| elapsed < self.debounce);
            if inside_window {
                return Button::None;
            }
        }
        self.last_sample = Some(now);

        let pressed = if levels.up && !self.held.up {
            self.held.up = true;
            Button::Up
        } else if levels.down && !self.held.down {
            self.held.down = true;
            Button::Down
        } else if levels.select && !self.held.select {
            self.held.select = true;
            Button::Select
        } else if levels.back && !self.held.back {
            self.held.back = true;
            Button::Back
        } else {
            Button::None
        };

        // Releases are always recorded; pending presses are not.
        self.held.up &= levels.up;
        self.held.down &= levels.down;
        self.held.select &= levels.select;
        self.held.back &= levels.back;

        if !pressed.is_none() {
            debug!("Button {:?}", pressed);
        }
        pressed
    }
}
