//! Character grid on top of any `embedded-graphics` target
//!
//! Lets the firmware (or a desktop window) stand in for the HD44780 LCD.
//! Every cell is one 6x10 glyph of an ISO 8859-7 font so Greek labels render
//! without custom characters.

use core::fmt::Debug;

use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder, iso_8859_7::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use log::warn;

use super::{LINE_CAPACITY, TextDisplay};
use crate::config::{LCD_COLUMNS, LCD_ROWS};

pub const CELL_WIDTH_PX: i32 = 6;
pub const CELL_HEIGHT_PX: i32 = 10;

/// 20x4 text adapter over a pixel display.
pub struct GraphicsLcd<D> {
    target: D,
    style: MonoTextStyle<'static, Rgb565>,
    background: Rgb565,
}

impl<D> GraphicsLcd<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
{
    /// Green-on-black, like the real backlit panel.
    pub fn new(target: D) -> Self {
        Self::with_colors(target, Rgb565::GREEN, Rgb565::BLACK)
    }

    pub fn with_colors(target: D, foreground: Rgb565, background: Rgb565) -> Self {
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(foreground)
            .background_color(background)
            .build();

        Self {
            target,
            style,
            background,
        }
    }

    /// Pixel size of the whole character grid.
    pub fn grid_size() -> Size {
        Size::new(
            (i32::from(LCD_COLUMNS) * CELL_WIDTH_PX) as u32,
            (i32::from(LCD_ROWS) * CELL_HEIGHT_PX) as u32,
        )
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D> TextDisplay for GraphicsLcd<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: Debug,
{
    fn clear(&mut self) {
        if let Err(e) = self.target.clear(self.background) {
            warn!("LCD clear failed: {:?}", e);
        }
    }

    fn write_line(&mut self, column: u8, row: u8, text: &str) {
        if row >= LCD_ROWS || column >= LCD_COLUMNS {
            return;
        }

        let room = usize::from(LCD_COLUMNS - column);
        let mut visible = heapless::String::<LINE_CAPACITY>::new();
        for c in text.chars().take(room) {
            if visible.push(c).is_err() {
                break;
            }
        }

        let origin = Point::new(
            i32::from(column) * CELL_WIDTH_PX,
            i32::from(row) * CELL_HEIGHT_PX,
        );
        if let Err(e) = Text::with_baseline(&visible, origin, self.style, Baseline::Top)
            .draw(&mut self.target)
        {
            warn!("LCD draw failed at ({}, {}): {:?}", column, row, e);
        }
    }
}
