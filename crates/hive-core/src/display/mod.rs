//! Character display contract
//!
//! The monitor drives a 20x4 character LCD. The core never deals with the
//! character set or the bus; it only asks the adapter to clear the screen
//! or to put a string at a given cell. Text running past the last column is
//! cut off by the adapter.

pub mod graphics;

pub use graphics::GraphicsLcd;

use core::fmt::{self, Write};

use crate::config::LCD_COLUMNS;

/// Byte capacity of one formatted row. Greek letters take two bytes each.
pub const LINE_CAPACITY: usize = 64;

/// One formatted display row.
pub type Line = heapless::String<LINE_CAPACITY>;

pub trait TextDisplay {
    fn clear(&mut self);

    /// Put `text` at (`column`, `row`). Rows are `0..4`.
    fn write_line(&mut self, column: u8, row: u8, text: &str);
}

impl<T: TextDisplay> TextDisplay for &mut T {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn write_line(&mut self, column: u8, row: u8, text: &str) {
        (**self).write_line(column, row, text)
    }
}

/// Format into a [`Line`]. Pieces that do not fit are dropped.
pub fn format_line(args: fmt::Arguments<'_>) -> Line {
    let mut line = Line::new();
    line.write_fmt(args).ok();
    line
}

/// Write `text` from column 0 and blank the rest of the row.
///
/// Short text is padded with spaces to the full width. Longer text is passed
/// on whole (up to [`LINE_CAPACITY`] bytes) for the adapter to cut.
pub fn write_row<D: TextDisplay>(display: &mut D, row: u8, text: &str) {
    let mut line = Line::new();
    let mut used = 0usize;
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
        used += 1;
    }
    while used < usize::from(LCD_COLUMNS) && line.push(' ').is_ok() {
        used += 1;
    }
    display.write_line(0, row, &line);
}
