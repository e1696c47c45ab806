// Right-hand status cluster: battery, clock and date cells

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime};
use unicode_width::UnicodeWidthStr;
use zellij_tile::prelude::PaletteColor;

use crate::battery::{battery_cells, BatterySource, BatteryStyle};
use crate::theme::{Glyphs, Theme};

pub const DEFAULT_CLOCK_FORMAT: &str = "%H:%M:%S";
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";

/// One segment of the status cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub bg: PaletteColor,
    pub fg: PaletteColor,
    pub text: String,
}

impl Cell {
    pub fn new(bg: PaletteColor, fg: PaletteColor, text: impl Into<String>) -> Self {
        Cell {
            bg,
            fg,
            text: text.into(),
        }
    }

    /// Cells showing a percentage hug their left neighbour with a
    /// one-column separator; every other cell gets two columns.
    pub fn separator_width(&self) -> usize {
        if self.text.contains('%') {
            1
        } else {
            2
        }
    }

    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.text.as_str())
    }
}

/// Which cells to show and how to format the time.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusOptions {
    pub show_battery: bool,
    pub show_clock: bool,
    pub show_date: bool,
    pub clock_format: String,
    pub date_format: String,
}

impl Default for StatusOptions {
    fn default() -> Self {
        StatusOptions {
            show_battery: true,
            show_clock: true,
            show_date: true,
            clock_format: DEFAULT_CLOCK_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Whether `format` renders a local time. Rejects unknown specifiers and
/// timezone items (`%Z`, `%z`), which a naive time cannot fill in.
pub fn is_valid_time_format(format: &str) -> bool {
    let Some(sample) = NaiveDate::from_ymd_opt(2000, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)) else {
        return false;
    };
    let mut out = String::new();
    write!(out, "{}", sample.format(format)).is_ok()
}

/// Render `now` with `format`, or with `fallback` if chrono refuses it.
fn format_time(now: &NaiveDateTime, format: &str, fallback: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", now.format(fallback));
    }
    out
}

/// Build the ordered status cells: battery (zero or two), clock, date.
pub fn build_status_cells<S: BatterySource + ?Sized>(
    now: &NaiveDateTime,
    battery: &S,
    theme: &Theme,
    glyphs: &Glyphs,
    options: &StatusOptions,
) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(4);

    if options.show_battery {
        cells.extend(battery_cells(battery, &BatteryStyle::from_theme(theme)));
    }
    if options.show_clock {
        let time = format_time(now, &options.clock_format, DEFAULT_CLOCK_FORMAT);
        let clock = format!("{} {}", glyphs.clock_icon, time);
        cells.push(Cell::new(theme.clock_bg, theme.clock_fg, clock));
    }
    if options.show_date {
        let day = format_time(now, &options.date_format, DEFAULT_DATE_FORMAT);
        let date = format!("{} {}", glyphs.date_icon, day);
        cells.push(Cell::new(theme.date_bg, theme.date_fg, date));
    }

    cells
}

/// Columns to hold back at the right edge for `cells`.
pub fn reserved_width(cells: &[Cell], right_margin: usize) -> usize {
    cells
        .iter()
        .fold(right_margin, |width, cell| {
            width.saturating_add(cell.width() + cell.separator_width())
        })
}
