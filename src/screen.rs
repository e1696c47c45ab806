// One-row cell grid the tab bar is drawn onto, serialized to ANSI for zellij

use ansi_term::{ANSIString, ANSIStrings};
use unicode_width::UnicodeWidthChar;
use zellij_tile::prelude::*;
use zellij_tile_utils::style;

use crate::theme;

/// Current drawing position and colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: usize,
    pub fg: PaletteColor,
    pub bg: PaletteColor,
}

#[derive(Debug, Clone, PartialEq)]
struct Glyph {
    text: String,
    fg: PaletteColor,
    bg: PaletteColor,
}

/// A single line of `columns` cells. Drawing writes at the cursor and
/// advances it by the display width of each character; anything that
/// would cross the right edge (or the active limit) is dropped.
#[derive(Debug, Clone)]
pub struct Screen {
    columns: usize,
    limit: Option<usize>,
    default_fg: PaletteColor,
    default_bg: PaletteColor,
    // None = untouched, Some("") = second half of a wide character
    cells: Vec<Option<Glyph>>,
    pub cursor: Cursor,
}

impl Screen {
    pub fn new(columns: usize, default_fg: PaletteColor, default_bg: PaletteColor) -> Self {
        Screen {
            columns,
            limit: None,
            default_fg,
            default_bg,
            cells: vec![None; columns],
            cursor: Cursor {
                x: 0,
                fg: default_fg,
                bg: default_bg,
            },
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn default_bg(&self) -> PaletteColor {
        self.default_bg
    }

    pub fn contrast(&self, a: PaletteColor, b: PaletteColor) -> f64 {
        theme::contrast(a, b)
    }

    /// Restrict drawing to columns before `limit`. Returns the previous limit.
    pub fn set_limit(&mut self, limit: Option<usize>) -> Option<usize> {
        std::mem::replace(&mut self.limit, limit)
    }

    fn bound(&self) -> usize {
        self.limit.map_or(self.columns, |l| l.min(self.columns))
    }

    /// Reset cursor colors to the terminal defaults.
    pub fn reset(&mut self) {
        self.cursor.fg = self.default_fg;
        self.cursor.bg = self.default_bg;
    }

    pub fn draw(&mut self, text: &str) {
        let bound = self.bound();
        for ch in text.chars() {
            let width = match ch.width() {
                Some(w) if w > 0 => w,
                _ => continue,
            };
            if self.cursor.x + width > bound {
                break;
            }
            let x = self.cursor.x;
            self.cells[x] = Some(Glyph {
                text: ch.to_string(),
                fg: self.cursor.fg,
                bg: self.cursor.bg,
            });
            for cell in &mut self.cells[x + 1..x + width] {
                *cell = Some(Glyph {
                    text: String::new(),
                    fg: self.cursor.fg,
                    bg: self.cursor.bg,
                });
            }
            self.cursor.x += width;
        }
    }

    /// Plain text of the line, untouched cells as spaces.
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.as_ref().map_or(" ", |g| g.text.as_str()))
            .collect()
    }

    /// (fg, bg) at column `x`, defaults for untouched cells.
    #[cfg(test)]
    pub fn colors_at(&self, x: usize) -> Option<(PaletteColor, PaletteColor)> {
        self.cells.get(x).map(|cell| match cell {
            Some(g) => (g.fg, g.bg),
            None => (self.default_fg, self.default_bg),
        })
    }

    /// Serialize the line, one ANSI run per stretch of equal colors.
    pub fn render(&self) -> String {
        let mut runs: Vec<(PaletteColor, PaletteColor, String)> = Vec::new();
        for cell in &self.cells {
            let (fg, bg, text) = match cell {
                Some(g) => (g.fg, g.bg, g.text.as_str()),
                None => (self.default_fg, self.default_bg, " "),
            };
            match runs.last_mut() {
                Some((run_fg, run_bg, run_text)) if *run_fg == fg && *run_bg == bg => {
                    run_text.push_str(text);
                }
                _ => runs.push((fg, bg, text.to_string())),
            }
        }

        let parts: Vec<ANSIString> = runs
            .into_iter()
            .map(|(fg, bg, text)| style!(fg, bg).paint(text))
            .collect();
        ANSIStrings(&parts).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FG: PaletteColor = PaletteColor::EightBit(7);
    const BG: PaletteColor = PaletteColor::EightBit(0);
    const RED: PaletteColor = PaletteColor::EightBit(1);

    fn make_screen(columns: usize) -> Screen {
        Screen::new(columns, FG, BG)
    }

    #[test]
    fn test_draw_advances_cursor() {
        let mut screen = make_screen(10);
        screen.draw("abc");
        assert_eq!(screen.cursor.x, 3);
        assert_eq!(screen.text(), "abc       ");
    }

    #[test]
    fn test_draw_clips_at_edge() {
        let mut screen = make_screen(4);
        screen.draw("abcdef");
        assert_eq!(screen.cursor.x, 4);
        assert_eq!(screen.text(), "abcd");
    }

    #[test]
    fn test_draw_respects_limit() {
        let mut screen = make_screen(10);
        assert_eq!(screen.set_limit(Some(3)), None);
        screen.draw("abcdef");
        assert_eq!(screen.cursor.x, 3);
        assert_eq!(screen.set_limit(None), Some(3));
        screen.draw("de");
        assert_eq!(screen.text(), "abcde     ");
    }

    #[test]
    fn test_wide_chars_take_two_columns() {
        let mut screen = make_screen(5);
        screen.draw("日本語");
        assert_eq!(screen.cursor.x, 4);
        assert_eq!(screen.text(), "日本 ");
    }

    #[test]
    fn test_overwrite_after_moving_cursor() {
        let mut screen = make_screen(6);
        screen.draw("aaaaaa");
        screen.cursor.x = 2;
        screen.cursor.bg = RED;
        screen.draw("bb");
        assert_eq!(screen.text(), "aabbaa");
        assert_eq!(screen.colors_at(2), Some((FG, RED)));
        assert_eq!(screen.colors_at(4), Some((FG, BG)));
        assert_eq!(screen.colors_at(6), None);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut screen = make_screen(3);
        screen.cursor.fg = RED;
        screen.cursor.bg = RED;
        screen.reset();
        assert_eq!(screen.cursor.fg, FG);
        assert_eq!(screen.cursor.bg, BG);
    }

    #[test]
    fn test_render_groups_runs() {
        let mut screen = make_screen(4);
        screen.cursor.bg = RED;
        screen.draw("ab");
        let output = screen.render();
        assert!(output.contains("ab"));
        assert!(output.contains("48;5;1"));
        assert!(output.ends_with("  \u{1b}[0m"));
    }
}
