// Tab line layout: shell icon, left-drawn tabs and the right status cluster

use unicode_width::UnicodeWidthStr;
use zellij_tile::prelude::PaletteColor;

use crate::screen::Screen;
use crate::status::{reserved_width, Cell};
use crate::tab::{truncate_title, TabEntry};
use crate::theme::{Glyphs, Theme};
use crate::timer::RedrawTimer;

/// State that outlives a single redraw.
#[derive(Debug, Default)]
pub struct TabBarContext {
    pub timer: RedrawTimer,
    /// Columns held back for the status cluster, recomputed every redraw
    pub reserved_width: usize,
}

impl TabBarContext {
    pub fn new(timer: RedrawTimer) -> Self {
        TabBarContext {
            timer,
            reserved_width: 0,
        }
    }

    /// First column the left-drawn tabs may not reach.
    pub fn left_bound(&self, columns: usize) -> usize {
        columns.saturating_sub(self.reserved_width)
    }
}

/// Columns occupied by one tab, for mouse click detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSpan {
    pub start: usize,
    pub end: usize,
    pub tab_index: usize,
}

impl TabSpan {
    pub fn contains(&self, x: usize) -> bool {
        x >= self.start && x < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorKind {
    /// Filled wedge into the next tab's background
    Hard,
    /// Thin divider between tabs sharing a background
    Soft,
}

pub fn separator_kind(tab_bg: PaletteColor, next_bg: Option<PaletteColor>) -> SeparatorKind {
    match next_bg {
        Some(bg) if bg == tab_bg => SeparatorKind::Soft,
        _ => SeparatorKind::Hard,
    }
}

/// Foreground for a soft separator. Uses the default background when the
/// tab's own foreground would vanish or stand out more than the default.
pub fn soft_separator_fg(
    screen: &Screen,
    tab_bg: PaletteColor,
    tab_fg: PaletteColor,
) -> PaletteColor {
    let default_bg = screen.default_bg();
    if tab_bg == tab_fg {
        return default_bg;
    }
    // Default bg wins when it contrasts *less* with the tab than the tab's fg does
    if tab_bg != default_bg && screen.contrast(tab_bg, default_bg) < screen.contrast(tab_bg, tab_fg) {
        return default_bg;
    }
    tab_fg
}

/// Shell icon in front of the first tab. Returns the column after it.
pub fn draw_icon(screen: &mut Screen, theme: &Theme, glyphs: &Glyphs) -> usize {
    let (fg, bg) = (screen.cursor.fg, screen.cursor.bg);

    screen.cursor.fg = theme.icon_fg;
    screen.cursor.bg = theme.icon_bg;
    screen.draw(&glyphs.shell_icon);

    screen.cursor.fg = theme.icon_bg;
    screen.cursor.bg = bg;
    screen.draw(&glyphs.separator);

    screen.cursor.fg = fg;
    screen.cursor.bg = bg;
    screen.cursor.x
}

/// Draw one tab at the cursor using the cursor's colors as the tab colors.
///
/// Nothing is drawn once the cursor has reached the reserved status
/// region, and drawing is clipped at its left edge.
pub fn draw_left_tab(
    screen: &mut Screen,
    ctx: &TabBarContext,
    tab: &TabEntry,
    next: Option<&TabEntry>,
    glyphs: &Glyphs,
    max_title_width: usize,
) -> usize {
    let bound = ctx.left_bound(screen.columns());
    if screen.cursor.x >= bound {
        return screen.cursor.x;
    }
    let previous_limit = screen.set_limit(Some(bound));

    let tab_bg = screen.cursor.bg;
    let tab_fg = screen.cursor.fg;
    let next_bg = next.map(|t| t.bg);

    let icon_width = UnicodeWidthStr::width(glyphs.shell_icon.as_str());
    if screen.cursor.x <= icon_width {
        screen.cursor.x = icon_width;
    }
    screen.draw(" ");
    screen.cursor.bg = tab_bg;
    screen.draw(&truncate_title(&tab.title, max_title_width));

    match separator_kind(tab_bg, next_bg) {
        SeparatorKind::Hard => {
            screen.draw(" ");
            screen.cursor.fg = tab_bg;
            screen.cursor.bg = next_bg.unwrap_or(screen.default_bg());
            screen.draw(&glyphs.separator);
        }
        SeparatorKind::Soft => {
            screen.cursor.fg = soft_separator_fg(screen, tab_bg, tab_fg);
            screen.draw(" ");
            screen.draw(&glyphs.soft_separator);
            screen.cursor.fg = tab_fg;
        }
    }

    screen.set_limit(previous_limit);
    screen.cursor.x
}

/// Draw the status cluster flush against the right edge (minus margin).
pub fn draw_right_status(
    screen: &mut Screen,
    ctx: &TabBarContext,
    cells: &[Cell],
    glyphs: &Glyphs,
) -> usize {
    screen.reset();
    screen.cursor.x = ctx.left_bound(screen.columns());

    for cell in cells {
        let padding = " ".repeat(cell.separator_width() - 1);
        screen.cursor.fg = cell.bg;
        screen.draw(&padding);
        screen.draw(&glyphs.status_separator);

        screen.cursor.bg = cell.bg;
        screen.cursor.fg = cell.fg;
        screen.draw(&cell.text);
    }

    screen.cursor.bg = screen.default_bg();
    screen.cursor.x
}

/// Widest title each tab can show when all tabs share the free space.
pub fn max_title_width(columns: usize, reserved: usize, glyphs: &Glyphs, tab_count: usize) -> usize {
    if tab_count == 0 {
        return 0;
    }
    let icon = UnicodeWidthStr::width(glyphs.shell_icon.as_str())
        + UnicodeWidthStr::width(glyphs.separator.as_str());
    // leading space, trailing space and separator around every title
    let per_tab = columns.saturating_sub(reserved).saturating_sub(icon) / tab_count;
    per_tab.saturating_sub(3).max(1)
}

/// Draw the full tab bar and return the clickable tab spans.
pub fn draw_tab_bar(
    ctx: &mut TabBarContext,
    screen: &mut Screen,
    tabs: &[TabEntry],
    cells: &[Cell],
    theme: &Theme,
    glyphs: &Glyphs,
    right_margin: usize,
) -> Vec<TabSpan> {
    ctx.reserved_width = reserved_width(cells, right_margin);
    let title_width = max_title_width(screen.columns(), ctx.reserved_width, glyphs, tabs.len());

    let mut spans = Vec::with_capacity(tabs.len());
    for (idx, tab) in tabs.iter().enumerate() {
        screen.cursor.fg = tab.fg;
        screen.cursor.bg = tab.bg;

        if idx == 0 {
            draw_icon(screen, theme, glyphs);
        }

        let start = screen.cursor.x;
        let end = draw_left_tab(screen, ctx, tab, tabs.get(idx + 1), glyphs, title_width);
        if end > start {
            spans.push(TabSpan {
                start,
                end,
                tab_index: tab.position,
            });
        }

        if idx + 1 == tabs.len() {
            draw_right_status(screen, ctx, cells, glyphs);
        }
    }

    spans
}
