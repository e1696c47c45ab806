// Tab entries and their titles

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use zellij_tile::prelude::*;

const ELLIPSIS: char = '…';

/// Foreground/background for active and inactive tabs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabColors {
    pub active_fg: PaletteColor,
    pub active_bg: PaletteColor,
    pub inactive_fg: PaletteColor,
    pub inactive_bg: PaletteColor,
}

impl TabColors {
    /// Ribbon colors from the current zellij theme.
    pub fn from_mode_info(mode_info: &ModeInfo) -> Self {
        let colors = &mode_info.style.colors;
        TabColors {
            active_fg: colors.ribbon_selected.base,
            active_bg: colors.ribbon_selected.background,
            inactive_fg: colors.ribbon_unselected.base,
            inactive_bg: colors.ribbon_unselected.background,
        }
    }
}

/// Everything the renderer needs to know about one tab.
#[derive(Debug, Clone, PartialEq)]
pub struct TabEntry {
    pub position: usize,
    pub title: String,
    pub active: bool,
    pub fg: PaletteColor,
    pub bg: PaletteColor,
}

impl TabEntry {
    pub fn from_tab_info(tab: &TabInfo, renaming: bool, show_position: bool, colors: &TabColors) -> Self {
        let (fg, bg) = if tab.active {
            (colors.active_fg, colors.active_bg)
        } else {
            (colors.inactive_fg, colors.inactive_bg)
        };
        TabEntry {
            position: tab.position,
            title: tab_title(tab, renaming && tab.active, show_position),
            active: tab.active,
            fg,
            bg,
        }
    }
}

/// Tab name plus position and mode markers.
pub fn tab_title(tab: &TabInfo, renaming: bool, show_position: bool) -> String {
    let mut title = if renaming && tab.name.is_empty() {
        String::from("Enter name...")
    } else {
        tab.name.clone()
    };

    if show_position {
        title = format!("{} <{}>", title, tab.position + 1);
    }
    if tab.is_fullscreen_active {
        title.push_str(" (FULLSCREEN)");
    }
    if tab.is_sync_panes_active {
        title.push_str(" (SYNC)");
    }
    title
}

/// Shorten `title` to at most `max_width` columns, ending in an ellipsis
/// when anything was cut.
pub fn truncate_title(title: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(title) <= max_width {
        return title.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in title.chars() {
        let cw = ch.width().unwrap_or(0);
        if width + cw > max_width - 1 {
            break;
        }
        out.push(ch);
        width += cw;
    }
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_tab_info(position: usize, name: &str, active: bool) -> TabInfo {
        TabInfo {
            position,
            name: name.to_string(),
            active,
            ..Default::default()
        }
    }

    fn make_colors() -> TabColors {
        TabColors {
            active_fg: PaletteColor::EightBit(0),
            active_bg: PaletteColor::EightBit(2),
            inactive_fg: PaletteColor::EightBit(7),
            inactive_bg: PaletteColor::EightBit(8),
        }
    }

    #[test]
    fn test_tab_title_plain() {
        let tab = mock_tab_info(0, "alpha", false);
        assert_eq!(tab_title(&tab, false, false), "alpha");
    }

    #[test]
    fn test_tab_title_with_position() {
        let tab = mock_tab_info(4, "alpha", false);
        assert_eq!(tab_title(&tab, false, true), "alpha <5>");
    }

    #[test]
    fn test_tab_title_markers() {
        let mut tab = mock_tab_info(0, "work", true);
        tab.is_fullscreen_active = true;
        tab.is_sync_panes_active = true;
        assert_eq!(tab_title(&tab, false, false), "work (FULLSCREEN) (SYNC)");
    }

    #[test]
    fn test_tab_title_rename_placeholder() {
        let tab = mock_tab_info(0, "", true);
        assert_eq!(tab_title(&tab, true, false), "Enter name...");
        assert_eq!(tab_title(&tab, false, false), "");
    }

    #[test]
    fn test_entry_colors_follow_active() {
        let colors = make_colors();
        let active = TabEntry::from_tab_info(&mock_tab_info(0, "a", true), false, false, &colors);
        let inactive = TabEntry::from_tab_info(&mock_tab_info(1, "b", false), false, false, &colors);
        assert_eq!(active.bg, colors.active_bg);
        assert_eq!(active.fg, colors.active_fg);
        assert_eq!(inactive.bg, colors.inactive_bg);
        assert_eq!(inactive.position, 1);
    }

    #[test]
    fn test_entry_placeholder_only_on_active() {
        let colors = make_colors();
        let inactive = TabEntry::from_tab_info(&mock_tab_info(1, "", false), true, false, &colors);
        assert_eq!(inactive.title, "");
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("alpha", 10), "alpha");
        assert_eq!(truncate_title("alpha", 5), "alpha");
        assert_eq!(truncate_title("alphabet", 5), "alph…");
        assert_eq!(truncate_title("alphabet", 1), "…");
        assert_eq!(truncate_title("alphabet", 0), "");
    }

    #[test]
    fn test_truncate_wide_title() {
        assert_eq!(truncate_title("日本語", 4), "日…");
    }
}
