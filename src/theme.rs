// Colors and glyphs used by the tab bar

use zellij_tile::prelude::PaletteColor;

use crate::ConfigError;

/// Rounded hard separator, pointing right (closes a tab).
pub const ROUND_SEPARATOR: &str = "\u{e0b4}";
/// Thin slanted separator between tabs sharing a background.
pub const SOFT_SEPARATOR: &str = "\u{e0bb}";
/// Rounded hard separator, pointing left (opens a status cell).
pub const ROUND_LEFT_SEPARATOR: &str = "\u{e0b6}";

// ============================================================================
// Palette
// ============================================================================

/// The sixteen base terminal colors, indexed like `color0`..`color15`.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub colors: [PaletteColor; 16],
}

impl Default for Palette {
    fn default() -> Self {
        let hex = [
            (0x15, 0x16, 0x1e),
            (0xf7, 0x76, 0x8e),
            (0x9e, 0xce, 0x6a),
            (0xe0, 0xaf, 0x68),
            (0x7a, 0xa2, 0xf7),
            (0xbb, 0x9a, 0xf7),
            (0x7d, 0xcf, 0xff),
            (0xa9, 0xb1, 0xd6),
            (0x41, 0x48, 0x68),
            (0xff, 0x89, 0x9d),
            (0xb9, 0xf2, 0x7c),
            (0xff, 0x9e, 0x64),
            (0x8d, 0xb0, 0xff),
            (0xc7, 0xa9, 0xff),
            (0xa4, 0xda, 0xff),
            (0xc0, 0xca, 0xf5),
        ];
        Palette {
            colors: hex.map(PaletteColor::Rgb),
        }
    }
}

impl Palette {
    pub fn red(&self) -> PaletteColor {
        self.colors[1]
    }
    pub fn green(&self) -> PaletteColor {
        self.colors[2]
    }
    pub fn blue(&self) -> PaletteColor {
        self.colors[4]
    }
    pub fn magenta(&self) -> PaletteColor {
        self.colors[5]
    }
    pub fn cyan(&self) -> PaletteColor {
        self.colors[6]
    }
    pub fn bright_black(&self) -> PaletteColor {
        self.colors[8]
    }
    pub fn bright_white(&self) -> PaletteColor {
        self.colors[15]
    }
}

/// Semantic colors for every component of the bar, derived from the palette.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub icon_fg: PaletteColor,
    pub icon_bg: PaletteColor,

    pub battery_bg: PaletteColor,
    pub battery_text: PaletteColor,
    pub battery_low: PaletteColor,
    pub battery_charging: PaletteColor,
    pub battery_full: PaletteColor,

    pub clock_bg: PaletteColor,
    pub clock_fg: PaletteColor,
    pub date_bg: PaletteColor,
    pub date_fg: PaletteColor,
}

impl Theme {
    pub fn from_palette(palette: &Palette) -> Self {
        Theme {
            icon_fg: palette.bright_black(),
            icon_bg: palette.blue(),
            battery_bg: palette.bright_white(),
            battery_text: palette.bright_black(),
            battery_low: palette.red(),
            battery_charging: palette.cyan(),
            battery_full: palette.green(),
            clock_bg: palette.magenta(),
            clock_fg: palette.bright_white(),
            date_bg: palette.green(),
            date_fg: palette.bright_white(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::from_palette(&Palette::default())
    }
}

/// Glyphs drawn by the bar. All are expected to be one column wide per char.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyphs {
    pub shell_icon: String,
    pub clock_icon: String,
    pub date_icon: String,
    pub separator: String,
    pub soft_separator: String,
    pub status_separator: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Glyphs {
            shell_icon: " \u{e843} ".to_string(),
            clock_icon: "\u{f017}".to_string(),
            date_icon: "\u{ef37}".to_string(),
            separator: ROUND_SEPARATOR.to_string(),
            soft_separator: SOFT_SEPARATOR.to_string(),
            status_separator: ROUND_LEFT_SEPARATOR.to_string(),
        }
    }
}

// ============================================================================
// Color parsing and contrast
// ============================================================================

/// Parse `#rrggbb` (leading `#` optional) or an xterm 256-color index.
pub fn parse_color(value: &str) -> Result<PaletteColor, ConfigError> {
    let value = value.trim();
    if value.len() <= 3 {
        if let Ok(index) = value.parse::<u8>() {
            return Ok(PaletteColor::EightBit(index));
        }
    }

    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(value.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| ConfigError::InvalidColor(value.to_string()))
    };
    Ok(PaletteColor::Rgb((channel(0..2)?, channel(2..4)?, channel(4..6)?)))
}

const ANSI_16: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00),
    (0xcd, 0x00, 0x00),
    (0x00, 0xcd, 0x00),
    (0xcd, 0xcd, 0x00),
    (0x00, 0x00, 0xee),
    (0xcd, 0x00, 0xcd),
    (0x00, 0xcd, 0xcd),
    (0xe5, 0xe5, 0xe5),
    (0x7f, 0x7f, 0x7f),
    (0xff, 0x00, 0x00),
    (0x00, 0xff, 0x00),
    (0xff, 0xff, 0x00),
    (0x5c, 0x5c, 0xff),
    (0xff, 0x00, 0xff),
    (0x00, 0xff, 0xff),
    (0xff, 0xff, 0xff),
];

/// Resolve a palette color to RGB using the xterm 256-color layout.
pub fn to_rgb(color: PaletteColor) -> (u8, u8, u8) {
    match color {
        PaletteColor::Rgb(rgb) => rgb,
        PaletteColor::EightBit(index @ 0..=15) => ANSI_16[index as usize],
        PaletteColor::EightBit(index @ 16..=231) => {
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            let i = index - 16;
            (level(i / 36), level((i / 6) % 6), level(i % 6))
        }
        PaletteColor::EightBit(index) => {
            let gray = 8 + (index - 232) * 10;
            (gray, gray, gray)
        }
    }
}

fn relative_luminance(color: PaletteColor) -> f64 {
    let (r, g, b) = to_rgb(color);
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// WCAG contrast ratio between two colors, in `[1.0, 21.0]`.
pub fn contrast(a: PaletteColor, b: PaletteColor) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}
