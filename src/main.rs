// zellij-powertabs: Tab-bar plugin with powerline tabs and a battery/clock/date status cluster

mod battery;
mod line;
mod screen;
mod status;
mod tab;
mod theme;
mod threshold;
mod timer;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{FixedOffset, Local, NaiveDateTime, Utc};
use tracing::Level;
use unicode_width::UnicodeWidthStr;
use zellij_tile::prelude::*;

use crate::battery::{try_read_battery, PolledBattery, DEFAULT_BATTERY_PATH};
use crate::line::{draw_tab_bar, TabBarContext, TabSpan};
use crate::screen::Screen;
use crate::status::{build_status_cells, is_valid_time_format, Cell, StatusOptions};
use crate::tab::{TabColors, TabEntry};
use crate::theme::{parse_color, Glyphs, Palette, Theme};
use crate::timer::{RedrawTimer, DEFAULT_REFRESH_SECS};

const PIPE_NAME: &str = "zellij-powertabs:status";
const BATTERY_CONTEXT: &str = "battery";

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("invalid time format {value:?} for {key}")]
    InvalidTimeFormat { key: String, value: String },

    #[error("invalid utc offset {0:?}, expected +HH:MM")]
    InvalidOffset(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TabColorOverrides {
    active_fg: Option<PaletteColor>,
    active_bg: Option<PaletteColor>,
    inactive_fg: Option<PaletteColor>,
    inactive_bg: Option<PaletteColor>,
}

#[derive(Debug, Clone, PartialEq)]
struct Config {
    palette: Palette,
    tab_colors: TabColorOverrides,
    default_fg: Option<PaletteColor>,
    default_bg: Option<PaletteColor>,
    glyphs: Glyphs,
    status: StatusOptions,
    battery_path: PathBuf,
    right_margin: usize,
    refresh_secs: f64,
    /// Fixed offset for the clock; the plugin sandbox has no timezone database
    utc_offset: Option<FixedOffset>,
    show_position: bool,
    log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Config::from_btreemap(&BTreeMap::new()).0
    }
}

fn parse_utc_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidOffset(value.to_string());
    let value = value.trim();
    if value.eq_ignore_ascii_case("utc") || value == "Z" {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = if let Some(rest) = value.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = value.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid());
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

impl Config {
    /// Build the config from the plugin's KDL block. Invalid values fall
    /// back to their defaults and are returned for logging.
    fn from_btreemap(config: &BTreeMap<String, String>) -> (Self, Vec<ConfigError>) {
        let mut errors = Vec::new();

        let mut color = |key: &str| -> Option<PaletteColor> {
            let value = config.get(key)?;
            parse_color(value).map_err(|e| errors.push(e)).ok()
        };

        let mut palette = Palette::default();
        for (idx, slot) in palette.colors.iter_mut().enumerate() {
            if let Some(c) = color(&format!("color{}", idx)) {
                *slot = c;
            }
        }
        let tab_colors = TabColorOverrides {
            active_fg: color("active_tab_fg"),
            active_bg: color("active_tab_bg"),
            inactive_fg: color("inactive_tab_fg"),
            inactive_bg: color("inactive_tab_bg"),
        };
        let default_fg = color("default_fg");
        let default_bg = color("default_bg");

        let mut glyphs = Glyphs::default();
        for (key, slot) in [
            ("shell_icon", &mut glyphs.shell_icon),
            ("clock_icon", &mut glyphs.clock_icon),
            ("date_icon", &mut glyphs.date_icon),
            ("separator", &mut glyphs.separator),
            ("soft_separator", &mut glyphs.soft_separator),
            ("status_separator", &mut glyphs.status_separator),
        ] {
            if let Some(value) = config.get(key) {
                // The right cluster budgets exactly one column per separator glyph
                if key == "status_separator" && UnicodeWidthStr::width(value.as_str()) != 1 {
                    errors.push(ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: value.clone(),
                    });
                    continue;
                }
                *slot = value.clone();
            }
        }

        let mut status = StatusOptions {
            show_battery: config.get("show_battery").map(|s| s != "false").unwrap_or(true),
            show_clock: config.get("show_clock").map(|s| s != "false").unwrap_or(true),
            show_date: config.get("show_date").map(|s| s != "false").unwrap_or(true),
            ..Default::default()
        };
        for (key, slot) in [
            ("clock_format", &mut status.clock_format),
            ("date_format", &mut status.date_format),
        ] {
            if let Some(value) = config.get(key) {
                if is_valid_time_format(value) {
                    *slot = value.clone();
                } else {
                    errors.push(ConfigError::InvalidTimeFormat {
                        key: key.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }

        let battery_path = config
            .get("battery_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BATTERY_PATH));

        let mut number = |key: &str| -> Option<f64> {
            let value = config.get(key)?;
            match value.parse::<f64>() {
                Ok(n) if n.is_finite() && n >= 0.0 => Some(n),
                _ => {
                    errors.push(ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: value.clone(),
                    });
                    None
                }
            }
        };
        let refresh_secs = number("refresh_secs")
            .filter(|n| *n > 0.0)
            .unwrap_or(DEFAULT_REFRESH_SECS);

        let right_margin = match config.get("right_margin") {
            Some(value) => value.trim().parse::<usize>().unwrap_or_else(|_| {
                errors.push(ConfigError::InvalidValue {
                    key: "right_margin".to_string(),
                    value: value.clone(),
                });
                0
            }),
            None => 0,
        };

        let utc_offset = config
            .get("utc_offset")
            .and_then(|s| parse_utc_offset(s).map_err(|e| errors.push(e)).ok());

        let show_position = config
            .get("show_position")
            .map(|s| s == "true")
            .unwrap_or(false);

        let log_level = match config.get("log_level") {
            Some(value) => Level::from_str(value).unwrap_or_else(|_| {
                errors.push(ConfigError::InvalidValue {
                    key: "log_level".to_string(),
                    value: value.clone(),
                });
                Level::INFO
            }),
            None => Level::INFO,
        };

        let config = Config {
            palette,
            tab_colors,
            default_fg,
            default_bg,
            glyphs,
            status,
            battery_path,
            right_margin,
            refresh_secs,
            utc_offset,
            show_position,
            log_level,
        };
        (config, errors)
    }

    fn now(&self) -> NaiveDateTime {
        match self.utc_offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

fn init_logging(level: Level) {
    // zellij collects plugin stderr into its own log file
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .with_max_level(level)
        .try_init();
}

// ============================================================================
// Plugin State
// ============================================================================

#[derive(Default)]
struct State {
    tabs: Vec<TabInfo>,
    mode_info: ModeInfo,
    config: Config,
    theme: Theme,

    // Timer and reserved width, kept across redraws
    context: TabBarContext,
    battery: PolledBattery,

    // Cached from the last render
    tab_spans: Vec<TabSpan>,
    cells: Vec<Cell>,
}

impl State {
    fn configure(&mut self, config: Config) {
        self.theme = Theme::from_palette(&config.palette);
        self.context = TabBarContext::new(RedrawTimer::new(config.refresh_secs));
        self.config = config;
    }

    fn handle_tab_update(&mut self, tabs: Vec<TabInfo>) -> bool {
        if self.tabs == tabs {
            return false;
        }
        self.tabs = tabs;
        true
    }

    fn tab_colors(&self) -> TabColors {
        let base = TabColors::from_mode_info(&self.mode_info);
        let overrides = &self.config.tab_colors;
        TabColors {
            active_fg: overrides.active_fg.unwrap_or(base.active_fg),
            active_bg: overrides.active_bg.unwrap_or(base.active_bg),
            inactive_fg: overrides.inactive_fg.unwrap_or(base.inactive_fg),
            inactive_bg: overrides.inactive_bg.unwrap_or(base.inactive_bg),
        }
    }

    fn default_colors(&self) -> (PaletteColor, PaletteColor) {
        let text = &self.mode_info.style.colors.text_unselected;
        (
            self.config.default_fg.unwrap_or(text.base),
            self.config.default_bg.unwrap_or(text.background),
        )
    }

    /// Tab position under column `x`, if any.
    fn tab_at(&self, x: usize) -> Option<usize> {
        self.tab_spans
            .iter()
            .find(|span| span.contains(x))
            .map(|span| span.tab_index)
    }
}

// ============================================================================
// Rendering
// ============================================================================

impl State {
    fn render_tab_bar(&mut self, cols: usize, now: &NaiveDateTime) -> String {
        self.cells = build_status_cells(
            now,
            &self.battery,
            &self.theme,
            &self.config.glyphs,
            &self.config.status,
        );

        let renaming = self.mode_info.mode == InputMode::RenameTab;
        let colors = self.tab_colors();
        let entries: Vec<TabEntry> = self
            .tabs
            .iter()
            .map(|t| TabEntry::from_tab_info(t, renaming, self.config.show_position, &colors))
            .collect();

        let (default_fg, default_bg) = self.default_colors();
        let mut screen = Screen::new(cols, default_fg, default_bg);
        self.tab_spans = draw_tab_bar(
            &mut self.context,
            &mut screen,
            &entries,
            &self.cells,
            &self.theme,
            &self.config.glyphs,
            self.config.right_margin,
        );

        screen.render()
    }
}

// ============================================================================
// Status pipe
// ============================================================================

const PIPE_HELP: &str = r#"zellij-powertabs:status - Show what the status cluster is displaying

Usage:
  zellij pipe --name zellij-powertabs:status
  zellij pipe --name zellij-powertabs:status --args format=json
  zellij pipe --name zellij-powertabs:status --args help
"#;

impl State {
    fn status_report(&self, want_json: bool) -> String {
        let battery = if self.config.status.show_battery {
            try_read_battery(&self.battery)
        } else {
            None
        };
        let cells: Vec<&str> = self.cells.iter().map(|c| c.text.as_str()).collect();

        if want_json {
            let report = serde_json::json!({
                "battery": battery,
                "cells": cells,
                "reserved_width": self.context.reserved_width,
                "refresh_secs": self.context.timer.interval(),
                "timer_armed": self.context.timer.is_armed(),
            });
            return format!(
                "{}\n",
                serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
            );
        }

        let mut out = String::new();
        match battery {
            Some(reading) => {
                out.push_str(&format!(
                    "battery\t{}% ({})\n",
                    reading.percent,
                    reading.state.as_str()
                ));
            }
            None => out.push_str("battery\t(none)\n"),
        }
        for cell in cells {
            out.push_str(&format!("cell\t{}\n", cell));
        }
        out.push_str(&format!("reserved\t{} columns\n", self.context.reserved_width));
        out
    }
}

// ============================================================================
// Plugin Implementation
// ============================================================================

#[cfg(target_family = "wasm")]
register_plugin!(State);

/// Native preview: draw the bar once for a few sample tabs using the local
/// battery and clock. Arguments are `key=value` config entries.
#[cfg(not(target_family = "wasm"))]
fn main() {
    use crate::battery::SysfsBattery;

    let configuration: BTreeMap<String, String> = std::env::args()
        .skip(1)
        .filter_map(|arg| arg.split_once('=').map(|(k, v)| (k.to_string(), v.to_string())))
        .collect();
    let (config, errors) = Config::from_btreemap(&configuration);
    init_logging(config.log_level);
    for error in &errors {
        tracing::warn!("config: {}, using default", error);
    }

    let cols = std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(100);

    let mut state = State::default();
    state.battery = PolledBattery::snapshot(&SysfsBattery::new(&config.battery_path));
    state.configure(config);
    state.handle_tab_update(
        (0..3)
            .map(|position| TabInfo {
                position,
                name: format!("Tab #{}", position + 1),
                active: position == 1,
                ..Default::default()
            })
            .collect(),
    );

    let now = state.config.now();
    println!("{}", state.render_tab_bar(cols, &now));
}

#[cfg(target_family = "wasm")]
impl State {
    fn poll_battery(&self) {
        if !self.config.status.show_battery {
            return;
        }
        let command = PolledBattery::command(&self.config.battery_path);
        let args: Vec<&str> = command.iter().map(String::as_str).collect();
        let mut context = BTreeMap::new();
        context.insert("source".to_string(), BATTERY_CONTEXT.to_string());
        run_command(&args, context);
    }

    fn handle_mouse_click(&self, x: usize) {
        if let Some(tab_idx) = self.tab_at(x) {
            go_to_tab(tab_idx as u32 + 1);
        }
    }

    fn handle_scroll(&self, up: bool) {
        if up {
            go_to_previous_tab();
        } else {
            go_to_next_tab();
        }
    }
}

#[cfg(target_family = "wasm")]
impl ZellijPlugin for State {
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let (config, errors) = Config::from_btreemap(&configuration);
        init_logging(config.log_level);
        for error in &errors {
            tracing::warn!("config: {}, using default", error);
        }
        tracing::debug!("load() config={:?}", configuration);
        self.configure(config);

        request_permission(&[
            PermissionType::ReadApplicationState,
            PermissionType::ChangeApplicationState,
            PermissionType::RunCommands,
            PermissionType::ReadCliPipes,
        ]);
        subscribe(&[
            EventType::TabUpdate,
            EventType::ModeUpdate,
            EventType::Mouse,
            EventType::Timer,
            EventType::RunCommandResult,
            EventType::PermissionRequestResult,
        ]);
    }

    fn update(&mut self, event: Event) -> bool {
        match event {
            Event::ModeUpdate(mode_info) => {
                let changed = self.mode_info != mode_info;
                self.mode_info = mode_info;
                changed
            }
            Event::TabUpdate(tabs) => self.handle_tab_update(tabs),
            Event::Mouse(mouse_event) => {
                match mouse_event {
                    Mouse::LeftClick(_, x) => self.handle_mouse_click(x),
                    Mouse::ScrollUp(_) => self.handle_scroll(true),
                    Mouse::ScrollDown(_) => self.handle_scroll(false),
                    _ => {}
                }
                false
            }
            Event::Timer(_) => {
                let redraw = self.context.timer.fire(set_timeout);
                if redraw {
                    self.poll_battery();
                }
                redraw
            }
            Event::RunCommandResult(exit_code, stdout, stderr, context) => {
                if context.get("source").map(|s| s.as_str()) != Some(BATTERY_CONTEXT) {
                    return false;
                }
                self.battery.apply_command_result(exit_code, &stdout, &stderr);
                true
            }
            Event::PermissionRequestResult(PermissionStatus::Granted) => {
                set_selectable(false);
                self.poll_battery();
                true
            }
            Event::PermissionRequestResult(PermissionStatus::Denied) => {
                tracing::warn!("permission denied, battery and tab switching disabled");
                false
            }
            _ => false,
        }
    }

    fn pipe(&mut self, pipe_message: PipeMessage) -> bool {
        if pipe_message.name != PIPE_NAME {
            return false;
        }
        if let PipeSource::Cli(pipe_id) = &pipe_message.source {
            let is_help = pipe_message.args.contains_key("help")
                || pipe_message.payload.as_deref() == Some("help");
            let output = if is_help {
                PIPE_HELP.to_string()
            } else {
                let want_json = pipe_message.args.get("format").map(|s| s.as_str()) == Some("json");
                self.status_report(want_json)
            };
            cli_pipe_output(pipe_id, &output);
        }
        false
    }

    fn render(&mut self, _rows: usize, cols: usize) {
        if self.tabs.is_empty() {
            // Leave the pane blank so zellij's permission dialog shows cleanly
            return;
        }

        if self.context.timer.arm_once(set_timeout) {
            tracing::debug!("redraw timer armed every {}s", self.context.timer.interval());
        }

        let now = self.config.now();
        print!("{}", self.render_tab_bar(cols, &now));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mock_tab_info(position: usize, name: &str, active: bool) -> TabInfo {
        TabInfo {
            position,
            name: name.to_string(),
            active,
            ..Default::default()
        }
    }

    fn make_state(entries: &[(&str, &str)]) -> State {
        let (config, errors) = Config::from_btreemap(&make_map(entries));
        assert!(errors.is_empty(), "unexpected config errors: {:?}", errors);
        let mut state = State::default();
        state.configure(config);
        state
    }

    fn make_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(14, 5, 9))
            .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let (config, errors) = Config::from_btreemap(&BTreeMap::new());
        assert!(errors.is_empty());
        assert_eq!(config.palette, Palette::default());
        assert_eq!(config.battery_path, PathBuf::from(DEFAULT_BATTERY_PATH));
        assert_eq!(config.right_margin, 0);
        assert_eq!(config.refresh_secs, DEFAULT_REFRESH_SECS);
        assert_eq!(config.status, StatusOptions::default());
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.utc_offset.is_none());
        assert!(!config.show_position);
    }

    #[test]
    fn test_config_custom_values() {
        let (config, errors) = Config::from_btreemap(&make_map(&[
            ("color4", "#112233"),
            ("active_tab_bg", "33"),
            ("right_margin", "2"),
            ("refresh_secs", "5"),
            ("show_battery", "false"),
            ("clock_format", "%H:%M"),
            ("battery_path", "/sys/class/power_supply/BAT1"),
            ("separator", ">"),
            ("show_position", "true"),
            ("log_level", "debug"),
        ]));
        assert!(errors.is_empty());
        assert_eq!(config.palette.blue(), PaletteColor::Rgb((0x11, 0x22, 0x33)));
        assert_eq!(config.tab_colors.active_bg, Some(PaletteColor::EightBit(33)));
        assert_eq!(config.right_margin, 2);
        assert_eq!(config.refresh_secs, 5.0);
        assert!(!config.status.show_battery);
        assert!(config.status.show_clock);
        assert_eq!(config.status.clock_format, "%H:%M");
        assert_eq!(config.battery_path, PathBuf::from("/sys/class/power_supply/BAT1"));
        assert_eq!(config.glyphs.separator, ">");
        assert!(config.show_position);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_config_invalid_values_fall_back() {
        let (config, errors) = Config::from_btreemap(&make_map(&[
            ("color1", "not-a-color"),
            ("right_margin", "-3"),
            ("refresh_secs", "0"),
            ("date_format", "%Q"),
            ("utc_offset", "+2h"),
            ("log_level", "loud"),
        ]));
        assert_eq!(config.palette, Palette::default());
        assert_eq!(config.right_margin, 0);
        assert_eq!(config.refresh_secs, DEFAULT_REFRESH_SECS);
        assert_eq!(config.status.date_format, status::DEFAULT_DATE_FORMAT);
        assert!(config.utc_offset.is_none());
        assert_eq!(config.log_level, Level::INFO);

        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ConfigError::InvalidColor("not-a-color".to_string())));
        assert!(errors.contains(&ConfigError::InvalidTimeFormat {
            key: "date_format".to_string(),
            value: "%Q".to_string(),
        }));
    }

    #[test]
    fn test_config_rejects_timezone_format() {
        let (config, errors) = Config::from_btreemap(&make_map(&[("clock_format", "%H:%M %Z")]));
        assert_eq!(config.status.clock_format, status::DEFAULT_CLOCK_FORMAT);
        assert_eq!(
            errors,
            vec![ConfigError::InvalidTimeFormat {
                key: "clock_format".to_string(),
                value: "%H:%M %Z".to_string(),
            }]
        );

        let mut state = State::default();
        state.configure(config);
        state.handle_tab_update(vec![mock_tab_info(0, "one", true)]);
        assert!(state.render_tab_bar(80, &make_now()).contains("14:05:09"));
    }

    #[test]
    fn test_config_right_margin_must_be_whole_columns() {
        for value in ["1e30", "2.7", "99999999999999999999999"] {
            let (config, errors) = Config::from_btreemap(&make_map(&[("right_margin", value)]));
            assert_eq!(config.right_margin, 0, "right_margin={}", value);
            assert_eq!(
                errors,
                vec![ConfigError::InvalidValue {
                    key: "right_margin".to_string(),
                    value: value.to_string(),
                }]
            );
        }

        let (config, errors) = Config::from_btreemap(&make_map(&[("right_margin", " 4 ")]));
        assert!(errors.is_empty());
        assert_eq!(config.right_margin, 4);
    }

    #[test]
    fn test_huge_right_margin_does_not_overflow() {
        let mut state = make_state(&[]);
        state.config.right_margin = usize::MAX;
        state.handle_tab_update(vec![mock_tab_info(0, "one", true)]);
        state.render_tab_bar(40, &make_now());
        assert_eq!(state.context.reserved_width, usize::MAX);
    }

    #[test]
    fn test_config_status_separator_must_be_one_column() {
        for value in ["", "<<", "\u{65e5}"] {
            let (config, errors) = Config::from_btreemap(&make_map(&[("status_separator", value)]));
            assert_eq!(config.glyphs.status_separator, Glyphs::default().status_separator);
            assert_eq!(errors.len(), 1, "status_separator={:?}", value);
        }

        let (config, errors) = Config::from_btreemap(&make_map(&[("status_separator", "<")]));
        assert!(errors.is_empty());
        assert_eq!(config.glyphs.status_separator, "<");
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+02:00").unwrap().local_minus_utc(), 7200);
        assert_eq!(parse_utc_offset("-05:30").unwrap().local_minus_utc(), -19800);
        assert_eq!(parse_utc_offset("+9").unwrap().local_minus_utc(), 32400);
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("02:00").is_err());
        assert!(parse_utc_offset("+02:75").is_err());
        assert!(parse_utc_offset("+30:00").is_err());
        assert!(parse_utc_offset("").is_err());
    }

    #[test]
    fn test_handle_tab_update_detects_changes() {
        let mut state = make_state(&[]);
        let tabs = vec![mock_tab_info(0, "a", true)];
        assert!(state.handle_tab_update(tabs.clone()));
        assert!(!state.handle_tab_update(tabs));
        assert!(state.handle_tab_update(vec![mock_tab_info(0, "b", true)]));
    }

    #[test]
    fn test_render_tab_bar_tracks_spans_and_width() {
        let mut state = make_state(&[("shell_icon", " $ "), ("separator", ">"), ("soft_separator", "|")]);
        state.handle_tab_update(vec![
            mock_tab_info(0, "one", true),
            mock_tab_info(1, "two", false),
        ]);

        let output = state.render_tab_bar(80, &make_now());

        assert!(output.contains("one"));
        assert!(output.contains("14:05:09"));
        assert!(output.contains("01.01.2024"));
        // No battery reported yet: clock and date only
        assert_eq!(state.cells.len(), 2);
        assert_eq!(state.context.reserved_width, (10 + 2) + (12 + 2));

        assert_eq!(state.tab_at(5), Some(0));
        assert_eq!(state.tab_at(11), Some(1));
        assert_eq!(state.tab_at(0), None);
        assert_eq!(state.tab_at(79), None);
    }

    #[test]
    fn test_render_tab_bar_with_battery() {
        let mut state = make_state(&[]);
        state.handle_tab_update(vec![mock_tab_info(0, "one", true)]);
        state.battery.apply_command_result(Some(0), b"Discharging\n45\n", b"");

        let output = state.render_tab_bar(80, &make_now());
        assert_eq!(state.cells.len(), 4);
        assert_eq!(state.cells[1].text, "45%");
        assert!(output.contains("45%"));
    }

    #[test]
    fn test_status_report_json() {
        let mut state = make_state(&[]);
        state.handle_tab_update(vec![mock_tab_info(0, "one", true)]);
        state.battery.apply_command_result(Some(0), b"Not charging\n80\n", b"");
        state.render_tab_bar(80, &make_now());

        let report: serde_json::Value = serde_json::from_str(&state.status_report(true)).unwrap();
        assert_eq!(report["battery"]["state"], "not-charging");
        assert_eq!(report["battery"]["percent"], 80);
        assert_eq!(report["cells"].as_array().map(|a| a.len()), Some(4));
        assert_eq!(report["timer_armed"], false);
    }

    #[test]
    fn test_status_report_text_without_battery() {
        let mut state = make_state(&[("show_date", "false")]);
        state.handle_tab_update(vec![mock_tab_info(0, "one", true)]);
        state.render_tab_bar(80, &make_now());

        let report = state.status_report(false);
        assert!(report.starts_with("battery\t(none)\n"));
        assert!(report.contains("14:05:09"));
        assert!(!report.contains("2024"));
    }

    #[test]
    fn test_tab_color_overrides() {
        let mut state = make_state(&[("inactive_tab_bg", "#010203")]);
        state.mode_info = ModeInfo::default();
        let colors = state.tab_colors();
        assert_eq!(colors.inactive_bg, PaletteColor::Rgb((1, 2, 3)));
        assert_eq!(
            colors.active_bg,
            TabColors::from_mode_info(&state.mode_info).active_bg
        );
    }
}
