// Battery state and the status cells it contributes

#[cfg(any(test, not(target_family = "wasm")))]
use std::fs;
use std::io;
use std::path::Path;
#[cfg(any(test, not(target_family = "wasm")))]
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};
use zellij_tile::prelude::PaletteColor;

use crate::status::Cell;
use crate::theme::Theme;
use crate::threshold::ThresholdTable;

pub const DEFAULT_BATTERY_PATH: &str = "/sys/class/power_supply/BAT0";
const STATUS_FILE: &str = "status";
const CAPACITY_FILE: &str = "capacity";

const PLUGGED_ICON: &str = "\u{f0084}";
const UNPLUGGED_ICONS: [(u8, &str); 10] = [
    (10, "\u{f007a}"),
    (20, "\u{f007b}"),
    (30, "\u{f007c}"),
    (40, "\u{f007d}"),
    (50, "\u{f007e}"),
    (60, "\u{f007f}"),
    (70, "\u{f0080}"),
    (80, "\u{f0081}"),
    (90, "\u{f0082}"),
    (100, "\u{f0079}"),
];

// ============================================================================
// Readings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChargeState {
    Discharging,
    /// Plugged in but not charging (e.g. held at a charge limit)
    NotCharging,
    /// Anything else the kernel reports: charging, full, unknown
    Charging,
}

impl ChargeState {
    pub fn from_status(status: &str) -> Self {
        match status.trim_end() {
            "Discharging" => ChargeState::Discharging,
            "Not charging" => ChargeState::NotCharging,
            _ => ChargeState::Charging,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeState::Discharging => "discharging",
            ChargeState::NotCharging => "not-charging",
            ChargeState::Charging => "charging",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatteryReading {
    pub state: ChargeState,
    pub percent: u8,
}

impl BatteryReading {
    /// Parse the raw contents of the sysfs `status` and `capacity` files.
    pub fn parse(status: &str, capacity: &str) -> Result<Self, BatteryError> {
        let raw = capacity.trim();
        let percent: u32 = raw
            .parse()
            .map_err(|_| BatteryError::Capacity(raw.to_string()))?;

        Ok(BatteryReading {
            state: ChargeState::from_status(status),
            percent: percent.min(100) as u8,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatteryError {
    #[error("no battery present")]
    Absent,

    #[error("failed to read battery {file}: {source}")]
    Read {
        file: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("invalid battery capacity {0:?}")]
    Capacity(String),
}

// ============================================================================
// Sources
// ============================================================================

/// Where battery `status` and `capacity` contents come from.
/// A `NotFound` error from either read means there is no battery.
pub trait BatterySource {
    fn read_status(&self) -> io::Result<String>;
    fn read_capacity(&self) -> io::Result<String>;
}

/// Reads the power-supply files directly. Only usable outside the plugin
/// sandbox.
#[cfg(any(test, not(target_family = "wasm")))]
#[derive(Debug, Clone)]
pub struct SysfsBattery {
    dir: PathBuf,
}

#[cfg(any(test, not(target_family = "wasm")))]
impl SysfsBattery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SysfsBattery { dir: dir.into() }
    }
}

#[cfg(any(test, not(target_family = "wasm")))]
impl BatterySource for SysfsBattery {
    fn read_status(&self) -> io::Result<String> {
        fs::read_to_string(self.dir.join(STATUS_FILE))
    }

    fn read_capacity(&self) -> io::Result<String> {
        fs::read_to_string(self.dir.join(CAPACITY_FILE))
    }
}

/// Battery contents delivered by a host command (`cat status capacity`).
///
/// The plugin sandbox cannot see `/sys`, so the files are read out of
/// process and the result is fed back here from `RunCommandResult`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PolledBattery {
    /// No command result received yet
    #[default]
    Pending,
    Absent,
    Ready {
        status: String,
        capacity: String,
    },
    Failed(String),
}

impl PolledBattery {
    /// Command line that prints `status` then `capacity` from `dir`.
    pub fn command(dir: &Path) -> Vec<String> {
        vec![
            "cat".to_string(),
            dir.join(STATUS_FILE).to_string_lossy().into_owned(),
            dir.join(CAPACITY_FILE).to_string_lossy().into_owned(),
        ]
    }

    /// Capture the current contents of another source.
    #[cfg(any(test, not(target_family = "wasm")))]
    pub fn snapshot<S: BatterySource + ?Sized>(source: &S) -> Self {
        match (source.read_status(), source.read_capacity()) {
            (Ok(status), Ok(capacity)) => PolledBattery::Ready { status, capacity },
            (Err(e), _) | (_, Err(e)) if e.kind() == io::ErrorKind::NotFound => PolledBattery::Absent,
            (Err(e), _) | (_, Err(e)) => PolledBattery::Failed(e.to_string()),
        }
    }

    pub fn apply_command_result(&mut self, exit_code: Option<i32>, stdout: &[u8], stderr: &[u8]) {
        let stdout = String::from_utf8_lossy(stdout);
        let stderr = String::from_utf8_lossy(stderr);

        *self = match exit_code {
            Some(0) => {
                let mut lines = stdout.split_inclusive('\n');
                match (lines.next(), lines.next()) {
                    (Some(status), Some(capacity)) => PolledBattery::Ready {
                        status: status.to_string(),
                        capacity: capacity.to_string(),
                    },
                    _ => PolledBattery::Failed(format!("unexpected output {:?}", stdout)),
                }
            }
            _ if stderr.contains("No such file") => PolledBattery::Absent,
            code => PolledBattery::Failed(format!(
                "exit code {:?}: {}",
                code,
                stderr.trim()
            )),
        };
        debug!("battery poll result: {:?}", self);
    }

    fn read(&self, pick: impl Fn(&str, &str) -> String) -> io::Result<String> {
        match self {
            PolledBattery::Pending | PolledBattery::Absent => {
                Err(io::Error::new(io::ErrorKind::NotFound, "battery not reported"))
            }
            PolledBattery::Ready { status, capacity } => Ok(pick(status, capacity)),
            PolledBattery::Failed(msg) => Err(io::Error::other(msg.clone())),
        }
    }
}

impl BatterySource for PolledBattery {
    fn read_status(&self) -> io::Result<String> {
        self.read(|status, _| status.to_string())
    }

    fn read_capacity(&self) -> io::Result<String> {
        self.read(|_, capacity| capacity.to_string())
    }
}

fn read_file(file: &'static str, result: io::Result<String>) -> Result<String, BatteryError> {
    result.map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => BatteryError::Absent,
        _ => BatteryError::Read { file, source },
    })
}

pub fn read_battery<S: BatterySource + ?Sized>(source: &S) -> Result<BatteryReading, BatteryError> {
    let status = read_file(STATUS_FILE, source.read_status())?;
    let capacity = read_file(CAPACITY_FILE, source.read_capacity())?;
    BatteryReading::parse(&status, &capacity)
}

/// Read the battery, degrading every failure to "no battery".
/// Absence is silent; any other error is logged.
pub fn try_read_battery<S: BatterySource + ?Sized>(source: &S) -> Option<BatteryReading> {
    match read_battery(source) {
        Ok(reading) => Some(reading),
        Err(BatteryError::Absent) => None,
        Err(e) => {
            warn!("battery read failed: {}", e);
            None
        }
    }
}

// ============================================================================
// Appearance
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryAppearance {
    pub icon: &'static str,
    pub icon_color: PaletteColor,
    pub label_color: PaletteColor,
}

/// Icon and color threshold tables per charge state.
#[derive(Debug, Clone)]
pub struct BatteryStyle {
    unplugged_icons: ThresholdTable<&'static str>,
    plugged_icon: &'static str,
    // Below 16% is the low-battery color, everything else uses the text color
    unplugged_colors: ThresholdTable<PaletteColor>,
    plugged_colors: ThresholdTable<PaletteColor>,
    background: PaletteColor,
    label: PaletteColor,
}

impl BatteryStyle {
    pub fn from_theme(theme: &Theme) -> Self {
        BatteryStyle {
            unplugged_icons: ThresholdTable::new(UNPLUGGED_ICONS),
            plugged_icon: PLUGGED_ICON,
            unplugged_colors: ThresholdTable::new([
                (15, theme.battery_low),
                (16, theme.battery_text),
            ]),
            plugged_colors: ThresholdTable::new([
                (15, theme.battery_low),
                (16, theme.battery_charging),
                (99, theme.battery_charging),
                (100, theme.battery_full),
            ]),
            background: theme.battery_bg,
            label: theme.battery_text,
        }
    }

    pub fn resolve(&self, reading: &BatteryReading) -> BatteryAppearance {
        let pct = reading.percent;
        let (icon, colors) = match reading.state {
            ChargeState::Discharging => (
                self.unplugged_icons.pick(pct).copied().unwrap_or(self.plugged_icon),
                &self.unplugged_colors,
            ),
            ChargeState::NotCharging => (self.plugged_icon, &self.unplugged_colors),
            ChargeState::Charging => (self.plugged_icon, &self.plugged_colors),
        };

        BatteryAppearance {
            icon,
            icon_color: colors.pick(pct).copied().unwrap_or(self.label),
            label_color: self.label,
        }
    }

    /// The icon cell followed by the percentage cell.
    pub fn cells(&self, reading: &BatteryReading) -> Vec<Cell> {
        let appearance = self.resolve(reading);
        vec![
            Cell::new(self.background, appearance.icon_color, appearance.icon),
            Cell::new(
                self.background,
                appearance.label_color,
                format!("{}%", reading.percent),
            ),
        ]
    }
}

/// Battery cells for the status cluster: two cells, or none when no
/// battery can be read.
pub fn battery_cells<S: BatterySource + ?Sized>(source: &S, style: &BatteryStyle) -> Vec<Cell> {
    try_read_battery(source)
        .map(|reading| style.cells(&reading))
        .unwrap_or_default()
}
