// Recurring redraw timer on top of zellij's one-shot set_timeout

pub const DEFAULT_REFRESH_SECS: f64 = 1.0;

/// Keeps the clock and battery live between user-triggered redraws.
///
/// Zellij timeouts fire once, so every fire re-arms the next one. The
/// scheduling call is passed in so the host API stays at the call site.
#[derive(Debug, Clone, PartialEq)]
pub struct RedrawTimer {
    interval: f64,
    armed: bool,
}

impl Default for RedrawTimer {
    fn default() -> Self {
        RedrawTimer::new(DEFAULT_REFRESH_SECS)
    }
}

impl RedrawTimer {
    pub fn new(interval: f64) -> Self {
        RedrawTimer {
            interval,
            armed: false,
        }
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Schedule the first tick. Does nothing once armed.
    pub fn arm_once(&mut self, schedule: impl FnOnce(f64)) -> bool {
        if self.armed {
            return false;
        }
        schedule(self.interval);
        self.armed = true;
        true
    }

    /// Handle a tick: schedule the next one and report whether the tab
    /// bar should be redrawn.
    pub fn fire(&mut self, schedule: impl FnOnce(f64)) -> bool {
        if !self.armed {
            return false;
        }
        schedule(self.interval);
        true
    }
}
