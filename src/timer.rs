//! Countdown timer store.
//!
//! The server is the single source of truth for elapsed time: the store never
//! ticks locally, it only replaces its value on each `interview-time`
//! snapshot. `timeLeft` is accepted in both observed wire shapes — a
//! pre-formatted `"HH:MM:SS"` string or a raw seconds count — and normalized
//! to seconds at the boundary.

use tracing::warn;

use crate::messages::{TimeLeft, TimerPayload};

/// Warning threshold: five minutes remaining.
pub const WARNING_SECS: u64 = 300;
/// Urgent threshold: three minutes remaining.
pub const URGENT_SECS: u64 = 180;

/// Styling tier for the remaining-time display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    /// ≤ 5 minutes remaining.
    Warning,
    /// ≤ 3 minutes remaining — pulsing style.
    Urgent,
}

/// Last-known time remaining, unset until the first snapshot arrives.
#[derive(Debug, Default)]
pub struct TimerStore {
    seconds: Option<u64>,
}

impl TimerStore {
    pub fn new() -> Self {
        TimerStore::default()
    }

    /// Apply one `interview-time` snapshot, replacing the last-known value.
    /// An unparseable formatted string keeps the previous value.
    pub fn on_timer_message(&mut self, payload: &TimerPayload) {
        match &payload.time_left {
            TimeLeft::Seconds(n) => {
                self.seconds = Some((*n).max(0) as u64);
            }
            TimeLeft::Formatted(s) => match parse_clock(s) {
                Some(secs) => self.seconds = Some(secs),
                None => warn!(value = %s, "unparseable timeLeft string, keeping last value"),
            },
        }
    }

    pub fn seconds_remaining(&self) -> Option<u64> {
        self.seconds
    }

    /// Display text: `HH:MM:SS` when hours > 0, `MM:SS` when minutes > 0,
    /// `0:SS` under a minute. `--:--` before the first snapshot.
    pub fn display(&self) -> String {
        match self.seconds {
            Some(secs) => format_clock(secs),
            None => "--:--".to_string(),
        }
    }

    pub fn urgency(&self) -> Urgency {
        match self.seconds {
            Some(secs) if secs <= URGENT_SECS => Urgency::Urgent,
            Some(secs) if secs <= WARNING_SECS => Urgency::Warning,
            _ => Urgency::Normal,
        }
    }

    /// Back to unset, as on disconnect.
    pub fn reset(&mut self) {
        self.seconds = None;
    }
}

/// Parse `"HH:MM:SS"` (or `"MM:SS"`) into seconds.
pub fn parse_clock(s: &str) -> Option<u64> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    let nums: Vec<u64> = parts
        .iter()
        .map(|p| p.parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>()?;
    match nums.as_slice() {
        [h, m, sec] => Some(h * 3600 + m * 60 + sec),
        [m, sec] => Some(m * 60 + sec),
        _ => None,
    }
}

/// Format seconds for display. Hours are retained only when nonzero.
pub fn format_clock(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else if minutes > 0 {
        format!("{minutes:02}:{seconds:02}")
    } else {
        format!("0:{seconds:02}")
    }
}
