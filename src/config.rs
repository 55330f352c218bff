//! Writer configuration.
//!
//! Defaults match an interactive terminal: TTY output when stdout is a
//! terminal, a 100ms repaint interval and colored lines.

use std::time::Duration;

use crossterm::tty::IsTty;

/// Default repaint interval.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Narrowest width the layout is computed for.
pub const DEFAULT_MIN_WIDTH: u16 = 20;

/// Which writer renders progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// TTY writer when stdout is a terminal, plain writer otherwise.
    #[default]
    Auto,
    /// Redraw a block of lines in place.
    Tty,
    /// Print one line per event, no cursor control.
    Plain,
}

impl ProgressMode {
    /// Resolve `Auto` against the current stdout.
    pub fn resolve(self) -> ProgressMode {
        match self {
            ProgressMode::Auto if std::io::stdout().is_tty() => ProgressMode::Tty,
            ProgressMode::Auto => ProgressMode::Plain,
            other => other,
        }
    }
}

/// Settings shared by the writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressConfig {
    pub mode: ProgressMode,
    /// Time between two repaints of the TTY writer.
    pub tick_interval: Duration,
    /// Emit color escape codes.
    pub color: bool,
    /// Reported widths below this are raised to it.
    pub min_width: u16,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            mode: ProgressMode::Auto,
            tick_interval: DEFAULT_TICK,
            color: true,
            min_width: DEFAULT_MIN_WIDTH,
        }
    }
}

impl ProgressConfig {
    /// Defaults adjusted by the environment (`NO_COLOR`).
    pub fn from_env() -> Self {
        Self::default().with_color(!no_color(std::env::var_os("NO_COLOR")))
    }

    pub fn with_mode(mut self, mode: ProgressMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        // A zero interval would spin the repaint loop
        self.tick_interval = tick_interval.max(Duration::from_millis(1));
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_min_width(mut self, min_width: u16) -> Self {
        self.min_width = min_width;
        self
    }
}

/// `NO_COLOR` disables color when present and non-empty.
fn no_color(value: Option<std::ffi::OsString>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProgressConfig::default();
        assert_eq!(config.mode, ProgressMode::Auto);
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert!(config.color);
        assert_eq!(config.min_width, 20);
    }

    #[test]
    fn test_builders() {
        let config = ProgressConfig::default()
            .with_mode(ProgressMode::Plain)
            .with_tick_interval(Duration::ZERO)
            .with_color(false)
            .with_min_width(40);
        assert_eq!(config.mode, ProgressMode::Plain);
        assert_eq!(config.tick_interval, Duration::from_millis(1));
        assert!(!config.color);
        assert_eq!(config.min_width, 40);
    }

    #[test]
    fn test_no_color_value() {
        assert!(!no_color(None));
        assert!(!no_color(Some("".into())));
        assert!(no_color(Some("1".into())));
    }

    #[test]
    fn test_explicit_modes_resolve_to_themselves() {
        assert_eq!(ProgressMode::Tty.resolve(), ProgressMode::Tty);
        assert_eq!(ProgressMode::Plain.resolve(), ProgressMode::Plain);
    }
}
