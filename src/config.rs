//! Session configuration. Everything the experimenter might want to change
//! between studies lives here, and is read from a [ron] file such as:
//!
//! ```text
//! (
//!     num_runs: 40,
//!     max_inflations: 18,
//!     lower_bound_range: (3, 10),
//!     peripheral: (enabled: false, baud_rate: 115200),
//!     timestamp_style: Iso8601,
//! )
//! ```
//!
//! Any field left out takes the value of [BartConfig::default()], which
//! reproduces the standard paradigm.

use crate::{error::BartError, timestamp::TimestampStyle};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// A key the participant can press. Kept independent of the terminal
/// library so that configs and tests never touch crossterm.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum ResponseKey {
    /// The space bar
    Space,
    /// Return / Enter
    Enter,
    /// Any printable key, matched case-insensitively
    Char(char),
}

impl ResponseKey {
    /// The name shown to the participant in the instructions.
    pub fn label(&self) -> String {
        match self {
            ResponseKey::Space => "SPACE".to_owned(),
            ResponseKey::Enter => "ENTER".to_owned(),
            ResponseKey::Char(c) => c.to_ascii_uppercase().to_string(),
        }
    }

    /// Whether two keys should be treated as the same press.
    pub fn matches(&self, other: &ResponseKey) -> bool {
        match (self, other) {
            (ResponseKey::Char(a), ResponseKey::Char(b)) => a.eq_ignore_ascii_case(b),
            (a, b) => a == b,
        }
    }
}

/// Which keys do what.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Pump the balloon once
    pub inflate: ResponseKey,
    /// Bank the current run's reward
    pub cash_in: ResponseKey,
    /// Leave the instruction screen
    pub begin: ResponseKey,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            inflate: ResponseKey::Space,
            cash_in: ResponseKey::Enter,
            begin: ResponseKey::Enter,
        }
    }
}

/// Settings for the hardware synchronization line.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PeripheralConfig {
    /// When false, triggers are looked up but never written anywhere
    pub enabled: bool,
    /// Device to open; the first enumerated port when absent
    pub port: Option<PathBuf>,
    pub baud_rate: u32,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: None,
            baud_rate: 115200,
        }
    }
}

/// Everything that parameterizes a session.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BartConfig {
    /// Number of balloons per session
    pub num_runs: u32,

    /// Pumps after which every balloon has certainly exploded
    pub max_inflations: u32,

    /// Inclusive range the per-session lower bound on explosion points is
    /// drawn from
    pub lower_bound_range: (u32, u32),

    /// Seconds to wait after each inflate press
    pub between_pump_delay: f64,

    /// Seconds to wait after each run
    pub between_run_delay: f64,

    /// Seconds the explosion stays on screen
    pub explosion_delay: f64,

    pub keys: KeyBindings,

    pub peripheral: PeripheralConfig,

    pub timestamp_style: TimestampStyle,

    /// Balloon and explosion fill, as `#RRGGBB`
    pub balloon_color: String,

    /// Size in pixels of the virtual screen stimuli are laid out on
    pub screen_size: (f64, f64),

    /// When set, log records go to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for BartConfig {
    fn default() -> Self {
        Self {
            num_runs: 40,
            max_inflations: 18,
            lower_bound_range: (3, 10),
            between_pump_delay: 0.1,
            between_run_delay: 0.5,
            explosion_delay: 1.5,
            keys: KeyBindings::default(),
            peripheral: PeripheralConfig::default(),
            timestamp_style: TimestampStyle::default(),
            balloon_color: "#B91515".to_owned(),
            screen_size: (1920.0, 1080.0),
            log_file: None,
        }
    }
}

impl BartConfig {
    /// Read and validate a config from the RON file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BartError> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Parse and validate a config from RON text.
    pub fn from_ron(text: &str) -> Result<Self, BartError> {
        let config: BartConfig = ron::de::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot produce a valid explosion point.
    pub fn validate(&self) -> Result<(), BartError> {
        let (low, high) = self.lower_bound_range;
        if self.max_inflations == 0 {
            return Err(BartError::InvalidConfig(
                "max_inflations must be at least 1".to_owned(),
            ));
        }
        if low == 0 || low > high {
            return Err(BartError::InvalidConfig(format!(
                "lower_bound_range ({}, {}) is empty or starts at zero",
                low, high
            )));
        }
        if high > self.max_inflations {
            return Err(BartError::InvalidConfig(format!(
                "lower_bound_range ends at {} but max_inflations is {}",
                high, self.max_inflations
            )));
        }
        let delays = [
            ("between_pump_delay", self.between_pump_delay),
            ("between_run_delay", self.between_run_delay),
            ("explosion_delay", self.explosion_delay),
        ];
        for (name, value) in delays {
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(BartError::InvalidConfig(format!(
                    "{} of {} seconds is not a usable delay",
                    name, value
                )));
            }
        }
        if self.keys.inflate.matches(&self.keys.cash_in) {
            return Err(BartError::InvalidConfig(
                "inflate and cash_in must be different keys".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn between_pump(&self) -> Duration {
        seconds(self.between_pump_delay)
    }

    pub fn between_run(&self) -> Duration {
        seconds(self.between_run_delay)
    }

    pub fn explosion(&self) -> Duration {
        seconds(self.explosion_delay)
    }
}

/// Delays that [BartConfig::validate] would reject become zero rather than
/// panicking mid-session.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_standard_paradigm() {
        let config = BartConfig::default();
        assert_eq!(config.num_runs, 40);
        assert_eq!(config.max_inflations, 18);
        assert_eq!(config.lower_bound_range, (3, 10));
        assert_eq!(config.peripheral.baud_rate, 115200);
        assert!(!config.peripheral.enabled);
        assert_eq!(config.between_pump(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config =
            BartConfig::from_ron("(num_runs: 3, peripheral: (enabled: true))").unwrap();
        assert_eq!(config.num_runs, 3);
        assert!(config.peripheral.enabled);
        assert_eq!(config.peripheral.baud_rate, 115200);
        assert_eq!(config.max_inflations, 18);
        assert_eq!(config.keys, KeyBindings::default());
    }

    #[test]
    fn custom_keys() {
        let config =
            BartConfig::from_ron("(keys: (inflate: Char('f'), cash_in: Char('j')))").unwrap();
        assert_eq!(config.keys.inflate, ResponseKey::Char('f'));
        assert_eq!(config.keys.begin, ResponseKey::Enter);
    }

    #[test]
    fn rejects_bad_lower_bound() {
        assert!(matches!(
            BartConfig::from_ron("(lower_bound_range: (10, 3))"),
            Err(BartError::InvalidConfig(_))
        ));
        assert!(matches!(
            BartConfig::from_ron("(lower_bound_range: (3, 20))"),
            Err(BartError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_huge_delay() {
        assert!(matches!(
            BartConfig::from_ron("(between_pump_delay: 1e30)"),
            Err(BartError::InvalidConfig(_))
        ));
        assert!(matches!(
            BartConfig::from_ron("(explosion_delay: -0.5)"),
            Err(BartError::InvalidConfig(_))
        ));
        assert!(BartConfig::from_ron("(between_run_delay: 0.0)").is_ok());
    }

    #[test]
    fn rejects_same_key_for_both_responses() {
        assert!(matches!(
            BartConfig::from_ron("(keys: (inflate: Enter, cash_in: Enter))"),
            Err(BartError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_malformed_ron() {
        assert!(matches!(
            BartConfig::from_ron("(num_runs: \"many\")"),
            Err(BartError::RonSpannedError(_))
        ));
    }

    #[test]
    fn char_keys_ignore_case() {
        assert!(ResponseKey::Char('f').matches(&ResponseKey::Char('F')));
        assert!(!ResponseKey::Space.matches(&ResponseKey::Enter));
        assert_eq!(ResponseKey::Char('f').label(), "F");
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = BartConfig::from_ron(include_str!("../config/bart.ron")).unwrap();
        assert_eq!(
            config,
            BartConfig {
                log_file: Some(PathBuf::from("bart.log")),
                ..BartConfig::default()
            }
        );
    }

    #[test]
    fn read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"(num_runs: 5)").unwrap();
        let config = BartConfig::from_path(file.path()).unwrap();
        assert_eq!(config.num_runs, 5);
    }
}
