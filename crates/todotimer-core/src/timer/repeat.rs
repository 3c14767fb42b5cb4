use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens when the active task finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Advance and stop after the last task.
    #[default]
    #[serde(rename = "off")]
    Off,
    /// Restart the same task indefinitely.
    #[serde(rename = "current")]
    RepeatCurrent,
    /// Wrap to the first task after the last.
    #[serde(rename = "all")]
    RepeatAll,
}

impl RepeatMode {
    /// Next mode in the toggle cycle `Off -> RepeatCurrent -> RepeatAll -> Off`.
    pub fn next(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::RepeatCurrent,
            RepeatMode::RepeatCurrent => RepeatMode::RepeatAll,
            RepeatMode::RepeatAll => RepeatMode::Off,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::RepeatCurrent => "current",
            RepeatMode::RepeatAll => "all",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(RepeatMode::Off),
            "current" | "one" => Ok(RepeatMode::RepeatCurrent),
            "all" => Ok(RepeatMode::RepeatAll),
            other => Err(format!("unknown repeat mode: {other} (expected off, current or all)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_visits_every_mode() {
        let mut mode = RepeatMode::Off;
        mode = mode.next();
        assert_eq!(mode, RepeatMode::RepeatCurrent);
        mode = mode.next();
        assert_eq!(mode, RepeatMode::RepeatAll);
        mode = mode.next();
        assert_eq!(mode, RepeatMode::Off);
    }

    #[test]
    fn parses_and_displays() {
        for mode in [RepeatMode::Off, RepeatMode::RepeatCurrent, RepeatMode::RepeatAll] {
            assert_eq!(mode.to_string().parse::<RepeatMode>(), Ok(mode));
        }
        assert_eq!("ALL".parse::<RepeatMode>(), Ok(RepeatMode::RepeatAll));
        assert!("sometimes".parse::<RepeatMode>().is_err());
    }

    #[test]
    fn serde_uses_short_names() {
        assert_eq!(
            serde_json::to_string(&RepeatMode::RepeatCurrent).unwrap(),
            "\"current\""
        );
        let mode: RepeatMode = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(mode, RepeatMode::RepeatAll);
    }
}
