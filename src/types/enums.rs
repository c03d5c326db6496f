//! Enumerations with exact native encodings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sys::{
    cef_log_severity_t, LOGSEVERITY_DEFAULT, LOGSEVERITY_DISABLE, LOGSEVERITY_ERROR,
    LOGSEVERITY_INFO, LOGSEVERITY_VERBOSE, LOGSEVERITY_WARNING,
};

/// Error returned when parsing an enumeration from its name fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}. Valid values are: {valid}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub valid: &'static str,
}

/// Log severity levels.
///
/// The raw values are the native ones; note that [`LogSeverity::Disable`] is
/// 99, not the next ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    /// Default logging (currently INFO logging).
    #[default]
    Default,
    /// Verbose logging.
    Verbose,
    /// INFO logging.
    Info,
    /// WARNING logging.
    Warning,
    /// ERROR logging.
    Error,
    /// Completely disable logging.
    Disable,
}

impl LogSeverity {
    pub const ALL: [LogSeverity; 6] = [
        LogSeverity::Default,
        LogSeverity::Verbose,
        LogSeverity::Info,
        LogSeverity::Warning,
        LogSeverity::Error,
        LogSeverity::Disable,
    ];

    /// Native `cef_log_severity_t` value.
    pub const fn to_raw(self) -> cef_log_severity_t {
        match self {
            LogSeverity::Default => LOGSEVERITY_DEFAULT,
            LogSeverity::Verbose => LOGSEVERITY_VERBOSE,
            LogSeverity::Info => LOGSEVERITY_INFO,
            LogSeverity::Warning => LOGSEVERITY_WARNING,
            LogSeverity::Error => LOGSEVERITY_ERROR,
            LogSeverity::Disable => LOGSEVERITY_DISABLE,
        }
    }

    /// Inverse of [`LogSeverity::to_raw`]. Unknown values yield `None`.
    pub const fn from_raw(raw: cef_log_severity_t) -> Option<Self> {
        match raw {
            LOGSEVERITY_DEFAULT => Some(LogSeverity::Default),
            LOGSEVERITY_VERBOSE => Some(LogSeverity::Verbose),
            LOGSEVERITY_INFO => Some(LogSeverity::Info),
            LOGSEVERITY_WARNING => Some(LogSeverity::Warning),
            LOGSEVERITY_ERROR => Some(LogSeverity::Error),
            LOGSEVERITY_DISABLE => Some(LogSeverity::Disable),
            _ => None,
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSeverity::Default => write!(f, "default"),
            LogSeverity::Verbose => write!(f, "verbose"),
            LogSeverity::Info => write!(f, "info"),
            LogSeverity::Warning => write!(f, "warning"),
            LogSeverity::Error => write!(f, "error"),
            LogSeverity::Disable => write!(f, "disable"),
        }
    }
}

impl FromStr for LogSeverity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(LogSeverity::Default),
            "verbose" => Ok(LogSeverity::Verbose),
            "info" => Ok(LogSeverity::Info),
            "warning" | "warn" => Ok(LogSeverity::Warning),
            "error" => Ok(LogSeverity::Error),
            "disable" | "disabled" | "off" => Ok(LogSeverity::Disable),
            _ => Err(ParseEnumError {
                kind: "log severity",
                value: s.to_string(),
                valid: "default, verbose, info, warning, error, disable",
            }),
        }
    }
}

/// How V8 context security checks are implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextSafetyImplementation {
    /// Security token and origin checks.
    #[default]
    Default,
    /// Alternate implementation using a hidden value.
    Alternate,
    /// No context safety checks.
    Disabled,
}

impl ContextSafetyImplementation {
    pub const ALL: [ContextSafetyImplementation; 3] = [
        ContextSafetyImplementation::Default,
        ContextSafetyImplementation::Alternate,
        ContextSafetyImplementation::Disabled,
    ];

    pub const fn to_raw(self) -> i32 {
        match self {
            ContextSafetyImplementation::Default => 0,
            ContextSafetyImplementation::Alternate => 1,
            ContextSafetyImplementation::Disabled => -1,
        }
    }

    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(ContextSafetyImplementation::Default),
            1 => Some(ContextSafetyImplementation::Alternate),
            -1 => Some(ContextSafetyImplementation::Disabled),
            _ => None,
        }
    }
}

impl fmt::Display for ContextSafetyImplementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextSafetyImplementation::Default => write!(f, "default"),
            ContextSafetyImplementation::Alternate => write!(f, "alternate"),
            ContextSafetyImplementation::Disabled => write!(f, "disabled"),
        }
    }
}

impl FromStr for ContextSafetyImplementation {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ContextSafetyImplementation::Default),
            "alternate" => Ok(ContextSafetyImplementation::Alternate),
            "disabled" | "disable" => Ok(ContextSafetyImplementation::Disabled),
            _ => Err(ParseEnumError {
                kind: "context safety implementation",
                value: s.to_string(),
                valid: "default, alternate, disabled",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_severity_raw_values() {
        assert_eq!(LogSeverity::Default.to_raw(), 0);
        assert_eq!(LogSeverity::Verbose.to_raw(), 1);
        assert_eq!(LogSeverity::Info.to_raw(), 2);
        assert_eq!(LogSeverity::Warning.to_raw(), 3);
        assert_eq!(LogSeverity::Error.to_raw(), 4);
        assert_eq!(LogSeverity::Disable.to_raw(), 99);
    }

    #[test]
    fn test_log_severity_bijection() {
        for severity in LogSeverity::ALL {
            assert_eq!(LogSeverity::from_raw(severity.to_raw()), Some(severity));
        }
        // 5 is the ordinal Disable would have without the sentinel.
        assert_eq!(LogSeverity::from_raw(5), None);
    }

    #[test]
    fn test_context_safety_bijection() {
        assert_eq!(ContextSafetyImplementation::Disabled.to_raw(), -1);
        for value in ContextSafetyImplementation::ALL {
            assert_eq!(ContextSafetyImplementation::from_raw(value.to_raw()), Some(value));
        }
        assert_eq!(ContextSafetyImplementation::from_raw(2), None);
    }

    #[test]
    fn test_parsing() {
        assert_eq!("WARNING".parse::<LogSeverity>().unwrap(), LogSeverity::Warning);
        assert_eq!("off".parse::<LogSeverity>().unwrap(), LogSeverity::Disable);
        assert!("loud".parse::<LogSeverity>().is_err());
        assert_eq!(
            "alternate".parse::<ContextSafetyImplementation>().unwrap(),
            ContextSafetyImplementation::Alternate
        );
    }

    #[test]
    fn test_display_parses_back() {
        for severity in LogSeverity::ALL {
            assert_eq!(severity.to_string().parse::<LogSeverity>().unwrap(), severity);
        }
    }
}
