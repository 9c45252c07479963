//! Error types

use crate::sim::Side;

/// Errors raised while sequencing serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeError {
    /// Every precomputed serve has been used.
    ScheduleExhausted,
    /// `serve()` was called before `initialize()` picked an attacker.
    NoAttacker,
    /// The match already has a winner.
    MatchOver(Side),
}

impl std::fmt::Display for ServeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServeError::ScheduleExhausted => write!(f, "serve schedule exhausted"),
            ServeError::NoAttacker => write!(f, "ball has no attacker; initialize it first"),
            ServeError::MatchOver(side) => write!(f, "match already won by {side}"),
        }
    }
}

impl std::error::Error for ServeError {}

/// Errors raised while loading or validating settings.
#[derive(Debug)]
pub enum SettingsError {
    /// A field failed validation.
    Invalid { field: &'static str, reason: String },
    /// Standard I/O error.
    IoError(std::io::Error),
    /// JSON serialization/deserialization error.
    JsonError(serde_json::Error),
}

impl SettingsError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SettingsError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
            SettingsError::IoError(e) => write!(f, "IO error: {e}"),
            SettingsError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::IoError(e) => Some(e),
            SettingsError::JsonError(e) => Some(e),
            SettingsError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::IoError(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::JsonError(e)
    }
}
