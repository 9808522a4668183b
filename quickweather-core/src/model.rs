use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Current conditions for one location, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    /// Provider's canonical location name. May differ from what the user typed.
    pub city_name: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kph: f64,
}

/// Observable state of the lookup screen. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Success {
        result: WeatherResult,
    },
    Failed {
        error: LookupError,
    },
}

impl LookupState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading { .. })
    }

    pub fn result(&self) -> Option<&WeatherResult> {
        match self {
            LookupState::Success { result } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            LookupState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Returns the trimmed query, or `None` if nothing is left to look up.
pub fn normalize_query(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}
