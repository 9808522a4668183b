use quickweather_core::{LookupState, WeatherResult};

pub const PROMPT: &str = "Enter city name (:q to quit) > ";

/// Text shown for a lookup state. `Idle` renders nothing.
pub fn render_state(state: &LookupState) -> String {
    match state {
        LookupState::Idle => String::new(),
        LookupState::Loading { .. } => "Loading...".to_string(),
        LookupState::Failed { error } => format!("Error: {error}"),
        LookupState::Success { result } => render_result(result),
    }
}

pub fn render_result(result: &WeatherResult) -> String {
    format!(
        "City name: {}\nTemperature: {} C\nHumidity: {} %\nWind speed: {} kph",
        result.city_name, result.temperature_c, result.humidity_pct, result.wind_speed_kph,
    )
}
