//! WMO weather code classification.
//!
//! See: https://open-meteo.com/en/docs#weathervariables
//!
//! All functions are total: codes outside the WMO table map to "Unknown",
//! [`IconCategory::Unknown`] and `false` predicates.

use serde::{Deserialize, Serialize};

/// Description text returned for codes outside the WMO table.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// Icon shown for a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    Sun,
    Moon,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Cloud,
    Fog,
    Drizzle,
    Rain,
    Snow,
    RainShowers,
    SnowShowers,
    Thunderstorm,
    Unknown,
}

impl IconCategory {
    /// Font Awesome icon class
    pub fn icon_name(self) -> &'static str {
        match self {
            Self::Sun => "fa-sun",
            Self::Moon => "fa-moon",
            Self::PartlyCloudyDay => "fa-cloud-sun",
            Self::PartlyCloudyNight => "fa-cloud-moon",
            Self::Cloud => "fa-cloud",
            Self::Fog => "fa-smog",
            Self::Drizzle => "fa-cloud-rain",
            Self::Rain => "fa-cloud-showers-heavy",
            Self::Snow => "fa-snowflake",
            Self::RainShowers => "fa-cloud-sun-rain",
            Self::SnowShowers => "fa-cloud-meatball",
            Self::Thunderstorm => "fa-cloud-bolt",
            Self::Unknown => "fa-question",
        }
    }

    /// Terminal glyph
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Sun => "☀️",
            Self::Moon => "🌙",
            Self::PartlyCloudyDay => "⛅",
            Self::PartlyCloudyNight => "☁️🌙",
            Self::Cloud => "☁️",
            Self::Fog => "🌫️",
            Self::Drizzle => "🌦️",
            Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::RainShowers => "🌦️",
            Self::SnowShowers => "🌨️",
            Self::Thunderstorm => "⛈️",
            Self::Unknown => "❓",
        }
    }
}

/// Human description of a WMO code.
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => UNKNOWN_DESCRIPTION,
    }
}

/// Icon for a code. Ranges are inclusive; only 0–2 depend on daylight.
pub fn icon_for(code: i32, is_day: bool) -> IconCategory {
    match code {
        0 | 1 if is_day => IconCategory::Sun,
        0 | 1 => IconCategory::Moon,
        2 if is_day => IconCategory::PartlyCloudyDay,
        2 => IconCategory::PartlyCloudyNight,
        3 => IconCategory::Cloud,
        45 | 48 => IconCategory::Fog,
        51..=57 => IconCategory::Drizzle,
        61..=67 => IconCategory::Rain,
        71..=77 => IconCategory::Snow,
        80..=82 => IconCategory::RainShowers,
        85..=86 => IconCategory::SnowShowers,
        95..=99 => IconCategory::Thunderstorm,
        _ => IconCategory::Unknown,
    }
}

pub fn is_raining(code: i32) -> bool {
    matches!(code, 51..=67 | 80..=82)
}

pub fn is_cloudy(code: i32) -> bool {
    matches!(code, 2..=3)
}

pub fn is_sunny(code: i32, is_day: bool) -> bool {
    matches!(code, 0 | 1) && is_day
}

/// Everything the presentation layer derives from a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherClassification {
    pub description: &'static str,
    pub icon: IconCategory,
    pub is_raining: bool,
    pub is_cloudy: bool,
    pub is_sunny: bool,
}

impl WeatherClassification {
    pub fn from_code(code: i32, is_day: bool) -> Self {
        Self {
            description: describe(code),
            icon: icon_for(code, is_day),
            is_raining: is_raining(code),
            is_cloudy: is_cloudy(code),
            is_sunny: is_sunny(code, is_day),
        }
    }
}
