use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Description used when the provider sent no condition entries
pub const UNKNOWN_CONDITIONS: &str = "unknown conditions";

/// Condition categories from OpenWeather condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    #[default]
    Clear,
    Clouds,
    Atmosphere,
    Drizzle,
    Rain,
    Snow,
    Thunderstorm,
}

impl ConditionCategory {
    /// Convert an OpenWeather condition id to a category
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_code(code: u32) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Atmosphere,
            801..=899 => Self::Clouds,
            _ => Self::Clear, // 800 and unknown codes
        }
    }
}

/// Geographic coordinates of the reporting station
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub lat: f64,
}

/// One condition entry; the first entry is the primary condition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub id: u32,
    /// Category name such as "Rain" or "Clear"
    #[serde(default)]
    pub main: String,
    /// Human description such as "light rain"
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

impl WeatherCondition {
    /// Category from the numeric id, or from the name when the id is missing
    pub fn category(&self) -> ConditionCategory {
        if self.id != 0 {
            return ConditionCategory::from_code(self.id);
        }
        match self.main.to_lowercase().as_str() {
            "thunderstorm" => ConditionCategory::Thunderstorm,
            "drizzle" => ConditionCategory::Drizzle,
            "rain" => ConditionCategory::Rain,
            "snow" => ConditionCategory::Snow,
            "clouds" => ConditionCategory::Clouds,
            "clear" | "" => ConditionCategory::Clear,
            _ => ConditionCategory::Atmosphere,
        }
    }
}

/// Temperature (°C), pressure (hPa) and humidity (%) readings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainReadings {
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub temp_min: f64,
    #[serde(default)]
    pub temp_max: f64,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: f64,
}

/// Wind speed (m/s) and direction (degrees)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

/// Rain volume (mm) over the last one and three hours
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rain {
    #[serde(rename = "1h", default, skip_serializing_if = "Option::is_none")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", default, skip_serializing_if = "Option::is_none")]
    pub three_hours: Option<f64>,
}

/// Current conditions for one location at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub coord: Coordinates,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    #[serde(default)]
    pub main: MainReadings,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Rain>,
    /// Location name as reported by the provider
    #[serde(default)]
    pub name: String,
}

impl WeatherSnapshot {
    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }

    /// Description of the primary condition, e.g. "clear sky"
    pub fn condition_description(&self) -> &str {
        self.primary_condition()
            .map(|c| c.description.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN_CONDITIONS)
    }

    pub fn condition_category(&self) -> ConditionCategory {
        self.primary_condition()
            .map(WeatherCondition::category)
            .unwrap_or_default()
    }

    /// True when the primary condition's name mentions rain ("Rain", "Freezing rain").
    /// Drizzle and thunderstorms do not count.
    pub fn is_raining(&self) -> bool {
        self.primary_condition()
            .is_some_and(|c| c.main.to_lowercase().contains("rain"))
    }

    /// Temperature rounded for display
    pub fn rounded_temp(&self) -> i64 {
        round_half_up(self.main.temp)
    }

    /// Feels-like temperature rounded for display
    pub fn rounded_feels_like(&self) -> i64 {
        round_half_up(self.main.feels_like)
    }
}

/// Round to the nearest integer with halves going toward positive infinity,
/// so -2.5 displays as -2 and 2.5 as 3.
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor() as i64
}

/// Short natural-language briefing for the dashboard header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherBriefing {
    pub text: String,
    pub tips: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
