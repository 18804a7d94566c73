//! Canned recommendations used when every remote tier has failed.

use skycast_weather::WeatherSnapshot;

/// Builds recommendation text locally. Pure and infallible.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackTextGenerator;

impl FallbackTextGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Only the location, rounded temperature and condition description vary.
    pub fn generate(&self, weather: &WeatherSnapshot) -> String {
        let temp = weather.rounded_temp();
        let location = if weather.name.trim().is_empty() {
            "your area"
        } else {
            weather.name.as_str()
        };

        format!(
            "Based on the current weather in {location} ({temp}°C, {conditions}):\n\
             \n\
             👕 Clothing: Light and comfortable clothing suitable for {temp}°C\n\
             \n\
             🏃‍♂️ Activities: Weather is suitable for outdoor activities, but monitor conditions\n\
             \n\
             🏥 Health: Stay hydrated and use sun protection if needed\n\
             \n\
             🚗 Travel: Normal travel conditions, no special precautions needed\n\
             \n\
             💡 Tips: Regular ventilation recommended for comfort",
            conditions = weather.condition_description(),
        )
    }
}
