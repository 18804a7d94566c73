//! Prompt and payload text sent to the providers.
//!
//! Every formatter is deterministic: the same snapshot always yields the
//! same text.

use serde_json::{json, Value};
use skycast_weather::WeatherSnapshot;

/// System prompt for the advisor agent on the agent platform.
pub const ADVISOR_PERSONA: &str = "\
You are a helpful weather assistant that provides personalized recommendations based on weather conditions.
Analyze the following weather parameters and provide specific advice:

1. Temperature Analysis:
- What to wear based on temperature and feels-like conditions
- How to stay comfortable in the current temperature

2. Weather Conditions:
- Specific precautions based on current conditions (rain, clouds, sun, etc.)
- Recommended activities suitable for these conditions

3. Health & Safety:
- Health precautions based on temperature, humidity, and conditions
- UV protection needs if applicable
- Air quality considerations

4. Daily Planning:
- Best times for outdoor activities
- Indoor alternatives if needed
- Travel recommendations

5. Additional Tips:
- Energy efficiency suggestions
- Weather-specific life hacks

Format your response in clear sections with emoji indicators.
Keep recommendations practical, specific, and easy to follow.";

/// Chat message for the advisor agent.
pub fn chat_digest(weather: &WeatherSnapshot) -> String {
    format!(
        "Analyze the current weather in {name} and provide recommendations:\n\
         Temperature: {temp}°C\n\
         Feels like: {feels}°C\n\
         Conditions: {conditions}\n\
         Humidity: {humidity}%\n\
         Wind: {wind} m/s",
        name = weather.name,
        temp = weather.rounded_temp(),
        feels = weather.rounded_feels_like(),
        conditions = weather.condition_description(),
        humidity = weather.main.humidity,
        wind = weather.wind.speed,
    )
}

/// Chat session key; one conversation per location.
pub fn session_key(weather: &WeatherSnapshot) -> String {
    format!("session_{}", weather.name)
}

/// Single-shot prompt for the text-generation tier.
pub fn recommendation_prompt(weather: &WeatherSnapshot) -> String {
    format!(
        "As a weather expert, provide detailed recommendations based on the following weather conditions in {name}:\n\
         \n\
         Temperature: {temp}°C\n\
         Feels like: {feels}°C\n\
         Conditions: {conditions}\n\
         Humidity: {humidity}%\n\
         Wind Speed: {wind} m/s\n\
         Pressure: {pressure} hPa\n\
         \n\
         Please provide specific recommendations for:\n\
         1. 👕 Clothing & Accessories\n\
         2. 🏃‍♂️ Outdoor Activities\n\
         3. 🏥 Health Precautions\n\
         4. 🚗 Travel Considerations\n\
         5. 💡 Energy Efficiency Tips\n\
         \n\
         Format the response in clear sections with emojis and keep it concise but informative.",
        name = weather.name,
        temp = weather.rounded_temp(),
        feels = weather.rounded_feels_like(),
        conditions = weather.condition_description(),
        humidity = weather.main.humidity,
        wind = weather.wind.speed,
        pressure = weather.main.pressure,
    )
}

/// Prompt for the dashboard briefing. Uses the unrounded temperature.
pub fn briefing_prompt(city: &str, weather: &WeatherSnapshot) -> String {
    format!(
        "Generate a friendly weather briefing for {}. Current conditions: {}, temperature: {}°C. Include tips for the day.",
        city,
        weather.condition_description(),
        weather.main.temp,
    )
}

/// OpenAPI document exposing the snapshot as example data for the agent.
pub fn weather_tool_schema(weather: &WeatherSnapshot) -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Current Weather Data",
            "version": "1.0"
        },
        "paths": {
            "/current": {
                "get": {
                    "operationId": "getCurrentWeather",
                    "summary": "Get current weather data",
                    "responses": {
                        "200": {
                            "description": "Current weather data",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "location": { "type": "string" },
                                            "temperature": { "type": "number" },
                                            "feels_like": { "type": "number" },
                                            "humidity": { "type": "number" },
                                            "wind_speed": { "type": "number" },
                                            "conditions": { "type": "string" },
                                            "pressure": { "type": "number" }
                                        }
                                    },
                                    "example": {
                                        "location": weather.name,
                                        "temperature": weather.main.temp,
                                        "feels_like": weather.main.feels_like,
                                        "humidity": weather.main.humidity,
                                        "wind_speed": weather.wind.speed,
                                        "conditions": weather.condition_description(),
                                        "pressure": weather.main.pressure
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}
