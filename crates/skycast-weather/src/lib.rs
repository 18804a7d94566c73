//! Weather data model for SkyCast
//!
//! Mirrors the OpenWeather current-conditions document that the dashboard
//! fetches upstream. The advisor crate only ever reads these values.

pub mod types;

pub use types::*;
