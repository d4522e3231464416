//! Core library for the `weather` lookup app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the geocoding and weather seams
//! - The search session state machine and its async driver
//! - Pure helpers for unit conversion and day/night derivation
//!
//! It is used by `weather-cli`, but can also drive any other presentation layer.

pub mod condition;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod provider;
pub mod runtime;
pub mod session;

pub use config::Config;
pub use convert::convert;
pub use error::WeatherError;
pub use model::{ConditionSignal, Locator, Suggestion, Unit, WeatherResult};
pub use provider::{GeocodeProvider, SearchProvider, WeatherProvider, openweather::OpenWeatherClient};
pub use runtime::SessionRuntime;
pub use session::{Command, Event, SearchSession, SessionPhase, SessionState, WeatherViewModel};
