use crate::{
    Config,
    error::WeatherError,
    model::{Locator, Suggestion, WeatherResult},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Most candidates a single lookup may return.
pub const SUGGESTION_LIMIT: usize = 5;

#[async_trait]
pub trait GeocodeProvider: Send + Sync + Debug {
    /// Look up candidates for a partial query.
    ///
    /// Every failure degrades to an empty list.
    async fn suggest(&self, query: &str) -> Vec<Suggestion>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn resolve(&self, locator: &Locator) -> Result<WeatherResult, WeatherError>;
}

/// Everything the search session needs from the outside world.
pub trait SearchProvider: GeocodeProvider + WeatherProvider {}

impl<T: GeocodeProvider + WeatherProvider> SearchProvider for T {}

/// Construct the OpenWeather client from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.resolve_api_key()?;
    OpenWeatherClient::with_base_url(api_key.to_owned(), config.base_url(), config.timeout())
}
