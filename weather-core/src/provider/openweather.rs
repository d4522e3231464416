use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{Locator, Suggestion, WeatherResult},
    provider::{GeocodeProvider, SUGGESTION_LIMIT, WeatherProvider},
};

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn with_base_url(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let limit = SUGGESTION_LIMIT.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (geocoding)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather geocoding response body")?;

        if !status.is_success() {
            anyhow::bail!(
                "OpenWeather geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            );
        }

        let parsed: Vec<OwGeoEntry> =
            serde_json::from_str(&body).context("Failed to parse OpenWeather geocoding JSON")?;

        Ok(parsed
            .into_iter()
            .take(SUGGESTION_LIMIT)
            .map(Suggestion::from)
            .collect())
    }

    async fn fetch_current(&self, locator: &Locator) -> Result<WeatherResult, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let mut params: Vec<(&str, String)> = match locator {
            Locator::FreeText(query) => vec![("q", query.clone())],
            Locator::Coordinates { lat, lon, .. } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(WeatherError::transport)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::transport)?;

        if !status.is_success() {
            debug!(%status, body = %truncate_body(&body), "OpenWeather current request failed");
            let message = serde_json::from_str::<OwErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            return Err(WeatherError::not_found(message));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(WeatherError::transport)?;

        parsed.try_into()
    }
}

#[async_trait]
impl GeocodeProvider for OpenWeatherClient {
    async fn suggest(&self, query: &str) -> Vec<Suggestion> {
        match self.fetch_suggestions(query).await {
            Ok(suggestions) => {
                debug!(query, count = suggestions.len(), "geocoding returned candidates");
                suggestions
            }
            Err(err) => {
                warn!(query, error = %format!("{err:#}"), "geocoding failed, showing no suggestions");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn resolve(&self, locator: &Locator) -> Result<WeatherResult, WeatherError> {
        debug!(?locator, "resolving current weather");
        self.fetch_current(locator).await
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: String,
    state: Option<String>,
}

impl From<OwGeoEntry> for Suggestion {
    fn from(entry: OwGeoEntry) -> Self {
        Suggestion {
            name: entry.name,
            country: entry.country,
            state: entry.state,
            lat: entry.lat,
            lon: entry.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
}

impl TryFrom<OwCurrentResponse> for WeatherResult {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let condition = parsed.weather.into_iter().next().ok_or_else(|| {
            WeatherError::Transport("OpenWeather response contained no conditions".to_string())
        })?;

        Ok(WeatherResult {
            name: parsed.name,
            weather_main: condition.main,
            weather_icon: condition.icon,
            weather_description: condition.description,
            temp_celsius: parsed.main.temp,
            sunrise_epoch_seconds: parsed.sys.sunrise,
            sunset_epoch_seconds: parsed.sys.sunset,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
