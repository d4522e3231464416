use serde::{Deserialize, Serialize};

/// Temperature unit the user has chosen to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// A geocoding candidate offered while the user is still typing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Suggestion {
    /// `"<name>, <country>[, <state>]"`
    pub fn display_name(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, self.country, state)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }

    /// Key used to tell candidates apart when listing them.
    pub fn key(&self) -> String {
        format!("{}-{}", self.lat, self.lon)
    }
}

/// Current conditions for one place, as returned by the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub name: String,
    pub weather_main: String,
    pub weather_icon: String,
    pub weather_description: String,
    pub temp_celsius: f64,
    pub sunrise_epoch_seconds: i64,
    pub sunset_epoch_seconds: i64,
}

impl WeatherResult {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.weather_icon)
    }
}

/// What to ask the weather provider for.
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    /// Trimmed, non-empty city or country name.
    FreeText(String),
    /// Resolved coordinates plus the name to show once the fetch succeeds.
    Coordinates {
        lat: f64,
        lon: f64,
        display_name: String,
    },
}

impl Locator {
    /// Build a free-text locator, rejecting blank input.
    pub fn free_text(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Locator::FreeText(trimmed.to_string()))
        }
    }

    pub fn from_suggestion(suggestion: &Suggestion) -> Self {
        Locator::Coordinates {
            lat: suggestion.lat,
            lon: suggestion.lon,
            display_name: suggestion.display_name(),
        }
    }

    /// Name the session should show after a successful fetch.
    pub fn display_name_for(&self, weather: &WeatherResult) -> String {
        match self {
            Locator::FreeText(_) => weather.name.clone(),
            Locator::Coordinates { display_name, .. } => display_name.clone(),
        }
    }
}

/// Simplified signal used to pick a background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionSignal {
    pub condition_category: String,
    pub is_daytime: bool,
}
