use std::collections::HashSet;

use chrono::DateTime;
use weather_core::{Suggestion, Unit, WeatherResult, WeatherViewModel, condition, convert};

pub fn weather(weather: &WeatherResult, unit: Unit, now_epoch_seconds: i64) -> String {
    let signal = condition::derive(weather, now_epoch_seconds);

    format!(
        "{}\n  {}{}  {}\n  {} ({})\n  sunrise {}  sunset {} (UTC)\n  icon: {}",
        weather.name,
        convert(weather.temp_celsius, unit),
        unit,
        weather.weather_description,
        signal.condition_category,
        if signal.is_daytime { "day" } else { "night" },
        clock(weather.sunrise_epoch_seconds),
        clock(weather.sunset_epoch_seconds),
        weather.icon_url(),
    )
}

/// Numbered list, skipping repeated coordinates.
pub fn suggestions(suggestions: &[Suggestion]) -> String {
    if suggestions.is_empty() {
        return "No matching places.".to_string();
    }

    unique_suggestions(suggestions)
        .into_iter()
        .enumerate()
        .map(|(i, s)| format!("  {}. {}", i + 1, s.display_name()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Candidates in display order, dropping repeats of the same coordinates.
pub fn unique_suggestions(suggestions: &[Suggestion]) -> Vec<&Suggestion> {
    let mut seen = HashSet::new();
    suggestions.iter().filter(|s| seen.insert(s.key())).collect()
}

/// Errors come first so a rejected submit stays visible while a fetch runs.
pub fn view(view: &WeatherViewModel, now_epoch_seconds: i64) -> String {
    let mut blocks = Vec::new();

    if let Some(error) = view.error.as_deref() {
        blocks.push(format!("Error: {error}"));
    }

    if view.loading {
        blocks.push("Loading...".to_string());
    } else if let Some(w) = view.active_weather.as_ref() {
        blocks.push(format!(
            "{}\n  (:unit toggles {}, :new starts over)",
            weather(w, view.unit, now_epoch_seconds),
            view.unit.toggled()
        ));
    } else if !view.suggestions.is_empty() {
        blocks.push(format!(
            "{}\n  (:pick N to choose, :go to search \"{}\")",
            suggestions(&view.suggestions),
            view.query.trim()
        ));
    } else if view.no_matches {
        blocks.push(format!("No matching places for \"{}\".", view.query.trim()));
    }

    blocks.join("\n")
}

fn clock(epoch_seconds: i64) -> String {
    DateTime::from_timestamp(epoch_seconds, 0)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::SessionPhase;

    fn idle_view() -> WeatherViewModel {
        WeatherViewModel {
            phase: SessionPhase::Idle,
            query: String::new(),
            suggestions: Vec::new(),
            active_weather: None,
            unit: Unit::Celsius,
            error: None,
            loading: false,
            no_matches: false,
            temperature: None,
            icon_url: None,
            derived_condition: None,
        }
    }

    fn london() -> Suggestion {
        Suggestion {
            name: "London".into(),
            country: "GB".into(),
            state: Some("England".into()),
            lat: 51.5,
            lon: -0.12,
        }
    }

    fn oslo() -> WeatherResult {
        WeatherResult {
            name: "Oslo".into(),
            weather_main: "Snow".into(),
            weather_icon: "13n".into(),
            weather_description: "light snow".into(),
            temp_celsius: -2.4,
            sunrise_epoch_seconds: 3_600,
            sunset_epoch_seconds: 7_200,
        }
    }

    #[test]
    fn weather_block_shows_unit_and_day_night() {
        let text = weather(&oslo(), Unit::Fahrenheit, 10_000);
        assert!(text.contains("28°F  light snow"));
        assert!(text.contains("Snow (night)"));
        assert!(text.contains("sunrise 01:00  sunset 02:00"));
        assert!(text.contains("https://openweathermap.org/img/wn/13n@2x.png"));
    }

    #[test]
    fn suggestions_are_numbered_and_deduplicated() {
        let paris = Suggestion {
            name: "Paris".into(),
            country: "FR".into(),
            state: None,
            lat: 48.85,
            lon: 2.35,
        };
        let text = suggestions(&[paris.clone(), paris]);
        assert_eq!(text, "  1. Paris, FR");
        assert_eq!(suggestions(&[]), "No matching places.");
    }

    #[test]
    fn suggestions_stay_visible_after_a_failed_search() {
        let view_model = WeatherViewModel {
            phase: SessionPhase::Error,
            query: "Lond".into(),
            suggestions: vec![london()],
            error: Some("city not found".into()),
            ..idle_view()
        };

        let text = view(&view_model, 0);
        assert!(text.starts_with("Error: city not found"));
        assert!(text.contains("1. London, GB, England"));
        assert!(text.contains(":pick N"));
    }

    #[test]
    fn validation_error_is_shown_while_loading() {
        let view_model = WeatherViewModel {
            phase: SessionPhase::Error,
            error: Some("Please enter a valid city or country name.".into()),
            loading: true,
            ..idle_view()
        };

        assert_eq!(
            view(&view_model, 0),
            "Error: Please enter a valid city or country name.\nLoading..."
        );
        assert_eq!(
            view(&WeatherViewModel { loading: true, ..idle_view() }, 0),
            "Loading..."
        );
    }

    #[test]
    fn empty_lookup_says_so() {
        let view_model = WeatherViewModel {
            query: " Xyzzy ".into(),
            no_matches: true,
            ..idle_view()
        };

        assert_eq!(view(&view_model, 0), "No matching places for \"Xyzzy\".");
        assert_eq!(view(&idle_view(), 0), "");
    }

    #[test]
    fn weather_view_offers_unit_toggle() {
        let view_model = WeatherViewModel {
            phase: SessionPhase::WeatherShown,
            active_weather: Some(oslo()),
            ..idle_view()
        };

        let text = view(&view_model, 5_000);
        assert!(text.starts_with("Oslo\n  -2°C  light snow"));
        assert!(text.contains("Snow (day)"));
        assert!(text.ends_with("(:unit toggles °F, :new starts over)"));
    }
}
