//! Search session state machine.
//!
//! [`SearchSession::handle`] applies one [`Event`] to the [`SessionState`] and
//! returns the side effects the caller must perform as [`Command`]s. Nothing in
//! here touches the network or a clock; see [`crate::runtime`] for the driver.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::{
    condition,
    convert::convert,
    error::WeatherError,
    model::{ConditionSignal, Locator, Suggestion, Unit, WeatherResult},
};

/// Quiet period after the last keystroke before suggestions are fetched.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Shortest trimmed query that triggers a suggestion lookup.
pub const MIN_SUGGEST_CHARS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub active_weather: Option<WeatherResult>,
    pub unit: Unit,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Idle,
    SuggestionsOpen,
    WeatherShown,
    Error,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        if self.active_weather.is_some() {
            SessionPhase::WeatherShown
        } else if self.error.is_some() {
            SessionPhase::Error
        } else if !self.suggestions.is_empty() {
            SessionPhase::SuggestionsOpen
        } else {
            SessionPhase::Idle
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The query field now holds this text.
    InputChanged(String),
    Submit,
    SelectSuggestion(Suggestion),
    NewSearch,
    ToggleUnit,
    DebounceElapsed {
        generation: u64,
    },
    SuggestionsLoaded {
        generation: u64,
        suggestions: Vec<Suggestion>,
    },
    WeatherLoaded {
        request_id: u64,
        result: Result<WeatherResult, WeatherError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Arm the debounce timer, replacing any pending one.
    StartDebounce { generation: u64, delay: Duration },
    /// Drop the pending timer and any suggestion lookup in flight.
    CancelDebounce,
    FetchSuggestions { generation: u64, query: String },
    /// Start a weather fetch; any earlier fetch is superseded.
    FetchWeather { request_id: u64, locator: Locator },
}

/// What a presentation layer needs to draw the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherViewModel {
    pub phase: SessionPhase,
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub active_weather: Option<WeatherResult>,
    pub unit: Unit,
    pub error: Option<String>,
    pub loading: bool,
    /// The last suggestion lookup for the current query came back empty.
    pub no_matches: bool,
    pub temperature: Option<i64>,
    pub icon_url: Option<String>,
    pub derived_condition: Option<ConditionSignal>,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    state: SessionState,
    suggestion_generation: u64,
    request_id: u64,
    pending: Option<(u64, Locator)>,
    no_matches: bool,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether a weather fetch has been started and not yet settled.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::InputChanged(text) => self.on_input(text),
            Event::Submit => self.on_submit(),
            Event::SelectSuggestion(suggestion) => {
                self.start_fetch(Locator::from_suggestion(&suggestion))
            }
            Event::NewSearch => self.on_new_search(),
            Event::ToggleUnit => {
                if self.state.active_weather.is_some() {
                    self.state.unit = self.state.unit.toggled();
                }
                Vec::new()
            }
            Event::DebounceElapsed { generation } => self.on_debounce_elapsed(generation),
            Event::SuggestionsLoaded {
                generation,
                suggestions,
            } => {
                if generation == self.suggestion_generation
                    && self.state.active_weather.is_none()
                {
                    self.no_matches = suggestions.is_empty();
                    self.state.suggestions = suggestions;
                } else {
                    debug!(generation, "dropping stale suggestions");
                }
                Vec::new()
            }
            Event::WeatherLoaded { request_id, result } => self.on_weather_loaded(request_id, result),
        }
    }

    pub fn view_model(&self, now_epoch_seconds: i64) -> WeatherViewModel {
        let weather = self.state.active_weather.as_ref();

        WeatherViewModel {
            phase: self.state.phase(),
            query: self.state.query.clone(),
            suggestions: self.state.suggestions.clone(),
            active_weather: weather.cloned(),
            unit: self.state.unit,
            error: self.state.error.clone(),
            loading: self.is_loading(),
            no_matches: self.no_matches,
            temperature: weather.map(|w| convert(w.temp_celsius, self.state.unit)),
            icon_url: weather.map(WeatherResult::icon_url),
            derived_condition: weather.map(|w| condition::derive(w, now_epoch_seconds)),
        }
    }

    fn on_input(&mut self, text: String) -> Vec<Command> {
        self.state.query = text;
        self.suggestion_generation += 1;
        self.no_matches = false;

        if self.state.active_weather.is_some() {
            return Vec::new();
        }

        if self.state.query.trim().chars().count() >= MIN_SUGGEST_CHARS {
            vec![Command::StartDebounce {
                generation: self.suggestion_generation,
                delay: DEBOUNCE_DELAY,
            }]
        } else {
            self.state.suggestions.clear();
            vec![Command::CancelDebounce]
        }
    }

    fn on_debounce_elapsed(&mut self, generation: u64) -> Vec<Command> {
        if generation != self.suggestion_generation || self.state.active_weather.is_some() {
            return Vec::new();
        }

        vec![Command::FetchSuggestions {
            generation,
            query: self.state.query.trim().to_string(),
        }]
    }

    fn on_submit(&mut self) -> Vec<Command> {
        match Locator::free_text(&self.state.query) {
            Some(locator) => self.start_fetch(locator),
            None => {
                self.state.active_weather = None;
                self.state.suggestions.clear();
                self.state.error = Some(WeatherError::empty_query().to_string());
                Vec::new()
            }
        }
    }

    fn on_new_search(&mut self) -> Vec<Command> {
        if self.state.active_weather.is_none() {
            return Vec::new();
        }

        self.state.active_weather = None;
        self.state.query.clear();
        self.state.suggestions.clear();
        self.suggestion_generation += 1;
        self.no_matches = false;
        vec![Command::CancelDebounce]
    }

    fn start_fetch(&mut self, locator: Locator) -> Vec<Command> {
        self.state.error = None;
        self.state.active_weather = None;
        self.state.suggestions.clear();
        self.suggestion_generation += 1;
        self.no_matches = false;
        self.request_id += 1;
        self.pending = Some((self.request_id, locator.clone()));

        debug!(request_id = self.request_id, ?locator, "starting weather fetch");

        vec![
            Command::CancelDebounce,
            Command::FetchWeather {
                request_id: self.request_id,
                locator,
            },
        ]
    }

    fn on_weather_loaded(
        &mut self,
        request_id: u64,
        result: Result<WeatherResult, WeatherError>,
    ) -> Vec<Command> {
        let locator = match self.pending.take() {
            Some((pending_id, locator)) if pending_id == request_id => locator,
            other => {
                debug!(request_id, "dropping superseded weather result");
                self.pending = other;
                return Vec::new();
            }
        };

        match result {
            Ok(weather) => {
                self.state.query = locator.display_name_for(&weather);
                self.state.active_weather = Some(weather);
                self.state.suggestions.clear();
                self.state.error = None;
                self.suggestion_generation += 1;
                vec![Command::CancelDebounce]
            }
            Err(err) => {
                debug!(request_id, error = %err, "weather fetch failed");
                self.state.active_weather = None;
                self.state.error = Some(err.to_string());
                Vec::new()
            }
        }
    }
}
