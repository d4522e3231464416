//! Async driver for [`SearchSession`].
//!
//! Commands returned by the session are executed as tokio tasks whose results
//! come back as [`Event`]s on an internal channel. Arming a timer or starting a
//! weather fetch aborts the task it replaces. Dropping the runtime aborts all
//! of them.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::{
    provider::SearchProvider,
    session::{Command, Event, SearchSession, SessionState, WeatherViewModel},
};

pub struct SessionRuntime<P: SearchProvider + 'static> {
    session: SearchSession,
    provider: Arc<P>,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    debounce: Option<JoinHandle<()>>,
    suggestion_fetch: Option<JoinHandle<()>>,
    weather_fetch: Option<JoinHandle<()>>,
}

impl<P: SearchProvider + 'static> SessionRuntime<P> {
    pub fn new(provider: Arc<P>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session: SearchSession::new(),
            provider,
            events_tx,
            events_rx,
            debounce: None,
            suggestion_fetch: None,
            weather_fetch: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn view_model(&self, now_epoch_seconds: i64) -> WeatherViewModel {
        self.session.view_model(now_epoch_seconds)
    }

    /// Apply a user event and start whatever work it calls for.
    pub fn dispatch(&mut self, event: Event) {
        for command in self.session.handle(event) {
            self.execute(command);
        }
    }

    /// Wait for the next completion (timer fired, lookup finished).
    ///
    /// Cancel safe. Pending forever while nothing is in flight.
    pub async fn next_event(&mut self) -> Event {
        match self.events_rx.recv().await {
            Some(event) => event,
            // The runtime holds a sender, so the channel never closes.
            None => std::future::pending().await,
        }
    }

    /// Wait for one completion and apply it.
    pub async fn process_next(&mut self) {
        let event = self.next_event().await;
        self.dispatch(event);
    }

    /// Abort every timer and request in flight.
    pub fn shutdown(&mut self) {
        for handle in [
            self.debounce.take(),
            self.suggestion_fetch.take(),
            self.weather_fetch.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::StartDebounce { generation, delay } => {
                abort(&mut self.debounce);
                let tx = self.events_tx.clone();
                self.debounce = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Event::DebounceElapsed { generation });
                }));
            }
            Command::CancelDebounce => {
                abort(&mut self.debounce);
                abort(&mut self.suggestion_fetch);
            }
            Command::FetchSuggestions { generation, query } => {
                abort(&mut self.suggestion_fetch);
                debug!(generation, query = %query, "fetching suggestions");
                let tx = self.events_tx.clone();
                let provider = Arc::clone(&self.provider);
                self.suggestion_fetch = Some(tokio::spawn(async move {
                    let suggestions = provider.suggest(&query).await;
                    let _ = tx.send(Event::SuggestionsLoaded {
                        generation,
                        suggestions,
                    });
                }));
            }
            Command::FetchWeather {
                request_id,
                locator,
            } => {
                abort(&mut self.weather_fetch);
                let tx = self.events_tx.clone();
                let provider = Arc::clone(&self.provider);
                self.weather_fetch = Some(tokio::spawn(async move {
                    let result = provider.resolve(&locator).await;
                    let _ = tx.send(Event::WeatherLoaded { request_id, result });
                }));
            }
        }
    }
}

impl<P: SearchProvider + 'static> Drop for SessionRuntime<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn abort(slot: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = slot.take() {
        handle.abort();
    }
}
