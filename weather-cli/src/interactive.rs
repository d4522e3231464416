use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use weather_core::{Event, SearchProvider, SessionRuntime};

use crate::render;

const HELP: &str = "\
Type a city or country name; suggestions appear after a short pause.
  :go       search for the typed text
  :pick N   show weather for suggestion N
  :unit     toggle Celsius / Fahrenheit
  :new      start a new search
  :help     show this help
  :quit     exit";

#[derive(Debug, PartialEq)]
enum Input {
    Text(String),
    Submit,
    Pick(usize),
    ToggleUnit,
    NewSearch,
    Help,
    Quit,
    Unknown(String),
}

fn parse_line(line: &str) -> Input {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Input::Text(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("go"), None) => Input::Submit,
        (Some("pick"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Input::Pick(n),
            _ => Input::Unknown(line.trim().to_string()),
        },
        (Some("unit"), None) => Input::ToggleUnit,
        (Some("new"), None) => Input::NewSearch,
        (Some("help"), None) => Input::Help,
        (Some("quit" | "q"), None) => Input::Quit,
        _ => Input::Unknown(line.trim().to_string()),
    }
}

/// Drive a search session from stdin until `:quit` or end of input.
pub async fn run<P: SearchProvider + 'static>(provider: Arc<P>) -> anyhow::Result<()> {
    let mut runtime = SessionRuntime::new(provider);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_frame = String::new();

    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };

                match parse_line(&line) {
                    Input::Text(text) => runtime.dispatch(Event::InputChanged(text)),
                    Input::Submit => runtime.dispatch(Event::Submit),
                    Input::Pick(n) => {
                        let picked = render::unique_suggestions(&runtime.state().suggestions)
                            .get(n - 1)
                            .map(|s| (*s).clone());
                        match picked {
                            Some(suggestion) => {
                                runtime.dispatch(Event::SelectSuggestion(suggestion))
                            }
                            None => println!("No suggestion #{n}."),
                        }
                    }
                    Input::ToggleUnit => runtime.dispatch(Event::ToggleUnit),
                    Input::NewSearch => runtime.dispatch(Event::NewSearch),
                    Input::Help => println!("{HELP}"),
                    Input::Quit => break,
                    Input::Unknown(cmd) => println!("Unknown command {cmd}, try :help"),
                }
            }
            event = runtime.next_event() => runtime.dispatch(event),
        }

        let now = chrono::Utc::now().timestamp();
        let frame = render::view(&runtime.view_model(now), now);
        if !frame.is_empty() && frame != last_frame {
            println!("{frame}");
        }
        last_frame = frame;
    }

    runtime.shutdown();
    Ok(())
}
