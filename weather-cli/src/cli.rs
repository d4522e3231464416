use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode};
use std::sync::Arc;
use weather_core::{
    Config, GeocodeProvider, Locator, Unit, WeatherError, WeatherProvider, provider,
};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Look up current weather by city or country")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city or country name.
    Show {
        /// City or country name.
        query: String,

        /// Display the temperature in Fahrenheit.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// List matching places for a partial name.
    Suggest {
        /// Partial city or country name.
        query: String,
    },

    /// Type to get suggestions, pick one or submit free text.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { query, fahrenheit } => {
                let client = client_from_config()?;
                let unit = if fahrenheit { Unit::Fahrenheit } else { Unit::Celsius };

                let locator = Locator::free_text(&query).ok_or_else(WeatherError::empty_query)?;
                let weather = client.resolve(&locator).await?;

                let now = chrono::Utc::now().timestamp();
                println!("{}", render::weather(&weather, unit, now));
                Ok(())
            }
            Command::Suggest { query } => {
                let client = client_from_config()?;
                let suggestions = client.suggest(query.trim()).await;
                println!("{}", render::suggestions(&suggestions));
                Ok(())
            }
            Command::Interactive => {
                let client = client_from_config()?;
                interactive::run(Arc::new(client)).await
            }
        }
    }
}

fn client_from_config() -> anyhow::Result<weather_core::OpenWeatherClient> {
    let config = Config::load()?.with_env_overrides();
    provider::provider_from_config(&config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if config.api_key.is_some() {
        let replace = Confirm::new("An API key is already stored. Replace it?")
            .with_default(false)
            .prompt()
            .context("Failed to read confirmation")?;
        if !replace {
            println!("Keeping the existing API key.");
            return Ok(());
        }
    }

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(inquire::required!("API key must not be empty"))
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
