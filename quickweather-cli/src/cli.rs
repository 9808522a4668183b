use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use quickweather_core::{Config, LookupController, LookupState, client_from_config};
use tokio::io::BufReader;

use crate::{interactive, view};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "quickweather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a seed city, then keep reading city names from stdin.
    Interactive {
        /// City to look up on start; falls back to the configured default.
        #[arg(long)]
        city: Option<String>,
    },

    /// Look up one city and exit.
    Show {
        /// City name, e.g. "London".
        city: String,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Store the API key and default city.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Interactive { city: None });

        match command {
            Command::Configure => configure(),
            Command::Show { city, json } => show(&city, json).await,
            Command::Interactive { city } => {
                let config = Config::load()?;
                let client = client_from_config(&config)?;
                let seed = city.as_deref().unwrap_or_else(|| config.seed_city()).to_owned();

                let stdin = BufReader::new(tokio::io::stdin());
                let mut stdout = std::io::stdout();
                interactive::run(client, &seed, stdin, &mut stdout).await
            }
        }
    }
}

async fn show(city: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = client_from_config(&config)?;

    let mut controller = LookupController::new(client);
    controller.set_query_text(city);
    if controller.submit_and_wait().await.is_none() {
        bail!("City name must not be empty");
    }

    match controller.state() {
        LookupState::Success { result } if json => {
            let text = serde_json::to_string_pretty(result)
                .context("Failed to serialize weather result")?;
            println!("{text}");
        }
        LookupState::Success { result } => println!("{}", view::render_result(result)),
        LookupState::Failed { error } => bail!("Lookup for '{}' failed: {error}", city.trim()),
        other => bail!("Lookup ended in unexpected state: {other:?}"),
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .with_help_message("Get one at https://www.weatherapi.com/my/")
        .prompt()
        .context("Failed to read API key")?;

    let default_city = Text::new("Default city:")
        .with_default(config.seed_city())
        .prompt()
        .context("Failed to read default city")?;

    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }
    config.default_city = Some(default_city.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
