//! JPChat - a movie-themed chat endpoint and terminal chat page.
//!
//! `jpchat serve` runs the completion endpoint; `jpchat chat` opens the chat
//! page and talks to it over HTTP.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use jpchat::app::App;
use jpchat::config::Config;
use jpchat::endpoint::EndpointClient;
use jpchat::input;
use jpchat::llm::{LlmClient, LlmConfig};
use jpchat::logging;
use jpchat::persona::Persona;
use jpchat::server::{self, AppState};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "jpchat", version, about = "Movie-themed chat endpoint and terminal chat page")]
struct Cli {
    /// Config file (defaults to ~/.config/jpchat/config.toml).
    #[arg(long, global = true, env = "JPCHAT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the completion endpoint.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "JPCHAT_BIND")]
        bind: Option<String>,

        /// Persona used when a request carries no system message.
        #[arg(long, value_enum)]
        persona: Option<Persona>,
    },
    /// Open the chat page in the terminal.
    Chat {
        /// Full URL of the completion endpoint.
        #[arg(long, env = "JPCHAT_ENDPOINT")]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, persona } => {
            logging::init_stderr();
            let config = load_config(cli.config.as_deref());

            let state = AppState {
                client: LlmClient::new(LlmConfig::from_env_and_config(Some(&config.llm))),
                persona: persona.unwrap_or(config.server.persona),
            };
            let bind = bind.unwrap_or(config.server.bind_addr);

            server::serve(state, &bind).await
        }
        Command::Chat { endpoint } => {
            if let Some(path) = Config::config_dir().map(|dir| dir.join("jpchat.log")) {
                if let Err(e) = logging::init_file(&path) {
                    eprintln!("Logging disabled: {e:#}");
                }
            }
            let config = load_config(cli.config.as_deref());
            let url = endpoint.unwrap_or_else(|| config.client.endpoint_url.clone());

            // The terminal loop blocks; keep the runtime free for the request task
            tokio::task::block_in_place(|| run_chat(&config, url))
        }
    }
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => Config::load_or_default(path),
        None => Config::load(),
    }
}

fn run_chat(config: &Config, url: String) -> Result<()> {
    let client = EndpointClient::new(url);
    info!(endpoint = client.url(), "opening chat page");
    let mut app = App::new(Arc::new(client));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = input::run_app(&mut terminal, &mut app, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
