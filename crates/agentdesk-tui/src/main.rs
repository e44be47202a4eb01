use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agentdesk_core::{Config, Deployment, SalesAgentClient};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, TICK_RATE};

#[derive(Parser, Debug)]
#[command(name = "agentdesk", version, about = "Chat with the Fleetworthy AI sales agent")]
struct Cli {
    /// Full URL of the agent's chat endpoint
    #[arg(long, env = "AGENTDESK_ENDPOINT")]
    endpoint: Option<String>,

    /// Talk to the local development agent instead of production
    #[arg(long)]
    dev: bool,

    /// Deployment to talk to: "development" or "production"
    #[arg(long = "env", env = "AGENTDESK_ENV", value_parser = parse_deployment)]
    environment: Option<Deployment>,

    /// Where to write the log (the terminal itself is taken by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn parse_deployment(s: &str) -> Result<Deployment, String> {
    Deployment::from_str(s).ok_or_else(|| format!("unknown deployment '{}'", s))
}

fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("agentdesk")
        .join("agentdesk.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = cli.log_file.clone().unwrap_or_else(default_log_file);
    let log_dir = log_file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let file_name = log_file
        .file_name()
        .map(|n| n.to_owned())
        .unwrap_or_else(|| "agentdesk.log".into());
    let file_appender = tracing_appender::rolling::never(&log_dir, file_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("agentdesk_tui=info,agentdesk_core=info")),
        )
        .init();

    let config = Config::load().context("loading configuration")?;
    let deployment = if cli.dev {
        Some(Deployment::Development)
    } else {
        cli.environment
    };
    let endpoint = config.resolve_endpoint(cli.endpoint.as_deref(), deployment);
    tracing::info!(%endpoint, "starting agentdesk");

    let agent = Arc::new(SalesAgentClient::new(&endpoint));
    let mut app = App::new(agent, endpoint);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    if let Some(task) = app.ask_task.take() {
        // Requests cannot be cancelled, only abandoned
        task.abort();
    }
    tracing::info!("agentdesk stopped");

    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event)?;
        app.poll_ask_task().await;
    }

    Ok(())
}
