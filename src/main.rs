//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run the command.
//! No business logic here; authentication is delegated to AuthService.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use dotenv::dotenv;
use grammers_client::{Client, Config, InitParams};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tg_stats::adapters::cli::{Cli, Command};
use tg_stats::adapters::telegram::{session, GrammersAuthAdapter, GrammersChannelGateway};
use tg_stats::domain::DomainError;
use tg_stats::ports::{AuthPort, ChannelGateway};
use tg_stats::shared::config::AppConfig;
use tg_stats::shared::json::to_pretty_json;
use tg_stats::usecases::{AuthService, ExportService, StatsService};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let env_loaded = dotenv();

    // Logs go to stderr; stdout carries nothing but command output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(_) => debug!("no .env found"),
    }

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    let cfg = AppConfig::load().context("read configuration from environment")?;
    let session_path = cfg.session_path();

    // --- Telegram client (cloned for auth and gateway; same session) ---
    let client = connect_client(&cfg, &session_path).await?;

    // --- Auth: adapter + service, then ensure we are logged in ---
    let auth_adapter: Arc<dyn AuthPort> = Arc::new(GrammersAuthAdapter::new(client.clone()));
    let auth_service = AuthService::new(auth_adapter);

    // --- Services over the channel gateway ---
    let gateway: Arc<dyn ChannelGateway> = Arc::new(GrammersChannelGateway::new(client.clone()));
    let stats_service = StatsService::new(Arc::clone(&gateway));
    let export_service = ExportService::new(gateway);

    let outcome = async {
        auth_service.run_auth_flow().await?;
        session::persist(&client, &session_path);
        dispatch(command, &stats_service, &export_service).await
    }
    .await;

    // Session state (auth keys, server salts) may have advanced even when the
    // command failed; save unconditionally.
    session::persist(&client, &session_path);

    Ok(outcome?)
}

async fn dispatch(
    command: Command,
    stats: &StatsService,
    export: &ExportService,
) -> Result<(), DomainError> {
    match command {
        Command::Messages {
            channel,
            limit,
            output,
        } => {
            let messages = stats.recent_messages(&channel, limit).await?;
            write_output(&to_pretty_json(&messages)?, output.as_deref()).await
        }
        Command::Stats {
            channel,
            limit,
            max_date,
            only_text,
            output,
        } => {
            let report = stats
                .channel_stats(&channel, limit, max_date.as_deref(), only_text)
                .await?;
            write_output(&to_pretty_json(&report)?, output.as_deref()).await
        }
        Command::Message { url, output } => {
            let detail = stats.message_stats(&url).await?;
            write_output(&to_pretty_json(&detail)?, output.as_deref()).await
        }
        Command::Export {
            channel,
            limit,
            output,
        } => match output {
            Some(path) => {
                let file = std::fs::File::create(&path)
                    .map_err(|e| DomainError::Output(format!("{}: {}", path.display(), e)))?;
                let rows = export.export_csv(&channel, limit, file).await?;
                info!(rows, path = %path.display(), "export saved");
                Ok(())
            }
            None => {
                export
                    .export_csv(&channel, limit, std::io::stdout())
                    .await?;
                Ok(())
            }
        },
    }
}

/// Print JSON to stdout, or save it when `--output` was given.
async fn write_output(json: &str, output: Option<&Path>) -> Result<(), DomainError> {
    match output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .map_err(|e| DomainError::Output(format!("{}: {}", path.display(), e)))?;
            info!(path = %path.display(), "result saved");
            Ok(())
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

/// Create a grammers Client with persistent session storage.
/// Loads the session from `session_path` if present; otherwise a new session
/// is created and saved after login. Requires TELEGRAM_API_ID and
/// TELEGRAM_API_HASH from https://my.telegram.org.
async fn connect_client(cfg: &AppConfig, session_path: &Path) -> anyhow::Result<Client> {
    let api_id = cfg.api_id.unwrap_or(0);
    if api_id == 0 {
        anyhow::bail!("Set TELEGRAM_API_ID (env or .env). Get it from https://my.telegram.org");
    }
    let api_hash = cfg.api_hash.clone().unwrap_or_default();
    if api_hash.is_empty() {
        anyhow::bail!("Set TELEGRAM_API_HASH (env or .env). Get it from https://my.telegram.org");
    }

    let session = session::load_or_create(session_path)?;
    let client = Client::connect(Config {
        session,
        api_id,
        api_hash,
        params: InitParams::default(),
    })
    .await
    .context("connect to Telegram")?;
    Ok(client)
}
