use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use bindery_server::{
    create_app,
    infra::{
        config::{Config, ConfigLoad, ConfigLoader, ConfigLoaderOptions, ConfigWarnings},
        startup::{build_state, connect_postgres},
    },
};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "bindery-server")]
#[command(about = "Read-list server with per-library access control")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to a bindery.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to a .env file loaded before reading the environment
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply database migrations and exit
    Migrate,
    /// Print the resolved configuration and any warnings, then exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ConfigLoad { config, warnings } = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: cli.config,
        env_file: cli.env_file,
    })
    .load()
    .context("failed to load configuration")?;

    if let Some(Command::CheckConfig) = cli.command {
        print_config(&config, &warnings);
        return Ok(());
    }

    init_tracing();
    log_config(&config, &warnings);

    match cli.command {
        Some(Command::Migrate) => run_migrate(&config).await,
        _ => run_server(config).await,
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn log_config(config: &Config, warnings: &ConfigWarnings) {
    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "configuration file loaded");
    }

    for warning in &warnings.items {
        match &warning.hint {
            Some(hint) => {
                warn!(message = %warning.message, hint = %hint, "configuration warning")
            }
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }
}

async fn run_migrate(config: &Config) -> anyhow::Result<()> {
    let Some(url) = config.database.url.as_deref() else {
        anyhow::bail!("DATABASE_URL or database.url must be set to run migrations");
    };

    let catalog = connect_postgres(url, config.database.max_connections).await?;
    catalog
        .migrate()
        .await
        .context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let config = Arc::new(config);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = build_state(config.clone()).await?;
    info!(
        storage = state.storage.as_str(),
        api_keys = state.api_keys.len(),
        "application state ready"
    );

    let app = create_app(state);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "bindery server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn print_config(config: &Config, warnings: &ConfigWarnings) {
    println!("server:      {}:{}", config.server.host, config.server.port);
    match &config.database.url {
        Some(_) => println!(
            "storage:     postgres (max_connections = {})",
            config.database.max_connections
        ),
        None => println!("storage:     in-memory"),
    }
    if let Some(seed) = &config.catalog.seed_path {
        println!("seed:        {}", seed.display());
    }
    println!(
        "pagination:  default {} / max {}",
        config.pagination.default_page_size, config.pagination.max_page_size
    );
    println!("api keys:    {}", config.api_keys.len());
    for entry in &config.api_keys {
        let scope = match &entry.libraries {
            Some(ids) => format!("{} libraries", ids.len()),
            None => "all libraries".to_string(),
        };
        let role = if entry.admin { "admin" } else { "reader" };
        println!("  - user {} ({role}, {scope})", entry.user_id);
    }

    if warnings.is_empty() {
        println!("no warnings");
    }
    for warning in &warnings.items {
        println!("warning: {}", warning.message);
        if let Some(hint) = &warning.hint {
            println!("  hint: {hint}");
        }
    }
}
