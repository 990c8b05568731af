//! Duelbot Engine - Main entry point.
//!
//! Reads one request per line from stdin, `<participant>[:<name>] <command>`,
//! and prints the reply. Notifications for any participant go to stdout.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duelbot_domain::ParticipantId;
use duelbot_engine::api::Dispatcher;
use duelbot_engine::app::{App, Repositories};
use duelbot_engine::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::AppConfig,
    memory::{InMemoryChallengeRepo, InMemoryMatchRepo, InMemoryUserStore},
    notifier::StdoutNotifier,
    ports::{ClockPort, NotifierPort, RandomPort, UserRegistry},
    sqlite::SqliteDatabase,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "duelbot_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Duelbot Engine");

    // Load configuration
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        database = %config.database_path,
        challenge_ttl_secs = config.challenge_ttl.map(|ttl| ttl.num_seconds()),
        "Configuration loaded"
    );

    let repositories = build_repositories(&config).await?;
    let registry = repositories.registry.clone();
    let app = Arc::new(App::new(repositories, &config));
    let dispatcher = Dispatcher::new(app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((actor, name, command)) = split_request(line) else {
            println!("usage: <participant>[:<name>] <command>");
            continue;
        };
        match registry.register_if_missing(actor, &name).await {
            Ok(true) => tracing::info!(participant = %actor, name = %name, "Registered new participant"),
            Ok(false) => {}
            Err(e) => {
                tracing::error!(participant = %actor, error = %e, "Registration failed");
                println!("Could not register {}. Please try again.", actor);
                continue;
            }
        }

        let reply = dispatcher.dispatch(actor, command).await;
        println!("<- [{}] {}", actor, reply);
    }

    tracing::info!("Duelbot Engine stopped");
    Ok(())
}

async fn build_repositories(config: &AppConfig) -> anyhow::Result<Repositories> {
    let notifier: Arc<dyn NotifierPort> = Arc::new(StdoutNotifier::new());
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());

    if config.uses_memory_backend() {
        tracing::warn!("Using in-memory storage; nothing survives a restart");
        let users = Arc::new(InMemoryUserStore::new());
        return Ok(Repositories {
            matches: Arc::new(InMemoryMatchRepo::new()),
            challenges: Arc::new(InMemoryChallengeRepo::new()),
            profiles: users.clone(),
            registry: users.clone(),
            ledger: users.clone(),
            inventory: users,
            notifier,
            clock,
            random,
        });
    }

    let db = SqliteDatabase::open(&config.database_path)
        .await
        .with_context(|| format!("Failed to open SQLite database at {}", config.database_path))?;
    let users = Arc::new(db.users());
    Ok(Repositories {
        matches: Arc::new(db.matches()),
        challenges: Arc::new(db.challenges()),
        profiles: users.clone(),
        registry: users.clone(),
        ledger: users.clone(),
        inventory: users,
        notifier,
        clock,
        random,
    })
}

/// Split `<participant>[:<name>] <command>`. The name defaults to `user<id>`.
fn split_request(line: &str) -> Option<(ParticipantId, String, &str)> {
    let (who, command) = line.split_once(char::is_whitespace)?;
    let (id, name) = match who.split_once(':') {
        Some((id, name)) if !name.is_empty() => (id, Some(name)),
        Some((id, _)) => (id, None),
        None => (who, None),
    };
    let actor: ParticipantId = id.parse().ok()?;
    let name = name.map_or_else(|| format!("user{}", actor), str::to_string);
    Some((actor, name, command.trim()))
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
