// Dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open storage, restore the selection set and saved teams
// 4. Sign in if credentials are configured
// 5. Fetch the default roster slice
// 6. Report the session summary

use courtside::auth::AuthClient;
use courtside::config;
use courtside::dashboard::RosterView;
use courtside::remote::RemoteTableClient;
use courtside::selection::SelectionStore;
use courtside::storage::SqliteStore;
use courtside::teams::TeamLibrary;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Dashboard starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!("Config loaded: remote={}", config.remote.url);

    // 3. Open storage and restore persisted state
    let store = Arc::new(
        SqliteStore::open(&config.db_path).context("failed to open storage")?,
    );
    info!("Storage opened at {}", config.db_path);

    let mut selection = SelectionStore::new(store.clone());
    selection.load();
    info!("Restored {} checked players", selection.len());

    let mut library = TeamLibrary::new(store.clone());
    library.load();
    info!("Restored {} saved teams", library.len());

    // 4. Sign in if credentials are configured
    let mut auth = AuthClient::new(&config.remote.url, &config.remote.anon_key);
    match (&config.credentials.email, &config.credentials.password) {
        (Some(email), Some(password)) => {
            let session = auth
                .sign_in(email, password)
                .await
                .context("sign-in failed")?;
            info!(user = %session.user.id, "session confirmed");
        }
        _ => info!("No credentials configured, starting signed out"),
    }

    // 5. Fetch the default roster slice
    let source = RemoteTableClient::new(&config.remote.url, &config.remote.anon_key);
    let mut view = RosterView::new();
    view.refresh(&source).await;
    if let Some(message) = view.last_error() {
        warn!("initial roster fetch failed: {message}");
    }

    // 6. Report the session summary
    let rows = view.rows(&selection);
    let checked = rows.iter().filter(|r| r.checked).count();
    let pages = courtside::compare::page_count(rows.len(), config.page_size);
    info!(
        "Roster loaded: {} players ({} pages of {}), {} checked, {} saved teams",
        rows.len(),
        pages,
        config.page_size,
        checked,
        library.len()
    );
    println!(
        "courtside ready: {} players loaded, {} checked, {} saved teams",
        rows.len(),
        checked,
        library.len()
    );

    Ok(())
}

/// Initialize tracing to log to a file so stdout stays clean for output.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("courtside.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtside=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
