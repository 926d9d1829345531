mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use quill_api::{AppState, AppStateInner};
use quill_crypto::CookieSigner;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill_server=debug,quill_api=debug,quill_db=info,tower_http=debug".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e}");
            eprintln!("       Set it in your environment or .env file and restart.");
            std::process::exit(1);
        }
    };

    // Init database
    let db = quill_db::Database::open(&PathBuf::from(&config.db_path))?;

    let signer = CookieSigner::new(&config.secret);
    let mut inner = AppStateInner::new(Arc::new(db), signer);
    inner.password_scheme = config.password_scheme;
    inner.cookie_hardened = config.cookie_hardened;
    let state: AppState = Arc::new(inner);

    let app = quill_api::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        "Quill listening on {} (password scheme {:?}, hardened cookies: {})",
        addr, config.password_scheme, config.cookie_hardened
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
