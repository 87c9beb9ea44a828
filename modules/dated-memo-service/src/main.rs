//! Dated Memo Service — standalone binary for recording and listing dated memos.
//!
//! Serves the memo page, its form endpoints and a small RPC API.
//! Default: http://0.0.0.0:5000/ (loopback only when MEMOS_DEBUG is set)

mod config;
mod dates;
mod db;
mod error;
mod pages;
mod routes;
mod store;

use config::Config;
use routes::AppState;
use std::sync::Arc;
use std::time::Instant;
use store::MemoStore;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.default_log_filter()),
    )
    .init();
    for warning in &config.warnings {
        log::warn!("{}", warning);
    }

    log::info!("Opening database at: {}", config.db_path);
    let database = match db::Db::open(&config.db_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            log::error!("Failure opening database at {}: {}", config.db_path, e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        store: MemoStore::new(database),
        start_time: Instant::now(),
    });

    let app = routes::router(state);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    log::info!("Dated Memo Service listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
