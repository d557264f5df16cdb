//! Wordaile Host Service
//!
//! Runs rounds and series against remote participants, pays series winners
//! and serves a read-only spectator API.

mod config;
mod handlers;
mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wordaile_core::reward::RpcRewardDistributor;
use wordaile_core::{
    HttpDirectory, HttpParticipantClient, JsonFileLedger, MessageSigner, MockRewardDistributor,
    ParticipantDirectory, RewardDistributor, SeriesController, SeriesDeps, StaticDirectory,
    WordList,
};

use config::{HostConfig, RosterSource};
use handlers::*;
use state::AppState;

/// Treasury for the mock distributor used when no payout service is configured
const MOCK_TREASURY: u64 = 1_000_000;

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/state", get(get_state))
        .route("/api/boards/:participant", get(get_board))
        .route("/api/winners", get(get_winners))
        .route("/api/host-key", get(get_host_key))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn build_directory(
    config: &HostConfig,
) -> Result<Arc<dyn ParticipantDirectory>, Box<dyn std::error::Error>> {
    let directory: Arc<dyn ParticipantDirectory> = match &config.roster {
        RosterSource::Directory(url) => {
            info!("Participant directory: {}", url);
            Arc::new(HttpDirectory::new(url.clone(), config.game.response_timeout)?)
        }
        RosterSource::Static(list) => {
            let directory = StaticDirectory::from_spec(list)?;
            if list.is_empty() {
                warn!("No participants configured (set DIRECTORY_URL or PARTICIPANTS)");
            }
            Arc::new(directory)
        }
    };
    Ok(directory)
}

fn build_distributor(config: &HostConfig) -> Arc<dyn RewardDistributor> {
    match &config.reward_rpc {
        Some(rpc) => {
            info!("Reward RPC enabled: {}", rpc.url);
            Arc::new(RpcRewardDistributor::with_token(rpc.url.clone(), rpc.token.clone()))
        }
        None => {
            info!("Reward RPC not configured (set REWARD_RPC_URL to enable), using mock payouts");
            Arc::new(MockRewardDistributor::new(MOCK_TREASURY))
        }
    }
}

async fn load_words(config: &HostConfig) -> Result<WordList, Box<dyn std::error::Error>> {
    let Some(path) = &config.words_file else {
        return Ok(WordList::standard());
    };
    let contents = tokio::fs::read_to_string(path).await?;
    let words = WordList::from_words(
        contents.lines().map(str::trim).filter(|l| !l.is_empty()),
        config.game.word_length,
    )?;
    info!("Loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = HostConfig::from_env()?;

    let signer = match &config.host_secret_key {
        Some(secret) => MessageSigner::from_secret_hex(secret)?,
        None => {
            warn!("HOST_SECRET_KEY not set, using a random signing key");
            MessageSigner::random()
        }
    };
    info!("Host public key: {}", signer.public_key_hex());

    let ledger = Arc::new(JsonFileLedger::new(&config.winners_file));
    info!("Winner history: {}", config.winners_file.display());

    let deps = SeriesDeps {
        directory: build_directory(&config)?,
        participants: Arc::new(HttpParticipantClient::new(config.game.response_timeout)?),
        distributor: build_distributor(&config),
        ledger: ledger.clone(),
        signer: Arc::new(signer),
        words: load_words(&config).await?,
    };
    let host_public_key = deps.signer.public_key_hex();

    let controller = SeriesController::new(config.game.clone(), deps)?;
    let state = AppState::new(controller.subscribe(), ledger, host_public_key);
    let game = tokio::spawn(controller.run(shutdown_signal()));

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Host service listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    game.await?;

    Ok(())
}
