//! Wordaile Player Service
//!
//! Reference participant: receives signed board broadcasts from the host
//! and answers with a guess consistent with the feedback so far.

mod solver;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wordaile_core::{authenticate, BoardBroadcast, GuessReply, SignedEnvelope, WordList};

use solver::Solver;

/// Application error type
struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Player state
struct PlayerState {
    /// Broadcasts must be signed by this key when set
    host_public_key: Option<String>,
    solver: Solver,
}

async fn health() -> &'static str {
    "ok"
}

async fn guess(
    State(state): State<Arc<PlayerState>>,
    Json(envelope): Json<SignedEnvelope<BoardBroadcast>>,
) -> Result<Json<GuessReply>, AppError> {
    let broadcast = match &state.host_public_key {
        Some(host_key) => {
            let verification = authenticate(envelope, host_key)
                .map_err(|e| AppError(StatusCode::UNAUTHORIZED, e.to_string()))?;
            if !verification.valid {
                warn!("Rejected broadcast with a bad signature");
                return Err(AppError(
                    StatusCode::UNAUTHORIZED,
                    "Invalid host signature".to_string(),
                ));
            }
            verification.payload
        }
        None => envelope.payload,
    };

    let board = &broadcast.board_state;
    let word = state.solver.choose(board).ok_or_else(|| {
        AppError(StatusCode::CONFLICT, "No words left to guess".to_string())
    })?;

    debug!(
        round = broadcast.round_number,
        guesses = board.guess_count(),
        guess = %word,
        "answering broadcast"
    );

    Ok(Json(GuessReply {
        guess: word.to_string(),
    }))
}

fn create_router(state: Arc<PlayerState>) -> Router {
    Router::new()
        .route("/", post(guess))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let host_public_key = std::env::var("HOST_PUBLIC_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    match &host_public_key {
        Some(key) => info!("Verifying broadcasts against host key {}", key),
        None => warn!("HOST_PUBLIC_KEY not set, accepting unsigned broadcasts"),
    }

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);

    let state = Arc::new(PlayerState {
        host_public_key,
        solver: Solver::new(WordList::standard()),
    });
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Player service listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
