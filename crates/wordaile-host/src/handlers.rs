//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use wordaile_core::{BoardState, LedgerError, ParticipantId, SeriesSnapshot, WinnerHistory};

use crate::state::AppState;

/// Application error type
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        error!(error = %e, "failed to read winner history");
        AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Winner history unavailable: {}", e),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostKeyResponse {
    pub public_key: String,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn get_state(State(state): State<AppState>) -> Json<SeriesSnapshot> {
    Json(state.snapshot())
}

/// A participant's board; unseen participants get an empty board
pub async fn get_board(
    State(state): State<AppState>,
    Path(participant): Path<String>,
) -> Json<BoardState> {
    let id = ParticipantId::from(participant);
    let board = state
        .snapshots
        .borrow()
        .boards
        .get(&id)
        .cloned()
        .unwrap_or_default();
    Json(board)
}

pub async fn get_winners(State(state): State<AppState>) -> Result<Json<WinnerHistory>, AppError> {
    let winners = state.ledger.read_all().await?;
    Ok(Json(WinnerHistory { winners }))
}

pub async fn get_host_key(State(state): State<AppState>) -> Json<HostKeyResponse> {
    Json(HostKeyResponse {
        public_key: state.host_public_key,
    })
}
