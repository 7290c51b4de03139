use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::warn;

use climate_wrapper_common::PresentationCommand;

use crate::{
    presentation::{PresentationError, PresentationWrite},
    supervisor::{Supervisor, SupervisorError},
};

#[derive(Clone)]
pub struct ApiState {
    pub supervisor: Arc<Mutex<Supervisor>>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/status", get(handle_get_status))
        .route("/api/mode", post(handle_set_mode))
        .route("/api/target", post(handle_set_target))
        .route("/api/enable", post(handle_set_enable))
        .with_state(state)
}

async fn handle_get_status(State(state): State<ApiState>) -> impl IntoResponse {
    let view = state.supervisor.lock().await.view();
    Json(view)
}

async fn handle_set_mode(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    handle_write(state, PresentationCommand::Mode, params).await
}

async fn handle_set_target(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    handle_write(state, PresentationCommand::Target, params).await
}

async fn handle_set_enable(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    handle_write(state, PresentationCommand::Enable, params).await
}

async fn handle_write(
    state: ApiState,
    command: PresentationCommand,
    params: HashMap<String, String>,
) -> axum::response::Response {
    let Some(value) = params.get("value") else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'value' parameter");
    };

    let write = match PresentationWrite::parse(command, value) {
        Ok(write) => write,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };

    let result = {
        let mut supervisor = state.supervisor.lock().await;
        write.apply(&mut supervisor)
    };

    match result {
        Ok(()) => {}
        // The write itself is stored; the device just could not be reconciled yet.
        Err(PresentationError::Rejected(
            err @ (SupervisorError::Device(_) | SupervisorError::MissingTemperature),
        )) => warn!("write {write:?} stored but not applied: {err}"),
        Err(err) => return error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string()),
    }

    handle_get_status(State(state)).await.into_response()
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
