use axum::extract::State;

use crate::api::dto::{EngineStatus, HealthData};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::ocr::SessionState;

/// `GET /api/health`
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthData> {
    let sessions = state.ocr.sessions();
    let engine_state = sessions.state();

    let status = match engine_state {
        SessionState::Ready | SessionState::Busy => "ok",
        SessionState::Uninitialized | SessionState::Initializing => "starting",
        SessionState::Terminated => "unavailable",
    };

    ApiResponse::success(HealthData {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: EngineStatus {
            name: sessions.engine_name().to_string(),
            state: engine_state,
            sessions: sessions.size(),
            capacity: sessions.capacity(),
            in_flight: sessions.in_flight(),
        },
    })
}
