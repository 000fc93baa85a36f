use axum::Json;

use crate::message::HealthResponse;

pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
