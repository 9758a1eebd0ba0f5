use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use deckgen_core::{ExtractionResponse, ExtractionResult};
use serde::Serialize;

/// An [`ExtractionResult`] rendered as the endpoint's JSON body and status.
pub struct ExtractJson(pub ExtractionResult);

impl IntoResponse for ExtractJson {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ExtractionResponse::from(&self.0))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
