//! HTTP handlers for the counter API.

use std::fmt::Write as _;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::instrument;

use crate::domain::{Limits, Pen, StatsReport};

use super::AppState;
use super::error::ApiError;
use super::types::{PenRequest, PensResponse, StatusOk};

/// `POST /click` — record one hit for today.
#[instrument(skip_all)]
pub async fn click(State(state): State<AppState>, body: Bytes) -> Result<Json<StatusOk>, ApiError> {
    let req = PenRequest::from_slice(&body).map_err(|e| state.reject(e))?;

    state
        .service
        .increment(&req.pen)
        .await
        .map_err(|e| state.reject(e.into()))?;

    if let (Some(metrics), Ok(pen)) = (&state.metrics, req.pen.parse::<Pen>()) {
        metrics.record_click(pen);
    }

    Ok(Json(StatusOk::new()))
}

/// `POST /adjust` — overwrite today's and/or total hits.
#[instrument(skip_all)]
pub async fn adjust(State(state): State<AppState>, body: Bytes) -> Result<Json<StatusOk>, ApiError> {
    let req = PenRequest::from_slice(&body).map_err(|e| state.reject(e))?;

    let applied = state
        .service
        .adjust(&req.pen, req.daily.as_ref(), req.total.as_ref())
        .await
        .map_err(|e| state.reject(e.into()))?;

    // `None` means neither value was given and nothing changed.
    if let (Some(metrics), Some(_), Ok(pen)) = (&state.metrics, applied, req.pen.parse::<Pen>()) {
        metrics.record_adjustment(pen);
    }

    Ok(Json(StatusOk::new()))
}

/// `GET /stats` — today's figures for every pen.
pub async fn stats(State(state): State<AppState>) -> Json<StatsReport> {
    Json(state.service.stats().await)
}

/// `GET /pens` — the pen catalogue and limits.
pub async fn pens() -> Json<PensResponse> {
    Json(PensResponse {
        pens: Pen::ALL.to_vec(),
        limits: Limits::CURRENT,
    })
}

/// `GET /` — minimal HTML page listing pens and limits.
pub async fn index() -> Html<String> {
    let limits = Limits::CURRENT;
    let mut items = String::new();
    for pen in Pen::ALL {
        let _ = writeln!(items, "      <li>{pen}</li>");
    }

    Html(format!(
        "<!doctype html>\n<html>\n  <head><title>Pen Counter</title></head>\n  <body>\n    \
         <h1>Pen Counter</h1>\n    <p>Daily limit: {daily} &middot; Total limit: {total}</p>\n    \
         <ul>\n{items}    </ul>\n    <p>Live figures: <a href=\"/stats\">/stats</a></p>\n  \
         </body>\n</html>\n",
        daily = limits.daily,
        total = limits.total,
    ))
}

/// `GET /metrics` — Prometheus text exposition.
pub async fn metrics(State(state): State<AppState>) -> Response {
    let Some(metrics) = &state.metrics else {
        return StatusCode::NOT_FOUND.into_response();
    };
    match metrics.render() {
        Ok(text) => text.into_response(),
        Err(source) => ApiError::Internal {
            message: "Failed to render metrics",
            source,
        }
        .into_response(),
    }
}
