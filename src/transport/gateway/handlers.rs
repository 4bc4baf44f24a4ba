use super::AppState;
use crate::core::lookups::decode_polyline;
use crate::error::LookupError;
use crate::prompt::policy::POLICY_VERSION;
use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

pub(super) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Status for a lookup failure: the upstream status when there was one,
/// otherwise 502.
fn lookup_failure_response(error: &LookupError) -> Response {
    let status = match (error, error.upstream_status()) {
        (LookupError::InvalidInput(_), _) => StatusCode::BAD_REQUEST,
        (_, Some(status)) => StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
        (_, None) => StatusCode::BAD_GATEWAY,
    };
    error_response(status, error.to_string())
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "policy_version": POLICY_VERSION,
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct MetarQuery {
    q: Option<String>,
}

/// GET /api/metar?q=<station or place>
pub(super) async fn handle_metar(
    State(state): State<AppState>,
    Query(params): Query<MetarQuery>,
) -> Response {
    let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing `q` parameter");
    };

    match state.weather.observe(q).await {
        Ok(Some(observation)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            observation.into_inner(),
        )
            .into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("No METAR found for “{q}”")),
        Err(error) => lookup_failure_response(&error),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PlanQuery {
    #[serde(rename = "fromICAO")]
    from_icao: Option<String>,
    #[serde(rename = "toICAO")]
    to_icao: Option<String>,
    #[serde(default)]
    decode: bool,
}

/// GET /api/plan?fromICAO=<a>&toICAO=<b>[&decode=true]
pub(super) async fn handle_plan(
    State(state): State<AppState>,
    Query(params): Query<PlanQuery>,
) -> Response {
    let non_empty = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let (Some(from), Some(to)) = (non_empty(&params.from_icao), non_empty(&params.to_icao)) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing query parameters: fromICAO and toICAO are required",
        );
    };

    let plan = match state.routes.find(&from, &to).await {
        Ok(Some(plan)) => plan,
        Ok(None) => {
            return error_response(
                StatusCode::NOT_FOUND,
                format!("No flight plans found from {from} to {to}"),
            );
        }
        Err(error) => {
            tracing::warn!(%from, %to, %error, "Route lookup failed");
            return lookup_failure_response(&error);
        }
    };

    if !params.decode {
        return Json(plan).into_response();
    }

    match decode_polyline(&plan.encoded_polyline) {
        Ok(points) => Json(serde_json::json!({
            "encodedPolyline": plan.encoded_polyline,
            "points": points,
        }))
        .into_response(),
        Err(error) => lookup_failure_response(&error),
    }
}
