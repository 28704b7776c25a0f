use std::{net::SocketAddr, time::Duration};

use axum::{
	Json, Router,
	extract::{ConnectInfo, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use lode_service::{
	CacheStats, CompromiseSearchResponse, Error as ServiceError, SearchRequest,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/cache/stats", get(cache_stats))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	ConnectInfo(addr): ConnectInfo<SocketAddr>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<CompromiseSearchResponse>, ApiError> {
	enforce_route_budget(&state, addr)?;
	enforce_search_budget(&state, addr)?;

	let response = state.service.search_with_compromise(payload).await?;

	Ok(Json(response))
}

async fn cache_stats(
	State(state): State<AppState>,
	ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<CacheStats>, ApiError> {
	enforce_route_budget(&state, addr)?;

	Ok(Json(state.service.cache.stats()))
}

/// Broad per-client budget shared by every `/v1` route.
fn enforce_route_budget(state: &AppState, addr: SocketAddr) -> Result<(), ApiError> {
	let limits = &state.service.cfg.rate_limit;
	let key = format!("route:{}", addr.ip());
	let window = Duration::from_secs(limits.route_window_seconds);

	if state.rate_limiter.is_allowed(&key, limits.route_max_requests, window) {
		Ok(())
	} else {
		Err(rate_limited(limits.route_window_seconds))
	}
}

/// Tighter budget for the search route itself, checked after the route
/// budget so a blocked search still burns a route slot.
fn enforce_search_budget(state: &AppState, addr: SocketAddr) -> Result<(), ApiError> {
	let limits = &state.service.cfg.rate_limit;
	let key = format!("search:{}", addr.ip());
	let window = Duration::from_secs(limits.search_window_seconds);

	if state.rate_limiter.is_allowed(&key, limits.search_max_requests, window) {
		Ok(())
	} else {
		Err(rate_limited(limits.search_window_seconds))
	}
}

fn rate_limited(window_seconds: u64) -> ApiError {
	ApiError {
		status: StatusCode::TOO_MANY_REQUESTS,
		error_code: "rate_limited".to_string(),
		message: "Too many requests, slow down.".to_string(),
		retry_after_seconds: Some(window_seconds),
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	retry_after_seconds: Option<u64>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	retry_after_seconds: Option<u64>,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let (status, error_code) = match &err {
			ServiceError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "invalid_request"),
			ServiceError::Encoding { .. } => (StatusCode::BAD_GATEWAY, "encoding_failed"),
			ServiceError::Retrieval { .. } => (StatusCode::BAD_GATEWAY, "retrieval_failed"),
			ServiceError::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "storage_failed"),
		};

		Self {
			status,
			error_code: error_code.to_string(),
			message: err.to_string(),
			retry_after_seconds: None,
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			retry_after_seconds: self.retry_after_seconds,
		};

		(self.status, Json(body)).into_response()
	}
}
