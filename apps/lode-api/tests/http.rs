use std::{net::SocketAddr, sync::Arc};

use axum::{
	body::{self, Body},
	extract::ConnectInfo,
	http::{Request, StatusCode},
};
use tower::util::ServiceExt;
use uuid::Uuid;

use lode_api::{routes, state::AppState};
use lode_service::{Document, LodeService, Neighbor, Providers, Tag};
use lode_testkit::{StaticDocuments, StaticEncoder, StaticIndex, StaticTags, test_config};

fn test_state() -> AppState {
	let service = LodeService::with_backends(
		test_config(),
		Providers::new(Arc::new(StaticEncoder::new(4))),
		Arc::new(StaticIndex::new(vec![Neighbor {
			document_id: Uuid::from_u128(1),
			distance: 0.50,
		}])),
		Arc::new(StaticTags::new(Vec::<Tag>::new())),
		Arc::new(StaticDocuments::new(vec![Document {
			document_id: Uuid::from_u128(1),
			text: "gold vein".to_string(),
			tag_ids: Vec::new(),
		}])),
	);

	AppState::with_service(service)
}

fn client_addr() -> ConnectInfo<SocketAddr> {
	ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40_000)))
}

fn search_request(query: &str) -> Request<Body> {
	let payload = serde_json::json!({ "query": query, "min_similarity": 85.0 });

	Request::builder()
		.method("POST")
		.uri("/v1/search")
		.header("content-type", "application/json")
		.extension(client_addr())
		.body(Body::from(payload.to_string()))
		.expect("Failed to build request.")
}

#[tokio::test]
async fn health_ok() {
	let app = routes::router(test_state());
	let response = app
		.oneshot(
			Request::builder()
				.uri("/health")
				.extension(client_addr())
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_returns_ranked_results() {
	let app = routes::router(test_state());
	let response =
		app.oneshot(search_request("gold vein")).await.expect("Failed to call search.");

	assert_eq!(response.status(), StatusCode::OK);

	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: serde_json::Value = serde_json::from_slice(&bytes).expect("Failed to parse.");

	assert_eq!(json["items"].as_array().map(Vec::len), Some(1));
	assert_eq!(json["items"][0]["similarity_score"], 100.0);
	assert_eq!(json["status"]["active"], false);
}

#[tokio::test]
async fn search_budget_blocks_the_eleventh_request() {
	let app = routes::router(test_state());

	for _ in 0..10 {
		let response = app
			.clone()
			.oneshot(search_request("gold vein"))
			.await
			.expect("Failed to call search.");

		assert_eq!(response.status(), StatusCode::OK);
	}

	let blocked =
		app.oneshot(search_request("gold vein")).await.expect("Failed to call search.");

	assert_eq!(blocked.status(), StatusCode::TOO_MANY_REQUESTS);

	let bytes = body::to_bytes(blocked.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: serde_json::Value = serde_json::from_slice(&bytes).expect("Failed to parse.");

	assert_eq!(json["error_code"], "rate_limited");
}

#[tokio::test]
async fn cache_stats_reports_configured_bounds() {
	let app = routes::router(test_state());
	let response = app
		.oneshot(
			Request::builder()
				.uri("/v1/cache/stats")
				.extension(client_addr())
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call cache stats.");

	assert_eq!(response.status(), StatusCode::OK);

	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: serde_json::Value = serde_json::from_slice(&bytes).expect("Failed to parse.");

	assert_eq!(json["max_size"], 100);
	assert_eq!(json["ttl_seconds"], 300);
}
