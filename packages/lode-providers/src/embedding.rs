//! OpenAI-compatible embedding endpoint client.

use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use lode_config::EmbeddingProviderConfig;

#[derive(Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
	index: Option<usize>,
	embedding: Vec<f32>,
}

/// Embeds `texts` in one request. Vectors come back in input order and
/// are checked against the configured dimension.
pub async fn embed(cfg: &EmbeddingProviderConfig, texts: &[String]) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let response: EmbeddingResponse = client
		.post(format!("{}{}", cfg.api_base, cfg.path))
		.headers(request_headers(cfg)?)
		.json(&body)
		.send()
		.await?
		.error_for_status()?
		.json()
		.await?;
	let vectors = order_by_index(response);

	if vectors.len() != texts.len() {
		return Err(eyre::eyre!(
			"Embedding count mismatch: sent {} inputs, got {} vectors.",
			texts.len(),
			vectors.len()
		));
	}
	for vector in &vectors {
		if vector.len() != cfg.dimensions as usize {
			return Err(eyre::eyre!(
				"Embedding dimension mismatch: expected {}, got {}.",
				cfg.dimensions,
				vector.len()
			));
		}
	}

	Ok(vectors)
}

// Providers may stream items out of order; the optional per-item index
// restores input order, falling back to arrival order.
fn order_by_index(response: EmbeddingResponse) -> Vec<Vec<f32>> {
	let mut indexed: Vec<(usize, Vec<f32>)> = response
		.data
		.into_iter()
		.enumerate()
		.map(|(arrival, item)| (item.index.unwrap_or(arrival), item.embedding))
		.collect();

	indexed.sort_by_key(|(index, _)| *index);

	indexed.into_iter().map(|(_, vector)| vector).collect()
}

fn request_headers(cfg: &EmbeddingProviderConfig) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {}", cfg.api_key).parse()?);

	for (key, value) in &cfg.default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn vectors_are_reordered_by_item_index() {
		let response: EmbeddingResponse = serde_json::from_value(serde_json::json!({
			"data": [
				{ "index": 1, "embedding": [2.0, 3.0] },
				{ "index": 0, "embedding": [0.5, 1.5] }
			]
		}))
		.expect("parse failed");
		let vectors = order_by_index(response);

		assert_eq!(vectors, vec![vec![0.5, 1.5], vec![2.0, 3.0]]);
	}

	#[test]
	fn missing_indices_fall_back_to_arrival_order() {
		let response: EmbeddingResponse = serde_json::from_value(serde_json::json!({
			"data": [
				{ "embedding": [1.0] },
				{ "embedding": [2.0] }
			]
		}))
		.expect("parse failed");

		assert_eq!(order_by_index(response), vec![vec![1.0], vec![2.0]]);
	}

	#[test]
	fn header_values_must_be_strings() {
		let mut cfg_headers = Map::new();

		cfg_headers.insert("x-extra".to_string(), Value::from(1));

		let cfg = EmbeddingProviderConfig {
			provider_id: "test".to_string(),
			api_base: "http://localhost".to_string(),
			api_key: "key".to_string(),
			path: "/v1/embeddings".to_string(),
			model: "m".to_string(),
			dimensions: 2,
			timeout_ms: 1_000,
			default_headers: cfg_headers,
		};

		assert!(request_headers(&cfg).is_err());
	}
}
