use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
	Document, Error, LodeService, Result,
	cache::normalize_query,
	compromise::{CompromiseState, CompromiseStatus},
};
use lode_domain::{RankedDoc, boost, filter, threshold};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	/// Similarity floor in percent. Falls back to `search.min_similarity`.
	pub min_similarity: Option<f32>,
	pub max_candidates: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchItem {
	pub document_id: Uuid,
	pub text: String,
	pub tag_ids: Vec<i32>,
	pub distance: f32,
	/// Similarity percentage in [0, 100], derived from the boosted distance.
	pub similarity_score: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
	pub items: Vec<SearchItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompromiseSearchResponse {
	pub items: Vec<SearchItem>,
	pub status: CompromiseStatus,
}

pub type CachedSearch = CompromiseSearchResponse;

impl LodeService {
	/// Single-pass search at a fixed similarity floor.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		if req.query.trim().is_empty() {
			tracing::info!("Empty query, returning no results.");

			return Ok(SearchResponse { items: Vec::new() });
		}

		let floor = req.min_similarity.unwrap_or(self.cfg.search.min_similarity);
		let candidate_k = req.max_candidates.unwrap_or(self.cfg.search.max_candidates).max(1);
		let items = self.search_pass(&req.query, Some(floor), candidate_k).await?;

		Ok(SearchResponse { items })
	}

	/// Search with the staged fallback: when the initial floor yields
	/// nothing, the floor drops step by step until results appear or the
	/// minimum is reached. Results found under a reduced floor are capped.
	/// Hits are memoized per normalized query.
	pub async fn search_with_compromise(
		&self,
		req: SearchRequest,
	) -> Result<CompromiseSearchResponse> {
		let initial_floor = req.min_similarity.unwrap_or(self.cfg.search.min_similarity);
		let mut state = CompromiseState::new(initial_floor, &self.cfg.search.compromise);

		if req.query.trim().is_empty() {
			tracing::info!("Empty query, returning no results.");

			return Ok(CompromiseSearchResponse { items: Vec::new(), status: state.status() });
		}

		let cache_enabled = self.cfg.search.cache.enabled;
		let normalized = normalize_query(&req.query);

		if cache_enabled
			&& let Some(cached) = self.cache.get(&normalized)
		{
			tracing::debug!("Search cache hit.");

			return Ok(cached);
		}

		let candidate_k = req.max_candidates.unwrap_or(self.cfg.search.max_candidates).max(1);
		let mut items = self.search_pass(&req.query, Some(initial_floor), candidate_k).await?;

		if items.is_empty() {
			tracing::info!(floor = initial_floor, "No results at the initial floor, compromising.");

			while state.should_continue() {
				let floor = state.reduce_floor();

				items = self.search_pass(&req.query, Some(floor), candidate_k).await?;

				if !items.is_empty() {
					items = state.limit_results(items);

					break;
				}
			}
		}

		let response = CompromiseSearchResponse { items, status: state.status() };

		if cache_enabled {
			self.cache.set(&normalized, response.clone());
		}

		Ok(response)
	}

	/// One full pipeline pass: encode, match tags, retrieve, boost,
	/// derive the cutoff from the raw distances, filter.
	async fn search_pass(
		&self,
		query_text: &str,
		floor: Option<f32>,
		candidate_k: u32,
	) -> Result<Vec<SearchItem>> {
		let query_vec = self.encode_query(query_text).await?;
		let matched_tags = self.find_similar_tags(&query_vec).await?;
		let neighbors = self
			.index
			.nearest(&query_vec, candidate_k)
			.await
			.map_err(|err| Error::Retrieval { message: err.to_string() })?;
		let all_distances: Vec<f32> =
			neighbors.iter().map(|neighbor| neighbor.distance).collect();
		let ids: Vec<Uuid> = neighbors.iter().map(|neighbor| neighbor.document_id).collect();
		let documents = self
			.documents
			.documents_by_ids(&ids)
			.await
			.map_err(|err| Error::Retrieval { message: err.to_string() })?;
		let mut by_id: ahash::AHashMap<Uuid, Document> =
			documents.into_iter().map(|doc| (doc.document_id, doc)).collect();
		// Rows missing from the document store are skipped, not fatal.
		let candidates: Vec<RankedDoc<Document>> = neighbors
			.iter()
			.filter_map(|neighbor| {
				by_id.remove(&neighbor.document_id).map(|doc| {
					let tag_ids = doc.tag_ids.clone();

					RankedDoc::new(doc, tag_ids, neighbor.distance)
				})
			})
			.collect();
		let boosted = boost::apply_tag_boost(
			candidates,
			&matched_tags,
			self.cfg.search.tags.boost_weight,
		);
		let cutoff = threshold::acceptance_cutoff(&all_distances, &self.cfg.search.thresholds);
		let outcome = filter::filter_candidates(boosted, cutoff, floor, &self.cfg.search.band);

		for rejected in outcome.rejected.iter().take(3) {
			tracing::debug!(
				document_id = %rejected.item.document_id,
				distance = rejected.boosted,
				"Rejected candidate.",
			);
		}

		tracing::info!(
			accepted = outcome.accepted.len(),
			rejected = outcome.rejected.len(),
			cutoff,
			"Search pass complete.",
		);

		Ok(outcome
			.accepted
			.into_iter()
			.map(|accepted| SearchItem {
				document_id: accepted.item.document_id,
				text: accepted.item.text,
				tag_ids: accepted.item.tag_ids,
				distance: accepted.distance,
				similarity_score: accepted.similarity,
			})
			.collect())
	}

	async fn encode_query(&self, query_text: &str) -> Result<Vec<f32>> {
		let filtered = strip_ignore_words(query_text, &self.cfg.search.ignore_words);
		let to_encode =
			if filtered.trim().is_empty() { query_text.to_string() } else { filtered };
		let vectors = self
			.providers
			.encoder
			.embed(&self.cfg.providers.embedding, &[to_encode])
			.await
			.map_err(|err| Error::Encoding { message: err.to_string() })?;

		vectors.into_iter().next().ok_or_else(|| Error::Encoding {
			message: "Encoder returned no vectors for the query.".to_string(),
		})
	}
}

/// Drops noise words from the query before encoding. Comparison is
/// case-insensitive; the ignore list is lowercased at config load.
fn strip_ignore_words(query: &str, ignore_words: &[String]) -> String {
	if ignore_words.is_empty() {
		return query.to_string();
	}

	query
		.split_whitespace()
		.filter(|word| !ignore_words.iter().any(|ignored| ignored == &word.to_lowercase()))
		.collect::<Vec<_>>()
		.join(" ")
}
