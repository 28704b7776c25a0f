//! In-memory fakes for the search pipeline's capability traits, so the
//! ranking path can be exercised without a real encoder or datastore.

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use ahash::AHashMap;
use color_eyre::eyre;
use uuid::Uuid;

use lode_config::{
	Config, EmbeddingProviderConfig, Postgres, Providers as ProvidersConfig, Service, Storage,
};
use lode_service::{BoxFuture, CandidateIndex, Document, Encoder, Neighbor, Tag, TagStore};

pub fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:8080".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres {
				dsn: "postgres://localhost/lode_test".to_string(),
				pool_max_conns: 1,
			},
		},
		providers: ProvidersConfig {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://localhost:9000".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-model".to_string(),
				dimensions: 4,
				timeout_ms: 1_000,
				default_headers: Default::default(),
			},
		},
		search: Default::default(),
		rate_limit: Default::default(),
	}
}

/// Returns a fixed vector per known text and zeros otherwise, counting
/// every call so tests can assert how often the pipeline re-encodes.
pub struct StaticEncoder {
	dim: usize,
	by_text: AHashMap<String, Vec<f32>>,
	calls: Arc<AtomicUsize>,
}
impl StaticEncoder {
	pub fn new(dim: usize) -> Self {
		Self { dim, by_text: AHashMap::new(), calls: Arc::new(AtomicUsize::new(0)) }
	}

	pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
		self.by_text.insert(text.to_string(), vector);

		self
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn call_counter(&self) -> Arc<AtomicUsize> {
		self.calls.clone()
	}
}
impl Encoder for StaticEncoder {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let vectors = texts
			.iter()
			.map(|text| self.by_text.get(text).cloned().unwrap_or_else(|| vec![0.0; self.dim]))
			.collect();

		Box::pin(async move { Ok(vectors) })
	}
}

pub struct FailingEncoder;
impl Encoder for FailingEncoder {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Err(eyre::eyre!("Encoder unreachable.")) })
	}
}

/// Serves a fixed neighbor list, already ascending by distance.
pub struct StaticIndex {
	neighbors: Vec<Neighbor>,
}
impl StaticIndex {
	pub fn new(neighbors: Vec<Neighbor>) -> Self {
		Self { neighbors }
	}
}
impl CandidateIndex for StaticIndex {
	fn nearest<'a>(
		&'a self,
		_query_vec: &'a [f32],
		k: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Neighbor>>> {
		let neighbors: Vec<Neighbor> =
			self.neighbors.iter().take(k as usize).copied().collect();

		Box::pin(async move { Ok(neighbors) })
	}
}

pub struct FailingIndex;
impl CandidateIndex for FailingIndex {
	fn nearest<'a>(
		&'a self,
		_query_vec: &'a [f32],
		_k: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Neighbor>>> {
		Box::pin(async move { Err(eyre::eyre!("Candidate store unreachable.")) })
	}
}

pub struct StaticTags {
	tags: Vec<Tag>,
}
impl StaticTags {
	pub fn new(tags: Vec<Tag>) -> Self {
		Self { tags }
	}

	pub fn empty() -> Self {
		Self { tags: Vec::new() }
	}
}
impl TagStore for StaticTags {
	fn all_tags<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<Vec<Tag>>> {
		let tags = self.tags.clone();

		Box::pin(async move { Ok(tags) })
	}
}

pub struct StaticDocuments {
	by_id: AHashMap<Uuid, Document>,
}
impl StaticDocuments {
	pub fn new(documents: Vec<Document>) -> Self {
		Self { by_id: documents.into_iter().map(|doc| (doc.document_id, doc)).collect() }
	}
}
impl lode_service::DocumentStore for StaticDocuments {
	fn documents_by_ids<'a>(
		&'a self,
		ids: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>> {
		let documents: Vec<Document> =
			ids.iter().filter_map(|id| self.by_id.get(id).cloned()).collect();

		Box::pin(async move { Ok(documents) })
	}
}
