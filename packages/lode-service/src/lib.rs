pub mod cache;
pub mod compromise;
pub mod rate_limit;
pub mod search;
pub mod tag_match;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

pub use cache::{CacheStats, SearchCache, normalize_query};
pub use compromise::{CompromiseState, CompromiseStatus};
pub use error::{Error, Result};
pub use rate_limit::RateLimiter;
pub use search::{
	CachedSearch, CompromiseSearchResponse, SearchItem, SearchRequest, SearchResponse,
};

use lode_config::{Config, EmbeddingProviderConfig};
use lode_providers::embedding;
use lode_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A row from the nearest-neighbor index, ascending by distance.
#[derive(Clone, Copy, Debug)]
pub struct Neighbor {
	pub document_id: Uuid,
	pub distance: f32,
}

#[derive(Clone, Debug)]
pub struct Tag {
	pub tag_id: i32,
	pub name: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Document {
	pub document_id: Uuid,
	pub text: String,
	pub tag_ids: Vec<i32>,
}

pub trait Encoder
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait CandidateIndex
where
	Self: Send + Sync,
{
	fn nearest<'a>(
		&'a self,
		query_vec: &'a [f32],
		k: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Neighbor>>>;
}

pub trait TagStore
where
	Self: Send + Sync,
{
	fn all_tags<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<Vec<Tag>>>;
}

pub trait DocumentStore
where
	Self: Send + Sync,
{
	fn documents_by_ids<'a>(
		&'a self,
		ids: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub encoder: Arc<dyn Encoder>,
}
impl Providers {
	pub fn new(encoder: Arc<dyn Encoder>) -> Self {
		Self { encoder }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { encoder: Arc::new(DefaultEncoder) }
	}
}

struct DefaultEncoder;
impl Encoder for DefaultEncoder {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

pub struct LodeService {
	pub cfg: Config,
	pub providers: Providers,
	pub index: Arc<dyn CandidateIndex>,
	pub tags: Arc<dyn TagStore>,
	pub documents: Arc<dyn DocumentStore>,
	pub cache: SearchCache<CachedSearch>,
}
impl LodeService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let db = Arc::new(db);
		let cache = SearchCache::new(&cfg.search.cache);

		Self {
			providers: Providers::default(),
			index: db.clone(),
			tags: db.clone(),
			documents: db,
			cache,
			cfg,
		}
	}

	pub fn with_backends(
		cfg: Config,
		providers: Providers,
		index: Arc<dyn CandidateIndex>,
		tags: Arc<dyn TagStore>,
		documents: Arc<dyn DocumentStore>,
	) -> Self {
		let cache = SearchCache::new(&cfg.search.cache);

		Self { cfg, providers, index, tags, documents, cache }
	}
}

impl CandidateIndex for Db {
	fn nearest<'a>(
		&'a self,
		query_vec: &'a [f32],
		k: u32,
	) -> BoxFuture<'a, color_eyre::Result<Vec<Neighbor>>> {
		Box::pin(async move {
			let rows = lode_storage::queries::nearest_neighbors(&self.pool, query_vec, k).await?;

			Ok(rows
				.into_iter()
				.map(|row| Neighbor { document_id: row.document_id, distance: row.distance })
				.collect())
		})
	}
}

impl TagStore for Db {
	fn all_tags<'a>(&'a self) -> BoxFuture<'a, color_eyre::Result<Vec<Tag>>> {
		Box::pin(async move {
			let rows = lode_storage::queries::all_tags(&self.pool).await?;

			Ok(rows.into_iter().map(|row| Tag { tag_id: row.tag_id, name: row.name }).collect())
		})
	}
}

impl DocumentStore for Db {
	fn documents_by_ids<'a>(
		&'a self,
		ids: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Document>>> {
		Box::pin(async move {
			let rows = lode_storage::queries::documents_by_ids(&self.pool, ids).await?;

			Ok(rows
				.into_iter()
				.map(|row| Document {
					document_id: row.document_id,
					text: row.text,
					tag_ids: row.tag_ids,
				})
				.collect())
		})
	}
}
