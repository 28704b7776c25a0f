use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub rate_limit: RateLimit,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub max_candidates: u32,
	/// Initial similarity floor in percent. Results below it only surface
	/// through compromise mode.
	pub min_similarity: f32,
	/// Words stripped from the query before encoding. If stripping removes
	/// everything, the original query is encoded instead.
	pub ignore_words: Vec<String>,
	pub tags: TagMatch,
	pub band: SimilarityBand,
	pub thresholds: ThresholdLadder,
	pub compromise: Compromise,
	pub cache: SearchCache,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			max_candidates: 30,
			min_similarity: 85.0,
			ignore_words: Vec::new(),
			tags: TagMatch::default(),
			band: SimilarityBand::default(),
			thresholds: ThresholdLadder::default(),
			compromise: Compromise::default(),
			cache: SearchCache::default(),
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TagMatch {
	pub max_similar: u32,
	pub distance_cutoff: f32,
	pub boost_weight: f32,
	pub encode_batch_size: u32,
}
impl Default for TagMatch {
	fn default() -> Self {
		Self { max_similar: 3, distance_cutoff: 0.7, boost_weight: 0.1, encode_batch_size: 10 }
	}
}

/// Distance band mapped onto the 0-100% similarity scale.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimilarityBand {
	pub max_distance: f32,
	pub min_distance: f32,
}
impl Default for SimilarityBand {
	fn default() -> Self {
		Self { max_distance: 0.72, min_distance: 0.50 }
	}
}

/// Acceptance cutoff ladder keyed on the best raw distance in the
/// candidate set. A close best match tightens the cutoff, a mediocre one
/// loosens it.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThresholdLadder {
	pub excellent_below: f32,
	pub excellent_cutoff: f32,
	pub good_below: f32,
	pub good_cutoff: f32,
	pub decent_below: f32,
	pub decent_cutoff: f32,
	pub poor_cutoff: f32,
	pub empty_cutoff: f32,
}
impl Default for ThresholdLadder {
	fn default() -> Self {
		Self {
			excellent_below: 0.55,
			excellent_cutoff: 0.65,
			good_below: 0.60,
			good_cutoff: 0.68,
			decent_below: 0.65,
			decent_cutoff: 0.70,
			poor_cutoff: 0.72,
			empty_cutoff: 0.70,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Compromise {
	/// Floor reduction per attempt, in percentage points.
	pub step: f32,
	pub min_floor: f32,
	/// Result cap applied once at least one reduction has happened.
	pub max_results: u32,
}
impl Default for Compromise {
	fn default() -> Self {
		Self { step: 5.0, min_floor: 30.0, max_results: 3 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchCache {
	pub enabled: bool,
	pub max_size: u32,
	pub ttl_seconds: u64,
}
impl Default for SearchCache {
	fn default() -> Self {
		Self { enabled: true, max_size: 100, ttl_seconds: 300 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RateLimit {
	pub route_max_requests: u32,
	pub route_window_seconds: u64,
	pub search_max_requests: u32,
	pub search_window_seconds: u64,
	/// Keys with no admission newer than this are dropped by the periodic
	/// sweep.
	pub idle_entry_seconds: u64,
}
impl Default for RateLimit {
	fn default() -> Self {
		Self {
			route_max_requests: 20,
			route_window_seconds: 60,
			search_max_requests: 10,
			search_window_seconds: 60,
			idle_entry_seconds: 3_600,
		}
	}
}
