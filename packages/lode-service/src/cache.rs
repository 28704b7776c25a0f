use std::{
	sync::Mutex,
	time::{Duration, Instant},
};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

type CacheKey = [u8; 16];

/// TTL plus capacity bounded memo for search results. Keys are derived
/// from the normalized query text so repeats differing only in case or
/// surrounding whitespace hit. One mutex serializes every operation.
pub struct SearchCache<V> {
	inner: Mutex<AHashMap<CacheKey, CacheEntry<V>>>,
	max_size: usize,
	ttl: Duration,
}

struct CacheEntry<V> {
	value: V,
	inserted_at: Instant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheStats {
	pub size: usize,
	pub max_size: usize,
	pub ttl_seconds: u64,
}

pub fn normalize_query(query: &str) -> String {
	query.trim().to_lowercase()
}

fn cache_key(query: &str) -> CacheKey {
	let digest = blake3::hash(normalize_query(query).as_bytes());
	let mut key = [0u8; 16];

	key.copy_from_slice(&digest.as_bytes()[..16]);

	key
}

impl<V> SearchCache<V>
where
	V: Clone,
{
	pub fn new(cfg: &lode_config::SearchCache) -> Self {
		Self {
			inner: Mutex::new(AHashMap::new()),
			max_size: cfg.max_size as usize,
			ttl: Duration::from_secs(cfg.ttl_seconds),
		}
	}

	pub fn get(&self, query: &str) -> Option<V> {
		self.get_at(query, Instant::now())
	}

	pub fn set(&self, query: &str, value: V) {
		self.set_at(query, value, Instant::now());
	}

	fn get_at(&self, query: &str, now: Instant) -> Option<V> {
		let key = cache_key(query);
		let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		let entry = inner.get(&key)?;

		if now.duration_since(entry.inserted_at) > self.ttl {
			inner.remove(&key);

			return None;
		}

		Some(entry.value.clone())
	}

	fn set_at(&self, query: &str, value: V, now: Instant) {
		let key = cache_key(query);
		let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

		if !inner.contains_key(&key) && inner.len() >= self.max_size {
			let oldest = inner
				.iter()
				.min_by_key(|(_, entry)| entry.inserted_at)
				.map(|(key, _)| *key);

			if let Some(oldest) = oldest {
				inner.remove(&oldest);
			}
		}

		inner.insert(key, CacheEntry { value, inserted_at: now });
	}

	pub fn clear(&self) {
		self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clear();
	}

	pub fn stats(&self) -> CacheStats {
		let inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

		CacheStats {
			size: inner.len(),
			max_size: self.max_size,
			ttl_seconds: self.ttl.as_secs(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cache(max_size: u32, ttl_seconds: u64) -> SearchCache<String> {
		SearchCache::new(&lode_config::SearchCache { enabled: true, max_size, ttl_seconds })
	}

	#[test]
	fn round_trip_hits_on_identical_text() {
		let cache = cache(10, 300);

		cache.set("what is a lode", "value".to_string());

		assert_eq!(cache.get("what is a lode").as_deref(), Some("value"));
	}

	#[test]
	fn key_ignores_case_and_surrounding_whitespace() {
		let cache = cache(10, 300);

		cache.set("What Is A Lode", "value".to_string());

		assert_eq!(cache.get("  what is a lode \n").as_deref(), Some("value"));
		assert!(cache.get("what is a  lode").is_none());
	}

	#[test]
	fn expired_entries_report_a_miss_and_are_removed() {
		let cache = cache(10, 300);
		let base = Instant::now();

		cache.set_at("query", "value".to_string(), base);

		let later = base + Duration::from_secs(301);

		assert!(cache.get_at("query", later).is_none());
		assert_eq!(cache.stats().size, 0);
	}

	#[test]
	fn entries_within_ttl_still_hit() {
		let cache = cache(10, 300);
		let base = Instant::now();

		cache.set_at("query", "value".to_string(), base);

		assert!(cache.get_at("query", base + Duration::from_secs(299)).is_some());
	}

	#[test]
	fn capacity_overflow_evicts_exactly_the_oldest_entry() {
		let cache = cache(3, 300);
		let base = Instant::now();

		cache.set_at("first", "1".to_string(), base);
		cache.set_at("second", "2".to_string(), base + Duration::from_secs(1));
		cache.set_at("third", "3".to_string(), base + Duration::from_secs(2));
		cache.set_at("fourth", "4".to_string(), base + Duration::from_secs(3));

		assert!(cache.get_at("first", base + Duration::from_secs(4)).is_none());
		assert!(cache.get_at("second", base + Duration::from_secs(4)).is_some());
		assert!(cache.get_at("third", base + Duration::from_secs(4)).is_some());
		assert!(cache.get_at("fourth", base + Duration::from_secs(4)).is_some());
	}

	#[test]
	fn overwriting_an_existing_key_does_not_evict() {
		let cache = cache(2, 300);
		let base = Instant::now();

		cache.set_at("a", "1".to_string(), base);
		cache.set_at("b", "2".to_string(), base + Duration::from_secs(1));
		cache.set_at("a", "3".to_string(), base + Duration::from_secs(2));

		assert_eq!(cache.get_at("a", base + Duration::from_secs(3)).as_deref(), Some("3"));
		assert_eq!(cache.get_at("b", base + Duration::from_secs(3)).as_deref(), Some("2"));
	}

	#[test]
	fn clear_empties_the_cache() {
		let cache = cache(10, 300);

		cache.set("query", "value".to_string());
		cache.clear();

		assert!(cache.get("query").is_none());
		assert_eq!(cache.stats().size, 0);
	}

	#[test]
	fn stats_reflect_configuration() {
		let cache = cache(42, 77);
		let stats = cache.stats();

		assert_eq!(stats.size, 0);
		assert_eq!(stats.max_size, 42);
		assert_eq!(stats.ttl_seconds, 77);
	}
}
