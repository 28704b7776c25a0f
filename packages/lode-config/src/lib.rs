mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Compromise, Config, EmbeddingProviderConfig, Postgres, Providers, RateLimit, Search,
	SearchCache, Service, SimilarityBand, Storage, TagMatch, ThresholdLadder,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.search.max_candidates == 0 {
		return Err(Error::Validation {
			message: "search.max_candidates must be greater than zero.".to_string(),
		});
	}
	if !(0.0..=100.0).contains(&cfg.search.min_similarity) {
		return Err(Error::Validation {
			message: "search.min_similarity must be in the range 0-100.".to_string(),
		});
	}
	if cfg.search.band.max_distance <= cfg.search.band.min_distance {
		return Err(Error::Validation {
			message: "search.band.max_distance must be greater than search.band.min_distance."
				.to_string(),
		});
	}

	for (label, value) in [
		("search.tags.distance_cutoff", cfg.search.tags.distance_cutoff),
		("search.tags.boost_weight", cfg.search.tags.boost_weight),
		("search.band.max_distance", cfg.search.band.max_distance),
		("search.band.min_distance", cfg.search.band.min_distance),
	] {
		if !value.is_finite() || value < 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be a finite non-negative number."),
			});
		}
	}

	let ladder = &cfg.search.thresholds;

	for (label, value) in [
		("search.thresholds.excellent_cutoff", ladder.excellent_cutoff),
		("search.thresholds.good_cutoff", ladder.good_cutoff),
		("search.thresholds.decent_cutoff", ladder.decent_cutoff),
		("search.thresholds.poor_cutoff", ladder.poor_cutoff),
		("search.thresholds.empty_cutoff", ladder.empty_cutoff),
	] {
		if !value.is_finite() || value <= 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be a finite positive number."),
			});
		}
	}

	if !(ladder.excellent_below < ladder.good_below && ladder.good_below < ladder.decent_below) {
		return Err(Error::Validation {
			message: "search.thresholds tier boundaries must be strictly ascending.".to_string(),
		});
	}
	if cfg.search.compromise.step <= 0.0 {
		return Err(Error::Validation {
			message: "search.compromise.step must be greater than zero.".to_string(),
		});
	}
	if !(0.0..=100.0).contains(&cfg.search.compromise.min_floor) {
		return Err(Error::Validation {
			message: "search.compromise.min_floor must be in the range 0-100.".to_string(),
		});
	}
	if cfg.search.compromise.max_results == 0 {
		return Err(Error::Validation {
			message: "search.compromise.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.search.cache.max_size == 0 {
		return Err(Error::Validation {
			message: "search.cache.max_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.cache.ttl_seconds == 0 {
		return Err(Error::Validation {
			message: "search.cache.ttl_seconds must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("rate_limit.route_max_requests", cfg.rate_limit.route_max_requests),
		("rate_limit.search_max_requests", cfg.rate_limit.search_max_requests),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	for (label, value) in [
		("rate_limit.route_window_seconds", cfg.rate_limit.route_window_seconds),
		("rate_limit.search_window_seconds", cfg.rate_limit.search_window_seconds),
		("rate_limit.idle_entry_seconds", cfg.rate_limit.idle_entry_seconds),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.search.ignore_words = cfg
		.search
		.ignore_words
		.iter()
		.map(|word| word.trim().to_lowercase())
		.filter(|word| !word.is_empty())
		.collect();
}
