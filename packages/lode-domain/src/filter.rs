use lode_config::SimilarityBand;

use crate::{RankedDoc, similarity};

#[derive(Clone, Debug)]
pub struct AcceptedDoc<T> {
	pub item: T,
	pub distance: f32,
	pub similarity: f32,
}

/// Accepted results in ascending-distance order plus the rejects, kept
/// around for diagnostics only.
#[derive(Clone, Debug)]
pub struct FilterOutcome<T> {
	pub accepted: Vec<AcceptedDoc<T>>,
	pub rejected: Vec<RankedDoc<T>>,
}

/// Accepts a candidate iff its boosted distance is within the cutoff and
/// its similarity percentage clears the caller's floor, when one is set.
pub fn filter_candidates<T>(
	candidates: Vec<RankedDoc<T>>,
	cutoff: f32,
	min_similarity: Option<f32>,
	band: &SimilarityBand,
) -> FilterOutcome<T> {
	let mut accepted = Vec::new();
	let mut rejected = Vec::new();

	for candidate in candidates {
		let percent = similarity::similarity_percent(candidate.boosted, band);
		let clears_floor = min_similarity.map(|floor| percent >= floor).unwrap_or(true);

		if candidate.boosted <= cutoff && clears_floor {
			accepted.push(AcceptedDoc {
				item: candidate.item,
				distance: candidate.boosted,
				similarity: percent,
			});
		} else {
			rejected.push(candidate);
		}
	}

	FilterOutcome { accepted, rejected }
}
