use crate::RankedDoc;

/// Lowers the boosted distance of candidates sharing tags with the query,
/// one `weight` per shared tag, then re-sorts ascending. The sort is
/// stable so untouched candidates keep their retrieval order.
pub fn apply_tag_boost<T>(
	mut candidates: Vec<RankedDoc<T>>,
	matched_tag_ids: &[i32],
	weight: f32,
) -> Vec<RankedDoc<T>> {
	if matched_tag_ids.is_empty() {
		return candidates;
	}

	for candidate in &mut candidates {
		let shared =
			candidate.tag_ids.iter().filter(|id| matched_tag_ids.contains(id)).count();

		if shared > 0 {
			candidate.boosted =
				(candidate.distance - shared as f32 * weight).clamp(0.0, 100.0);
		}
	}

	candidates.sort_by(|a, b| a.boosted.total_cmp(&b.boosted));

	candidates
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ranked(item: &'static str, tag_ids: Vec<i32>, distance: f32) -> RankedDoc<&'static str> {
		RankedDoc::new(item, tag_ids, distance)
	}

	#[test]
	fn boost_scales_with_shared_tag_count() {
		let candidates = vec![
			ranked("one-tag", vec![1], 0.60),
			ranked("two-tags", vec![1, 2], 0.60),
			ranked("no-tags", vec![], 0.60),
		];
		let boosted = apply_tag_boost(candidates, &[1, 2], 0.1);

		assert_eq!(boosted[0].item, "two-tags");
		assert!((boosted[0].boosted - 0.40).abs() < 1e-6);
		assert_eq!(boosted[1].item, "one-tag");
		assert!((boosted[1].boosted - 0.50).abs() < 1e-6);
		assert_eq!(boosted[2].item, "no-tags");
		assert_eq!(boosted[2].boosted, 0.60);
	}

	#[test]
	fn boost_never_increases_or_goes_negative() {
		let candidates = vec![ranked("near-zero", vec![1, 2, 3], 0.05)];
		let boosted = apply_tag_boost(candidates, &[1, 2, 3], 0.1);

		assert_eq!(boosted[0].boosted, 0.0);
		assert!(boosted[0].boosted <= boosted[0].distance);
	}

	#[test]
	fn no_matched_tags_leaves_order_untouched() {
		let candidates = vec![ranked("b", vec![5], 0.70), ranked("a", vec![6], 0.40)];
		let boosted = apply_tag_boost(candidates, &[], 0.1);

		assert_eq!(boosted[0].item, "b");
		assert_eq!(boosted[1].item, "a");
	}

	#[test]
	fn ties_preserve_retrieval_order() {
		let candidates = vec![
			ranked("first", vec![], 0.55),
			ranked("second", vec![], 0.55),
			ranked("boosted", vec![9], 0.65),
		];
		let boosted = apply_tag_boost(candidates, &[9], 0.1);

		assert_eq!(boosted[0].item, "first");
		assert_eq!(boosted[1].item, "second");
		assert_eq!(boosted[2].item, "boosted");
	}
}
