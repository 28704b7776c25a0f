use lode_config::SimilarityBand;

/// Cosine distance, `1 - q.t / (|q| |t|)`. Zero-norm vectors compare as
/// maximally distant rather than dividing by zero.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
	let mut dot = 0.0f32;
	let mut norm_a = 0.0f32;
	let mut norm_b = 0.0f32;

	for (x, y) in a.iter().zip(b.iter()) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 1.0;
	}

	1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Maps a distance onto the 0-100% similarity scale. Distances at or below
/// the band minimum clamp to 100%, at or above the band maximum to 0%.
pub fn similarity_percent(distance: f32, band: &SimilarityBand) -> f32 {
	let raw = (band.max_distance - distance) / (band.max_distance - band.min_distance) * 100.0;

	raw.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn band() -> SimilarityBand {
		SimilarityBand::default()
	}

	#[test]
	fn identical_vectors_have_zero_distance() {
		let v = [0.3, 0.4, 0.5];

		assert!(cosine_distance(&v, &v).abs() < 1e-6);
	}

	#[test]
	fn orthogonal_vectors_have_unit_distance() {
		assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
	}

	#[test]
	fn zero_norm_is_maximally_distant() {
		assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
	}

	#[test]
	fn percent_is_non_increasing_in_distance() {
		let band = band();
		let mut last = f32::INFINITY;

		for step in 0..=30 {
			let distance = 0.40 + step as f32 * 0.02;
			let percent = similarity_percent(distance, &band);

			assert!(percent <= last);

			last = percent;
		}
	}

	#[test]
	fn percent_clamps_outside_the_band() {
		let band = band();

		assert_eq!(similarity_percent(0.30, &band), 100.0);
		assert_eq!(similarity_percent(0.90, &band), 0.0);
	}

	#[test]
	fn percent_maps_known_points() {
		let band = band();

		assert_eq!(similarity_percent(0.50, &band), 100.0);
		assert!((similarity_percent(0.60, &band) - 54.545).abs() < 0.01);
		assert_eq!(similarity_percent(0.72, &band), 0.0);
	}
}
