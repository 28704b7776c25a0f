use lode_config::ThresholdLadder;

/// Picks the acceptance cutoff from the quality of the best raw distance.
/// The closer the best candidate, the stricter the cutoff; with no
/// candidates at all the ladder's empty default applies.
pub fn acceptance_cutoff(distances: &[f32], ladder: &ThresholdLadder) -> f32 {
	let Some(min_distance) = distances
		.iter()
		.copied()
		.filter(|distance| distance.is_finite())
		.min_by(f32::total_cmp)
	else {
		return ladder.empty_cutoff;
	};

	if min_distance < ladder.excellent_below {
		ladder.excellent_cutoff
	} else if min_distance < ladder.good_below {
		ladder.good_cutoff
	} else if min_distance < ladder.decent_below {
		ladder.decent_cutoff
	} else {
		ladder.poor_cutoff
	}
}
