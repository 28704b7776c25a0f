use crate::{Error, LodeService, Result};
use lode_domain::similarity;

impl LodeService {
	/// Tags whose name embedding sits close to the query embedding, best
	/// first, capped at `max_similar` and gated on the distance cutoff.
	/// Tag names are encoded in small batches to bound provider payloads.
	pub(crate) async fn find_similar_tags(&self, query_vec: &[f32]) -> Result<Vec<i32>> {
		let tags = self
			.tags
			.all_tags()
			.await
			.map_err(|err| Error::Retrieval { message: err.to_string() })?;

		if tags.is_empty() {
			tracing::debug!("No tags available, skipping tag matching.");

			return Ok(Vec::new());
		}

		let names: Vec<String> = tags.iter().map(|tag| tag.name.clone()).collect();
		let batch_size = (self.cfg.search.tags.encode_batch_size as usize).max(1);
		let mut vectors = Vec::with_capacity(names.len());

		for batch in names.chunks(batch_size) {
			let encoded = self
				.providers
				.encoder
				.embed(&self.cfg.providers.embedding, batch)
				.await
				.map_err(|err| Error::Encoding { message: err.to_string() })?;

			vectors.extend(encoded);
		}

		if vectors.len() != tags.len() {
			return Err(Error::Encoding {
				message: format!(
					"Encoder returned {} vectors for {} tag names.",
					vectors.len(),
					tags.len()
				),
			});
		}

		let mut scored: Vec<(f32, i32, &str)> = tags
			.iter()
			.zip(vectors.iter())
			.map(|(tag, vector)| {
				(similarity::cosine_distance(query_vec, vector), tag.tag_id, tag.name.as_str())
			})
			.collect();

		scored.sort_by(|a, b| a.0.total_cmp(&b.0));

		let cutoff = self.cfg.search.tags.distance_cutoff;
		let matched: Vec<i32> = scored
			.iter()
			.take(self.cfg.search.tags.max_similar as usize)
			.filter(|(distance, _, _)| *distance < cutoff)
			.map(|(_, tag_id, _)| *tag_id)
			.collect();

		if matched.is_empty() {
			tracing::debug!("No sufficiently similar tags found.");
		} else {
			let names: Vec<&str> = scored
				.iter()
				.take(self.cfg.search.tags.max_similar as usize)
				.filter(|(distance, _, _)| *distance < cutoff)
				.map(|(_, _, name)| *name)
				.collect();

			tracing::debug!(?names, "Matched similar tags.");
		}

		Ok(matched)
	}
}
