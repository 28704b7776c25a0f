use sqlx::PgPool;
use uuid::Uuid;

use crate::{
	Result,
	models::{DocumentRow, NeighborRow, TagRow},
};

/// Nearest candidates by cosine distance, ascending. `k` is bounded by the
/// caller; the candidate store itself imposes no cap.
pub async fn nearest_neighbors(
	pool: &PgPool,
	query_vec: &[f32],
	k: u32,
) -> Result<Vec<NeighborRow>> {
	let vec_text = vector_to_pg(query_vec);
	let rows = sqlx::query_as::<_, NeighborRow>(
		"\
SELECT
	document_id,
	(vec <=> $1::text::vector)::real AS distance
FROM document_embeddings
ORDER BY distance
LIMIT $2",
	)
	.bind(vec_text.as_str())
	.bind(i64::from(k))
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn all_tags(pool: &PgPool) -> Result<Vec<TagRow>> {
	let rows = sqlx::query_as::<_, TagRow>("SELECT tag_id, name FROM tags ORDER BY tag_id")
		.fetch_all(pool)
		.await?;

	Ok(rows)
}

pub async fn documents_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<DocumentRow>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let rows = sqlx::query_as::<_, DocumentRow>(
		"\
SELECT
	d.document_id,
	d.text,
	d.created_at,
	COALESCE(
		array_agg(dt.tag_id) FILTER (WHERE dt.tag_id IS NOT NULL),
		'{}'
	) AS tag_ids
FROM documents d
LEFT JOIN document_tags dt ON dt.document_id = d.document_id
WHERE d.document_id = ANY($1)
GROUP BY d.document_id, d.text, d.created_at",
	)
	.bind(ids)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);
	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}
		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pg_vector_text_is_bracketed_and_comma_separated() {
		assert_eq!(vector_to_pg(&[0.5, -1.0, 2.0]), "[0.5,-1,2]");
		assert_eq!(vector_to_pg(&[]), "[]");
	}
}
