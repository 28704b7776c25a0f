use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRow {
	pub document_id: Uuid,
	pub text: String,
	pub created_at: OffsetDateTime,
	pub tag_ids: Vec<i32>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagRow {
	pub tag_id: i32,
	pub name: String,
}

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct NeighborRow {
	pub document_id: Uuid,
	pub distance: f32,
}
