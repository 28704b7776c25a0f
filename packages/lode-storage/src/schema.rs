const SCHEMA: &str = "\
CREATE EXTENSION IF NOT EXISTS vector;

CREATE TABLE IF NOT EXISTS documents (
	document_id UUID PRIMARY KEY,
	text TEXT NOT NULL,
	created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS tags (
	tag_id SERIAL PRIMARY KEY,
	name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS document_tags (
	document_id UUID NOT NULL REFERENCES documents (document_id) ON DELETE CASCADE,
	tag_id INT NOT NULL REFERENCES tags (tag_id) ON DELETE CASCADE,
	PRIMARY KEY (document_id, tag_id)
);

CREATE TABLE IF NOT EXISTS document_embeddings (
	document_id UUID PRIMARY KEY REFERENCES documents (document_id) ON DELETE CASCADE,
	vec VECTOR(<VECTOR_DIM>) NOT NULL,
	created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

pub fn render_schema(vector_dim: u32) -> String {
	SCHEMA.replace("<VECTOR_DIM>", &vector_dim.to_string())
}
