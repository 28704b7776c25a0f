use std::sync::Arc;

use lode_service::{LodeService, RateLimiter};
use lode_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LodeService>,
	pub rate_limiter: Arc<RateLimiter>,
}
impl AppState {
	pub async fn new(config: lode_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.providers.embedding.dimensions).await?;

		let service = LodeService::new(config, db);

		Ok(Self { service: Arc::new(service), rate_limiter: Arc::new(RateLimiter::new()) })
	}

	pub fn with_service(service: LodeService) -> Self {
		Self { service: Arc::new(service), rate_limiter: Arc::new(RateLimiter::new()) }
	}
}
