use std::sync::Arc;

use pawfind_service::{PawfindService, PgRecordStore};
use pawfind_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PawfindService>,
}
impl AppState {
	pub async fn new(config: pawfind_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let store = Arc::new(PgRecordStore::new(db));

		Ok(Self::from_service(PawfindService::new(config, store)))
	}

	pub fn from_service(service: PawfindService) -> Self {
		Self { service: Arc::new(service) }
	}
}
