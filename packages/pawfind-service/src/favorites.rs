use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, PawfindService, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleFavoriteRequest {
	#[serde(default)]
	pub viewer_id: Option<Uuid>,
	pub listing_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleFavoriteResponse {
	pub listing_id: Uuid,
	/// State held by the store after the toggle.
	pub favorite: bool,
}

impl PawfindService {
	pub async fn toggle_favorite(&self, req: ToggleFavoriteRequest) -> Result<ToggleFavoriteResponse> {
		let Some(viewer_id) = req.viewer_id else {
			return Err(Error::InvalidRequest {
				field: "viewer_id",
				message: "viewer_id is required to toggle a favorite.".to_string(),
			});
		};
		let favorite = self.store.toggle_favorite(viewer_id, req.listing_id).await?;

		tracing::info!(%viewer_id, listing_id = %req.listing_id, favorite, "Favorite toggled.");

		Ok(ToggleFavoriteResponse { listing_id: req.listing_id, favorite })
	}
}
