//! Viewer favorite marks for a ranked page.

use std::collections::HashSet;

use uuid::Uuid;

use pawfind_domain::ListingRecord;

use crate::{FetchError, PawfindService, Result};

/// Listing ids a viewer has favorited, read once per cycle.
pub type FavoriteIdSet = HashSet<Uuid>;

impl PawfindService {
	/// Anonymous viewers have no favorites, so no fetch is issued for them.
	pub(crate) async fn load_favorites(
		&self,
		viewer_id: Option<Uuid>,
	) -> Result<Option<FavoriteIdSet>, FetchError> {
		let Some(viewer_id) = viewer_id else {
			return Ok(None);
		};
		let favorites = self.bounded(self.store.fetch_favorite_ids(viewer_id)).await?;

		Ok(Some(favorites))
	}
}

pub fn is_favorite(favorites: Option<&FavoriteIdSet>, listing_id: &Uuid) -> bool {
	favorites.is_some_and(|favorites| favorites.contains(listing_id))
}

/// One flag per record, in page order.
pub fn annotate(records: &[ListingRecord], favorites: Option<&FavoriteIdSet>) -> Vec<bool> {
	records.iter().map(|record| is_favorite(favorites, &record.id)).collect()
}
