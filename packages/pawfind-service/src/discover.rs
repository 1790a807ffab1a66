use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawfind_domain::{
	FilterCriteria, ListingRecord, RawCriteria,
	filter::{self, FilterImpact},
	normalize, ranking,
};

use crate::{
	Author, CycleToken, FetchError, FetchPlan, PawfindService, Result, annotate, enrich, planner,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoverRequest {
	/// Absent for anonymous viewers.
	#[serde(default)]
	pub viewer_id: Option<Uuid>,
	#[serde(default)]
	pub criteria: RawCriteria,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredListing {
	#[serde(flatten)]
	pub listing: ListingRecord,
	pub favorite: bool,
	pub author: Author,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResponse {
	pub cycle: CycleToken,
	/// A newer cycle for the same viewer started before this one finished. Callers should discard
	/// a stale response.
	pub stale: bool,
	pub criteria: FilterCriteria,
	pub impact: FilterImpact,
	pub items: Vec<DiscoveredListing>,
}

impl PawfindService {
	pub async fn discover(&self, req: DiscoverRequest) -> Result<DiscoverResponse> {
		let (criteria, degraded) = normalize::normalize_with_report(&req.criteria);

		for field in degraded {
			tracing::debug!(?field, "Criteria value degraded to its default.");
		}

		self.run_cycle(req.viewer_id, criteria).await
	}

	/// Runs one discovery cycle for already canonical criteria.
	///
	/// Any record store failure fails the whole cycle: the caller gets the error and no items.
	pub async fn run_cycle(
		&self,
		viewer_id: Option<Uuid>,
		criteria: FilterCriteria,
	) -> Result<DiscoverResponse> {
		let cycle = self.cycles.begin(viewer_id);
		let plan = planner::plan(&criteria, self.cfg.discovery.max_limit);
		let (items, impact) = match self.execute(viewer_id, &criteria, &plan).await {
			Ok(outcome) => outcome,
			Err(err) => {
				self.cycles.finish(&cycle);

				tracing::warn!(error = %err, seq = cycle.seq, "Discovery cycle failed.");

				return Err(err.into());
			},
		};
		let stale = !self.cycles.finish(&cycle);

		tracing::info!(
			seq = cycle.seq,
			fetched = impact.fetched,
			dropped = impact.dropped_total(),
			kept = items.len(),
			stale,
			in_flight = self.cycles.in_flight(),
			"Discovery cycle completed."
		);

		Ok(DiscoverResponse { cycle, stale, criteria, impact, items })
	}

	async fn execute(
		&self,
		viewer_id: Option<Uuid>,
		criteria: &FilterCriteria,
		plan: &FetchPlan,
	) -> Result<(Vec<DiscoveredListing>, FilterImpact), FetchError> {
		let page = self.bounded(self.store.fetch_page(plan)).await?;
		let (mut records, impact) = filter::apply(page, criteria);

		ranking::rank(&mut records, criteria.sort, plan.client_sort_required);

		let author_ids = enrich::distinct_authors(&records);
		let (favorites, profiles) =
			tokio::try_join!(self.load_favorites(viewer_id), self.load_profiles(&author_ids))?;
		let authors = author_ids
			.into_iter()
			.map(|id| (id, enrich::resolve(id, profiles.get(&id))))
			.collect::<HashMap<_, _>>();
		let unresolved = authors.values().filter(|author| !author.resolved).count();

		if unresolved > 0 {
			tracing::debug!(unresolved, "Authors without a usable profile use the fallback name.");
		}

		let flags = annotate::annotate(&records, favorites.as_ref());
		let items = records
			.into_iter()
			.zip(flags)
			.map(|(listing, favorite)| {
				let author = match authors.get(&listing.author_id) {
					Some(author) => author.clone(),
					None => enrich::resolve(listing.author_id, None),
				};

				DiscoveredListing { listing, favorite, author }
			})
			.collect();

		Ok((items, impact))
	}
}
