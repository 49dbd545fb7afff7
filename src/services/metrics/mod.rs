//! Comparative daily series for the ops dashboard.
//!
//! A request resolves a date-range preset into a current and a comparison
//! window, routes the metric key to its domain aggregator, and zero-fills the
//! reduced maps onto one point per day of the current window.

pub mod aggregate;
pub mod assemble;
pub mod bpo;
pub mod catalog;
pub mod freight;
pub mod hotel;
pub mod range;
pub mod scope;
pub mod skeleton;
pub mod store;

use chrono::NaiveDate;

pub use aggregate::{DailyValues, DomainAggregator, WindowedSeries};
pub use assemble::MetricSeriesPoint;
pub use catalog::{catalog, MetricDescriptor, MetricKey};
pub use range::{DateRangeKey, ResolvedRange};
pub use scope::ScopeRequest;
pub use store::{MetricsStore, PgMetricsStore, StoreError};

use crate::auth::AuthenticatedUser;

#[derive(Debug, Clone)]
pub struct SeriesRequest {
    pub metric: String,
    pub date_range: DateRangeKey,
    pub scope: ScopeRequest,
}

/// Routes the metric to its domain, fetching only with that domain's scope.
/// Unknown metrics produce empty maps without touching the store.
async fn route_metric<S: MetricsStore>(
    store: &S,
    user: &AuthenticatedUser,
    metric: &str,
    scope: &ScopeRequest,
    range: &ResolvedRange,
) -> Result<WindowedSeries, StoreError> {
    match MetricKey::parse(metric) {
        Some(MetricKey::Freight(metric)) => {
            metric
                .aggregate(store, &scope::freight_scope(user, scope), range)
                .await
        }
        Some(MetricKey::Hotel(metric)) => {
            metric
                .aggregate(store, &scope::hotel_scope(user, scope), range)
                .await
        }
        Some(MetricKey::Bpo(metric)) => {
            metric
                .aggregate(store, &scope::bpo_scope(user, scope), range)
                .await
        }
        None => {
            tracing::debug!(metric, "unrecognized metric key; returning zero series");
            Ok(WindowedSeries::default())
        }
    }
}

/// Computes the series for `today` (a calendar day in the reporting zone).
pub async fn compute_series<S: MetricsStore>(
    store: &S,
    user: &AuthenticatedUser,
    request: &SeriesRequest,
    today: NaiveDate,
) -> Result<Vec<MetricSeriesPoint>, StoreError> {
    let range = ResolvedRange::resolve(request.date_range, today);
    let series = route_metric(store, user, &request.metric, &request.scope, &range).await?;
    let days = skeleton::build_skeleton(range.current_start, range.current_end);
    Ok(assemble::assemble(&days, &series.current, &series.comparison))
}
