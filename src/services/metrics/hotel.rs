use chrono::NaiveDate;

use super::aggregate::{windowed_reduce, DailyReducer, DomainAggregator, WindowedSeries};
use super::catalog::HotelMetric;
use super::range::ResolvedRange;
use super::scope::HotelScope;
use super::store::{HotelKpiRow, MetricsStore, StoreError};

/// Sums the selected KPI column across every property row for the day.
pub(crate) struct KpiColumnReducer(pub(crate) HotelMetric);

impl KpiColumnReducer {
    fn column(&self, row: &HotelKpiRow) -> Option<f64> {
        match self.0 {
            HotelMetric::Revpar => row.revpar,
            HotelMetric::Adr => row.adr,
            HotelMetric::OccupancyPct => row.occupancy_pct,
            HotelMetric::TotalRevenue => row.total_revenue,
        }
    }
}

impl DailyReducer for KpiColumnReducer {
    type Row = HotelKpiRow;
    type Acc = f64;

    fn day(&self, row: &HotelKpiRow) -> Option<NaiveDate> {
        Some(row.date)
    }

    fn fold(&self, acc: &mut f64, row: &HotelKpiRow) {
        *acc += self.column(row).unwrap_or(0.0);
    }

    fn finish(&self, acc: f64) -> f64 {
        acc
    }
}

impl DomainAggregator for HotelMetric {
    type Scope = HotelScope;

    async fn aggregate<S: MetricsStore>(
        &self,
        store: &S,
        scope: &HotelScope,
        range: &ResolvedRange,
    ) -> Result<WindowedSeries, StoreError> {
        windowed_reduce(range, &KpiColumnReducer(*self), |window| {
            store.hotel_kpi_rows(scope, window)
        })
        .await
    }
}
