use chrono::NaiveDate;

use super::aggregate::{windowed_reduce, DailyReducer, DomainAggregator, WindowedSeries};
use super::catalog::FreightMetric;
use super::range::ResolvedRange;
use super::scope::FreightScope;
use super::store::{DailyCount, LoadRow, MetricsStore, StoreError};

#[derive(Debug, Default)]
pub(crate) struct LoadTotals {
    billed: f64,
    cost: f64,
    miles: f64,
}

/// Freight formulas computed from individual delivered loads. Load counts
/// come from a grouped read instead and have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadFormula {
    MarginPct,
    Rpm,
    GrossRevenue,
}

pub(crate) struct LoadReducer(pub(crate) LoadFormula);

impl DailyReducer for LoadReducer {
    type Row = LoadRow;
    type Acc = LoadTotals;

    fn day(&self, row: &LoadRow) -> Option<NaiveDate> {
        row.billing_day
    }

    fn fold(&self, acc: &mut LoadTotals, row: &LoadRow) {
        acc.billed += row.bill_amount.unwrap_or(0.0);
        acc.cost += row.cost_amount.unwrap_or(0.0);
        acc.miles += row.miles.unwrap_or(0.0);
    }

    fn finish(&self, acc: LoadTotals) -> f64 {
        match self.0 {
            LoadFormula::MarginPct if acc.billed > 0.0 => (acc.billed - acc.cost) / acc.billed,
            LoadFormula::Rpm if acc.miles > 0.0 => acc.billed / acc.miles,
            LoadFormula::MarginPct | LoadFormula::Rpm => 0.0,
            LoadFormula::GrossRevenue => acc.billed,
        }
    }
}

pub(crate) struct LoadCountReducer;

impl DailyReducer for LoadCountReducer {
    type Row = DailyCount;
    type Acc = i64;

    fn day(&self, row: &DailyCount) -> Option<NaiveDate> {
        row.day
    }

    fn fold(&self, acc: &mut i64, row: &DailyCount) {
        *acc += row.count;
    }

    fn finish(&self, acc: i64) -> f64 {
        acc as f64
    }
}

impl DomainAggregator for FreightMetric {
    type Scope = FreightScope;

    async fn aggregate<S: MetricsStore>(
        &self,
        store: &S,
        scope: &FreightScope,
        range: &ResolvedRange,
    ) -> Result<WindowedSeries, StoreError> {
        let formula = match *self {
            FreightMetric::MarginPct => LoadFormula::MarginPct,
            FreightMetric::Rpm => LoadFormula::Rpm,
            FreightMetric::GrossRevenue => LoadFormula::GrossRevenue,
            FreightMetric::LoadsCount => {
                return windowed_reduce(range, &LoadCountReducer, |window| {
                    store.delivered_load_counts(scope, window)
                })
                .await;
            }
        };
        windowed_reduce(range, &LoadReducer(formula), |window| {
            store.delivered_loads(scope, window)
        })
        .await
    }
}
