use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::future::Future;

use super::range::{DayWindow, ResolvedRange};
use super::store::{MetricsStore, StoreError};

pub type DailyValues = BTreeMap<NaiveDate, f64>;

/// Per-day values for the current and comparison windows. Days without
/// contributing rows are absent, not zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowedSeries {
    pub current: DailyValues,
    pub comparison: DailyValues,
}

/// Folds raw rows into one number per calendar day.
pub trait DailyReducer {
    type Row;
    type Acc: Default;

    /// Grouping day for `row`; `None` drops the row entirely.
    fn day(&self, row: &Self::Row) -> Option<NaiveDate>;

    fn fold(&self, acc: &mut Self::Acc, row: &Self::Row);

    fn finish(&self, acc: Self::Acc) -> f64;
}

pub fn reduce_by_day<R: DailyReducer>(reducer: &R, rows: &[R::Row]) -> DailyValues {
    let mut by_day: BTreeMap<NaiveDate, R::Acc> = BTreeMap::new();
    for row in rows {
        let Some(day) = reducer.day(row) else {
            continue;
        };
        reducer.fold(by_day.entry(day).or_default(), row);
    }
    by_day
        .into_iter()
        .map(|(day, acc)| (day, reducer.finish(acc)))
        .collect()
}

/// Fetches the current and comparison windows concurrently, then reduces each
/// by day. Either fetch failing fails the whole call.
pub async fn windowed_reduce<R, F, Fut>(
    range: &ResolvedRange,
    reducer: &R,
    fetch: F,
) -> Result<WindowedSeries, StoreError>
where
    R: DailyReducer,
    F: Fn(DayWindow) -> Fut,
    Fut: Future<Output = Result<Vec<R::Row>, StoreError>>,
{
    let (current, comparison) = tokio::try_join!(
        fetch(range.current_window()),
        fetch(range.comparison_window())
    )?;
    Ok(WindowedSeries {
        current: reduce_by_day(reducer, &current),
        comparison: reduce_by_day(reducer, &comparison),
    })
}

/// A metric family that can produce windowed daily values from its own typed
/// scope.
pub trait DomainAggregator {
    type Scope;

    fn aggregate<S: MetricsStore>(
        &self,
        store: &S,
        scope: &Self::Scope,
        range: &ResolvedRange,
    ) -> impl Future<Output = Result<WindowedSeries, StoreError>> + Send;
}
