use chrono::NaiveDate;

use super::aggregate::{windowed_reduce, DailyReducer, DomainAggregator, WindowedSeries};
use super::catalog::BpoMetric;
use super::range::ResolvedRange;
use super::scope::BpoScope;
use super::store::{BpoDailyRow, MetricsStore, StoreError};

/// Paid hours assumed per FTE per day.
const HOURS_PER_FTE: f64 = 8.0;

#[derive(Debug, Default)]
pub(crate) struct CallCenterTotals {
    calls: f64,
    hours: f64,
    qa_sum: f64,
    qa_count: u32,
    last_fte: Option<f64>,
}

pub(crate) struct CallCenterReducer(pub(crate) BpoMetric);

impl DailyReducer for CallCenterReducer {
    type Row = BpoDailyRow;
    type Acc = CallCenterTotals;

    fn day(&self, row: &BpoDailyRow) -> Option<NaiveDate> {
        // Unscored rows carry nothing for QA and must not dilute the mean.
        if self.0 == BpoMetric::QaScorePct && row.avg_qa_score.is_none() {
            return None;
        }
        Some(row.date)
    }

    fn fold(&self, acc: &mut CallCenterTotals, row: &BpoDailyRow) {
        let fte = row.fte_count.unwrap_or(1.0);
        acc.calls += row.handled_calls.unwrap_or(0.0);
        acc.hours += fte * HOURS_PER_FTE;
        if let Some(score) = row.avg_qa_score {
            acc.qa_sum += score;
            acc.qa_count += 1;
        }
        acc.last_fte = Some(fte);
    }

    fn finish(&self, acc: CallCenterTotals) -> f64 {
        match self.0 {
            BpoMetric::CallsPerHour if acc.hours > 0.0 => acc.calls / acc.hours,
            BpoMetric::CallsPerHour => 0.0,
            BpoMetric::ConnectedCalls => acc.calls,
            BpoMetric::QaScorePct if acc.qa_count > 0 => acc.qa_sum / f64::from(acc.qa_count),
            BpoMetric::QaScorePct => 0.0,
            BpoMetric::AttendancePct => acc.last_fte.unwrap_or(1.0),
        }
    }
}

impl DomainAggregator for BpoMetric {
    type Scope = BpoScope;

    async fn aggregate<S: MetricsStore>(
        &self,
        store: &S,
        scope: &BpoScope,
        range: &ResolvedRange,
    ) -> Result<WindowedSeries, StoreError> {
        windowed_reduce(range, &CallCenterReducer(*self), |window| {
            store.bpo_daily_metrics(scope, window)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::metrics::aggregate::reduce_by_day;
    use crate::services::metrics::range::DateRangeKey;
    use crate::services::metrics::scope::IdFilter;
    use crate::test_support::{MemoryStore, StoredBpoRow};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn row(
        day: NaiveDate,
        calls: Option<f64>,
        fte: Option<f64>,
        qa: Option<f64>,
    ) -> BpoDailyRow {
        BpoDailyRow {
            date: day,
            handled_calls: calls,
            fte_count: fte,
            avg_qa_score: qa,
        }
    }

    #[test]
    fn calls_per_hour_defaults_missing_fte_to_one() {
        let day = date(2024, 4, 1);
        let rows = vec![
            row(day, Some(160.0), Some(2.0), None),
            row(day, Some(80.0), None, None),
        ];
        let values = reduce_by_day(&CallCenterReducer(BpoMetric::CallsPerHour), &rows);
        // 240 calls over (2 + 1) * 8 hours.
        assert_eq!(values[&day], 10.0);
    }

    #[test]
    fn connected_calls_sums_handled() {
        let day = date(2024, 4, 2);
        let rows = vec![
            row(day, Some(12.0), Some(1.0), None),
            row(day, None, Some(1.0), None),
            row(day, Some(30.0), Some(3.0), Some(90.0)),
        ];
        let values = reduce_by_day(&CallCenterReducer(BpoMetric::ConnectedCalls), &rows);
        assert_eq!(values[&day], 42.0);
    }

    #[test]
    fn qa_score_averages_only_scored_rows() {
        let day = date(2024, 4, 3);
        let unscored_day = date(2024, 4, 4);
        let rows = vec![
            row(day, Some(10.0), None, Some(80.0)),
            row(day, Some(10.0), None, None),
            row(unscored_day, Some(10.0), None, None),
        ];
        let values = reduce_by_day(&CallCenterReducer(BpoMetric::QaScorePct), &rows);
        assert_eq!(values[&day], 80.0);
        assert!(!values.contains_key(&unscored_day));
    }

    #[test]
    fn attendance_takes_last_observed_fte() {
        let day = date(2024, 4, 5);
        let rows = vec![
            row(day, None, Some(4.0), None),
            row(day, None, Some(6.0), None),
        ];
        let values = reduce_by_day(&CallCenterReducer(BpoMetric::AttendancePct), &rows);
        assert_eq!(values[&day], 6.0);

        let missing = vec![row(day, None, None, None)];
        let values = reduce_by_day(&CallCenterReducer(BpoMetric::AttendancePct), &missing);
        assert_eq!(values[&day], 1.0);
    }

    #[tokio::test]
    async fn campaign_scope_filters_offices() {
        let today = date(2024, 4, 10);
        let range = ResolvedRange::resolve(DateRangeKey::Last7Days, today);
        let stored = |office_id: i64, day: NaiveDate, calls: f64| StoredBpoRow {
            venture_id: Some(5),
            office_id: Some(office_id),
            row: row(day, Some(calls), Some(1.0), None),
        };
        let store = MemoryStore::default().with_bpo_rows(vec![
            stored(20, today, 40.0),
            stored(21, today, 1000.0),
            stored(20, date(2024, 4, 1), 15.0),
        ]);
        let scope = BpoScope {
            venture_ids: IdFilter::OneOf(vec![5]),
            office_ids: IdFilter::OneOf(vec![20]),
        };

        let series = BpoMetric::ConnectedCalls
            .aggregate(&store, &scope, &range)
            .await
            .unwrap();

        assert_eq!(series.current[&today], 40.0);
        assert_eq!(series.comparison[&date(2024, 4, 1)], 15.0);
        assert_eq!(store.calls().bpo, 2);
    }
}
