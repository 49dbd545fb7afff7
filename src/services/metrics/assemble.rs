use chrono::NaiveDate;

use super::aggregate::DailyValues;

#[derive(Debug, Clone, PartialEq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub comparison_value: f64,
}

/// One point per skeleton day, in skeleton order; days missing from either
/// map read as zero.
///
/// Both maps are keyed by the skeleton's own calendar day. Comparison entries
/// are not shifted onto the current window, so comparison days that fall
/// outside it read as zero.
pub fn assemble(
    skeleton: &[NaiveDate],
    current: &DailyValues,
    comparison: &DailyValues,
) -> Vec<MetricSeriesPoint> {
    skeleton
        .iter()
        .map(|day| MetricSeriesPoint {
            date: *day,
            value: current.get(day).copied().unwrap_or(0.0),
            comparison_value: comparison.get(day).copied().unwrap_or(0.0),
        })
        .collect()
}
