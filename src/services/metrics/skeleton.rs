use chrono::NaiveDate;

/// Every calendar day from `start` through `end`, ascending. Empty when
/// `end < start`.
pub fn build_skeleton(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}
