use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

const GAP_SEARCH_MINUTES: i64 = 180;

/// Calendar date of `now` as observed in `tz`.
pub fn local_date<Tz: TimeZone>(tz: &Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(tz).date_naive()
}

/// First instant of `date` in `tz`.
///
/// A midnight that falls inside a DST gap resolves to the first valid local
/// time after it; an ambiguous midnight resolves to the earlier instant.
pub fn local_day_start_utc<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    resolve_local(tz, naive).unwrap_or_else(|| {
        tracing::warn!(%date, "no valid local midnight found; treating as UTC");
        Utc.from_utc_datetime(&naive)
    })
}

/// Half-open UTC bounds `[start, end)` covering the inclusive local days
/// `first..=last`.
pub fn local_days_utc_bounds<Tz: TimeZone>(
    tz: &Tz,
    first: NaiveDate,
    last: NaiveDate,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_day_start_utc(tz, first);
    let end = match last.succ_opt() {
        Some(next) => local_day_start_utc(tz, next),
        None => local_day_start_utc(tz, last) + Duration::days(1),
    };
    (start, end)
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    for minutes in 0..=GAP_SEARCH_MINUTES {
        let candidate = naive + Duration::minutes(minutes);
        match tz.from_local_datetime(&candidate) {
            chrono::LocalResult::Single(dt) => return Some(dt.with_timezone(&Utc)),
            chrono::LocalResult::Ambiguous(a, b) => {
                let (a, b) = (a.with_timezone(&Utc), b.with_timezone(&Utc));
                return Some(std::cmp::min(a, b));
            }
            chrono::LocalResult::None => continue,
        }
    }
    None
}
