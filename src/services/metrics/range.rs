use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone, Utc};

use crate::time::local_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, utoipa::ToSchema)]
pub enum DateRangeKey {
    #[serde(rename = "MTD")]
    Mtd,
    #[serde(rename = "YTD")]
    Ytd,
    #[serde(rename = "LAST_7_DAYS")]
    Last7Days,
    #[default]
    #[serde(rename = "LAST_30_DAYS")]
    Last30Days,
}

impl DateRangeKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mtd => "MTD",
            Self::Ytd => "YTD",
            Self::Last7Days => "LAST_7_DAYS",
            Self::Last30Days => "LAST_30_DAYS",
        }
    }

    /// Unknown or missing presets fall back to `LAST_30_DAYS`.
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(str::trim).map(str::to_ascii_uppercase).as_deref() {
            Some("MTD") => Self::Mtd,
            Some("YTD") => Self::Ytd,
            Some("LAST_7_DAYS") => Self::Last7Days,
            _ => Self::Last30Days,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
}

/// Inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayWindow {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub current_start: NaiveDate,
    pub current_end: NaiveDate,
    pub comparison_start: NaiveDate,
    pub comparison_end: NaiveDate,
    pub granularity: Granularity,
}

impl ResolvedRange {
    /// Resolves `key` against the local calendar day `today`. The current
    /// window always ends at the close of `today`.
    ///
    /// Calendar presets compare against the same calendar period one year
    /// back; rolling presets compare against the immediately preceding window
    /// of equal length.
    pub fn resolve(key: DateRangeKey, today: NaiveDate) -> Self {
        let (current_start, comparison_start, comparison_end) = match key {
            DateRangeKey::Mtd => {
                let month_start = first_of_month(today);
                (
                    month_start,
                    years_back(month_start, 1),
                    years_back(today, 1),
                )
            }
            DateRangeKey::Ytd => {
                let year_start = first_of_year(today);
                (year_start, years_back(year_start, 1), years_back(today, 1))
            }
            DateRangeKey::Last7Days => rolling(today, 7),
            DateRangeKey::Last30Days => rolling(today, 30),
        };

        Self {
            current_start,
            current_end: today,
            comparison_start,
            comparison_end,
            granularity: Granularity::Day,
        }
    }

    pub fn resolve_at<Tz: TimeZone>(key: DateRangeKey, tz: &Tz, now: DateTime<Utc>) -> Self {
        Self::resolve(key, local_date(tz, now))
    }

    pub fn current_window(&self) -> DayWindow {
        DayWindow {
            start: self.current_start,
            end: self.current_end,
        }
    }

    pub fn comparison_window(&self) -> DayWindow {
        DayWindow {
            start: self.comparison_start,
            end: self.comparison_end,
        }
    }
}

fn rolling(today: NaiveDate, days: u64) -> (NaiveDate, NaiveDate, NaiveDate) {
    let current_start = days_back(today, days - 1);
    let comparison_end = days_back(current_start, 1);
    let comparison_start = days_back(comparison_end, days - 1);
    (current_start, comparison_start, comparison_end)
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

fn first_of_year(day: NaiveDate) -> NaiveDate {
    NaiveDate::from_yo_opt(day.year(), 1).unwrap_or(day)
}

/// Same month and day `years` earlier, clamped to the last day of that month
/// (Feb 29 maps to Feb 28 in a non-leap year).
fn years_back(day: NaiveDate, years: u32) -> NaiveDate {
    day.checked_sub_months(Months::new(12 * years))
        .unwrap_or(NaiveDate::MIN)
}

fn days_back(day: NaiveDate, days: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}
