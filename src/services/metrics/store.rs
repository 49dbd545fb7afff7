use chrono::NaiveDate;
use chrono_tz::Tz;
use sqlx::PgPool;
use std::future::Future;

use super::range::DayWindow;
use super::scope::{BpoScope, FreightScope, HotelScope};
use crate::time::local_days_utc_bounds;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("metrics backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LoadRow {
    pub billing_day: Option<NaiveDate>,
    pub bill_amount: Option<f64>,
    pub cost_amount: Option<f64>,
    pub miles: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DailyCount {
    pub day: Option<NaiveDate>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HotelKpiRow {
    pub date: NaiveDate,
    pub total_revenue: Option<f64>,
    pub adr: Option<f64>,
    pub revpar: Option<f64>,
    pub occupancy_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct BpoDailyRow {
    pub date: NaiveDate,
    pub handled_calls: Option<f64>,
    pub fte_count: Option<f64>,
    pub avg_qa_score: Option<f64>,
}

/// Read-only access to the raw records behind each metric domain.
///
/// Rows come back ordered by day, then by insertion order, so "last observed"
/// reductions are deterministic.
pub trait MetricsStore: Send + Sync {
    /// Delivered loads whose billing day falls inside `window`.
    fn delivered_loads(
        &self,
        scope: &FreightScope,
        window: DayWindow,
    ) -> impl Future<Output = Result<Vec<LoadRow>, StoreError>> + Send;

    /// Delivered loads counted per billing day.
    fn delivered_load_counts(
        &self,
        scope: &FreightScope,
        window: DayWindow,
    ) -> impl Future<Output = Result<Vec<DailyCount>, StoreError>> + Send;

    fn hotel_kpi_rows(
        &self,
        scope: &HotelScope,
        window: DayWindow,
    ) -> impl Future<Output = Result<Vec<HotelKpiRow>, StoreError>> + Send;

    fn bpo_daily_metrics(
        &self,
        scope: &BpoScope,
        window: DayWindow,
    ) -> impl Future<Output = Result<Vec<BpoDailyRow>, StoreError>> + Send;
}

#[derive(Debug, Clone)]
pub struct PgMetricsStore {
    pool: PgPool,
    tz: Tz,
}

impl PgMetricsStore {
    pub fn new(pool: PgPool, tz: Tz) -> Self {
        Self { pool, tz }
    }
}

impl MetricsStore for PgMetricsStore {
    async fn delivered_loads(
        &self,
        scope: &FreightScope,
        window: DayWindow,
    ) -> Result<Vec<LoadRow>, StoreError> {
        let (start, end) = local_days_utc_bounds(&self.tz, window.start, window.end);
        let rows: Vec<LoadRow> = sqlx::query_as(
            r#"
            SELECT (l.billing_date AT TIME ZONE $3)::date AS billing_day,
                   l.bill_amount::float8 AS bill_amount,
                   l.cost_amount::float8 AS cost_amount,
                   l.miles::float8 AS miles
            FROM loads l
            WHERE l.load_status = 'DELIVERED'
              AND l.billing_date >= $1
              AND l.billing_date < $2
              AND ($4::bigint[] IS NULL OR l.venture_id = ANY($4))
              AND ($5::bigint[] IS NULL OR l.office_id = ANY($5))
              AND ($6::bigint IS NULL OR l.created_by_id = $6)
            ORDER BY l.billing_date, l.id
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(self.tz.name())
        .bind(scope.venture_ids.as_bind())
        .bind(scope.office_ids.as_bind())
        .bind(scope.created_by_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delivered_load_counts(
        &self,
        scope: &FreightScope,
        window: DayWindow,
    ) -> Result<Vec<DailyCount>, StoreError> {
        let (start, end) = local_days_utc_bounds(&self.tz, window.start, window.end);
        let rows: Vec<DailyCount> = sqlx::query_as(
            r#"
            SELECT (l.billing_date AT TIME ZONE $3)::date AS day,
                   COUNT(*) AS count
            FROM loads l
            WHERE l.load_status = 'DELIVERED'
              AND l.billing_date >= $1
              AND l.billing_date < $2
              AND ($4::bigint[] IS NULL OR l.venture_id = ANY($4))
              AND ($5::bigint[] IS NULL OR l.office_id = ANY($5))
              AND ($6::bigint IS NULL OR l.created_by_id = $6)
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(self.tz.name())
        .bind(scope.venture_ids.as_bind())
        .bind(scope.office_ids.as_bind())
        .bind(scope.created_by_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn hotel_kpi_rows(
        &self,
        scope: &HotelScope,
        window: DayWindow,
    ) -> Result<Vec<HotelKpiRow>, StoreError> {
        let rows: Vec<HotelKpiRow> = sqlx::query_as(
            r#"
            SELECT k.date,
                   k.total_revenue::float8 AS total_revenue,
                   k.adr::float8 AS adr,
                   k.revpar::float8 AS revpar,
                   k.occupancy_pct::float8 AS occupancy_pct
            FROM hotel_kpi_daily k
            WHERE k.date >= $1
              AND k.date <= $2
              AND ($3::bigint[] IS NULL OR k.venture_id = ANY($3))
              AND ($4::bigint[] IS NULL OR k.hotel_id = ANY($4))
            ORDER BY k.date, k.id
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .bind(scope.venture_ids.as_bind())
        .bind(scope.property_ids.as_bind())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn bpo_daily_metrics(
        &self,
        scope: &BpoScope,
        window: DayWindow,
    ) -> Result<Vec<BpoDailyRow>, StoreError> {
        let rows: Vec<BpoDailyRow> = sqlx::query_as(
            r#"
            SELECT m.date,
                   m.handled_calls::float8 AS handled_calls,
                   m.fte_count::float8 AS fte_count,
                   m.avg_qa_score::float8 AS avg_qa_score
            FROM bpo_daily_metrics m
            JOIN bpo_campaigns c ON c.id = m.campaign_id
            WHERE m.date >= $1
              AND m.date <= $2
              AND ($3::bigint[] IS NULL OR c.venture_id = ANY($3))
              AND ($4::bigint[] IS NULL OR c.office_id = ANY($4))
            ORDER BY m.date, m.id
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .bind(scope.venture_ids.as_bind())
        .bind(scope.office_ids.as_bind())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
