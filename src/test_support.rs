use crate::auth::{AuthenticatedUser, Role};
use crate::config::CoreConfig;
use crate::db;
use crate::services::metrics::range::DayWindow;
use crate::services::metrics::scope::{BpoScope, FreightScope, HotelScope};
use crate::services::metrics::store::{
    BpoDailyRow, DailyCount, HotelKpiRow, LoadRow, MetricsStore, PgMetricsStore, StoreError,
};
use crate::state::AppState;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn test_config() -> CoreConfig {
    CoreConfig {
        database_url: "postgresql://postgres@localhost/postgres".to_string(),
        reporting_timezone: chrono_tz::America::Chicago,
        db_max_connections: 2,
        db_acquire_timeout_seconds: 1,
        request_timeout_seconds: 5,
    }
}

pub fn test_state() -> AppState {
    let config = test_config();
    let pool = db::connect_lazy(&config).expect("connect_lazy");
    let store = PgMetricsStore::new(pool.clone(), config.reporting_timezone);
    AppState {
        config,
        db: pool,
        store,
    }
}

pub fn test_user(role: Role, venture_ids: &[i64], office_ids: &[i64]) -> AuthenticatedUser {
    AuthenticatedUser {
        id: 7,
        email: "test-user@example.com".to_string(),
        role,
        venture_ids: venture_ids.to_vec(),
        office_ids: office_ids.to_vec(),
        source: "test".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct StoredLoad {
    pub venture_id: Option<i64>,
    pub office_id: Option<i64>,
    pub created_by_id: Option<i64>,
    pub row: LoadRow,
}

#[derive(Debug, Clone)]
pub struct StoredHotelRow {
    pub venture_id: Option<i64>,
    pub property_id: Option<i64>,
    pub row: HotelKpiRow,
}

#[derive(Debug, Clone)]
pub struct StoredBpoRow {
    pub venture_id: Option<i64>,
    pub office_id: Option<i64>,
    pub row: BpoDailyRow,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub loads: usize,
    pub load_counts: usize,
    pub hotel: usize,
    pub bpo: usize,
}

impl StoreCalls {
    pub fn total(&self) -> usize {
        self.loads + self.load_counts + self.hotel + self.bpo
    }
}

/// In-memory `MetricsStore` that applies scopes and windows the way the SQL
/// predicates do.
#[derive(Debug, Default)]
pub struct MemoryStore {
    loads: Vec<StoredLoad>,
    hotel_rows: Vec<StoredHotelRow>,
    bpo_rows: Vec<StoredBpoRow>,
    fail: bool,
    stall: bool,
    load_calls: AtomicUsize,
    load_count_calls: AtomicUsize,
    hotel_calls: AtomicUsize,
    bpo_calls: AtomicUsize,
}

impl MemoryStore {
    /// Loads visible to any scope.
    pub fn with_loads(self, rows: Vec<LoadRow>) -> Self {
        self.with_stored_loads(
            rows.into_iter()
                .map(|row| StoredLoad {
                    venture_id: None,
                    office_id: None,
                    created_by_id: None,
                    row,
                })
                .collect(),
        )
    }

    pub fn with_stored_loads(mut self, loads: Vec<StoredLoad>) -> Self {
        self.loads.extend(loads);
        self
    }

    pub fn with_hotel_rows(mut self, rows: Vec<StoredHotelRow>) -> Self {
        self.hotel_rows.extend(rows);
        self
    }

    pub fn with_bpo_rows(mut self, rows: Vec<StoredBpoRow>) -> Self {
        self.bpo_rows.extend(rows);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Every read hangs forever after being counted.
    pub fn stalled(mut self) -> Self {
        self.stall = true;
        self
    }

    pub fn calls(&self) -> StoreCalls {
        StoreCalls {
            loads: self.load_calls.load(Ordering::SeqCst),
            load_counts: self.load_count_calls.load(Ordering::SeqCst),
            hotel: self.hotel_calls.load(Ordering::SeqCst),
            bpo: self.bpo_calls.load(Ordering::SeqCst),
        }
    }

    async fn record(&self, counter: &AtomicUsize) -> Result<(), StoreError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if self.stall {
            std::future::pending::<()>().await;
        }
        if self.fail {
            return Err(StoreError::Backend("memory store offline".to_string()));
        }
        Ok(())
    }

    fn scoped_loads<'a>(
        &'a self,
        scope: &'a FreightScope,
        window: DayWindow,
    ) -> impl Iterator<Item = &'a LoadRow> + 'a {
        self.loads
            .iter()
            .filter(move |load| {
                scope.venture_ids.matches(load.venture_id)
                    && scope.office_ids.matches(load.office_id)
                    && scope
                        .created_by_id
                        .map_or(true, |id| load.created_by_id == Some(id))
                    && load.row.billing_day.is_some_and(|day| window.contains(day))
            })
            .map(|load| &load.row)
    }
}

impl MetricsStore for MemoryStore {
    async fn delivered_loads(
        &self,
        scope: &FreightScope,
        window: DayWindow,
    ) -> Result<Vec<LoadRow>, StoreError> {
        self.record(&self.load_calls).await?;
        Ok(self.scoped_loads(scope, window).cloned().collect())
    }

    async fn delivered_load_counts(
        &self,
        scope: &FreightScope,
        window: DayWindow,
    ) -> Result<Vec<DailyCount>, StoreError> {
        self.record(&self.load_count_calls).await?;
        let mut counts: BTreeMap<Option<NaiveDate>, i64> = BTreeMap::new();
        for row in self.scoped_loads(scope, window) {
            *counts.entry(row.billing_day).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(day, count)| DailyCount { day, count })
            .collect())
    }

    async fn hotel_kpi_rows(
        &self,
        scope: &HotelScope,
        window: DayWindow,
    ) -> Result<Vec<HotelKpiRow>, StoreError> {
        self.record(&self.hotel_calls).await?;
        Ok(self
            .hotel_rows
            .iter()
            .filter(|stored| {
                scope.venture_ids.matches(stored.venture_id)
                    && scope.property_ids.matches(stored.property_id)
                    && window.contains(stored.row.date)
            })
            .map(|stored| stored.row.clone())
            .collect())
    }

    async fn bpo_daily_metrics(
        &self,
        scope: &BpoScope,
        window: DayWindow,
    ) -> Result<Vec<BpoDailyRow>, StoreError> {
        self.record(&self.bpo_calls).await?;
        Ok(self
            .bpo_rows
            .iter()
            .filter(|stored| {
                scope.venture_ids.matches(stored.venture_id)
                    && scope.office_ids.matches(stored.office_id)
                    && window.contains(stored.row.date)
            })
            .map(|stored| stored.row.clone())
            .collect())
    }
}
