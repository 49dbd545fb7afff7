use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use std::time::Duration;
use tracing::Instrument;

use crate::auth::{AuthUser, AuthenticatedUser};
use crate::config::CoreConfig;
use crate::error::{internal_error, AppError, AppResult};
use crate::services::metrics::{
    catalog, compute_series, DateRangeKey, MetricDescriptor, MetricSeriesPoint, MetricsStore,
    ScopeRequest, SeriesRequest,
};
use crate::state::AppState;
use crate::time::local_date;

#[derive(Debug, Clone, Default, serde::Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SeriesParams {
    /// Metric key, e.g. `freight_margin_pct`.
    pub metric: Option<String>,
    /// `MTD`, `YTD`, `LAST_7_DAYS` or `LAST_30_DAYS` (default).
    pub date_range: Option<String>,
    pub venture_id: Option<i64>,
    pub office_id: Option<i64>,
    pub property_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl SeriesParams {
    fn scope(&self) -> ScopeRequest {
        ScopeRequest {
            venture_id: self.venture_id,
            office_id: self.office_id,
            property_id: self.property_id,
            user_id: self.user_id,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct SeriesResponse {
    pub data: Vec<MetricSeriesPoint>,
}

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct MetricCatalogResponse {
    pub metrics: Vec<MetricDescriptor>,
}

#[utoipa::path(
    get,
    path = "/api/analytics/series",
    tag = "analytics",
    params(SeriesParams),
    responses(
        (status = 200, description = "Daily series with comparison values", body = SeriesResponse),
        (status = 400, description = "Missing metric or invalid request", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    security(("HTTPBearer" = []))
)]
pub(crate) async fn series(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    params: Result<Query<SeriesParams>, QueryRejection>,
) -> AppResult<Json<SeriesResponse>> {
    let Query(params) = params.map_err(|err| {
        tracing::debug!(error = %err, "rejected series query");
        AppError::bad_request("Invalid request")
    })?;
    series_response(&state.store, &state.config, user, params).await
}

/// Validates the metric, then computes the series under the configured
/// request timeout. Store failures and timeouts surface as a generic 500.
pub(crate) async fn series_response<S: MetricsStore>(
    store: &S,
    config: &CoreConfig,
    user: AuthenticatedUser,
    params: SeriesParams,
) -> AppResult<Json<SeriesResponse>> {
    let metric = params
        .metric
        .as_deref()
        .map(str::trim)
        .filter(|metric| !metric.is_empty())
        .ok_or_else(|| AppError::bad_request("metric is required"))?;

    let request = SeriesRequest {
        metric: metric.to_string(),
        date_range: DateRangeKey::parse_lenient(params.date_range.as_deref()),
        scope: params.scope(),
    };
    let span = tracing::info_span!(
        "metric_series",
        metric = %request.metric,
        date_range = request.date_range.as_str(),
        user_id = user.id,
    );
    let limit = Duration::from_secs(config.request_timeout_seconds);

    async move {
        let today = local_date(&config.reporting_timezone, Utc::now());
        let computation = compute_series(store, &user, &request, today);
        let data = match tokio::time::timeout(limit, computation).await {
            Ok(Ok(data)) => data,
            Ok(Err(err)) => return Err(internal_error(err)),
            Err(_) => {
                return Err(internal_error(format!(
                    "series computation exceeded {}s",
                    limit.as_secs()
                )))
            }
        };
        tracing::debug!(points = data.len(), "computed metric series");
        Ok(Json(SeriesResponse { data }))
    }
    .instrument(span)
    .await
}

#[utoipa::path(
    get,
    path = "/api/analytics/metrics",
    tag = "analytics",
    responses(
        (status = 200, description = "Supported series metrics", body = MetricCatalogResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody)
    ),
    security(("HTTPBearer" = []))
)]
pub(crate) async fn metrics_catalog(AuthUser(_user): AuthUser) -> Json<MetricCatalogResponse> {
    Json(MetricCatalogResponse { metrics: catalog() })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analytics/series", get(series))
        .route("/analytics/metrics", get(metrics_catalog))
}
