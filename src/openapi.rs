use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ops Metrics Server",
        description = "Comparative daily metric series for freight, hotel and call-center operations."
    ),
    paths(
        crate::routes::health::healthz_handler,
        crate::routes::analytics::series,
        crate::routes::analytics::metrics_catalog,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::routes::health::HealthResponse,
        crate::routes::analytics::SeriesResponse,
        crate::routes::analytics::MetricCatalogResponse,
        crate::services::metrics::MetricSeriesPoint,
        crate::services::metrics::MetricDescriptor,
        crate::services::metrics::catalog::Domain,
        crate::services::metrics::catalog::MetricFormat,
        crate::services::metrics::DateRangeKey,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness"),
        (name = "analytics", description = "Comparative metric series")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "HTTPBearer",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

pub fn openapi_json() -> serde_json::Value {
    serde_json::to_value(ApiDoc::openapi()).unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to serialize OpenAPI document");
        serde_json::Value::Null
    })
}

async fn openapi_handler() -> Json<serde_json::Value> {
    Json(openapi_json())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_series_endpoint_and_bearer_scheme() {
        let doc = openapi_json();
        let series = &doc["paths"]["/api/analytics/series"]["get"];
        assert!(series.is_object());

        let params: Vec<&str> = series["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|param| param["name"].as_str())
            .collect();
        assert!(params.contains(&"metric"));
        assert!(params.contains(&"dateRange"));
        assert!(params.contains(&"ventureId"));

        assert!(doc["components"]["securitySchemes"]["HTTPBearer"].is_object());
        assert!(doc["components"]["schemas"]["MetricSeriesPoint"].is_object());
        assert!(doc["components"]["schemas"]["ErrorBody"].is_object());
        assert!(series["responses"]["500"].is_object());
    }
}
