use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::metrics::vitals::{MetricName, MetricSummary, VitalsCollector, VitalsRating};

/// A single report from the browser's web-vitals observer.
#[derive(Debug, Deserialize)]
pub struct VitalsReport {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct VitalsReportResponse {
    pub rating: VitalsRating,
}

pub fn process_vitals_report(
    collector: &VitalsCollector,
    report: VitalsReport,
) -> Result<VitalsReportResponse, AppError> {
    let name: MetricName = report.name.parse()?;
    let rating = collector.record(name, report.value)?;

    tracing::debug!(
        metric = %name,
        value = report.value,
        id = report.id.as_deref().unwrap_or("-"),
        page = report.page.as_deref().unwrap_or("-"),
        ?rating,
        "Web vital recorded"
    );

    Ok(VitalsReportResponse { rating })
}

/// Axum handler for `POST /api/vitals`.
#[cfg(feature = "ssr")]
pub async fn report_vitals_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    axum::Json(report): axum::Json<VitalsReport>,
) -> Result<axum::Json<VitalsReportResponse>, AppError> {
    Ok(axum::Json(process_vitals_report(&state.vitals, report)?))
}

/// Axum handler for `GET /api/vitals`.
#[cfg(feature = "ssr")]
pub async fn vitals_summary_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
) -> Result<axum::Json<Vec<MetricSummary>>, AppError> {
    Ok(axum::Json(state.vitals.summary()?))
}
