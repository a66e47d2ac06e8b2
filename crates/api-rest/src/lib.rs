//! # API REST
//!
//! REST API implementation for MedWell.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! All handlers read from one [`ReportService`] loaded at startup and the built-in
//! [`DoctorDirectory`]; nothing here mutates either.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use medwell_core::{
    classify_elements, ClassifiedElement, CoreError, Doctor, DoctorDirectory, DoctorSearch,
    RangeFilter, Report, ReportId, ReportService, SearchQuery,
};
use medwell_export::{render_report, PDF_MEDIA_TYPE};

/// Error half of every fallible handler.
type ApiError = (StatusCode, String);

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    reports: Arc<ReportService>,
    doctors: Arc<DoctorDirectory>,
}

impl AppState {
    pub fn new(reports: ReportService) -> Self {
        Self {
            reports: Arc::new(reports),
            doctors: Arc::new(DoctorDirectory::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// `live` or `fallback`
    pub data_source: String,
    pub report_count: usize,
    /// Why the feed could not be loaded, when it could not.
    pub load_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportSummary {
    pub id: String,
    pub title: String,
    pub date: String,
    pub collection_date: String,
    pub doctor_name: String,
    pub report_type: String,
    pub element_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListReportsRes {
    pub reports: Vec<ReportSummary>,
}

/// One classified result row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ElementRow {
    pub name: String,
    pub display_name: String,
    /// `-1` when not measured
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub value_text: String,
    pub range_text: String,
    /// `In Range`, `Out of Range` or `Not Available`
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetail {
    pub id: String,
    pub title: String,
    pub date: String,
    pub collection_date: String,
    pub doctor_name: String,
    pub summary: String,
    pub report_url: Option<String>,
    pub report_type: String,
    pub submitted_at: String,
    /// Measured rows first, then unmeasured ones
    pub elements: Vec<ElementRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListElementsRes {
    pub range_filter: String,
    pub elements: Vec<ElementRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorRes {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListDoctorsRes {
    pub doctors: Vec<DoctorRes>,
    pub page: usize,
    pub per_page: usize,
    pub total_doctors: usize,
    pub total_pages: usize,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DoctorsQuery {
    /// Case-insensitive match on specialty
    pub specialty: Option<String>,
    /// Page number starting at 1 (default 1)
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportsQuery {
    /// Case-insensitive match on title, doctor, summary, element names or values
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ElementsQuery {
    /// Case-insensitive match on element name or value
    pub q: Option<String>,
    /// `all`, `inRange`, `outOfRange` or `notAvailable`
    pub range: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_reports,
        get_report,
        similar_reports,
        report_elements,
        report_pdf,
        list_doctors,
    ),
    components(schemas(
        HealthRes,
        ReportSummary,
        ListReportsRes,
        ElementRow,
        ReportDetail,
        ListElementsRes,
        DoctorRes,
        ListDoctorsRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router over a loaded report service.
pub fn router(reports: ReportService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/reports", get(list_reports))
        .route("/reports/:id", get(get_report))
        .route("/reports/:id/similar", get(similar_reports))
        .route("/reports/:id/elements", get(report_elements))
        .route("/reports/:id/pdf", get(report_pdf))
        .route("/doctors", get(list_doctors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(reports))
}

fn core_error(e: CoreError) -> ApiError {
    match e {
        CoreError::ReportNotFound(id) => (StatusCode::NOT_FOUND, format!("Report not found: {id}")),
        CoreError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
        other => {
            tracing::error!("Report lookup error: {:?}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
        }
    }
}

fn summary(report: &Report) -> ReportSummary {
    ReportSummary {
        id: report.id.to_string(),
        title: report.title.clone(),
        date: report.date.clone(),
        collection_date: report.collection_date.clone(),
        doctor_name: report.doctor_name.clone(),
        report_type: report.report_type.clone(),
        element_count: report.elements.len(),
    }
}

fn doctor_res(doctor: &Doctor) -> DoctorRes {
    DoctorRes {
        id: doctor.id,
        name: doctor.name.clone(),
        specialty: doctor.specialty.clone(),
        address: doctor.address.clone(),
        latitude: doctor.latitude,
        longitude: doctor.longitude,
    }
}

fn element_row(row: &ClassifiedElement<'_>) -> ElementRow {
    ElementRow {
        name: row.name.to_string(),
        display_name: row.display_name(),
        value: row.data.value,
        min: row.data.min,
        max: row.data.max,
        unit: row.data.unit.clone(),
        value_text: row.data.value_text(),
        range_text: row.data.range_text(),
        status: row.status().label().to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Also reports whether live data was loaded or only the built-in reports are served.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    let source = state.reports.data_source();
    Json(HealthRes {
        ok: true,
        message: "MedWell REST API is alive".into(),
        data_source: if source.is_live() { "live" } else { "fallback" }.into(),
        report_count: source.reports().len(),
        load_error: state.reports.load_error().map(str::to_string),
    })
}

#[utoipa::path(
    get,
    path = "/reports",
    params(ReportsQuery),
    responses(
        (status = 200, description = "Reports matching the search", body = ListReportsRes)
    )
)]
/// List reports, optionally filtered by a global search
#[axum::debug_handler]
async fn list_reports(
    State(state): State<AppState>,
    Query(params): Query<ReportsQuery>,
) -> Json<ListReportsRes> {
    let reports = state
        .reports
        .search(&SearchQuery::from(params.q))
        .into_iter()
        .map(summary)
        .collect();
    Json(ListReportsRes { reports })
}

#[utoipa::path(
    get,
    path = "/reports/{id}",
    params(("id" = String, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report detail", body = ReportDetail),
        (status = 404, description = "Report not found")
    )
)]
/// Fetch one report with all of its result rows
#[axum::debug_handler]
async fn get_report(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ReportDetail>, ApiError> {
    let report = state.reports.find(&ReportId::new(id)).map_err(core_error)?;
    let elements = classify_elements(&report.elements, &SearchQuery::default(), RangeFilter::All)
        .iter()
        .map(element_row)
        .collect();

    Ok(Json(ReportDetail {
        id: report.id.to_string(),
        title: report.title.clone(),
        date: report.date.clone(),
        collection_date: report.collection_date.clone(),
        doctor_name: report.doctor_name.clone(),
        summary: report.summary.clone(),
        report_url: report
            .has_report_url()
            .then(|| report.report_url.clone()),
        report_type: report.report_type.clone(),
        submitted_at: report.submitted_at.clone(),
        elements,
    }))
}

#[utoipa::path(
    get,
    path = "/reports/{id}/similar",
    params(("id" = String, Path, description = "Report id")),
    responses(
        (status = 200, description = "Reports with an overlapping title, the same doctor or a shared test", body = ListReportsRes),
        (status = 404, description = "Report not found")
    )
)]
/// List other reports similar to this one
///
/// A report is similar when its title contains this report's title, it names the same
/// doctor, or it shares at least one test.
#[axum::debug_handler]
async fn similar_reports(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ListReportsRes>, ApiError> {
    let similar = state
        .reports
        .similar(&ReportId::new(id))
        .map_err(core_error)?;
    Ok(Json(ListReportsRes {
        reports: similar.into_iter().map(summary).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/reports/{id}/elements",
    params(("id" = String, Path, description = "Report id"), ElementsQuery),
    responses(
        (status = 200, description = "Filtered result rows", body = ListElementsRes),
        (status = 400, description = "Unknown range filter"),
        (status = 404, description = "Report not found")
    )
)]
/// Search and range-filter the result rows of one report
#[axum::debug_handler]
async fn report_elements(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(params): Query<ElementsQuery>,
) -> Result<Json<ListElementsRes>, ApiError> {
    let range_filter = params
        .range
        .as_deref()
        .map(str::parse::<RangeFilter>)
        .transpose()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
        .unwrap_or_default();

    let rows = state
        .reports
        .elements(&ReportId::new(id), &SearchQuery::from(params.q), range_filter)
        .map_err(core_error)?;

    Ok(Json(ListElementsRes {
        range_filter: range_filter.to_string(),
        elements: rows.iter().map(element_row).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/reports/{id}/pdf",
    params(("id" = String, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report rendered as an A4 PDF attachment"),
        (status = 404, description = "Report not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Download one report as PDF
#[axum::debug_handler]
async fn report_pdf(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Response, ApiError> {
    let report = state.reports.find(&ReportId::new(id)).map_err(core_error)?;
    let pdf = render_report(report).map_err(|e| {
        tracing::error!("Render PDF error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    })?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        pdf.filename.replace('"', "_")
    );
    Ok((
        [
            (header::CONTENT_TYPE, PDF_MEDIA_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf.bytes,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/doctors",
    params(DoctorsQuery),
    responses(
        (status = 200, description = "One page of doctors matching the specialty", body = ListDoctorsRes)
    )
)]
/// Search doctors by specialty, five per page
#[axum::debug_handler]
async fn list_doctors(
    State(state): State<AppState>,
    Query(params): Query<DoctorsQuery>,
) -> Json<ListDoctorsRes> {
    let search = DoctorSearch::new()
        .with_specialty(SearchQuery::from(params.specialty))
        .with_page(params.page.unwrap_or(1));
    let page = state.doctors.search(&search);

    Json(ListDoctorsRes {
        doctors: page.items.iter().copied().map(doctor_res).collect(),
        page: page.page,
        per_page: page.per_page,
        total_doctors: page.total_items,
        total_pages: page.total_pages,
    })
}
