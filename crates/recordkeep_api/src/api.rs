//! Record REST handlers and wire envelopes.
//!
//! # Responsibility
//! - Translate HTTP requests into record service calls.
//! - Shape responses as `{ success, data, ... }` envelopes.
//!
//! # Invariants
//! - Handlers hold no business logic beyond parsing and envelope shaping.
//! - Unsupported methods answer 405 with an explicit `Allow` header.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use recordkeep_core::{
    core_version, pagination_window, ListRequest, PaginationWindow, Record, RecordId,
    RecordInput, RecordPage,
};
use serde::Serialize;
use uuid::Uuid;

pub const RECORDS_ALLOW: &str = "GET, POST";
pub const RECORD_ALLOW: &str = "GET, PUT, DELETE";

/// Raw listing query string. Values stay untyped until the planner parses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
}

impl ListParams {
    /// Collects known keys from decoded query pairs. The first occurrence of
    /// a repeated key wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "search" => &mut params.search,
                "sortBy" => &mut params.sort_by,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }

    pub fn to_request(&self) -> ListRequest {
        ListRequest::from_params(
            self.page.as_deref(),
            self.limit.as_deref(),
            self.search.as_deref(),
            self.sort_by.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub success: bool,
    pub data: Vec<Record>,
    pub total: u64,
    pub total_pages: u64,
    pub page: u32,
    pub limit: u32,
    pub pagination: PaginationWindow,
}

impl From<RecordPage> for ListResponse {
    fn from(page: RecordPage) -> Self {
        let pagination = pagination_window(u64::from(page.page.get()), page.total_pages);
        Self {
            success: true,
            data: page.items,
            total: page.total,
            total_pages: page.total_pages,
            page: page.page.get(),
            limit: page.limit.get(),
            pagination,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub data: Record,
}

impl RecordResponse {
    fn ok(data: Record) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        version: core_version(),
    })
}

/// `GET /records`
pub async fn list_records(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let Query(pairs) = pairs.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let request = ListParams::from_pairs(pairs).to_request();
    let page = state
        .with_service(move |service| service.list_records(&request))
        .await?;
    Ok(Json(ListResponse::from(page)))
}

/// `POST /records`
pub async fn create_record(
    State(state): State<AppState>,
    body: Result<Json<RecordInput>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordResponse>), ApiError> {
    let Json(input) = body.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let record = state
        .with_service(move |service| service.create_record(&input))
        .await?;
    Ok((StatusCode::CREATED, Json(RecordResponse::ok(record))))
}

/// `GET /records/{id}`
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordResponse>, ApiError> {
    let id = parse_record_id(&id)?;
    let record = state
        .with_service(move |service| service.get_record(id))
        .await?;
    Ok(Json(RecordResponse::ok(record)))
}

/// `PUT /records/{id}`; replaces every editable field.
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<RecordInput>, JsonRejection>,
) -> Result<Json<RecordResponse>, ApiError> {
    let id = parse_record_id(&id)?;
    let Json(input) = body.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let record = state
        .with_service(move |service| service.update_record(id, &input))
        .await?;
    Ok(Json(RecordResponse::ok(record)))
}

/// `DELETE /records/{id}`
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AckResponse>, ApiError> {
    let id = parse_record_id(&id)?;
    state
        .with_service(move |service| service.delete_record(id))
        .await?;
    Ok(Json(AckResponse { success: true }))
}

pub async fn records_method_not_allowed(method: Method) -> Response {
    method_not_allowed(&method, RECORDS_ALLOW)
}

pub async fn record_method_not_allowed(method: Method) -> Response {
    method_not_allowed(&method, RECORD_ALLOW)
}

fn method_not_allowed(method: &Method, allow: &'static str) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, allow)],
        format!("Method {method} Not Allowed"),
    )
        .into_response()
}

fn parse_record_id(raw: &str) -> Result<RecordId, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("malformed record id `{raw}`")))
}
