use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Router,
};
use uuid::Uuid;
use validator::Validate;

use super::common::{PaginatedResponse, PaginationParams};
use crate::dto::sku::{
    BatchSkuRequest, SkuFilterParams, SkuRequest, SkuResponse, SkuSearchCriteria,
    SkuUpdateRequest,
};
use crate::errors::ServiceError;
use crate::AppState;

/// Create a new SKU with an auto-generated SKU code.
#[utoipa::path(
    post,
    path = "/api/v1/skus",
    request_body = SkuRequest,
    responses(
        (status = 201, description = "SKU created", body = SkuResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "SKU with UPC already exists")
    ),
    tag = "skus"
)]
pub async fn create_sku(
    State(state): State<AppState>,
    Json(request): Json<SkuRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;
    let created = state.sku_service.create_sku(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Create multiple SKUs in one atomic request.
#[utoipa::path(
    post,
    path = "/api/v1/skus/batch",
    request_body = BatchSkuRequest,
    responses(
        (status = 201, description = "All SKUs created", body = [SkuResponse]),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "A UPC in the batch already exists")
    ),
    tag = "skus"
)]
pub async fn create_skus_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchSkuRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;
    for sku in &request.skus {
        sku.validate()?;
    }
    let created = state.sku_service.create_skus_batch(request.skus).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List SKUs with optional filters and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/skus",
    params(SkuFilterParams, PaginationParams),
    responses((status = 200, description = "Paginated SKU list")),
    tag = "skus"
)]
pub async fn list_skus(
    State(state): State<AppState>,
    Query(filters): Query<SkuFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (skus, total) = state
        .sku_service
        .list_skus(filters, pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        skus,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Search SKUs by combined criteria.
#[utoipa::path(
    get,
    path = "/api/v1/skus/search",
    params(SkuSearchCriteria, PaginationParams),
    responses((status = 200, description = "Paginated search results")),
    tag = "skus"
)]
pub async fn search_skus(
    State(state): State<AppState>,
    Query(criteria): Query<SkuSearchCriteria>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (skus, total) = state
        .sku_service
        .search_skus(criteria, pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        skus,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a SKU by its internal UUID.
#[utoipa::path(
    get,
    path = "/api/v1/skus/{id}",
    params(("id" = Uuid, Path, description = "SKU UUID")),
    responses(
        (status = 200, description = "SKU found", body = SkuResponse),
        (status = 404, description = "SKU not found")
    ),
    tag = "skus"
)]
pub async fn get_sku(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.sku_service.get_sku(id).await?))
}

/// Get a SKU by its generated code.
#[utoipa::path(
    get,
    path = "/api/v1/skus/code/{sku_code}",
    params(("sku_code" = String, Path, description = "Generated SKU code")),
    responses(
        (status = 200, description = "SKU found", body = SkuResponse),
        (status = 404, description = "SKU not found")
    ),
    tag = "skus"
)]
pub async fn get_sku_by_code(
    State(state): State<AppState>,
    Path(sku_code): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.sku_service.get_sku_by_code(&sku_code).await?))
}

/// Get a SKU by its Universal Product Code.
#[utoipa::path(
    get,
    path = "/api/v1/skus/upc/{upc}",
    params(("upc" = String, Path, description = "12-digit UPC")),
    responses(
        (status = 200, description = "SKU found", body = SkuResponse),
        (status = 404, description = "SKU not found")
    ),
    tag = "skus"
)]
pub async fn get_sku_by_upc(
    State(state): State<AppState>,
    Path(upc): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(Json(state.sku_service.get_sku_by_upc(&upc).await?))
}

/// Replace all mutable fields of a SKU.
#[utoipa::path(
    put,
    path = "/api/v1/skus/{id}",
    params(("id" = Uuid, Path, description = "SKU UUID")),
    request_body = SkuRequest,
    responses(
        (status = 200, description = "SKU updated", body = SkuResponse),
        (status = 404, description = "SKU not found"),
        (status = 409, description = "UPC belongs to another SKU")
    ),
    tag = "skus"
)]
pub async fn update_sku(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SkuRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;
    Ok(Json(state.sku_service.update_sku(id, request).await?))
}

/// Update only the supplied fields of a SKU.
#[utoipa::path(
    patch,
    path = "/api/v1/skus/{id}",
    params(("id" = Uuid, Path, description = "SKU UUID")),
    request_body = SkuUpdateRequest,
    responses(
        (status = 200, description = "SKU updated", body = SkuResponse),
        (status = 404, description = "SKU not found"),
        (status = 409, description = "UPC belongs to another SKU")
    ),
    tag = "skus"
)]
pub async fn partial_update_sku(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SkuUpdateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;
    Ok(Json(
        state.sku_service.partial_update_sku(id, request).await?,
    ))
}

/// Soft delete: mark the SKU DISCONTINUED, keeping the record.
#[utoipa::path(
    delete,
    path = "/api/v1/skus/{id}",
    params(("id" = Uuid, Path, description = "SKU UUID")),
    responses(
        (status = 204, description = "SKU discontinued"),
        (status = 404, description = "SKU not found")
    ),
    tag = "skus"
)]
pub async fn delete_sku(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.sku_service.delete_sku(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn sku_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_sku))
        .route("/", get(list_skus))
        .route("/batch", post(create_skus_batch))
        .route("/search", get(search_skus))
        .route("/:id", get(get_sku))
        .route("/:id", put(update_sku))
        .route("/:id", patch(partial_update_sku))
        .route("/:id", delete(delete_sku))
        .route("/code/:sku_code", get(get_sku_by_code))
        .route("/upc/:upc", get(get_sku_by_upc))
}
