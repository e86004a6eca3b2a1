use utoipa::OpenApi;

use crate::dto::sku::{
    BatchSkuRequest, DimensionsDto, SkuRequest, SkuResponse, SkuUpdateRequest,
};
use crate::errors::ErrorResponse;
use crate::handlers::common::PaginationMeta;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SKU Management API",
        description = "Operations for managing Stock Keeping Units",
        version = "0.1.0"
    ),
    paths(
        crate::handlers::skus::create_sku,
        crate::handlers::skus::create_skus_batch,
        crate::handlers::skus::list_skus,
        crate::handlers::skus::search_skus,
        crate::handlers::skus::get_sku,
        crate::handlers::skus::get_sku_by_code,
        crate::handlers::skus::get_sku_by_upc,
        crate::handlers::skus::update_sku,
        crate::handlers::skus::partial_update_sku,
        crate::handlers::skus::delete_sku,
    ),
    components(schemas(
        SkuRequest,
        SkuUpdateRequest,
        BatchSkuRequest,
        SkuResponse,
        DimensionsDto,
        ErrorResponse,
        PaginationMeta,
    )),
    tags((name = "skus", description = "SKU management endpoints"))
)]
pub struct ApiDoc;
