use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::db::DbPool;
use crate::dto::sku::{
    SkuFilterParams, SkuRequest, SkuResponse, SkuSearchCriteria, SkuUpdateRequest,
};
use crate::entities::sku::{self, Entity as Sku, STATUS_ACTIVE, STATUS_DISCONTINUED};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::queries::sku_filters::{filter_condition, search_condition};
use crate::services::code_generator::SkuCodeGenerator;

/// Service for managing SKU records
pub struct SkuService {
    db_pool: Arc<DbPool>,
    code_generator: Arc<SkuCodeGenerator>,
    event_sender: EventSender,
}

impl SkuService {
    pub fn new(
        db_pool: Arc<DbPool>,
        code_generator: Arc<SkuCodeGenerator>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            db_pool,
            code_generator,
            event_sender,
        }
    }

    /// Create a single SKU with a generated code.
    #[instrument(skip(self, request), fields(category = %request.category))]
    pub async fn create_sku(&self, request: SkuRequest) -> Result<SkuResponse, ServiceError> {
        let db = &*self.db_pool;

        ensure_upc_available(db, request.upc.as_deref()).await?;
        let sku_code = self.code_generator.next_code(db, &request.category).await?;

        let model = new_active_model(&request, sku_code.clone()).insert(db).await?;

        self.event_sender
            .send(Event::SkuCreated {
                id: model.id,
                sku_code: sku_code.clone(),
            })
            .await;
        info!(sku_code = %sku_code, "Created SKU");

        Ok(model.into())
    }

    /// Create a batch of SKUs atomically. The first UPC collision, whether
    /// against persisted records or between two items of the same batch,
    /// aborts the whole batch; nothing is persisted on failure.
    #[instrument(skip(self, requests), fields(batch_size = requests.len()))]
    pub async fn create_skus_batch(
        &self,
        requests: Vec<SkuRequest>,
    ) -> Result<Vec<SkuResponse>, ServiceError> {
        let txn = self.db_pool.begin().await?;

        let mut batch_upcs: HashSet<String> = HashSet::new();
        let mut created = Vec::with_capacity(requests.len());

        for request in &requests {
            if let Some(upc) = request.upc.as_deref() {
                if !batch_upcs.insert(upc.to_string()) {
                    return Err(ServiceError::DuplicateKey(format!(
                        "UPC {upc} appears more than once in the batch"
                    )));
                }
            }
            ensure_upc_available(&txn, request.upc.as_deref()).await?;

            let sku_code = self
                .code_generator
                .next_code(&txn, &request.category)
                .await?;
            let model = new_active_model(request, sku_code).insert(&txn).await?;
            created.push(model);
        }

        txn.commit().await?;

        self.event_sender
            .send(Event::SkuBatchCreated {
                count: created.len(),
            })
            .await;
        info!("Created {} SKUs in batch", created.len());

        Ok(created.into_iter().map(SkuResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_sku(&self, id: Uuid) -> Result<SkuResponse, ServiceError> {
        let model = Sku::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("SKU not found with id: {id}")))?;
        Ok(model.into())
    }

    #[instrument(skip(self))]
    pub async fn get_sku_by_code(&self, sku_code: &str) -> Result<SkuResponse, ServiceError> {
        let model = Sku::find()
            .filter(sku::Column::SkuCode.eq(sku_code))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("SKU not found with code: {sku_code}"))
            })?;
        Ok(model.into())
    }

    #[instrument(skip(self))]
    pub async fn get_sku_by_upc(&self, upc: &str) -> Result<SkuResponse, ServiceError> {
        let model = Sku::find()
            .filter(sku::Column::Upc.eq(upc))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("SKU not found with UPC: {upc}")))?;
        Ok(model.into())
    }

    /// Paginated listing, newest first, with optional filters.
    #[instrument(skip(self))]
    pub async fn list_skus(
        &self,
        filters: SkuFilterParams,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<SkuResponse>, u64), ServiceError> {
        let paginator = Sku::find()
            .filter(filter_condition(&filters))
            .order_by_desc(sku::Column::CreatedAt)
            .paginate(&*self.db_pool, per_page.max(1));

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(SkuResponse::from).collect(), total))
    }

    /// Criteria search, ordered by name.
    #[instrument(skip(self))]
    pub async fn search_skus(
        &self,
        criteria: SkuSearchCriteria,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<SkuResponse>, u64), ServiceError> {
        let paginator = Sku::find()
            .filter(search_condition(&criteria))
            .order_by_asc(sku::Column::Name)
            .paginate(&*self.db_pool, per_page.max(1));

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(SkuResponse::from).collect(), total))
    }

    /// Full update: every mutable field is replaced with the request value,
    /// including clearing fields the request omits. `id`, `sku_code`,
    /// `status`, and `created_at` are preserved; the version is bumped.
    #[instrument(skip(self, request))]
    pub async fn update_sku(
        &self,
        id: Uuid,
        request: SkuRequest,
    ) -> Result<SkuResponse, ServiceError> {
        let db = &*self.db_pool;

        let existing = Sku::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("SKU not found with id: {id}")))?;

        // Re-saving a record with its own UPC must not fail
        if request.upc.is_some() && request.upc != existing.upc {
            ensure_upc_available(db, request.upc.as_deref()).await?;
        }

        let version = existing.version;
        let mut active: sku::ActiveModel = existing.into();
        active.upc = Set(request.upc.clone());
        active.name = Set(request.name.clone());
        active.description = Set(request.description.clone());
        active.brand = Set(request.brand.clone());
        active.category = Set(request.category.clone());
        active.subcategory = Set(request.subcategory.clone());
        active.price = Set(request.price);
        active.cost = Set(request.cost);
        active.unit_of_measure = Set(request.unit_of_measure.clone());
        active.quantity_per_unit = Set(request.quantity_per_unit);
        active.weight = Set(request.weight);
        active.dimension_length = Set(request.dimensions.as_ref().and_then(|d| d.length));
        active.dimension_width = Set(request.dimensions.as_ref().and_then(|d| d.width));
        active.dimension_height = Set(request.dimensions.as_ref().and_then(|d| d.height));
        active.tags = Set(request.tags.as_ref().map(|t| serde_json::json!(t)));
        active.attributes = Set(request.attributes.as_ref().map(|a| serde_json::json!(a)));
        active.version = Set(version + 1);

        let model = active.update(db).await?;

        self.event_sender.send(Event::SkuUpdated { id }).await;
        info!(sku_code = %model.sku_code, "Updated SKU");

        Ok(model.into())
    }

    /// Partial update: only fields present in the request are touched.
    #[instrument(skip(self, request))]
    pub async fn partial_update_sku(
        &self,
        id: Uuid,
        request: SkuUpdateRequest,
    ) -> Result<SkuResponse, ServiceError> {
        let db = &*self.db_pool;

        let existing = Sku::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("SKU not found with id: {id}")))?;

        if request.upc.is_some() && request.upc != existing.upc {
            ensure_upc_available(db, request.upc.as_deref()).await?;
        }

        let version = existing.version;
        let mut active: sku::ActiveModel = existing.into();
        if let Some(upc) = request.upc.clone() {
            active.upc = Set(Some(upc));
        }
        if let Some(name) = request.name.clone() {
            active.name = Set(name);
        }
        if let Some(description) = request.description.clone() {
            active.description = Set(Some(description));
        }
        if let Some(brand) = request.brand.clone() {
            active.brand = Set(Some(brand));
        }
        if let Some(subcategory) = request.subcategory.clone() {
            active.subcategory = Set(Some(subcategory));
        }
        if let Some(price) = request.price {
            active.price = Set(Some(price));
        }
        if let Some(cost) = request.cost {
            active.cost = Set(Some(cost));
        }
        if let Some(unit_of_measure) = request.unit_of_measure.clone() {
            active.unit_of_measure = Set(Some(unit_of_measure));
        }
        if let Some(quantity_per_unit) = request.quantity_per_unit {
            active.quantity_per_unit = Set(Some(quantity_per_unit));
        }
        if let Some(weight) = request.weight {
            active.weight = Set(Some(weight));
        }
        if let Some(dimensions) = request.dimensions.as_ref() {
            active.dimension_length = Set(dimensions.length);
            active.dimension_width = Set(dimensions.width);
            active.dimension_height = Set(dimensions.height);
        }
        if let Some(tags) = request.tags.as_ref() {
            active.tags = Set(Some(serde_json::json!(tags)));
        }
        if let Some(attributes) = request.attributes.as_ref() {
            active.attributes = Set(Some(serde_json::json!(attributes)));
        }
        active.version = Set(version + 1);

        let model = active.update(db).await?;

        self.event_sender.send(Event::SkuUpdated { id }).await;
        info!(sku_code = %model.sku_code, "Partially updated SKU");

        Ok(model.into())
    }

    /// Soft delete: flip status to DISCONTINUED and keep the record. The
    /// record stays retrievable by id, code, and UPC afterwards.
    #[instrument(skip(self))]
    pub async fn delete_sku(&self, id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = Sku::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("SKU not found with id: {id}")))?;

        let sku_code = existing.sku_code.clone();
        let version = existing.version;
        let mut active: sku::ActiveModel = existing.into();
        active.status = Set(STATUS_DISCONTINUED.to_string());
        active.version = Set(version + 1);
        active.update(db).await?;

        self.event_sender.send(Event::SkuDeleted { id }).await;
        info!(sku_code = %sku_code, "Soft deleted SKU");

        Ok(())
    }
}

/// Fast-fail pre-check for UPC uniqueness. The unique index on `upc` is the
/// actual guarantee; a write racing past this check still fails with
/// `DuplicateKey` via constraint-violation translation.
async fn ensure_upc_available<C: ConnectionTrait>(
    db: &C,
    upc: Option<&str>,
) -> Result<(), ServiceError> {
    if let Some(upc) = upc {
        let existing = Sku::find()
            .filter(sku::Column::Upc.eq(upc))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::DuplicateKey(format!(
                "SKU with UPC {upc} already exists"
            )));
        }
    }
    Ok(())
}

fn new_active_model(request: &SkuRequest, sku_code: String) -> sku::ActiveModel {
    sku::ActiveModel {
        id: Set(Uuid::new_v4()),
        sku_code: Set(sku_code),
        upc: Set(request.upc.clone()),
        name: Set(request.name.clone()),
        description: Set(request.description.clone()),
        brand: Set(request.brand.clone()),
        category: Set(request.category.clone()),
        subcategory: Set(request.subcategory.clone()),
        price: Set(request.price),
        cost: Set(request.cost),
        unit_of_measure: Set(request.unit_of_measure.clone()),
        quantity_per_unit: Set(request.quantity_per_unit),
        weight: Set(request.weight),
        dimension_length: Set(request.dimensions.as_ref().and_then(|d| d.length)),
        dimension_width: Set(request.dimensions.as_ref().and_then(|d| d.width)),
        dimension_height: Set(request.dimensions.as_ref().and_then(|d| d.height)),
        status: Set(STATUS_ACTIVE.to_string()),
        tags: Set(request.tags.as_ref().map(|t| serde_json::json!(t))),
        attributes: Set(request.attributes.as_ref().map(|a| serde_json::json!(a))),
        version: Set(0),
        ..Default::default()
    }
}
