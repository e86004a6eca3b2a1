use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record status for an active, sellable SKU.
pub const STATUS_ACTIVE: &str = "ACTIVE";
/// Record status after soft deletion. Never transitions back to ACTIVE.
pub const STATUS_DISCONTINUED: &str = "DISCONTINUED";

/// SKU entity backing the `skus` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skus")]
pub struct Model {
    /// Primary key, assigned once at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Generated retailer code, `PREFIX-CAT-NNNNNNN`. Unique, immutable.
    #[sea_orm(unique)]
    pub sku_code: String,

    /// Universal Product Code (12 digits). Unique when present.
    #[sea_orm(unique)]
    pub upc: Option<String>,

    /// Product name
    pub name: String,

    /// Detailed product description
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Brand name
    pub brand: Option<String>,

    /// 3-letter category code, drives the sku_code prefix
    pub category: String,

    /// Free-form subcategory
    pub subcategory: Option<String>,

    /// Retail price
    pub price: Option<Decimal>,

    /// Wholesale cost
    pub cost: Option<Decimal>,

    /// Unit of measure (EACH, SQFT, LB, ...)
    pub unit_of_measure: Option<String>,

    /// Quantity per unit/package
    pub quantity_per_unit: Option<i32>,

    /// Weight in pounds
    pub weight: Option<Decimal>,

    pub dimension_length: Option<Decimal>,
    pub dimension_width: Option<Decimal>,
    pub dimension_height: Option<Decimal>,

    /// `ACTIVE` or `DISCONTINUED`; soft delete flips this, nothing else
    pub status: String,

    /// Searchable tags, stored as a JSON array of strings
    #[sea_orm(column_type = "Json", nullable)]
    pub tags: Option<Json>,

    /// Custom key-value attributes, stored as a JSON object
    #[sea_orm(column_type = "Json", nullable)]
    pub attributes: Option<Json>,

    /// Creation timestamp, set at insert and never touched again
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp, refreshed on every save
    pub updated_at: DateTime<Utc>,

    /// Optimistic concurrency token, bumped by the service on update
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert && matches!(active_model.created_at, ActiveValue::NotSet) {
            active_model.created_at = Set(now);
        }
        active_model.updated_at = Set(now);

        Ok(active_model)
    }
}
