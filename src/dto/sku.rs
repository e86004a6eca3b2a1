use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::entities::sku;

lazy_static! {
    static ref UPC_RE: Regex = Regex::new(r"^\d{12}$").unwrap();
    static ref CATEGORY_RE: Regex = Regex::new(r"^[A-Z]{3}$").unwrap();
}

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_positive() && !value.is_zero() {
        Ok(())
    } else {
        Err(ValidationError::new("must_be_positive"))
    }
}

/// Product dimensions in inches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct DimensionsDto {
    #[validate(custom = "validate_positive")]
    #[schema(example = "96.0")]
    pub length: Option<Decimal>,
    #[validate(custom = "validate_positive")]
    #[schema(example = "3.5")]
    pub width: Option<Decimal>,
    #[validate(custom = "validate_positive")]
    #[schema(example = "1.5")]
    pub height: Option<Decimal>,
}

/// Request payload for creating a SKU (also used for full update)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SkuRequest {
    /// Universal Product Code (12 digits)
    #[validate(regex(path = "UPC_RE", message = "UPC must be exactly 12 digits"))]
    #[schema(example = "012345678901")]
    pub upc: Option<String>,

    /// Product name
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[schema(example = "2x4x8 Pressure Treated Lumber")]
    pub name: String,

    /// Detailed product description
    #[validate(length(max = 4000, message = "Description must not exceed 4000 characters"))]
    pub description: Option<String>,

    /// Brand name
    #[validate(length(max = 100, message = "Brand must not exceed 100 characters"))]
    #[schema(example = "WeatherShield")]
    pub brand: Option<String>,

    /// Product category code, drives SKU code generation
    #[validate(regex(path = "CATEGORY_RE", message = "Category must be a 3-letter uppercase code"))]
    #[schema(example = "LBR")]
    pub category: String,

    /// Product subcategory
    #[validate(length(max = 50, message = "Subcategory must not exceed 50 characters"))]
    #[schema(example = "PRESSURE_TREATED")]
    pub subcategory: Option<String>,

    /// Retail price
    #[validate(custom = "validate_positive")]
    #[schema(example = "8.99")]
    pub price: Option<Decimal>,

    /// Wholesale cost
    #[validate(custom = "validate_positive")]
    #[schema(example = "5.50")]
    pub cost: Option<Decimal>,

    /// Unit of measure (EACH, SQFT, LINEAR_FT, CUBIC_FT, LB, GAL)
    #[validate(length(max = 20, message = "Unit of measure must not exceed 20 characters"))]
    #[schema(example = "EACH")]
    pub unit_of_measure: Option<String>,

    /// Quantity per unit/package
    #[validate(range(min = 1, message = "Quantity per unit must be at least 1"))]
    #[schema(example = 1)]
    pub quantity_per_unit: Option<i32>,

    /// Weight in pounds
    #[validate(custom = "validate_positive")]
    #[schema(example = "12.5")]
    pub weight: Option<Decimal>,

    #[validate]
    pub dimensions: Option<DimensionsDto>,

    /// Searchable tags
    #[schema(example = json!(["outdoor", "treated", "lumber"]))]
    pub tags: Option<Vec<String>>,

    /// Custom attributes as key-value pairs
    #[schema(example = json!({"treatment_type": "ACQ", "grade": "#2"}))]
    pub attributes: Option<HashMap<String, String>>,
}

/// Request payload for partially updating a SKU. Omitted fields are left
/// unchanged; there is no way to clear a field through this endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct SkuUpdateRequest {
    #[validate(regex(path = "UPC_RE", message = "UPC must be exactly 12 digits"))]
    pub upc: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 4000, message = "Description must not exceed 4000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Brand must not exceed 100 characters"))]
    pub brand: Option<String>,

    #[validate(length(max = 50, message = "Subcategory must not exceed 50 characters"))]
    pub subcategory: Option<String>,

    #[validate(custom = "validate_positive")]
    pub price: Option<Decimal>,

    #[validate(custom = "validate_positive")]
    pub cost: Option<Decimal>,

    #[validate(length(max = 20, message = "Unit of measure must not exceed 20 characters"))]
    pub unit_of_measure: Option<String>,

    #[validate(range(min = 1, message = "Quantity per unit must be at least 1"))]
    pub quantity_per_unit: Option<i32>,

    #[validate(custom = "validate_positive")]
    pub weight: Option<Decimal>,

    #[validate]
    pub dimensions: Option<DimensionsDto>,

    pub tags: Option<Vec<String>>,

    pub attributes: Option<HashMap<String, String>>,
}

/// Batch creation wrapper. The whole batch is applied atomically.
/// Individual items are validated by the handler before the service runs.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BatchSkuRequest {
    #[validate(length(min = 1, max = 100, message = "Batch must contain between 1 and 100 SKUs"))]
    pub skus: Vec<SkuRequest>,
}

/// SKU record as returned to API clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkuResponse {
    pub id: Uuid,
    #[schema(example = "THD-LBR-0000001")]
    pub sku_code: String,
    pub upc: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub price: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub unit_of_measure: Option<String>,
    pub quantity_per_unit: Option<i32>,
    pub weight: Option<Decimal>,
    pub dimensions: Option<DimensionsDto>,
    #[schema(example = "ACTIVE")]
    pub status: String,
    pub tags: Option<Vec<String>>,
    pub attributes: Option<HashMap<String, String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl From<sku::Model> for SkuResponse {
    fn from(model: sku::Model) -> Self {
        let dimensions = if model.dimension_length.is_some()
            || model.dimension_width.is_some()
            || model.dimension_height.is_some()
        {
            Some(DimensionsDto {
                length: model.dimension_length,
                width: model.dimension_width,
                height: model.dimension_height,
            })
        } else {
            None
        };

        Self {
            id: model.id,
            sku_code: model.sku_code,
            upc: model.upc,
            name: model.name,
            description: model.description,
            brand: model.brand,
            category: model.category,
            subcategory: model.subcategory,
            price: model.price,
            cost: model.cost,
            unit_of_measure: model.unit_of_measure,
            quantity_per_unit: model.quantity_per_unit,
            weight: model.weight,
            dimensions,
            status: model.status,
            tags: model.tags.and_then(|v| serde_json::from_value(v).ok()),
            attributes: model
                .attributes
                .and_then(|v| serde_json::from_value(v).ok()),
            created_at: model.created_at,
            updated_at: model.updated_at,
            version: model.version,
        }
    }
}

/// Optional filters for the listing endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SkuFilterParams {
    pub category: Option<String>,
    pub status: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl SkuFilterParams {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.status.is_none()
            && self.brand.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}

/// Search criteria: every field optional, supplied fields are AND-composed
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SkuSearchCriteria {
    /// Free-text query matched case-insensitively against name or description
    pub query: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub status: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Comma-separated tag list; a SKU matches if it carries any of them
    pub tags: Option<String>,
}

impl SkuSearchCriteria {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SkuRequest {
        SkuRequest {
            upc: Some("012345678901".to_string()),
            name: "2x4x8 Pressure Treated Lumber".to_string(),
            description: None,
            brand: Some("WeatherShield".to_string()),
            category: "LBR".to_string(),
            subcategory: None,
            price: Some(Decimal::new(899, 2)),
            cost: None,
            unit_of_measure: Some("EACH".to_string()),
            quantity_per_unit: Some(1),
            weight: None,
            dimensions: None,
            tags: None,
            attributes: None,
        }
    }

    #[test]
    fn accepts_valid_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn rejects_bad_upc() {
        let mut req = valid_request();
        req.upc = Some("12345".to_string());
        assert!(req.validate().is_err());

        req.upc = Some("01234567890a".to_string());
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_bad_category() {
        let mut req = valid_request();
        req.category = "lbr".to_string();
        assert!(req.validate().is_err());

        req.category = "LBRX".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_price() {
        let mut req = valid_request();
        req.price = Some(Decimal::ZERO);
        assert!(req.validate().is_err());

        req.price = Some(Decimal::new(-100, 2));
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_oversized_batch() {
        let batch = BatchSkuRequest {
            skus: vec![valid_request(); 101],
        };
        assert!(batch.validate().is_err());
    }

    #[test]
    fn rejects_empty_batch() {
        let batch = BatchSkuRequest { skus: vec![] };
        assert!(batch.validate().is_err());
    }

    #[test]
    fn tag_list_splits_and_trims() {
        let criteria = SkuSearchCriteria {
            tags: Some(" outdoor, treated ,,lumber".to_string()),
            ..Default::default()
        };
        assert_eq!(criteria.tag_list(), vec!["outdoor", "treated", "lumber"]);
        assert!(SkuSearchCriteria::default().tag_list().is_empty());
    }
}
