//! Stateless builders translating optional filter/search fields into a single
//! AND-composed `Condition`. Omitted or blank fields impose no constraint, so
//! empty criteria match every record.

use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{ColumnTrait, Condition};

use crate::dto::sku::{SkuFilterParams, SkuSearchCriteria};
use crate::entities::sku;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Condition for the listing endpoint: category, status, brand, price range.
pub fn filter_condition(filters: &SkuFilterParams) -> Condition {
    let mut condition = Condition::all();

    if let Some(category) = non_blank(&filters.category) {
        condition = condition.add(sku::Column::Category.eq(category));
    }
    if let Some(status) = non_blank(&filters.status) {
        condition = condition.add(sku::Column::Status.eq(status));
    }
    if let Some(brand) = non_blank(&filters.brand) {
        condition = condition.add(sku::Column::Brand.eq(brand));
    }
    if let Some(min_price) = filters.min_price {
        condition = condition.add(sku::Column::Price.gte(min_price));
    }
    if let Some(max_price) = filters.max_price {
        condition = condition.add(sku::Column::Price.lte(max_price));
    }

    condition
}

/// Condition for the search endpoint: the listing filters plus subcategory,
/// tag match, and a case-insensitive substring query over name OR description.
pub fn search_condition(criteria: &SkuSearchCriteria) -> Condition {
    let mut condition = filter_condition(&SkuFilterParams {
        category: criteria.category.clone(),
        status: criteria.status.clone(),
        brand: criteria.brand.clone(),
        min_price: criteria.min_price,
        max_price: criteria.max_price,
    });

    if let Some(subcategory) = non_blank(&criteria.subcategory) {
        condition = condition.add(sku::Column::Subcategory.eq(subcategory));
    }

    if let Some(query) = non_blank(&criteria.query) {
        let pattern = format!("%{}%", query.to_lowercase());
        condition = condition.add(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(sku::Column::Name)))
                        .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(sku::Column::Description))).like(pattern),
                ),
        );
    }

    let tags = criteria.tag_list();
    if !tags.is_empty() {
        // Tags live in a JSON array column; matching the quoted token in the
        // serialized text works on both SQLite and Postgres backends.
        let mut tag_condition = Condition::any();
        for tag in tags {
            let pattern = format!("%\"{}\"%", tag);
            tag_condition = tag_condition.add(
                Expr::expr(Expr::col(sku::Column::Tags).cast_as(Alias::new("TEXT")))
                    .like(pattern),
            );
        }
        condition = condition.add(tag_condition);
    }

    condition
}
