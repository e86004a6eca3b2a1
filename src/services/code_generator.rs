use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use tracing::debug;

use crate::entities::sku;
use crate::errors::ServiceError;

/// Width of the zero-padded decimal sequence segment in a SKU code.
pub const SEQUENCE_WIDTH: usize = 7;

/// Generates SKU codes of the form `<RETAILER_PREFIX>-<CATEGORY>-<NNNNNNN>`
/// with strictly increasing sequence numbers per prefix.
///
/// Counters live in process memory, keyed by prefix, and are seeded lazily
/// from the highest persisted sequence the first time a prefix is used.
/// Within one process, two concurrent calls for the same prefix can never
/// produce the same sequence: the increment is a single atomic
/// read-modify-write on the per-prefix counter.
///
/// Known limitation: counters are process-local. In a multi-instance
/// deployment, two processes can seed from the same persisted max and issue
/// overlapping sequences before either row lands. The unique index on
/// `sku_code` catches the collision and it surfaces as a duplicate-key error.
pub struct SkuCodeGenerator {
    retailer_prefix: String,
    counters: DashMap<String, Arc<AtomicI64>>,
}

impl SkuCodeGenerator {
    pub fn new(retailer_prefix: impl Into<String>) -> Self {
        Self {
            retailer_prefix: retailer_prefix.into(),
            counters: DashMap::new(),
        }
    }

    /// Sequence namespace for a category, e.g. `THD-LBR`.
    pub fn prefix_for(&self, category: &str) -> String {
        format!("{}-{}", self.retailer_prefix, category)
    }

    /// Produce the next code for a category.
    ///
    /// Concurrent first use of a prefix may run the seed query more than
    /// once; the query is idempotent and only one counter wins the map entry,
    /// so no sequence number is ever issued twice by this process.
    pub async fn next_code<C: ConnectionTrait>(
        &self,
        db: &C,
        category: &str,
    ) -> Result<String, ServiceError> {
        let prefix = self.prefix_for(category);

        let counter = match self.counters.get(&prefix) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                let seed = find_max_sequence(db, &prefix).await?;
                debug!(prefix = %prefix, seed = seed, "seeded sequence counter");
                Arc::clone(
                    self.counters
                        .entry(prefix.clone())
                        .or_insert_with(|| Arc::new(AtomicI64::new(seed)))
                        .value(),
                )
            }
        };

        let sequence = counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format_code(&prefix, sequence))
    }
}

pub(crate) fn format_code(prefix: &str, sequence: i64) -> String {
    format!("{prefix}-{sequence:0width$}", width = SEQUENCE_WIDTH)
}

/// Highest sequence number persisted for a prefix, or 0 when none exist.
///
/// Because sequences are zero-padded to a fixed width, the lexicographic
/// maximum of matching codes embeds the numeric maximum, so a plain
/// `MAX(sku_code)` works on every backend without string-slicing SQL.
async fn find_max_sequence<C: ConnectionTrait>(db: &C, prefix: &str) -> Result<i64, ServiceError> {
    let max_code: Option<Option<String>> = sku::Entity::find()
        .select_only()
        .column_as(sku::Column::SkuCode.max(), "max_code")
        .filter(sku::Column::SkuCode.like(format!("{prefix}-%")))
        .into_tuple()
        .one(db)
        .await?;

    Ok(max_code
        .flatten()
        .and_then(|code| parse_sequence(&code, prefix))
        .unwrap_or(0))
}

fn parse_sequence(code: &str, prefix: &str) -> Option<i64> {
    code.strip_prefix(prefix)?
        .strip_prefix('-')?
        .parse::<i64>()
        .ok()
}
