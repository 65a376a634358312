use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only audit trail: one row per screener check, written whether
/// or not a violation was found. Never updated after insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "moderation_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// `store` or `product`.
    pub content_type: String,
    pub store_id: i32,
    pub product_id: Option<i32>,
    pub is_violation: bool,
    pub severity: String,
    /// JSON array of category labels from the screener.
    pub categories: String,
    pub reason: String,
    pub confidence: f64,
    pub checked_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
