use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One proposed mutation awaiting (or having completed) admin review.
///
/// `change_type` constrains which applier may process the request:
/// `store_info`, `product_create`, `product_update`, `product_delete`.
/// Status moves exactly once from `pending` to `approved` or `rejected`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "change_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub store_id: i32,
    pub product_id: Option<i32>,
    pub change_type: String,
    /// JSON payload of the proposed values.
    pub new_data: String,
    /// Screener severity recorded at submission, used to triage the
    /// admin queue (severe first).
    pub moderation_severity: String,
    pub status: String,
    pub reviewer_id: Option<i32>,
    pub reviewed_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::store::Entity",
        from = "Column::StoreId",
        to = "super::store::Column::Id"
    )]
    Store,
}

impl Related<super::store::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Store.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Body of `POST /stores/:id/change-requests`, dispatched on `change_type`.
#[derive(Debug, Deserialize)]
pub struct ChangeRequestPayload {
    pub change_type: String,
    pub product_id: Option<i32>,
    pub data: serde_json::Value,
}

/// Body of the admin approve/reject endpoints.
#[derive(Debug, Deserialize)]
pub struct ReviewAction {
    pub reviewer_id: i32,
    pub reason: Option<String>,
}
