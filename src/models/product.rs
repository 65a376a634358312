use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A product listing. Live fields are what shoppers see; the `draft_*`
/// columns hold proposed values while an admin-reviewed `product_update`
/// change request is pending, and are cleared when it resolves.
///
/// `moderation_status` is one of `pending`, `approved`, `flagged`,
/// `hidden`. `hidden` always implies `active = false`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub store_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub active: bool,
    pub moderation_status: String,
    pub has_pending_changes: bool,
    pub draft_name: Option<String>,
    pub draft_description: Option<String>,
    pub draft_price: Option<f64>,
    pub draft_image_url: Option<String>,
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

/// Payload for creating a product, on both the direct path and as the
/// `new_data` of a `product_create` change request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
}

/// Partial product update. Doubles as the `new_data` shape of a
/// `product_update` change request; each present field is staged into
/// the matching draft column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
    }
}
