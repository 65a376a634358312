use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A vendor's storefront. `status` is one of `pending`, `approved`,
/// `suspended`; suspension hides the store from public listings and is
/// applied automatically on severe moderation violations.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub subdomain: String,
    pub contact_email: String,
    pub description: Option<String>,
    pub maker_bio: Option<String>,
    pub welcome_message: Option<String>,
    pub policies: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Payload for registering a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStore {
    pub owner_id: i32,
    pub name: String,
    pub subdomain: String,
    pub contact_email: String,
    pub description: Option<String>,
    pub maker_bio: Option<String>,
    pub welcome_message: Option<String>,
    pub policies: Option<String>,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
}

/// Partial update of store profile fields. Keys left out of the payload
/// are not touched, so this doubles as the `new_data` shape carried by
/// `store_info` change requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker_bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
}

impl StoreUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact_email.is_none()
            && self.description.is_none()
            && self.maker_bio.is_none()
            && self.welcome_message.is_none()
            && self.policies.is_none()
            && self.logo_url.is_none()
            && self.banner_url.is_none()
    }
}
