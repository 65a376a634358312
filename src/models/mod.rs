pub mod change_request;
pub mod moderation_log;
pub mod product;
pub mod store;
pub mod user;

pub use change_request::ChangeRequestPayload;
pub use product::{NewProduct, ProductUpdate};
pub use store::{NewStore, StoreUpdate};
