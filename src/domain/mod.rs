//! Domain models for storecode.
//!
//! Generator configuration, charsets, store codes and the entities that own them.

pub mod charset;
pub mod company;
pub mod config;
pub mod entity;
pub mod store_code;
pub mod user;

pub use charset::{Charset, DIGITS, LETTERS};
pub use company::{Company, DocType};
pub use config::GeneratorConfig;
pub use entity::{Reference, StoreEntity, StoreRecord};
pub use store_code::{STORE_CODE_FIELD, StoreCode};
pub use user::{CustomUser, UserProfile, UserType, normalize_email};
