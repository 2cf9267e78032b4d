//! Service layer module.
//!
//! Contains store-code generation and the store service that assigns codes
//! to records.

pub mod generator;
pub mod store;

pub use generator::{PRIME, StoreCodeGen, encode_section};
pub use store::{DEFAULT_MAX_ATTEMPTS, StoreService};
