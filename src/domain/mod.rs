//! Catalog domain types.

pub mod product;

pub use product::{Product, ValidationError, PRODUCT_FIELDS, REQUIRED_FIELDS};
