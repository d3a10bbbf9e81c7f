//! Skincare catalog
//!
//! Skin type labels and care tips, the product model, and skin-type
//! recommendations spread across brands.

pub mod product;
pub mod recommend;
pub mod skin_type;

pub use product::{categories, format_price, Category, Product, ProductFilter};
pub use recommend::{diversify_brands, filter_by_skin_type, recommend, MAX_RECOMMENDATIONS};
pub use skin_type::SkinType;

use thiserror::Error;

/// Catalog error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown skin type: {0}")]
    UnknownSkinType(String),
}
