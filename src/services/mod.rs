//! Catalog facades.
//!
//! Each facade owns the stores it needs plus the aggregators that keep the
//! derived state behind it consistent. Primary mutations always commit;
//! follow-up recomputes are best-effort and log a warning when they fail,
//! since the next recompute repairs any drift.

mod categories;
mod products;
mod reviews;

pub use categories::{
    CategoryCatalogService, CategoryWithProducts, NewCategory, UpdateCategory,
};
pub use products::{NewProduct, ProductCatalogService, ProductWithCategory, UpdateProduct};
pub use reviews::{NewReview, ReviewService, UpdateReview};
