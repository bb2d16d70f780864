//! Derived-state maintenance.
//!
//! Three small engines keep redundant columns in sync with the source rows:
//! per-product rating summaries, per-category product counts, and the two
//! dynamic categories curated from product rankings. Each recompute reads the
//! current source rows and overwrites the derived value, so a recompute is
//! always safe to repeat.

mod category_count;
mod curator;
mod rating;

pub use category_count::CategoryCountAggregator;
pub use curator::{
    DynamicCategoryCurator, BEST_SELLERS_NAME, DYNAMIC_MEMBER_LIMIT, LOWEST_PRICE_NAME,
};
pub use rating::{RatingAggregator, RatingSummary};
