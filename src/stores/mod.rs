//! Typed collection access for the three catalog entities.
//!
//! Stores own the persistence queries and nothing else: no cross-entity
//! writes, no orchestration. Aggregators and facades compose them.

mod categories;
mod products;
mod reviews;

pub use categories::CategoryStore;
pub use products::ProductStore;
pub use reviews::ReviewStore;
