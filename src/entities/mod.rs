pub mod category;
pub mod product;
pub mod review;

pub use category::{CategoryMembership, Entity as Category, Model as CategoryModel};
pub use product::{Entity as Product, Model as ProductModel};
pub use review::{Entity as Review, Model as ReviewModel};
