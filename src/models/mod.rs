//! Concrete entity schemas.

mod article;
mod category;
mod company;
mod product;
mod shared;

pub use article::Article;
pub use category::Category;
pub use company::extract_company_name;
pub use product::Product;
pub use shared::{AdditionalProperty, AggregateRating, Breadcrumb, Gtin, Offer};
