//! HTML template rendering handlers for the storefront pages.

mod product_reviews;

pub use product_reviews::{ProductReviewsTemplate, ReviewView, product_reviews_handler};
