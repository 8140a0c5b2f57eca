//! The reviews-plus-statistics pair returned to the storefront.

use super::{ProductId, Review, ReviewStats};

/// Default number of reviews per page.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Window over a product's review list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewPage {
    pub limit: usize,
    pub offset: usize,
}

impl ReviewPage {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }
}

impl Default for ReviewPage {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

/// Reviews for one product together with their aggregate statistics.
///
/// Statistics always describe the full review set, also when `reviews` holds
/// only one page of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductReviews {
    pub reviews: Vec<Review>,
    pub stats: ReviewStats,
}

impl ProductReviews {
    pub fn new(reviews: Vec<Review>, stats: ReviewStats) -> Self {
        Self { reviews, stats }
    }

    /// A structurally valid result with no reviews and zeroed statistics.
    pub fn empty(product_id: ProductId) -> Self {
        Self {
            reviews: Vec::new(),
            stats: ReviewStats::empty(product_id),
        }
    }

    /// Keeps only the reviews inside `page`. Statistics are left untouched.
    pub fn paginate(self, page: ReviewPage) -> Self {
        let reviews = self
            .reviews
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect();

        Self {
            reviews,
            stats: self.stats,
        }
    }

    pub fn into_parts(self) -> (Vec<Review>, ReviewStats) {
        (self.reviews, self.stats)
    }
}
