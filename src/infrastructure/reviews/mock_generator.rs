//! Deterministic fallback reviews for when the review API is unusable.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error};
use uuid::{Builder, Uuid};

use crate::domain::entities::{
    NewReview, ProductId, ProductReviews, Review, ReviewStats, ReviewStatus,
};
use crate::utils::bucketing::stable_hash;

/// Upper bound (exclusive) of synthesized reviews per product.
const MAX_REVIEWS_EXCLUSIVE: u64 = 6;

const CUSTOMER_NAMES: [&str; 5] = [
    "John Doe",
    "Jane Smith",
    "Bob Johnson",
    "Alice Brown",
    "Charlie Davis",
];

const REVIEW_CONTENTS: [&str; 5] = [
    "I've been using this for weeks and it's fantastic.",
    "Exactly what I was looking for. High quality.",
    "The product is decent but shipping took too long.",
    "Works as advertised, very happy with my purchase.",
    "Good value for the money, would buy again.",
];

/// Synthesizes a plausible, stable review set per product.
///
/// Everything except the timestamps' reference point is derived from the
/// product id: the same product always gets the same number of reviews, the
/// same ratings, names, texts and ids, in the same order. Storefront pages
/// therefore keep showing the same numbers across reloads during an outage.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockReviewGenerator;

impl MockReviewGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates fallback reviews relative to the current time.
    pub fn generate(&self, product_id: &ProductId) -> ProductReviews {
        self.generate_at(product_id, Utc::now())
    }

    /// Generates fallback reviews with `created_at` offsets taken from `now`.
    ///
    /// Reviews are sorted newest first; statistics average the generated
    /// ratings rounded to one decimal.
    pub fn generate_at(&self, product_id: &ProductId, now: DateTime<Utc>) -> ProductReviews {
        let seed = stable_hash(product_id.as_str());
        let count = (seed % MAX_REVIEWS_EXCLUSIVE) as usize;
        let mut rng = StdRng::seed_from_u64(seed);

        let mut reviews: Vec<Review> = (0..count)
            .filter_map(|index| synthesize(&mut rng, product_id, index, now))
            .collect();
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let stats = ReviewStats::summarize(product_id.clone(), &reviews);
        debug!(
            product_id = %product_id,
            reviews = reviews.len(),
            average_rating = stats.average_rating(),
            "Generated fallback reviews"
        );

        ProductReviews::new(reviews, stats)
    }
}

fn synthesize(
    rng: &mut StdRng,
    product_id: &ProductId,
    index: usize,
    now: DateTime<Utc>,
) -> Option<Review> {
    let days_ago: i64 = rng.random_range(1..=30);
    let rating = weighted_rating(rng.random_range(1..=100));
    let customer_name = CUSTOMER_NAMES[rng.random_range(0..CUSTOMER_NAMES.len())];
    let content = REVIEW_CONTENTS[rng.random_range(0..REVIEW_CONTENTS.len())];
    let id: Uuid = Builder::from_random_bytes(rng.random()).into_uuid();

    let review = Review::new(NewReview {
        id,
        product_id: product_id.clone(),
        customer_name: customer_name.to_string(),
        title: format!("Sample Review: {} for Product", index + 1),
        content: content.to_string(),
        rating,
        created_at: now - Duration::days(days_ago),
        status: ReviewStatus::Approved,
    });

    review
        .map_err(|e| error!(product_id = %product_id, error = %e, "Fallback review failed validation"))
        .ok()
}

/// Maps a roll in `1..=100` onto a rating skewed towards positive reviews:
/// 10% one star, 15% two, 25% three, 30% four, 20% five.
fn weighted_rating(roll: u32) -> i32 {
    match roll {
        0..=10 => 1,
        11..=25 => 2,
        26..=50 => 3,
        51..=80 => 4,
        _ => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ProductId {
        ProductId::parse(raw).unwrap()
    }

    fn ratings(result: &ProductReviews) -> Vec<u8> {
        result.reviews.iter().map(Review::rating).collect()
    }

    #[test]
    fn test_same_product_same_reviews() {
        let generator = MockReviewGenerator::new();
        for raw in ["P1", "P2", "sku-42", "3f2504e0-4f89-11d3-9a0c-0305e82c3301"] {
            let first = generator.generate(&id(raw));
            let second = generator.generate(&id(raw));

            assert_eq!(first.reviews.len(), second.reviews.len());
            assert_eq!(ratings(&first), ratings(&second));
            assert_eq!(first.stats.average_rating(), second.stats.average_rating());

            let ids = |r: &ProductReviews| r.reviews.iter().map(Review::id).collect::<Vec<_>>();
            assert_eq!(ids(&first), ids(&second));
        }
    }

    #[test]
    fn test_identical_output_for_fixed_clock() {
        let now = Utc::now();
        let generator = MockReviewGenerator::new();
        assert_eq!(
            generator.generate_at(&id("P1"), now),
            generator.generate_at(&id("P1"), now)
        );
    }

    #[test]
    fn test_count_follows_hash() {
        let generator = MockReviewGenerator::new();
        for n in 0..50 {
            let product = id(&format!("product-{n}"));
            let expected = (stable_hash(product.as_str()) % 6) as usize;
            let result = generator.generate(&product);
            assert_eq!(result.reviews.len(), expected);
            assert_eq!(result.stats.review_count() as usize, expected);
        }
    }

    #[test]
    fn test_known_product_count() {
        // SHA-256("P1") prefix mod 6 == 4
        let result = MockReviewGenerator::new().generate(&id("P1"));
        assert_eq!(result.reviews.len(), 4);
    }

    #[test]
    fn test_average_is_rounded_mean() {
        let generator = MockReviewGenerator::new();
        for n in 0..50 {
            let result = generator.generate(&id(&format!("avg-{n}")));
            let r = ratings(&result);
            let expected = if r.is_empty() {
                0.0
            } else {
                let mean = r.iter().map(|&x| f64::from(x)).sum::<f64>() / r.len() as f64;
                (mean * 10.0).round() / 10.0
            };
            assert_eq!(result.stats.average_rating(), expected);
        }
    }

    #[test]
    fn test_reviews_are_valid_and_newest_first() {
        let now = Utc::now();
        let generator = MockReviewGenerator::new();
        for n in 0..50 {
            let result = generator.generate_at(&id(&format!("order-{n}")), now);
            for pair in result.reviews.windows(2) {
                assert!(pair[0].created_at() >= pair[1].created_at());
            }
            for review in &result.reviews {
                assert!((1..=5).contains(&review.rating()));
                assert_eq!(review.status(), ReviewStatus::Approved);
                assert!(CUSTOMER_NAMES.contains(&review.customer_name()));
                assert!(REVIEW_CONTENTS.contains(&review.content()));
                assert!(review.title().starts_with("Sample Review: "));
                let age = now - review.created_at();
                assert!(age >= Duration::days(1) && age <= Duration::days(30));
            }
        }
    }

    #[test]
    fn test_weighted_rating_thresholds() {
        assert_eq!(weighted_rating(1), 1);
        assert_eq!(weighted_rating(10), 1);
        assert_eq!(weighted_rating(11), 2);
        assert_eq!(weighted_rating(25), 2);
        assert_eq!(weighted_rating(26), 3);
        assert_eq!(weighted_rating(50), 3);
        assert_eq!(weighted_rating(51), 4);
        assert_eq!(weighted_rating(80), 4);
        assert_eq!(weighted_rating(81), 5);
        assert_eq!(weighted_rating(100), 5);
    }

    #[test]
    fn test_distribution_skews_positive() {
        let counts = (1..=100).fold([0u32; 5], |mut acc, roll| {
            acc[(weighted_rating(roll) - 1) as usize] += 1;
            acc
        });
        assert_eq!(counts, [10, 15, 25, 30, 20]);
    }
}
