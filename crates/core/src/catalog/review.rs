//! Product reviews and moderation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ReviewId, UserId};

/// A customer review of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: Option<UserId>,
    /// 1 through 5.
    pub rating: i16,
    pub title: Option<String>,
    pub body: String,
    /// Falls back to "Anonymous" when the reviewer left no name.
    pub reviewer_name: String,
    pub approved: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregate rating shown next to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub count: usize,
    /// Mean rating to one decimal place, `None` without reviews.
    pub average_rating: Option<Decimal>,
}

impl ReviewSummary {
    /// Summarize approved reviews; unapproved ones are ignored.
    #[must_use]
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let ratings: Vec<i64> = reviews
            .iter()
            .filter(|r| r.approved)
            .map(|r| i64::from(r.rating))
            .collect();

        if ratings.is_empty() {
            return Self::default();
        }

        let sum: i64 = ratings.iter().sum();
        let count = ratings.len();
        let average = Decimal::from(sum) / Decimal::from(count);
        Self {
            count,
            average_rating: Some(average.round_dp(1)),
        }
    }
}

/// Storefront display order: featured first, then newest.
pub fn sort_for_display(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| {
        b.featured
            .cmp(&a.featured)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Admin moderation change; absent fields are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewModeration {
    #[serde(default)]
    pub approved: Option<bool>,
    #[serde(default)]
    pub featured: Option<bool>,
}

impl ReviewModeration {
    /// Whether the change touches nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.approved.is_none() && self.featured.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn review(id: i32, rating: i16, approved: bool, featured: bool, day: u32) -> Review {
        Review {
            id: ReviewId::new(id),
            product_id: ProductId::new(1),
            user_id: None,
            rating,
            title: None,
            body: "Lovely".to_string(),
            reviewer_name: "Anonymous".to_string(),
            approved,
            featured,
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_summary_ignores_unapproved() {
        let reviews = vec![
            review(1, 5, true, false, 1),
            review(2, 4, true, false, 2),
            review(3, 1, false, false, 3),
        ];
        let summary = ReviewSummary::from_reviews(&reviews);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average_rating, Some(Decimal::new(45, 1)));
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(ReviewSummary::from_reviews(&[]), ReviewSummary::default());
    }

    #[test]
    fn test_sort_featured_then_newest() {
        let mut reviews = vec![
            review(1, 5, true, false, 1),
            review(2, 4, true, false, 9),
            review(3, 3, true, true, 2),
        ];
        sort_for_display(&mut reviews);
        let ids: Vec<i32> = reviews.iter().map(|r| r.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
