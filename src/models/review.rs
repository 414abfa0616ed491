// src/models/review.rs - Normalized testimonial records
use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const REVIEWS_TO_SHOW: usize = 3;
pub const MAX_REVIEW_TEXT_CHARS: usize = 240;
pub const DEFAULT_RELATIVE_TIME: &str = "Google review";

/// One review in the shape every page renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    pub rating: f64,
    pub text: String,
    pub relative_time: String,

    /// Used for ordering only, never rendered
    #[serde(skip)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Builds a review from raw upstream fields, or `None` if a required one is missing.
    ///
    /// Author and text must be non-empty after trimming; the rating must be numeric.
    pub fn from_parts(
        author: Option<&str>,
        rating: Option<f64>,
        text: Option<&str>,
        relative_time: Option<&str>,
        published_at: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        let author = author.map(str::trim).filter(|a| !a.is_empty())?;
        let text = text.map(str::trim).filter(|t| !t.is_empty())?;
        let rating = rating?;

        Some(Self {
            author: author.to_string(),
            rating,
            text: clamp_review_text(text, MAX_REVIEW_TEXT_CHARS),
            relative_time: relative_time
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_RELATIVE_TIME)
                .to_string(),
            published_at,
        })
    }
}

/// Cuts `text` to `max_chars` characters and marks the cut with an ellipsis
pub fn clamp_review_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head.trim_end())
}

/// How a page wants its reviews arranged before truncation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewOrder {
    /// Keep the order the upstream API returned (home page)
    Upstream,
    /// Most recently published first; undated reviews go last (PM landing page)
    NewestFirst,
}

impl ReviewOrder {
    /// Applies the ordering and keeps the first `REVIEWS_TO_SHOW`
    pub fn arrange(&self, mut reviews: Vec<Review>) -> Vec<Review> {
        if *self == ReviewOrder::NewestFirst {
            // Stable, so ties keep upstream order
            reviews.sort_by_key(|review| Reverse(review.published_at));
        }
        reviews.truncate(REVIEWS_TO_SHOW);
        reviews
    }
}

/// Business rating summary handed to the testimonials carousel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub rating: Option<f64>,
    pub total_ratings: Option<u64>,
    pub reviews_url: String,
    pub reviews: Vec<Review>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReviewSummary {
    /// The degraded state: nothing to show, plus an optional diagnostic
    pub fn empty(reviews_url: &str, error: Option<String>) -> Self {
        Self {
            rating: None,
            total_ratings: None,
            reviews_url: reviews_url.to_string(),
            reviews: Vec::new(),
            error,
        }
    }

    /// True when there is something worth rendering
    pub fn has_content(&self) -> bool {
        !self.reviews.is_empty() || self.rating.is_some()
    }

    pub fn without_diagnostics(mut self) -> Self {
        self.error = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn review(author: &str, published_at: Option<DateTime<Utc>>) -> Review {
        Review {
            author: author.to_string(),
            rating: 5.0,
            text: "Great".to_string(),
            relative_time: DEFAULT_RELATIVE_TIME.to_string(),
            published_at,
        }
    }

    #[test]
    fn test_clamp_leaves_short_text_alone() {
        assert_eq!(clamp_review_text("Spotless turnover", 240), "Spotless turnover");
    }

    #[test]
    fn test_clamp_truncates_and_adds_ellipsis() {
        let long = "word ".repeat(100);
        let clamped = clamp_review_text(&long, MAX_REVIEW_TEXT_CHARS);
        assert!(clamped.ends_with("..."));
        // Trailing space before the cut is trimmed
        assert!(!clamped.ends_with(" ..."));
        assert!(clamped.chars().count() <= MAX_REVIEW_TEXT_CHARS + 3);
    }

    #[test]
    fn test_clamp_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(clamp_review_text(&text, 10), text);
        assert_eq!(clamp_review_text(&text, 4), "éééé...");
    }

    #[test]
    fn test_from_parts_drops_records_missing_fields() {
        assert!(Review::from_parts(Some("  "), Some(5.0), Some("Nice"), None, None).is_none());
        assert!(Review::from_parts(Some("Ana"), None, Some("Nice"), None, None).is_none());
        assert!(Review::from_parts(Some("Ana"), Some(4.0), Some(""), None, None).is_none());
        assert!(Review::from_parts(None, Some(4.0), Some("Nice"), None, None).is_none());
    }

    #[test]
    fn test_from_parts_defaults_relative_time() {
        let review = Review::from_parts(Some(" Ana "), Some(4.0), Some(" Nice "), None, None)
            .expect("valid review");
        assert_eq!(review.author, "Ana");
        assert_eq!(review.text, "Nice");
        assert_eq!(review.relative_time, DEFAULT_RELATIVE_TIME);
    }

    #[test]
    fn test_newest_first_orders_and_keeps_ties_stable() {
        let day = |d| Some(Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap());
        let reviews = vec![
            review("old", day(1)),
            review("undated", None),
            review("tie-a", day(5)),
            review("tie-b", day(5)),
            review("newest", day(9)),
        ];

        let arranged = ReviewOrder::NewestFirst.arrange(reviews.clone());
        let authors: Vec<_> = arranged.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["newest", "tie-a", "tie-b"]);

        let upstream = ReviewOrder::Upstream.arrange(reviews);
        let authors: Vec<_> = upstream.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["old", "undated", "tie-a"]);
    }

    #[test]
    fn test_summary_serializes_camel_case_without_publish_time() {
        let summary = ReviewSummary {
            rating: Some(4.9),
            total_ratings: Some(87),
            reviews_url: "https://maps.google.com/?cid=1".to_string(),
            reviews: vec![review("Ana", None)],
            error: None,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalRatings"], 87);
        assert_eq!(json["reviews"][0]["relativeTime"], DEFAULT_RELATIVE_TIME);
        assert!(json.get("error").is_none());
        assert!(json["reviews"][0].get("publishedAt").is_none());
    }
}
