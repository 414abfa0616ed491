// src/models/places.rs - Upstream response shapes, one set per Places API generation
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::review::Review;

// --- Current generation: places.googleapis.com/v1 ---

#[derive(Debug, Default, Deserialize)]
pub struct V1ApiError {
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct V1Place {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct V1SearchResponse {
    pub places: Option<Vec<V1Place>>,
    pub error: Option<V1ApiError>,
}

impl V1SearchResponse {
    /// Resource name of the best match, e.g. `places/ChIJ...`
    pub fn first_place_name(&self) -> Option<String> {
        self.places
            .as_ref()?
            .first()?
            .name
            .as_ref()
            .filter(|name| !name.is_empty())
            .cloned()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct V1LocalizedText {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V1AuthorAttribution {
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V1Review {
    pub rating: Option<JsonValue>,
    pub relative_publish_time_description: Option<String>,
    pub publish_time: Option<String>,
    pub text: Option<V1LocalizedText>,
    pub original_text: Option<V1LocalizedText>,
    pub author_attribution: Option<V1AuthorAttribution>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct V1DetailsResponse {
    pub rating: Option<JsonValue>,
    pub user_rating_count: Option<JsonValue>,
    pub google_maps_uri: Option<String>,
    // Kept raw so one malformed review cannot sink the whole payload
    pub reviews: Option<Vec<JsonValue>>,
    pub error: Option<V1ApiError>,
}

// --- Legacy generation: maps.googleapis.com/maps/api/place ---

#[derive(Debug, Default, Deserialize)]
pub struct LegacyCandidate {
    pub place_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyFindPlaceResponse {
    pub status: Option<String>,
    pub error_message: Option<String>,
    pub candidates: Option<Vec<LegacyCandidate>>,
}

impl LegacyFindPlaceResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }

    pub fn first_place_id(&self) -> Option<String> {
        self.candidates
            .as_ref()?
            .first()?
            .place_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .cloned()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyReview {
    pub author_name: Option<String>,
    pub rating: Option<JsonValue>,
    pub relative_time_description: Option<String>,
    pub text: Option<String>,
    /// Unix seconds
    pub time: Option<JsonValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyPlaceResult {
    pub rating: Option<JsonValue>,
    pub user_ratings_total: Option<JsonValue>,
    pub url: Option<String>,
    pub reviews: Option<Vec<JsonValue>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LegacyDetailsResponse {
    pub status: Option<String>,
    pub error_message: Option<String>,
    pub result: Option<LegacyPlaceResult>,
}

/// Details payload tagged with the generation that produced it
#[derive(Debug)]
pub enum PlaceDetails {
    Current(V1DetailsResponse),
    Legacy(LegacyPlaceResult),
}

/// A place after normalization, before ordering and truncation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedPlace {
    pub rating: Option<f64>,
    pub total_ratings: Option<u64>,
    pub reviews_url: Option<String>,
    pub reviews: Vec<Review>,
}

impl PlaceDetails {
    pub fn normalize(self) -> NormalizedPlace {
        match self {
            PlaceDetails::Current(details) => NormalizedPlace {
                rating: details.rating.as_ref().and_then(JsonValue::as_f64),
                total_ratings: details.user_rating_count.as_ref().and_then(JsonValue::as_u64),
                reviews_url: details.google_maps_uri.filter(|url| !url.is_empty()),
                reviews: details
                    .reviews
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|raw| serde_json::from_value::<V1Review>(raw).ok())
                    .filter_map(normalize_v1_review)
                    .collect(),
            },
            PlaceDetails::Legacy(result) => NormalizedPlace {
                rating: result.rating.as_ref().and_then(JsonValue::as_f64),
                total_ratings: result.user_ratings_total.as_ref().and_then(JsonValue::as_u64),
                reviews_url: result.url.filter(|url| !url.is_empty()),
                reviews: result
                    .reviews
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|raw| serde_json::from_value::<LegacyReview>(raw).ok())
                    .filter_map(normalize_legacy_review)
                    .collect(),
            },
        }
    }
}

/// Adapter for current-generation reviews; the untranslated text wins
pub fn normalize_v1_review(review: V1Review) -> Option<Review> {
    let original = review.original_text.as_ref().and_then(|t| t.text.as_deref());
    let translated = review.text.as_ref().and_then(|t| t.text.as_deref());
    let published_at = review
        .publish_time
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc));

    Review::from_parts(
        review
            .author_attribution
            .as_ref()
            .and_then(|a| a.display_name.as_deref()),
        review.rating.as_ref().and_then(JsonValue::as_f64),
        original.or(translated),
        review.relative_publish_time_description.as_deref(),
        published_at,
    )
}

/// Adapter for legacy reviews
pub fn normalize_legacy_review(review: LegacyReview) -> Option<Review> {
    let published_at = review
        .time
        .as_ref()
        .and_then(JsonValue::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    Review::from_parts(
        review.author_name.as_deref(),
        review.rating.as_ref().and_then(JsonValue::as_f64),
        review.text.as_deref(),
        review.relative_time_description.as_deref(),
        published_at,
    )
}
