// src/repositories/places_legacy.rs - Legacy Places API (find-place + details by place_id)
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::places::{PlacesGeneration, PlacesRepositoryTrait};
use crate::errors::RepositoryError;
use crate::models::{LegacyDetailsResponse, LegacyFindPlaceResponse, PlaceDetails};

type Result<T> = std::result::Result<T, RepositoryError>;

const DETAILS_FIELDS: &str = "rating,user_ratings_total,reviews,url";

pub struct LegacyPlacesRepository {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LegacyPlacesRepository {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl PlacesRepositoryTrait for LegacyPlacesRepository {
    fn generation(&self) -> PlacesGeneration {
        PlacesGeneration::Legacy
    }

    fn place_ref_from_id(&self, place_id: &str) -> String {
        let place_id = place_id.trim();
        place_id
            .strip_prefix("places/")
            .unwrap_or(place_id)
            .to_string()
    }

    async fn search_place(&self, query: &str) -> Result<Option<String>> {
        debug!("Legacy find-place for '{}'", query);

        let response = self
            .client
            .get(format!("{}/findplacefromtext/json", self.base_url))
            .query(&[
                ("input", query),
                ("inputtype", "textquery"),
                ("fields", "place_id"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RepositoryError::Status(response.status().as_u16()));
        }

        // The legacy API signals failure through `status`, not HTTP codes
        let payload: LegacyFindPlaceResponse = response.json().await?;
        if !payload.is_ok() {
            return match payload.error_message {
                Some(message) => Err(RepositoryError::Upstream(message)),
                None => Ok(None),
            };
        }

        Ok(payload.first_place_id())
    }

    async fn fetch_details(&self, place_ref: &str) -> Result<PlaceDetails> {
        debug!("Legacy details for '{}'", place_ref);

        let response = self
            .client
            .get(format!("{}/details/json", self.base_url))
            .query(&[
                ("place_id", place_ref),
                ("fields", DETAILS_FIELDS),
                ("reviews_sort", "newest"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RepositoryError::Status(response.status().as_u16()));
        }

        let payload: LegacyDetailsResponse = response.json().await?;
        let status_ok = payload.status.as_deref() == Some("OK");
        match (status_ok, payload.result) {
            (true, Some(result)) => Ok(PlaceDetails::Legacy(result)),
            _ => Err(match payload.error_message {
                Some(message) => RepositoryError::Upstream(message),
                None => RepositoryError::UnexpectedStatus(
                    payload.status.unwrap_or_else(|| "UNKNOWN".to_string()),
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::{Method::GET, MockServer};
    use serde_json::json;

    use super::*;

    fn repository(server: &MockServer) -> LegacyPlacesRepository {
        LegacyPlacesRepository::new(Client::new(), &server.base_url(), "legacy-key")
    }

    #[test]
    fn test_place_ref_strips_resource_prefix() {
        let repo = LegacyPlacesRepository::new(Client::new(), "http://localhost", "k");
        assert_eq!(repo.place_ref_from_id("places/ChIJ123"), "ChIJ123");
        assert_eq!(repo.place_ref_from_id("ChIJ123"), "ChIJ123");
    }

    #[tokio::test]
    async fn test_find_place_returns_candidate() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/findplacefromtext/json")
                    .query_param("input", "Blue Bunny Rental Cleaners")
                    .query_param("inputtype", "textquery")
                    .query_param("key", "legacy-key");
                then.status(200).json_body(json!({
                    "status": "OK",
                    "candidates": [{ "place_id": "ChIJlegacy" }]
                }));
            })
            .await;

        let place = repository(&server)
            .search_place("Blue Bunny Rental Cleaners")
            .await
            .unwrap();
        assert_eq!(place.as_deref(), Some("ChIJlegacy"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_find_place_status_conventions() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).query_param("input", "denied");
                then.status(200).json_body(json!({
                    "status": "REQUEST_DENIED",
                    "error_message": "This API project is not authorized"
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).query_param("input", "nothing");
                then.status(200).json_body(json!({ "status": "ZERO_RESULTS", "candidates": [] }));
            })
            .await;

        let repo = repository(&server);
        assert!(matches!(
            repo.search_place("denied").await,
            Err(RepositoryError::Upstream(_))
        ));
        assert!(matches!(repo.search_place("nothing").await, Ok(None)));
    }

    #[tokio::test]
    async fn test_details_requests_newest_reviews() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/details/json")
                    .query_param("place_id", "ChIJlegacy")
                    .query_param("reviews_sort", "newest")
                    .query_param("fields", DETAILS_FIELDS);
                then.status(200).json_body(json!({
                    "status": "OK",
                    "result": {
                        "rating": 4.7,
                        "user_ratings_total": 18,
                        "url": "https://maps.google.com/?cid=3",
                        "reviews": [{ "author_name": "Ivy", "rating": 5, "text": "Five stars" }]
                    }
                }));
            })
            .await;

        let place = repository(&server)
            .fetch_details("ChIJlegacy")
            .await
            .unwrap()
            .normalize();
        assert_eq!(place.rating, Some(4.7));
        assert_eq!(place.reviews.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_details_without_ok_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/details/json");
                then.status(200).json_body(json!({ "status": "NOT_FOUND" }));
            })
            .await;

        match repository(&server).fetch_details("gone").await {
            Err(RepositoryError::UnexpectedStatus(status)) => assert_eq!(status, "NOT_FOUND"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
