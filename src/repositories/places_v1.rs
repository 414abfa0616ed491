// src/repositories/places_v1.rs - Current-generation Places API (search + details by resource name)
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;

use super::places::{PlacesGeneration, PlacesRepositoryTrait};
use crate::errors::RepositoryError;
use crate::models::{PlaceDetails, V1DetailsResponse, V1SearchResponse};

type Result<T> = std::result::Result<T, RepositoryError>;

const API_KEY_HEADER: &str = "x-goog-api-key";
const FIELD_MASK_HEADER: &str = "x-goog-fieldmask";
const SEARCH_FIELD_MASK: &str = "places.name,error";
const DETAILS_FIELD_MASK: &str = "rating,userRatingCount,reviews,googleMapsUri,reviews.rating,reviews.relativePublishTimeDescription,reviews.publishTime,reviews.text,reviews.originalText,reviews.authorAttribution";
const RESOURCE_PREFIX: &str = "places/";

pub struct PlacesV1Repository {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PlacesV1Repository {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl PlacesRepositoryTrait for PlacesV1Repository {
    fn generation(&self) -> PlacesGeneration {
        PlacesGeneration::Current
    }

    fn place_ref_from_id(&self, place_id: &str) -> String {
        let place_id = place_id.trim();
        if place_id.starts_with(RESOURCE_PREFIX) {
            place_id.to_string()
        } else {
            format!("{}{}", RESOURCE_PREFIX, place_id)
        }
    }

    async fn search_place(&self, query: &str) -> Result<Option<String>> {
        debug!("Places v1 text search for '{}'", query);

        let response = self
            .client
            .post(format!("{}/places:searchText", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .header(FIELD_MASK_HEADER, SEARCH_FIELD_MASK)
            .json(&json!({
                "textQuery": query,
                "maxResultCount": 1,
                "languageCode": "en",
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RepositoryError::Status(response.status().as_u16()));
        }

        let payload: V1SearchResponse = response.json().await?;
        if let Some(message) = payload.error.as_ref().and_then(|e| e.message.clone()) {
            return Err(RepositoryError::Upstream(message));
        }

        Ok(payload.first_place_name())
    }

    async fn fetch_details(&self, place_ref: &str) -> Result<PlaceDetails> {
        debug!("Places v1 details for '{}'", place_ref);

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, place_ref))
            .query(&[("languageCode", "en")])
            .header(API_KEY_HEADER, &self.api_key)
            .header(FIELD_MASK_HEADER, DETAILS_FIELD_MASK)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RepositoryError::Status(response.status().as_u16()));
        }

        let payload: V1DetailsResponse = response.json().await?;
        if let Some(message) = payload.error.as_ref().and_then(|e| e.message.clone()) {
            return Err(RepositoryError::Upstream(message));
        }

        Ok(PlaceDetails::Current(payload))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::{Method::GET, Method::POST, MockServer};
    use serde_json::json;

    use super::*;

    fn repository(server: &MockServer) -> PlacesV1Repository {
        PlacesV1Repository::new(Client::new(), &server.base_url(), "test-key")
    }

    #[test]
    fn test_place_ref_gets_resource_prefix() {
        let repo = PlacesV1Repository::new(Client::new(), "http://localhost/", "k");
        assert_eq!(repo.place_ref_from_id(" ChIJ123 "), "places/ChIJ123");
        assert_eq!(repo.place_ref_from_id("places/ChIJ123"), "places/ChIJ123");
    }

    #[tokio::test]
    async fn test_search_returns_first_resource_name() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/places:searchText")
                    .header(API_KEY_HEADER, "test-key")
                    .header(FIELD_MASK_HEADER, SEARCH_FIELD_MASK)
                    .json_body_partial(r#"{"textQuery":"Blue Bunny","maxResultCount":1}"#);
                then.status(200)
                    .json_body(json!({ "places": [{ "name": "places/abc" }, { "name": "places/def" }] }));
            })
            .await;

        let place = repository(&server).search_place("Blue Bunny").await.unwrap();
        assert_eq!(place.as_deref(), Some("places/abc"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_maps_http_and_payload_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).json_body_partial(r#"{"textQuery":"forbidden"}"#);
                then.status(403);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).json_body_partial(r#"{"textQuery":"broken"}"#);
                then.status(200)
                    .json_body(json!({ "error": { "message": "API key not valid", "status": "INVALID_ARGUMENT" } }));
            })
            .await;

        let repo = repository(&server);
        assert!(matches!(
            repo.search_place("forbidden").await,
            Err(RepositoryError::Status(403))
        ));
        match repo.search_place("broken").await {
            Err(RepositoryError::Upstream(message)) => assert_eq!(message, "API key not valid"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_details_by_resource_name() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/places/abc")
                    .query_param("languageCode", "en")
                    .header(API_KEY_HEADER, "test-key");
                then.status(200).json_body(json!({
                    "rating": 4.9,
                    "userRatingCount": 52,
                    "reviews": []
                }));
            })
            .await;

        let details = repository(&server).fetch_details("places/abc").await.unwrap();
        let place = details.normalize();
        assert_eq!(place.rating, Some(4.9));
        assert_eq!(place.total_ratings, Some(52));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_details_non_json_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/places/abc");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        assert!(matches!(
            repository(&server).fetch_details("places/abc").await,
            Err(RepositoryError::Decode(_))
        ));
    }
}
