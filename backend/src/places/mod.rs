//! Places lookup collaborator
//!
//! Finds nearby pharmacies, hospitals and clinics through the Google Places
//! web service (text search and place details).

use anyhow::Context;
use async_trait::async_trait;
use health_tracker_shared::{Coordinates, PlaceCategory, PlaceDetail, PlaceSummary};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("place {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Provider(#[from] anyhow::Error),
}

#[async_trait]
pub trait PlacesLookup: Send + Sync {
    async fn search_nearby(
        &self,
        location: Coordinates,
        category: PlaceCategory,
    ) -> Result<Vec<PlaceSummary>, PlacesError>;

    async fn get_details(&self, place_id: &str) -> Result<PlaceDetail, PlacesError>;
}

// ============================================================================
// Provider Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<ApiPlace>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<ApiPlace>,
}

#[derive(Debug, Deserialize)]
struct ApiPlace {
    place_id: String,
    name: String,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    geometry: ApiGeometry,
    rating: Option<f64>,
    opening_hours: Option<ApiOpeningHours>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiGeometry {
    location: ApiLatLng,
}

#[derive(Debug, Deserialize)]
struct ApiLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct ApiOpeningHours {
    open_now: Option<bool>,
    #[serde(default)]
    weekday_text: Vec<String>,
}

impl ApiPlace {
    fn location(&self) -> Coordinates {
        Coordinates {
            latitude: self.geometry.location.lat,
            longitude: self.geometry.location.lng,
        }
    }

    fn into_summary(self) -> PlaceSummary {
        PlaceSummary {
            location: self.location(),
            open_now: self.opening_hours.as_ref().and_then(|h| h.open_now),
            address: self.formatted_address.or(self.vicinity),
            place_id: self.place_id,
            name: self.name,
            rating: self.rating,
        }
    }

    fn into_detail(self) -> PlaceDetail {
        PlaceDetail {
            location: self.location(),
            opening_hours: self
                .opening_hours
                .map(|h| h.weekday_text)
                .unwrap_or_default(),
            address: self.formatted_address.or(self.vicinity),
            place_id: self.place_id,
            name: self.name,
            phone: self.formatted_phone_number,
            website: self.website,
            rating: self.rating,
        }
    }
}

// ============================================================================
// Google Places Client
// ============================================================================

/// Google Places web service client
#[derive(Clone)]
pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
    radius_m: u32,
}

impl GooglePlacesClient {
    pub fn new(base_url: &str, api_key: &str, radius_m: u32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            radius_m,
        }
    }
}

#[async_trait]
impl PlacesLookup for GooglePlacesClient {
    /// Text search around `location`
    ///
    /// A non-OK provider status (including `ZERO_RESULTS`) yields an empty list.
    async fn search_nearby(
        &self,
        location: Coordinates,
        category: PlaceCategory,
    ) -> Result<Vec<PlaceSummary>, PlacesError> {
        let url = format!("{}/textsearch/json", self.base_url);
        let location_param = format!("{},{}", location.latitude, location.longitude);
        let radius = self.radius_m.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", category.search_query()),
                ("location", location_param.as_str()),
                ("radius", radius.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("Places search request failed")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Places search failed: {}", response.status()).into());
        }

        let result: SearchResponse = response
            .json()
            .await
            .context("Invalid places search response")?;

        if result.status != "OK" {
            warn!(status = %result.status, category = category.as_str(), "Places search returned no results");
            return Ok(Vec::new());
        }

        debug!(count = result.results.len(), "Places search completed");
        Ok(result.results.into_iter().map(ApiPlace::into_summary).collect())
    }

    async fn get_details(&self, place_id: &str) -> Result<PlaceDetail, PlacesError> {
        let url = format!("{}/details/json", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("place_id", place_id), ("key", self.api_key.as_str())])
            .send()
            .await
            .context("Place details request failed")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Place details failed: {}", response.status()).into());
        }

        let details: DetailsResponse = response
            .json()
            .await
            .context("Invalid place details response")?;

        match (details.status.as_str(), details.result) {
            ("OK", Some(place)) => Ok(place.into_detail()),
            ("NOT_FOUND" | "INVALID_REQUEST", _) | ("OK", None) => {
                Err(PlacesError::NotFound(place_id.to_string()))
            }
            (status, _) => Err(anyhow::anyhow!("Place details returned status {}", status).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vancouver() -> Coordinates {
        Coordinates {
            latitude: 49.28,
            longitude: -123.12,
        }
    }

    fn place_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "place_id": id,
            "name": name,
            "formatted_address": "123 Main St",
            "geometry": { "location": { "lat": 49.28, "lng": -123.12 } },
            "rating": 4.5,
            "opening_hours": { "open_now": true, "weekday_text": ["Monday: 9 AM - 5 PM"] }
        })
    }

    #[tokio::test]
    async fn test_search_sends_category_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/textsearch/json"))
            .and(query_param("query", "hospital"))
            .and(query_param("location", "49.28,-123.12"))
            .and(query_param("radius", "10000"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [place_json("p1", "General Hospital")]
            })))
            .mount(&server)
            .await;

        let client = GooglePlacesClient::new(&server.uri(), "test-key", 10_000);
        let places = client
            .search_nearby(vancouver(), PlaceCategory::Hospital)
            .await
            .unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].place_id, "p1");
        assert_eq!(places[0].address.as_deref(), Some("123 Main St"));
        assert_eq!(places[0].open_now, Some(true));
    }

    #[tokio::test]
    async fn test_search_non_ok_status_is_empty() {
        let server = MockServer::start().await;
        Mock::given(path("/textsearch/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ZERO_RESULTS",
                "results": []
            })))
            .mount(&server)
            .await;

        let client = GooglePlacesClient::new(&server.uri(), "k", 10_000);
        let places = client
            .search_nearby(vancouver(), PlaceCategory::Pharmacy)
            .await
            .unwrap();
        assert!(places.is_empty());
    }

    #[tokio::test]
    async fn test_search_http_failure_is_error() {
        let server = MockServer::start().await;
        Mock::given(path("/textsearch/json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = GooglePlacesClient::new(&server.uri(), "k", 10_000);
        let result = client.search_nearby(vancouver(), PlaceCategory::Clinic).await;
        assert!(matches!(result, Err(PlacesError::Provider(_))));
    }

    #[tokio::test]
    async fn test_details() {
        let server = MockServer::start().await;
        let mut place = place_json("p1", "Corner Pharmacy");
        place["formatted_phone_number"] = json!("(604) 555-0100");
        Mock::given(path("/details/json"))
            .and(query_param("place_id", "p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "result": place
            })))
            .mount(&server)
            .await;

        let client = GooglePlacesClient::new(&server.uri(), "k", 10_000);
        let detail = client.get_details("p1").await.unwrap();
        assert_eq!(detail.name, "Corner Pharmacy");
        assert_eq!(detail.phone.as_deref(), Some("(604) 555-0100"));
        assert_eq!(detail.opening_hours.len(), 1);
    }

    #[tokio::test]
    async fn test_details_not_found() {
        let server = MockServer::start().await;
        Mock::given(path("/details/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "NOT_FOUND"
            })))
            .mount(&server)
            .await;

        let client = GooglePlacesClient::new(&server.uri(), "k", 10_000);
        assert!(matches!(
            client.get_details("gone").await,
            Err(PlacesError::NotFound(_))
        ));
    }
}
