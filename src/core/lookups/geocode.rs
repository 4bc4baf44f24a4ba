use crate::core::providers::build_identified_client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Resolves free-form place text to a coordinate pair.
///
/// Never fails: every upstream problem is logged and reported as no match.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, place: &str) -> Option<Coordinates>;
}

/// Nominatim `/search` client.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    search_url: String,
}

#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl Place {
    fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates {
            lat: self.lat.trim().parse().ok()?,
            lon: self.lon.trim().parse().ok()?,
        })
    }
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Self {
        Self {
            client: build_identified_client(timeout_secs, user_agent),
            search_url: format!("{}/search", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, place: &str) -> Option<Coordinates> {
        let place = place.trim();
        if place.is_empty() {
            return None;
        }

        let resp = match self
            .client
            .get(&self.search_url)
            .query(&[("format", "json"), ("limit", "1"), ("q", place)])
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(error) => {
                tracing::warn!(place, %error, "Geocoder request failed");
                return None;
            }
        };

        if !resp.status().is_success() {
            tracing::warn!(place, status = %resp.status(), "Geocoder returned non-success status");
            return None;
        }

        let places: Vec<Place> = match resp.json().await {
            Ok(places) => places,
            Err(error) => {
                tracing::warn!(place, %error, "Geocoder response could not be decoded");
                return None;
            }
        };

        let coordinates = places.first().and_then(Place::coordinates);
        if coordinates.is_none() {
            tracing::debug!(place, "Geocoder found no match");
        }
        coordinates
    }
}
