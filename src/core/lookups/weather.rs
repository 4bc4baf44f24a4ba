use super::geocode::{Coordinates, Geocoder};
use crate::core::providers::{build_identified_client, sanitize_api_error};
use crate::error::LookupError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// One statute mile expressed in degrees.
pub const MILE_TO_DEGREES: f64 = 0.014_492_753_623_188_4;

/// Half-width of the area searched around a geocoded place.
pub const AREA_RADIUS_MILES: f64 = 10.0;

const SERVICE: &str = "aviationweather";

/// Raw observation text exactly as the weather service sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherObservation(String);

impl WeatherObservation {
    /// `None` for empty or whitespace-only text.
    pub fn from_body(body: String) -> Option<Self> {
        if body.trim().is_empty() {
            None
        } else {
            Some(Self(body))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Chat input asking the assistant to decode this observation.
    pub fn as_chat_prompt(&self) -> String {
        format!("Decode: {}", self.0.trim())
    }
}

impl fmt::Display for WeatherObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat0: f64,
    pub lon0: f64,
    pub lat1: f64,
    pub lon1: f64,
}

impl BoundingBox {
    pub fn around(center: Coordinates, radius_miles: f64) -> Self {
        let delta = radius_miles * MILE_TO_DEGREES;
        Self {
            lat0: center.lat - delta,
            lon0: center.lon - delta,
            lat1: center.lat + delta,
            lon1: center.lon + delta,
        }
    }

    /// `lat0,lon0,lat1,lon1` as the weather service expects it.
    pub fn to_query_value(&self) -> String {
        format!("{},{},{},{}", self.lat0, self.lon0, self.lat1, self.lon1)
    }
}

/// Exactly four ASCII letters, in any case.
pub fn is_station_code(identifier: &str) -> bool {
    identifier.len() == 4 && identifier.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Upstream observation source, queried by station or by area.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn by_station(&self, code: &str) -> Result<Option<WeatherObservation>, LookupError>;

    async fn by_area(&self, area: &BoundingBox) -> Result<Option<WeatherObservation>, LookupError>;
}

/// aviationweather.gov data API client.
pub struct AviationWeatherClient {
    client: reqwest::Client,
    metar_url: String,
}

impl AviationWeatherClient {
    pub fn new(base_url: &str, user_agent: &str, timeout_secs: u64) -> Self {
        Self {
            client: build_identified_client(timeout_secs, user_agent),
            metar_url: format!("{}/api/data/metar", base_url.trim_end_matches('/')),
        }
    }

    async fn fetch(&self, param: &str, value: &str) -> Result<Option<WeatherObservation>, LookupError> {
        let resp = self
            .client
            .get(&self.metar_url)
            .query(&[(param, value)])
            .send()
            .await
            .map_err(|e| LookupError::Transport {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LookupError::UpstreamStatus {
                service: SERVICE,
                status: status.as_u16(),
                message: sanitize_api_error(&body),
            });
        }

        let body = resp.text().await.map_err(|e| LookupError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })?;
        Ok(WeatherObservation::from_body(body))
    }
}

#[async_trait]
impl WeatherSource for AviationWeatherClient {
    async fn by_station(&self, code: &str) -> Result<Option<WeatherObservation>, LookupError> {
        self.fetch("ids", code).await
    }

    async fn by_area(&self, area: &BoundingBox) -> Result<Option<WeatherObservation>, LookupError> {
        self.fetch("bbox", &area.to_query_value()).await
    }
}

/// Station-code lookup with a geocoded-area fallback.
#[derive(Clone)]
pub struct WeatherLookup {
    source: Arc<dyn WeatherSource>,
    geocoder: Arc<dyn Geocoder>,
}

impl WeatherLookup {
    pub fn new(source: Arc<dyn WeatherSource>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { source, geocoder }
    }

    /// Only a blank identifier is an error. Every upstream failure on the
    /// way down the chain ends as `Ok(None)`.
    pub async fn observe(&self, identifier: &str) -> Result<Option<WeatherObservation>, LookupError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(LookupError::InvalidInput(
                "weather identifier must not be empty".into(),
            ));
        }

        if is_station_code(identifier) {
            let code = identifier.to_ascii_uppercase();
            match self.source.by_station(&code).await {
                Ok(Some(observation)) => return Ok(Some(observation)),
                Ok(None) => tracing::debug!(station = %code, "No observation for station, trying area"),
                Err(error) => {
                    tracing::warn!(station = %code, %error, "Station lookup failed, trying area");
                }
            }
        }

        let Some(center) = self.geocoder.resolve(identifier).await else {
            tracing::debug!(identifier, "Could not geocode weather identifier");
            return Ok(None);
        };

        let area = BoundingBox::around(center, AREA_RADIUS_MILES);
        match self.source.by_area(&area).await {
            Ok(observation) => Ok(observation),
            Err(error) => {
                tracing::warn!(identifier, %error, "Area lookup failed");
                Ok(None)
            }
        }
    }
}
