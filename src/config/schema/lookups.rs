use serde::{Deserialize, Serialize};

/// Upstream endpoints for the auxiliary weather and route lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupsConfig {
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,
    /// Client signature sent to the geocoder; providers reject anonymous calls
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_route_url")]
    pub route_url: String,
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org".into()
}

fn default_user_agent() -> String {
    "AviationAI/1.0".into()
}

fn default_weather_url() -> String {
    "https://aviationweather.gov".into()
}

fn default_route_url() -> String {
    "https://api.flightplandatabase.com".into()
}

fn default_lookup_timeout_secs() -> u64 {
    15
}

impl Default for LookupsConfig {
    fn default() -> Self {
        Self {
            geocoder_url: default_geocoder_url(),
            user_agent: default_user_agent(),
            weather_url: default_weather_url(),
            route_url: default_route_url(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}
