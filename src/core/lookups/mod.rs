pub mod geocode;
pub mod polyline;
pub mod route;
pub mod weather;

pub use geocode::{Coordinates, Geocoder, NominatimGeocoder};
pub use polyline::decode_polyline;
pub use route::{FlightPlanDatabaseClient, RouteLookup, RoutePlan, RouteSource};
pub use weather::{
    AviationWeatherClient, BoundingBox, WeatherLookup, WeatherObservation, WeatherSource,
};
