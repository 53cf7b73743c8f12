//! Geocoding and routing for the ELD trip planner.
//!
//! Two public OpenStreetMap services stand in for the address and road data:
//! - Nominatim resolves a free-form address to a coordinate
//! - OSRM finds the driving route between two coordinates
//!
//! Response parsing is kept separate from transport so it can be tested
//! without a network.

use std::fmt;
use std::time::Duration;

use eld_core::{Coordinate, Leg, ValidationError};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_USER_AGENT: &str = concat!("eld-trip-planner/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const METERS_PER_MILE: f64 = 1609.344;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Geocoding and routing errors.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The address was empty or whitespace-only.
    #[error("address cannot be empty")]
    EmptyAddress,
    /// Nominatim returned no match.
    #[error("address not found: {address}")]
    AddressNotFound { address: String },
    /// OSRM could not connect the two points.
    #[error("no route found ({code})")]
    NoRoute { code: String },
    /// A configured base URL is unusable.
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Service returned a non-success status.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Endpoints and transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoSettings {
    pub nominatim_url: String,
    pub osrm_url: String,
    /// Sent on every request; Nominatim rejects anonymous clients.
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GeoSettings {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A geocoded address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

impl Location {
    pub fn coordinate(&self) -> Result<Coordinate, ValidationError> {
        Coordinate::new(self.lat, self.lon)
    }
}

/// A driving route between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance_miles: f64,
    pub duration_hours: f64,
    /// Polyline as `[lat, lon]` pairs.
    pub geometry: Vec<[f64; 2]>,
}

impl Route {
    /// The route as a simulator leg. Fails for degenerate zero-length routes.
    pub fn leg(&self) -> Result<Leg, ValidationError> {
        Leg::new(self.distance_miles, self.duration_hours)
    }
}

/// HTTP client for Nominatim and OSRM.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
#[derive(Clone)]
pub struct GeoClient {
    http: reqwest::Client,
    nominatim_url: String,
    osrm_url: String,
}

impl fmt::Debug for GeoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoClient")
            .field("nominatim_url", &self.nominatim_url)
            .field("osrm_url", &self.osrm_url)
            .finish_non_exhaustive()
    }
}

impl GeoClient {
    /// Creates a client from the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(settings: GeoSettings) -> Result<Self, GeoError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent)
            .build()
            .map_err(GeoError::ClientBuild)?;

        Ok(Self {
            http,
            nominatim_url: settings.nominatim_url.trim_end_matches('/').to_string(),
            osrm_url: settings.osrm_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves a free-form address to its best match.
    pub async fn geocode(&self, address: &str) -> Result<Location, GeoError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeoError::EmptyAddress);
        }

        let url = search_url(&self.nominatim_url, address)?;
        tracing::debug!(%url, "geocoding");
        let body = self.fetch(url).await?;
        parse_search_response(address, &body)
    }

    /// Resolves several addresses in order, pausing `delay` between lookups.
    pub async fn geocode_all(
        &self,
        addresses: &[&str],
        delay: Duration,
    ) -> Result<Vec<Location>, GeoError> {
        let mut locations = Vec::with_capacity(addresses.len());
        for (i, address) in addresses.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            locations.push(self.geocode(address).await?);
        }
        Ok(locations)
    }

    /// Fetches the fastest driving route from `from` to `to`.
    pub async fn route(&self, from: Coordinate, to: Coordinate) -> Result<Route, GeoError> {
        let url = route_url(&self.osrm_url, from, to)?;
        tracing::debug!(%url, "routing");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_osrm_error(&body).unwrap_or_else(|| GeoError::Api {
                message: format!("status {status}: {body}"),
            }));
        }
        parse_route_response(&body)
    }

    async fn fetch(&self, url: Url) -> Result<String, GeoError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GeoError::Api {
                message: format!("status {status}: {body}"),
            });
        }
        Ok(body)
    }
}

fn search_url(base: &str, address: &str) -> Result<Url, GeoError> {
    let mut url = Url::parse(&format!("{base}/search"))
        .map_err(|err| GeoError::InvalidUrl(err.to_string()))?;
    url.query_pairs_mut()
        .append_pair("q", address)
        .append_pair("format", "json")
        .append_pair("limit", "1");
    Ok(url)
}

fn route_url(base: &str, from: Coordinate, to: Coordinate) -> Result<Url, GeoError> {
    // OSRM takes lon,lat.
    let mut url = Url::parse(&format!(
        "{base}/route/v1/driving/{},{};{},{}",
        from.lon(),
        from.lat(),
        to.lon(),
        to.lat()
    ))
    .map_err(|err| GeoError::InvalidUrl(err.to_string()))?;
    url.query_pairs_mut()
        .append_pair("overview", "full")
        .append_pair("geometries", "geojson");
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Parses a Nominatim `/search` body, taking the first match.
pub fn parse_search_response(address: &str, body: &str) -> Result<Location, GeoError> {
    let results: Vec<SearchResult> =
        serde_json::from_str(body).map_err(|err| GeoError::InvalidResponse(err.to_string()))?;
    let Some(first) = results.into_iter().next() else {
        return Err(GeoError::AddressNotFound {
            address: address.to_string(),
        });
    };

    let lat = parse_degrees("lat", &first.lat)?;
    let lon = parse_degrees("lon", &first.lon)?;
    Ok(Location {
        lat,
        lon,
        display_name: first.display_name,
    })
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, GeoError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| GeoError::InvalidResponse(format!("{field} is not a number: {raw:?}")))
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Parses an OSRM `/route` body, taking the first route.
pub fn parse_route_response(body: &str) -> Result<Route, GeoError> {
    let payload: RouteResponse =
        serde_json::from_str(body).map_err(|err| GeoError::InvalidResponse(err.to_string()))?;
    if payload.code != "Ok" {
        return Err(GeoError::NoRoute { code: payload.code });
    }
    let Some(route) = payload.routes.into_iter().next() else {
        tracing::warn!("OSRM answered Ok without routes");
        return Err(GeoError::NoRoute { code: payload.code });
    };

    Ok(Route {
        distance_miles: route.distance / METERS_PER_MILE,
        duration_hours: route.duration / SECONDS_PER_HOUR,
        geometry: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| [lat, lon])
            .collect(),
    })
}

/// OSRM reports routing failures such as `NoRoute` with a 4xx status.
fn parse_osrm_error(body: &str) -> Option<GeoError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        code: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .filter(|payload| payload.code != "Ok")
        .map(|payload| GeoError::NoRoute { code: payload.code })
}
