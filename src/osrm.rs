//! OSRM HTTP adapter for travel segments and duration matrices.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::model::{TransportMode, TravelSegment};
use crate::traits::{DurationMatrix, RoutingProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, service: &str, mode: TransportMode, locations: &[(f64, f64)]) -> String {
        let coords = locations
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{}/v1/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            service,
            profile(mode),
            coords
        )
    }

    fn get<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, RoutingError> {
        tracing::debug!(%url, "osrm request");
        let response = self.client.get(url).send()?;
        let status = response.status();

        // OSRM reports routing failures (NoRoute, InvalidQuery) as 4xx with a
        // JSON body, so parse before looking at the status.
        match response.json::<T>() {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => Err(RoutingError::Service {
                code: status.as_u16().to_string(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }
}

/// OSRM has no transit profile; transit legs are estimated on foot.
fn profile(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::Walking | TransportMode::Transit => "foot",
        TransportMode::Driving => "car",
        TransportMode::Cycling => "bike",
    }
}

fn check_code(code: &str, message: Option<String>) -> Result<(), RoutingError> {
    if code == "Ok" {
        return Ok(());
    }
    Err(RoutingError::Service {
        code: code.to_string(),
        message: message.unwrap_or_else(|| "no message".to_string()),
    })
}

impl RoutingProvider for OsrmClient {
    fn segment(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
        mode: TransportMode,
    ) -> Result<TravelSegment, RoutingError> {
        let url = format!(
            "{}?overview=false",
            self.url("route", mode, &[origin, destination])
        );
        let body: OsrmRouteResponse = self.get(url)?;
        check_code(&body.code, body.message)?;

        let route = body
            .routes
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::MalformedResponse("no routes in response".to_string()))?;

        Ok(TravelSegment {
            origin,
            destination,
            mode,
            distance_meters: route.distance,
            duration_seconds: route.duration,
        })
    }

    fn duration_matrix(
        &self,
        locations: &[(f64, f64)],
        mode: TransportMode,
    ) -> Result<DurationMatrix, RoutingError> {
        if locations.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}?annotations=duration",
            self.url("table", mode, locations)
        );
        let body: OsrmTableResponse = self.get(url)?;
        check_code(&body.code, body.message)?;

        body.durations
            .ok_or_else(|| RoutingError::MalformedResponse("no durations in response".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        assert_eq!(profile(TransportMode::Walking), "foot");
        assert_eq!(profile(TransportMode::Transit), "foot");
        assert_eq!(profile(TransportMode::Driving), "car");
        assert_eq!(profile(TransportMode::Cycling), "bike");
    }

    #[test]
    fn test_url_uses_lng_lat_order() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://localhost:5000/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        let url = client.url("table", TransportMode::Driving, &[(35.0116, 135.7681), (34.9671, 135.7727)]);
        assert_eq!(
            url,
            "http://localhost:5000/table/v1/car/135.768100,35.011600;135.772700,34.967100"
        );
    }
}
