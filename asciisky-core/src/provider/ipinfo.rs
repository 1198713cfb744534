use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{error::FetchError, model::Location, provider::get_json};

use super::LocationProvider;

pub const IPINFO_URL: &str = "https://ipinfo.io/json";

const SERVICE: &str = "ipinfo.io";

/// Geolocates the caller by public IP.
#[derive(Debug, Clone)]
pub struct IpInfoProvider {
    http: Client,
    url: String,
}

impl IpInfoProvider {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            url: IPINFO_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
    country: Option<String>,
    /// "lat,lon"
    loc: Option<String>,
}

#[async_trait]
impl LocationProvider for IpInfoProvider {
    async fn locate(&self) -> Result<Location, FetchError> {
        debug!(url = %self.url, "looking up location");

        let request = self.http.get(&self.url);
        let parsed: IpInfoResponse = get_json(SERVICE, request, None).await?;
        into_location(parsed)
    }
}

fn into_location(parsed: IpInfoResponse) -> Result<Location, FetchError> {
    let fallback = Location::fallback();

    let (lat, lon) = match parsed.loc.as_deref() {
        Some(loc) => parse_loc(loc).ok_or_else(|| FetchError::Malformed {
            service: SERVICE,
            field: "loc",
            value: loc.to_string(),
        })?,
        None => (fallback.lat, fallback.lon),
    };

    Ok(Location {
        city: non_empty(parsed.city).or(fallback.city),
        country: non_empty(parsed.country).or(fallback.country),
        lat,
        lon,
    })
}

fn parse_loc(loc: &str) -> Option<(f64, f64)> {
    let (lat, lon) = loc.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;
    (lat.is_finite() && lon.is_finite()).then_some((lat, lon))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
