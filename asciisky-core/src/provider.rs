use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::{
    error::{FetchError, redact_secret, truncate_body},
    model::{CurrentWeather, Location, MoonPhase},
};

pub mod ipinfo;
pub mod open_meteo;
pub mod visual_crossing;

pub use ipinfo::IpInfoProvider;
pub use open_meteo::OpenMeteoProvider;
pub use visual_crossing::VisualCrossingProvider;

/// Every upstream call gives up after this long.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared client for all providers of one invocation.
pub fn http_client() -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("asciisky-core/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn locate(&self) -> Result<Location, FetchError>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, location: &Location) -> Result<CurrentWeather, FetchError>;
}

#[async_trait]
pub trait MoonProvider: Send + Sync + Debug {
    async fn moon_phase(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<MoonPhase, FetchError>;
}

/// A location given up front, e.g. from `--lat/--lon`.
#[derive(Debug, Clone)]
pub struct FixedLocation(pub Location);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Result<Location, FetchError> {
        Ok(self.0.clone())
    }
}

/// Send `request`, require a 2xx status and decode the body as JSON.
///
/// `secret` is scrubbed from error bodies; some services echo the key back.
pub(crate) async fn get_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
    secret: Option<&str>,
) -> Result<T, FetchError> {
    // `without_url` keeps API keys in the query string out of error messages.
    let request_failed = |e: reqwest::Error| FetchError::Request {
        service,
        source: e.without_url(),
    };

    let res = request.send().await.map_err(request_failed)?;
    let status = res.status();
    let body = res.text().await.map_err(request_failed)?;

    debug!(service, %status, bytes = body.len(), "received response");

    if !status.is_success() {
        let body = redact_secret(&body, secret.unwrap_or_default());
        return Err(FetchError::Status {
            service,
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body)
        .map_err(|source| FetchError::Decode { service, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_location_returns_itself() {
        let loc = Location::from_coords(48.85, 2.35);
        let provider = FixedLocation(loc.clone());

        assert_eq!(provider.locate().await.unwrap(), loc);
    }

    #[test]
    fn http_client_builds() {
        assert!(http_client().is_ok());
    }
}
