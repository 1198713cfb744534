use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::FetchError,
    model::{CurrentWeather, Location},
    provider::get_json,
};

use super::WeatherProvider;

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

const SERVICE: &str = "Open-Meteo";

/// Current conditions from Open-Meteo. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    url: String,
}

impl OpenMeteoProvider {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            url: OPEN_METEO_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current_weather(&self, location: &Location) -> Result<CurrentWeather, FetchError> {
        debug!(lat = location.lat, lon = location.lon, "requesting current weather");

        let request = self.http.get(&self.url).query(&[
            ("latitude", location.lat.to_string()),
            ("longitude", location.lon.to_string()),
            ("current_weather", "true".to_string()),
        ]);

        let parsed: ForecastResponse = get_json(SERVICE, request, None).await?;

        parsed.current_weather.ok_or(FetchError::MissingField {
            service: SERVICE,
            field: "current_weather",
        })
    }
}
