use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::FetchError,
    model::{Location, MoonPhase},
    provider::get_json,
};

use super::MoonProvider;

pub const VISUAL_CROSSING_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

const SERVICE: &str = "Visual Crossing";

/// Moon phase from the Visual Crossing timeline API.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    http: Client,
    base_url: String,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String, http: Client) -> Self {
        Self {
            api_key,
            http,
            base_url: VISUAL_CROSSING_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// `<base>/<location>/<date>/<date>`, one path segment each, without the key.
    fn timeline_url(&self, location: &Location, date: NaiveDate) -> Result<Url, FetchError> {
        let invalid = || FetchError::InvalidBaseUrl {
            service: SERVICE,
            base_url: self.base_url.clone(),
        };

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        let day = date.format("%Y-%m-%d").to_string();
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(&location.query())
            .push(&day)
            .push(&day);

        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    days: Vec<TimelineDay>,
}

#[derive(Debug, Deserialize)]
struct TimelineDay {
    moonphase: Option<f64>,
}

#[async_trait]
impl MoonProvider for VisualCrossingProvider {
    async fn moon_phase(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<MoonPhase, FetchError> {
        let url = self.timeline_url(location, date)?;
        debug!(%url, "requesting moon phase");

        let key = self.api_key.as_str();
        let request = self
            .http
            .get(url)
            .query(&[("key", key), ("includeAstronomy", "true")]);

        let parsed: TimelineResponse = get_json(SERVICE, request, Some(key)).await?;

        let day = parsed.days.first().ok_or(FetchError::MissingField {
            service: SERVICE,
            field: "days",
        })?;

        day.moonphase.map(MoonPhase).ok_or(FetchError::MissingField {
            service: SERVICE,
            field: "moonphase",
        })
    }
}
