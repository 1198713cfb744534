use serde::{Deserialize, Serialize};

/// Where the caller is, as far as we can tell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const FALLBACK_LAT: f64 = 1.29;
    pub const FALLBACK_LON: f64 = 103.85;

    /// Used whenever IP geolocation is unavailable.
    pub fn fallback() -> Self {
        Self {
            city: Some("Singapore".to_string()),
            country: Some("SG".to_string()),
            lat: Self::FALLBACK_LAT,
            lon: Self::FALLBACK_LON,
        }
    }

    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self {
            city: None,
            country: None,
            lat,
            lon,
        }
    }

    /// Location string understood by Visual Crossing: a place name, or "lat,lon".
    pub fn query(&self) -> String {
        match &self.city {
            Some(city) => city.clone(),
            None => format!("{},{}", self.lat, self.lon),
        }
    }

    pub fn display_name(&self) -> String {
        match &self.city {
            Some(city) => city.clone(),
            None => format!("{}, {}", self.lat, self.lon),
        }
    }
}

/// Open-Meteo `current_weather` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Degrees Celsius.
    pub temperature: f64,
    /// WMO weather interpretation code.
    pub weathercode: u8,
    #[serde(default)]
    pub windspeed: Option<f64>,
    #[serde(default)]
    pub time: Option<String>,
}

/// Fraction of the lunar cycle: 0 new, 0.25 first quarter, 0.5 full, 0.75 last quarter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoonPhase(pub f64);

impl MoonPhase {
    pub fn value(self) -> f64 {
        self.0
    }
}
