//! Core library for the `asciisky` CLI.
//!
//! This crate defines:
//! - Configuration & API key resolution
//! - Clients for the location, weather and moon phase services
//! - ASCII art and report rendering
//!
//! It is used by the `asciisky` binary, but can also be reused by other binaries or services.

pub mod art;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod report;

pub use config::{API_KEY_ENV, ApiKey, ApiKeySource, Config, ProviderConfig, resolve_api_key};
pub use error::FetchError;
pub use model::{CurrentWeather, Location, MoonPhase};
pub use provider::{
    FixedLocation, IpInfoProvider, LocationProvider, MoonProvider, OpenMeteoProvider,
    VisualCrossingProvider, WeatherProvider,
};
pub use report::{Block, Report, Sections};
