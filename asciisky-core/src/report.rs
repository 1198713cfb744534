use chrono::NaiveDate;
use std::fmt::Display;
use tracing::warn;

use crate::{
    art,
    model::{CurrentWeather, Location, MoonPhase},
    provider::{LocationProvider, MoonProvider, WeatherProvider},
};

/// Which parts of the report to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections {
    pub weather: bool,
    pub moon: bool,
}

impl Sections {
    pub const ALL: Sections = Sections {
        weather: true,
        moon: true,
    };
    pub const WEATHER: Sections = Sections {
        weather: true,
        moon: false,
    };
    pub const MOON: Sections = Sections {
        weather: false,
        moon: true,
    };

    /// No flag at all means everything.
    pub fn from_flags(weather: bool, moon: bool, all: bool) -> Self {
        if all || !(weather || moon) {
            Self::ALL
        } else {
            Self { weather, moon }
        }
    }
}

/// One piece of output, in the order it was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Rendered section, meant for stdout.
    Section(String),
    /// `[... fetch failed: ...]` notice, meant for stderr.
    Failure(String),
}

#[derive(Debug, Default)]
pub struct Report {
    pub blocks: Vec<Block>,
}

impl Report {
    pub fn failures(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Failure(_)))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }

    /// Fetch and render the requested sections one after another.
    ///
    /// A failing section becomes a [`Block::Failure`]; the others still run.
    pub async fn collect(
        sections: Sections,
        location: &Location,
        weather: &dyn WeatherProvider,
        moon: Option<&dyn MoonProvider>,
        today: NaiveDate,
    ) -> Self {
        let mut report = Report::default();

        if sections.weather {
            let block = match weather.current_weather(location).await {
                Ok(w) => Block::Section(render_weather(location, &w)),
                Err(e) => Block::Failure(failure_notice("Weather", &e)),
            };
            report.blocks.push(block);
        }

        if sections.moon {
            let block = match moon {
                Some(provider) => match provider.moon_phase(location, today).await {
                    Ok(phase) => Block::Section(render_moon(phase)),
                    Err(e) => Block::Failure(failure_notice("Moon", &e)),
                },
                None => Block::Failure(failure_notice("Moon", &"No API key provided")),
            };
            report.blocks.push(block);
        }

        report
    }
}

/// Locate the caller, or fall back to [`Location::fallback`] with a notice.
pub async fn locate_or_fallback(provider: &dyn LocationProvider) -> (Location, Option<String>) {
    match provider.locate().await {
        Ok(location) => (location, None),
        Err(e) => {
            warn!(error = %e, "location lookup failed, using fallback");
            (Location::fallback(), Some(failure_notice("Location", &e)))
        }
    }
}

pub fn render_weather(location: &Location, weather: &CurrentWeather) -> String {
    format!(
        "\nWeather in {}: {}°C\n{}",
        location.display_name(),
        weather.temperature,
        art::weather_icon(weather.weathercode)
    )
}

pub fn render_moon(phase: MoonPhase) -> String {
    format!(
        "\nMoon Phase ({:.2}):\n{}",
        phase.value(),
        art::moon_icon(phase.value())
    )
}

pub fn failure_notice(what: &str, err: &dyn Display) -> String {
    format!("[{what} fetch failed: {err}]")
}
