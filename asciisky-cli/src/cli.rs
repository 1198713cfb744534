use anyhow::{Context, bail};
use asciisky_core::{
    API_KEY_ENV, ApiKey, Block, Config, FixedLocation, IpInfoProvider, Location,
    LocationProvider, MoonProvider, OpenMeteoProvider, Report, Sections, VisualCrossingProvider,
    provider, report::locate_or_fallback, resolve_api_key,
};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "asciisky", version, about = "Weather & Moon ASCII Tool")]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub show: ShowArgs,

    /// Log requests and decisions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the Visual Crossing API key in the config file.
    Configure,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Show moon phase
    #[arg(long)]
    pub moon: bool,

    /// Show weather
    #[arg(long)]
    pub weather: bool,

    /// Show all info (the default when no section is chosen)
    #[arg(long)]
    pub all: bool,

    /// Visual Crossing API key (overrides API_KEY and the config file)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Place name used for the moon lookup and the heading
    #[arg(long, value_name = "NAME")]
    pub city: Option<String>,

    /// Latitude; skips IP geolocation
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude; skips IP geolocation
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl ShowArgs {
    pub fn sections(&self) -> Sections {
        Sections::from_flags(self.weather, self.moon, self.all)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            None => show(self.show).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("Visual Crossing API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    let path = config.save()?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let sections = args.sections();
    debug!(?sections, "selected sections");

    // Resolved before any request so a missing key costs no network round trip.
    let env_key = std::env::var(API_KEY_ENV).ok();
    let api_key = moon_api_key(
        sections,
        args.api_key.as_deref(),
        env_key.as_deref(),
        Config::load,
    )?;

    let http = provider::http_client().context("Failed to build HTTP client")?;
    let moon = api_key
        .map(|key| VisualCrossingProvider::new(key.into_string(), http.clone()));

    let ip_lookup = IpInfoProvider::new(http.clone());
    let (location, notice) = resolve_location(&args, &ip_lookup).await;
    if let Some(notice) = notice {
        eprintln!("{notice}");
    }
    debug!(?location, "resolved location");

    let weather = OpenMeteoProvider::new(http);
    let report = Report::collect(
        sections,
        &location,
        &weather,
        moon.as_ref().map(|p| p as &dyn MoonProvider),
        Local::now().date_naive(),
    )
    .await;

    print_report(&report)
}

/// The Visual Crossing key, when the moon section needs one.
///
/// `config` is only called for the moon section, and only when neither `flag`
/// nor `env` holds a key.
fn moon_api_key(
    sections: Sections,
    flag: Option<&str>,
    env: Option<&str>,
    config: impl FnOnce() -> anyhow::Result<Config>,
) -> anyhow::Result<Option<ApiKey>> {
    if !sections.moon {
        return Ok(None);
    }

    let key = resolve_api_key(flag, env, config)?.with_context(|| {
        format!(
            "You must provide a Visual Crossing API key either via --api-key, \
             the {API_KEY_ENV} environment variable (.env) or `asciisky configure`"
        )
    })?;
    debug!(source = %key.source(), "using Visual Crossing API key");

    Ok(Some(key))
}

/// `--lat/--lon` replace `ip_lookup`; `--city` only renames whatever was found.
async fn resolve_location(
    args: &ShowArgs,
    ip_lookup: &dyn LocationProvider,
) -> (Location, Option<String>) {
    let (mut location, notice) = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            let fixed = FixedLocation(Location::from_coords(lat, lon));
            locate_or_fallback(&fixed).await
        }
        _ => locate_or_fallback(ip_lookup).await,
    };

    if let Some(city) = &args.city {
        location.city = Some(city.clone());
    }

    (location, notice)
}

/// Sections go to stdout, failure notices to stderr; any failure fails the run.
fn print_report(report: &Report) -> anyhow::Result<()> {
    for block in &report.blocks {
        match block {
            Block::Section(text) => println!("{text}"),
            Block::Failure(notice) => eprintln!("{notice}"),
        }
    }

    if !report.is_success() {
        bail!(
            "{} of the requested sections could not be fetched",
            report.failures()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use asciisky_core::ApiKeySource;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("asciisky").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    fn unreadable_config() -> anyhow::Result<Config> {
        Err(anyhow!("config file must not be read"))
    }

    #[test]
    fn bare_invocation_shows_everything() {
        let cli = parse(&[]);

        assert!(cli.command.is_none());
        assert_eq!(cli.show.sections(), Sections::ALL);
    }

    #[test]
    fn all_flag_parses() {
        let cli = parse(&["--all"]);
        assert!(cli.show.all);
    }

    #[test]
    fn section_flags_combine() {
        let cli = parse(&["--weather", "--moon", "--api-key", "KEY"]);

        assert!(cli.show.weather);
        assert!(cli.show.moon);
        assert_eq!(cli.show.api_key.as_deref(), Some("KEY"));
    }

    #[test]
    fn coordinates_accept_negative_values() {
        let cli = parse(&["--lat", "-33.9", "--lon", "18.4", "--city", "Cape Town"]);

        assert_eq!(cli.show.lat, Some(-33.9));
        assert_eq!(cli.show.lon, Some(18.4));
        assert_eq!(cli.show.city.as_deref(), Some("Cape Town"));
    }

    #[test]
    fn lat_without_lon_is_rejected() {
        let err = Cli::try_parse_from(["asciisky", "--lat", "10"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn configure_subcommand_parses() {
        let cli = parse(&["configure", "-v"]);

        assert!(matches!(cli.command, Some(Command::Configure)));
        assert!(cli.verbose);
    }

    #[test]
    fn section_flags_conflict_with_configure() {
        assert!(Cli::try_parse_from(["asciisky", "--moon", "configure"]).is_err());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["asciisky", "--sun"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn moon_without_key_fails_naming_every_source() {
        let err = moon_api_key(Sections::MOON, None, None, || Ok(Config::default()))
            .unwrap_err();
        let msg = err.to_string();

        assert!(msg.starts_with("You must provide a Visual Crossing API key"));
        assert!(msg.contains("--api-key"));
        assert!(msg.contains("the API_KEY environment variable (.env)"));
        assert!(msg.contains("`asciisky configure`"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let result = moon_api_key(Sections::ALL, Some(" "), Some(""), || Ok(Config::default()));
        assert!(result.is_err());
    }

    #[test]
    fn weather_only_needs_no_key() {
        let key = moon_api_key(Sections::WEATHER, None, None, unreadable_config)
            .unwrap();
        assert!(key.is_none());
    }

    #[test]
    fn env_key_is_used_without_reading_config() {
        let key = moon_api_key(Sections::ALL, None, Some("ENV"), unreadable_config)
            .unwrap()
            .expect("key must resolve");

        assert_eq!(key.as_str(), "ENV");
        assert_eq!(key.source(), ApiKeySource::Env);
    }

    #[test]
    fn broken_config_is_reported_when_needed() {
        let err = moon_api_key(Sections::MOON, None, None, unreadable_config)
            .unwrap_err();
        assert!(err.to_string().contains("config file must not be read"));
    }

    #[tokio::test]
    async fn coordinates_skip_ip_lookup() {
        let args = parse(&["--lat", "-33.9", "--lon", "18.4"]).show;
        let ip_lookup = FixedLocation(Location::fallback());

        let (location, notice) = resolve_location(&args, &ip_lookup).await;

        assert!(notice.is_none());
        assert_eq!(location, Location::from_coords(-33.9, 18.4));
    }

    #[tokio::test]
    async fn city_only_renames_ip_location() {
        let args = parse(&["--city", "Kyoto"]).show;
        let ip_lookup = FixedLocation(Location::fallback());

        let (location, _) = resolve_location(&args, &ip_lookup).await;

        assert_eq!(location.city.as_deref(), Some("Kyoto"));
        assert_eq!(location.country.as_deref(), Some("SG"));
        assert_eq!(location.lat, Location::FALLBACK_LAT);
        assert_eq!(location.lon, Location::FALLBACK_LON);
    }

    #[tokio::test]
    async fn city_and_coordinates_combine() {
        let cli = parse(&["--lat", "-33.9", "--lon", "18.4", "--city", "Cape Town"]);
        let ip_lookup = FixedLocation(Location::fallback());

        let (location, _) = resolve_location(&cli.show, &ip_lookup).await;

        assert_eq!(location.query(), "Cape Town");
        assert_eq!(location.lat, -33.9);
    }

    #[test]
    fn failed_section_fails_the_run() {
        let report = Report {
            blocks: vec![
                Block::Section("\nWeather in Singapore: 31.2°C\n".into()),
                Block::Failure("[Moon fetch failed: 401 Unauthorized]".into()),
            ],
        };

        let err = print_report(&report).unwrap_err();
        assert_eq!(
            err.to_string(),
            "1 of the requested sections could not be fetched"
        );
    }

    #[test]
    fn complete_report_succeeds() {
        let report = Report {
            blocks: vec![Block::Section("\nMoon Phase (0.50):\n".into())],
        };

        assert!(print_report(&report).is_ok());
    }
}
