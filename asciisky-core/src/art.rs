//! ASCII icons for weather conditions and moon phases.

const SUNNY: &str = r"
          |
          |   .
   `.  *  |     .'
     `. ._|_* .'  .
   . * .'   `.  *
-------|     |-------
   .  *`.___.' *  .
      .'  |* `.  *
    .' *  |  . `.
        . |
          | jgs
";

const CLOUDY: &str = r"
     .--.
  .-(    ).
 (___.__)__)
";

const RAIN: &str = r"
 , // ,,/ ,.// ,/ ,// / /, // ,/, /, // ,/,
 /, .-'   `-. ,// ////, // ,/,/, // ///
";

const SNOW: &str = r"
    *  .  *
  . _\/ \/_ .
   \  \ /  /
  -==>: X :<==-
";

const STORM: &str = "
   .-.
  (   )
 (___)
  ⚡⚡⚡
";

const MOON_NEW: &str = "
     *****
   *********
  ***********
  ***********
   *********
     *****
";

const MOON_FIRST_QUARTER: &str = "
     *****
   ***     *
  ***      *
  ***      *
   ***     *
     *****
";

const MOON_FULL: &str = "
     *****
   *******
  *********
  *********
   *******
     *****
";

const MOON_LAST_QUARTER: &str = "
     *****
   *     ***
  *      ***
  *      ***
   *     ***
     *****
";

/// Coarse grouping of WMO weather interpretation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherKind {
    Sunny,
    Cloudy,
    Rain,
    Snow,
    Storm,
}

impl WeatherKind {
    /// Unknown codes (fog, hail without thunder, ...) are drawn as clouds.
    pub fn from_wmo_code(code: u8) -> Self {
        match code {
            0 => WeatherKind::Sunny,
            1..=3 => WeatherKind::Cloudy,
            51..=67 | 80..=82 => WeatherKind::Rain,
            71..=77 | 85..=86 => WeatherKind::Snow,
            95..=99 => WeatherKind::Storm,
            _ => WeatherKind::Cloudy,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WeatherKind::Sunny => SUNNY,
            WeatherKind::Cloudy => CLOUDY,
            WeatherKind::Rain => RAIN,
            WeatherKind::Snow => SNOW,
            WeatherKind::Storm => STORM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoonKind {
    New,
    FirstQuarter,
    Full,
    LastQuarter,
}

impl MoonKind {
    /// Buckets of a quarter cycle centred on each principal phase.
    pub fn from_phase(phase: f64) -> Self {
        if (0.125..0.375).contains(&phase) {
            MoonKind::FirstQuarter
        } else if (0.375..0.625).contains(&phase) {
            MoonKind::Full
        } else if (0.625..0.875).contains(&phase) {
            MoonKind::LastQuarter
        } else {
            MoonKind::New
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            MoonKind::New => MOON_NEW,
            MoonKind::FirstQuarter => MOON_FIRST_QUARTER,
            MoonKind::Full => MOON_FULL,
            MoonKind::LastQuarter => MOON_LAST_QUARTER,
        }
    }
}

pub fn weather_icon(code: u8) -> &'static str {
    WeatherKind::from_wmo_code(code).icon()
}

pub fn moon_icon(phase: f64) -> &'static str {
    MoonKind::from_phase(phase).icon()
}
