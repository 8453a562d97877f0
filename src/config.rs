use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use log::{info, warn};

use crate::report::MAX_RANGE_DAYS;
use crate::stats::DEFAULT_TREND_WINDOW;

pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub weather_url: String,
    /// Goals are kept in memory when unset.
    pub goals_dir: Option<PathBuf>,
    pub report_max_days: i64,
    pub trend_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_url: DEFAULT_WEATHER_URL.to_owned(),
            goals_dir: None,
            report_max_days: MAX_RANGE_DAYS,
            trend_window: DEFAULT_TREND_WINDOW,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            weather_url: try_load(&lookup, "PGC_WEATHER_URL", defaults.weather_url),
            goals_dir: lookup("PGC_GOALS_DIR")
                .map(|dir| dir.trim().to_owned())
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from)
                .or_else(|| {
                    info!("PGC_GOALS_DIR not set, keeping goals in memory");
                    None
                }),
            report_max_days: try_load(&lookup, "PGC_REPORT_MAX_DAYS", defaults.report_max_days),
            trend_window: try_load(&lookup, "PGC_TREND_WINDOW", defaults.trend_window)
                .max(1),
        }
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value: {e}, using default: {default}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        assert_eq!(config(&[]), Config::default());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("PGC_WEATHER_URL", "http://localhost:9000/forecast"),
            ("PGC_GOALS_DIR", "/var/lib/pgc/goals"),
            ("PGC_REPORT_MAX_DAYS", " 30 "),
            ("PGC_TREND_WINDOW", "6"),
        ]);
        assert_eq!(config.weather_url, "http://localhost:9000/forecast");
        assert_eq!(config.goals_dir, Some(PathBuf::from("/var/lib/pgc/goals")));
        assert_eq!(config.report_max_days, 30);
        assert_eq!(config.trend_window, 6);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[
            ("PGC_REPORT_MAX_DAYS", "sixty"),
            ("PGC_TREND_WINDOW", "0"),
            ("PGC_GOALS_DIR", "  "),
        ]);
        assert_eq!(config.report_max_days, MAX_RANGE_DAYS);
        assert_eq!(config.trend_window, 1);
        assert_eq!(config.goals_dir, None);
    }
}
