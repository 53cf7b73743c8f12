//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::FixedOffset;
use eld_geo::{DEFAULT_NOMINATIM_URL, DEFAULT_OSRM_URL, DEFAULT_USER_AGENT, GeoSettings};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Nominatim geocoder.
    pub nominatim_url: String,
    /// Base URL of the OSRM router.
    pub osrm_url: String,
    /// `User-Agent` sent to both services.
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Pause between consecutive geocoding lookups.
    pub geocode_delay_ms: u64,
    /// Hour of day, in the log timezone, at which trips start by default.
    pub start_hour: u32,
    /// UTC offset whose midnight starts each log day.
    pub log_utc_offset_minutes: i32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("nominatim_url", &self.nominatim_url)
            .field("osrm_url", &self.osrm_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("geocode_delay_ms", &self.geocode_delay_ms)
            .field("start_hour", &self.start_hour)
            .field("log_utc_offset_minutes", &self.log_utc_offset_minutes)
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
            geocode_delay_ms: 1100,
            start_hour: 8,
            log_utc_offset_minutes: 0,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (ELD_*)
        figment = figment.merge(Env::prefixed("ELD_"));

        figment.extract()
    }

    /// Settings for the geocoding and routing client.
    pub fn geo_settings(&self) -> GeoSettings {
        GeoSettings {
            nominatim_url: self.nominatim_url.clone(),
            osrm_url: self.osrm_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub const fn geocode_delay(&self) -> Duration {
        Duration::from_millis(self.geocode_delay_ms)
    }

    /// The log timezone, or `None` if the offset is a day or more.
    pub fn log_offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.log_utc_offset_minutes.checked_mul(60)?)
    }
}

/// Returns the platform-specific config directory for eld.
///
/// On Linux: `~/.config/eld`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("eld"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_eld() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "eld");
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("eld.toml");
        std::fs::write(
            &path,
            "osrm_url = \"http://localhost:5000\"\nlog_utc_offset_minutes = -360\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.osrm_url, "http://localhost:5000");
        assert_eq!(config.nominatim_url, DEFAULT_NOMINATIM_URL);
        assert_eq!(config.start_hour, 8);
        assert_eq!(
            config.log_offset(),
            FixedOffset::west_opt(6 * 3600)
        );
    }

    #[test]
    fn test_log_offset_rejects_whole_days() {
        let config = Config {
            log_utc_offset_minutes: 24 * 60,
            ..Config::default()
        };
        assert!(config.log_offset().is_none());
        assert_eq!(Config::default().log_offset(), FixedOffset::east_opt(0));
    }

    #[test]
    fn test_geo_settings_carry_timeout() {
        let settings = Config::default().geo_settings();
        assert_eq!(settings.timeout, Duration::from_secs(10));
        assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(Config::default().geocode_delay(), Duration::from_millis(1100));
    }
}
