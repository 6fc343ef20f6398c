use crate::timezone::Timezone;
use log::*;
use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path, path::PathBuf, time::Duration};
use time::{OffsetDateTime, Time, macros::format_description};

pub const ENV_API_URL: &str = "MLB_SIGN_API_URL";
pub const ENV_BRIGHTNESS: &str = "MLB_SIGN_BRIGHTNESS";
pub const ENV_REFRESH_INTERVAL: &str = "MLB_SIGN_REFRESH_INTERVAL";
pub const ENV_TIMEZONE: &str = "MLB_SIGN_TIMEZONE";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub api_key: String,
    pub sign_token: String,
    pub refresh_interval_secs: u64,
    pub timeout_secs: u64,
    pub date: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/external".to_string(),
            api_key: String::new(),
            sign_token: String::new(),
            refresh_interval_secs: 3600,
            timeout_secs: 30,
            date: None,
        }
    }
}

impl Api {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    pub brightness: u8,
    pub rotation_interval_secs: u64,
    pub watchdog_interval_secs: u64,
    pub width: u32,
    pub height: u32,
    pub serial_port: Option<String>,
    pub baud_rate: u32,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            brightness: 50,
            rotation_interval_secs: 10,
            watchdog_interval_secs: 30,
            width: 64,
            height: 32,
            serial_port: None,
            baud_rate: 115_200,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub enabled: bool,
    pub on_time: String,
    pub off_time: String,
    pub timezone: Timezone,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            enabled: false,
            on_time: "07:00".to_string(),
            off_time: "23:00".to_string(),
            timezone: Timezone::local(),
        }
    }
}

fn parse_clock_time(s: &str) -> Option<Time> {
    Time::parse(s.trim(), format_description!("[hour]:[minute]")).ok()
}

impl Schedule {
    /// Whether the panel should be lit at `now`. A disabled schedule, unparseable times, or
    /// identical on and off times all mean "always on". Windows may wrap past midnight.
    pub fn is_on(&self, now: OffsetDateTime) -> bool {
        if !self.enabled {
            return true;
        }

        let (Some(on), Some(off)) = (
            parse_clock_time(&self.on_time),
            parse_clock_time(&self.off_time),
        ) else {
            warn!(
                "Ignoring schedule with unreadable times {:?} - {:?}",
                self.on_time, self.off_time
            );
            return true;
        };

        let local = now.to_offset(self.timezone.offset_at(now)).time();
        if on == off {
            true
        } else if on < off {
            local >= on && local < off
        } else {
            local >= on || local < off
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub cache_file: PathBuf,
    pub api: Api,
    pub display: Display,
    pub schedule: Schedule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from("standings_cache.json"),
            api: Default::default(),
            display: Default::default(),
            schedule: Default::default(),
        }
    }
}

impl Config {
    pub fn new_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let config_file = match read_to_string(path) {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to read config file: {}", e);
                return Err(Box::new(e));
            }
        };

        match toml::from_str(&config_file) {
            Ok(c) => Ok(c),
            Err(e) => {
                error!("Failed to parse config file: {}", e);
                Err(Box::new(e))
            }
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies the `MLB_SIGN_*` overrides found by `lookup`. Values that fail to parse are
    /// logged and skipped.
    pub fn apply_overrides_from<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(url) = lookup(ENV_API_URL) {
            info!("{ENV_API_URL} overrides the API url");
            self.api.base_url = url;
        }

        if let Some(val) = lookup(ENV_BRIGHTNESS) {
            match val.trim().parse() {
                Ok(b) => self.display.brightness = b,
                Err(e) => warn!("Ignoring {ENV_BRIGHTNESS}={val:?}: {e}"),
            }
        }

        if let Some(val) = lookup(ENV_REFRESH_INTERVAL) {
            match val.trim().parse() {
                Ok(secs) => self.api.refresh_interval_secs = secs,
                Err(e) => warn!("Ignoring {ENV_REFRESH_INTERVAL}={val:?}: {e}"),
            }
        }

        if let Some(val) = lookup(ENV_TIMEZONE) {
            match val.parse() {
                Ok(tz) => self.schedule.timezone = tz,
                Err(e) => warn!("Ignoring {ENV_TIMEZONE}: {e}"),
            }
        }
    }
}
