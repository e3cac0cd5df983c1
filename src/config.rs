use std::env;
use std::path::PathBuf;

use chrono::Duration;

use crate::entities::Coordinates;
use crate::error::{invalid_config_error, Error};

pub const DEFAULT_API_URL: &str = "http://localhost:3001/graphql";
pub const DEFAULT_SESSION_FILE: &str = ".tourline/session.json";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;
// Buenos Aires
pub const DEFAULT_MAP_CENTER: &str = "-34.6037,-58.3816";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub session_ttl: Duration,
    pub map_center: Coordinates,
}

impl Config {
    /// Reads `TOURLINE_*` variables, after loading a `.env` file if present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("TOURLINE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(invalid_config_error("TOURLINE_API_URL"));
        }

        let session_file = lookup("TOURLINE_SESSION_FILE")
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.into())
            .into();

        let ttl_minutes = match lookup("TOURLINE_SESSION_TTL_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| invalid_config_error("TOURLINE_SESSION_TTL_MINUTES"))?,
            None => DEFAULT_SESSION_TTL_MINUTES,
        };
        let session_ttl = Duration::try_minutes(ttl_minutes)
            .ok_or_else(|| invalid_config_error("TOURLINE_SESSION_TTL_MINUTES"))?;

        let map_center = lookup("TOURLINE_MAP_CENTER").unwrap_or_else(|| DEFAULT_MAP_CENTER.into());
        let map_center = Coordinates::try_from(map_center.as_str())
            .map_err(|_| invalid_config_error("TOURLINE_MAP_CENTER"))?;

        Ok(Self {
            api_url,
            session_file,
            session_ttl,
            map_center,
        })
    }
}
