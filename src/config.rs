use crate::error::{Error, Result};
use std::time::Duration;

/// Pause between catalog lookups for distinct performers
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 30;
pub const DEFAULT_MARKET: &str = "US";

/// SeatGeek API credentials (https://seatgeek.com/account/develop)
#[derive(Debug, Clone)]
pub struct SeatGeekConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// OhMyRockness API credentials
#[derive(Debug, Clone)]
pub struct OhMyRocknessConfig {
    pub token: String,
    pub user_agent: String,
}

/// Spotify Web API settings
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub access_token: String,
    pub username: Option<String>, // Only needed to create playlists
    pub market: String,
    pub request_interval: Duration,
}

/// Load `.env` if present so credentials can live next to the binary
pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingCredential(key.to_string())),
    }
}

impl SeatGeekConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        Ok(Self {
            client_id: required(&lookup, "SEATGEEK_CLIENT_ID")?,
            client_secret: required(&lookup, "SEATGEEK_CLIENT_SECRET")?,
        })
    }
}

impl OhMyRocknessConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        Ok(Self {
            token: required(&lookup, "OHMYROCKNESS_TOKEN")?,
            user_agent: required(&lookup, "OHMYROCKNESS_USER_AGENT")?,
        })
    }
}

impl SpotifyConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let access_token = required(&lookup, "SPOTIFY_ACCESS_TOKEN")?;
        let username = lookup("SPOTIFY_USERNAME").filter(|name| !name.trim().is_empty());
        let market = lookup("SPOTIFY_MARKET").unwrap_or_else(|| DEFAULT_MARKET.to_string());

        let request_interval_ms = match lookup("SPOTIFY_REQUEST_INTERVAL_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "SPOTIFY_REQUEST_INTERVAL_MS must be a whole number of milliseconds, got '{raw}'"
                ))
            })?,
            None => DEFAULT_REQUEST_INTERVAL_MS,
        };

        Ok(Self {
            access_token,
            username,
            market,
            request_interval: Duration::from_millis(request_interval_ms),
        })
    }

    /// The username is required before any playlist is created
    pub fn require_username(&self) -> Result<&str> {
        self.username
            .as_deref()
            .ok_or_else(|| Error::MissingCredential("SPOTIFY_USERNAME".to_string()))
    }
}
