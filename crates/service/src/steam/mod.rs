//! Steam Web API integration: profile URL grammar, the HTTP client, and the
//! identifier resolver / profile fetcher built on top of it.

pub mod client;
pub mod profile_url;
pub mod resolver;

use async_trait::async_trait;
use thiserror::Error;

pub use client::SteamClient;
pub use profile_url::{InvalidProfileUrl, ProfileUrl};
pub use resolver::{fetch_profile, resolve_steam_id, Profile};

#[derive(Debug, Error)]
pub enum SteamError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: &'static str, message: String },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error("{endpoint} returned an unexpected body: {message}")]
    Malformed { endpoint: &'static str, message: String },
    #[error("vanity name {0:?} did not resolve to a steam id")]
    VanityNotFound(String),
    #[error("no player found for steam id {0}")]
    PlayerNotFound(String),
}

/// Display data from `GetPlayerSummaries`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSummary {
    pub persona_name: String,
    pub avatar_url: String,
}

/// The three Steam Web API calls the ledger depends on.
#[async_trait]
pub trait SteamApi: Send + Sync {
    /// `ISteamUser/ResolveVanityURL/v1`: vanity name to SteamID64.
    async fn resolve_vanity(&self, vanity: &str) -> Result<String, SteamError>;
    /// `ISteamUser/GetPlayerSummaries/v2` for a single id.
    async fn player_summary(&self, steam_id: &str) -> Result<PlayerSummary, SteamError>;
    /// `IPlayerService/GetSteamLevel/v1`.
    async fn player_level(&self, steam_id: &str) -> Result<u32, SteamError>;
}
