use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, error, instrument};

use common::observability::{UPSTREAM_CALLS_TOTAL, UPSTREAM_ERRORS_TOTAL};
use configs::SteamConfig;

use super::{PlayerSummary, SteamApi, SteamError};

const RESOLVE_VANITY: &str = "ISteamUser/ResolveVanityURL/v1/";
const PLAYER_SUMMARIES: &str = "ISteamUser/GetPlayerSummaries/v2/";
const STEAM_LEVEL: &str = "IPlayerService/GetSteamLevel/v1/";

/// Steam wraps every payload in `{"response": ...}`.
#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize)]
struct VanityResponse {
    #[serde(default)]
    steamid: Option<String>,
}

#[derive(Deserialize)]
struct SummariesResponse {
    #[serde(default)]
    players: Vec<PlayerWire>,
}

#[derive(Deserialize)]
struct PlayerWire {
    steamid: String,
    personaname: String,
    avatarfull: String,
}

#[derive(Deserialize)]
struct LevelResponse {
    #[serde(default)]
    player_level: Option<u32>,
}

/// `reqwest`-backed [`SteamApi`]. Every call carries the configured key as `key=`.
/// No timeout or retry beyond the transport defaults.
#[derive(Clone)]
pub struct SteamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SteamClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.into(), api_key: api_key.into() }
    }

    pub fn from_config(cfg: &SteamConfig) -> Self {
        Self::new(cfg.base_url.clone(), cfg.api_key.clone())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T, SteamError> {
        UPSTREAM_CALLS_TOTAL.inc();
        let result = self.send(endpoint, params).await;
        if let Err(e) = &result {
            UPSTREAM_ERRORS_TOTAL.inc();
            error!(endpoint, error = %e, "steam api call failed");
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T, SteamError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let resp = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| SteamError::Transport { endpoint, message: e.to_string() })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SteamError::Status { endpoint, status: status.as_u16() });
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SteamError::Transport { endpoint, message: e.to_string() })?;
        debug!(endpoint, len = bytes.len(), "steam api response");
        serde_json::from_slice::<Envelope<T>>(&bytes)
            .map(|env| env.response)
            .map_err(|e| SteamError::Malformed { endpoint, message: e.to_string() })
    }
}

#[async_trait]
impl SteamApi for SteamClient {
    #[instrument(skip(self))]
    async fn resolve_vanity(&self, vanity: &str) -> Result<String, SteamError> {
        let resp: VanityResponse = self.get_json(RESOLVE_VANITY, &[("vanityurl", vanity)]).await?;
        resp.steamid
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SteamError::VanityNotFound(vanity.to_string()))
    }

    #[instrument(skip(self))]
    async fn player_summary(&self, steam_id: &str) -> Result<PlayerSummary, SteamError> {
        let resp: SummariesResponse =
            self.get_json(PLAYER_SUMMARIES, &[("steamids", steam_id)]).await?;
        resp.players
            .into_iter()
            .find(|p| p.steamid == steam_id)
            .map(|p| PlayerSummary { persona_name: p.personaname, avatar_url: p.avatarfull })
            .ok_or_else(|| SteamError::PlayerNotFound(steam_id.to_string()))
    }

    #[instrument(skip(self))]
    async fn player_level(&self, steam_id: &str) -> Result<u32, SteamError> {
        let resp: LevelResponse = self.get_json(STEAM_LEVEL, &[("steamid", steam_id)]).await?;
        // private profiles answer with an empty `response` object
        resp.player_level.ok_or_else(|| SteamError::Malformed {
            endpoint: STEAM_LEVEL,
            message: "missing player_level".into(),
        })
    }
}
