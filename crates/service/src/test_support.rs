//! Test doubles for the Steam Web API: an in-process [`FakeSteam`] for service
//! tests and a real HTTP fake for exercising [`SteamClient`](crate::steam::SteamClient).

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicU16, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

use crate::steam::{PlayerSummary, SteamApi, SteamError};

pub const GABEN: &str = "gabelogannewell";
pub const GABEN_ID: &str = "76561197960287930";
const AVATAR: &str = "https://avatars.steamstatic.com/c5d56249ee5d28a07db4ac9f7f60af961fab5426_full.jpg";

/// Knows one player: [`GABEN`] / [`GABEN_ID`].
#[derive(Default)]
pub struct FakeSteam {
    vanity: AtomicUsize,
    summary: AtomicUsize,
    level: AtomicUsize,
    fail_level: bool,
}

impl FakeSteam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_level(mut self) -> Self {
        self.fail_level = true;
        self
    }

    pub fn vanity_calls(&self) -> usize { self.vanity.load(Ordering::SeqCst) }
    pub fn summary_calls(&self) -> usize { self.summary.load(Ordering::SeqCst) }
    pub fn level_calls(&self) -> usize { self.level.load(Ordering::SeqCst) }

    pub fn total_calls(&self) -> usize {
        self.vanity_calls() + self.summary_calls() + self.level_calls()
    }
}

#[async_trait]
impl SteamApi for FakeSteam {
    async fn resolve_vanity(&self, vanity: &str) -> Result<String, SteamError> {
        self.vanity.fetch_add(1, Ordering::SeqCst);
        if vanity == GABEN {
            Ok(GABEN_ID.to_string())
        } else {
            Err(SteamError::VanityNotFound(vanity.to_string()))
        }
    }

    async fn player_summary(&self, steam_id: &str) -> Result<PlayerSummary, SteamError> {
        self.summary.fetch_add(1, Ordering::SeqCst);
        if steam_id == GABEN_ID {
            Ok(PlayerSummary { persona_name: "Rabscuttle".into(), avatar_url: AVATAR.into() })
        } else {
            Err(SteamError::PlayerNotFound(steam_id.to_string()))
        }
    }

    async fn player_level(&self, _steam_id: &str) -> Result<u32, SteamError> {
        self.level.fetch_add(1, Ordering::SeqCst);
        if self.fail_level {
            return Err(SteamError::Status { endpoint: "IPlayerService/GetSteamLevel/v1/", status: 500 });
        }
        Ok(42)
    }
}

#[derive(Default)]
struct FakeServerState {
    hits: Mutex<HashMap<&'static str, usize>>,
    last_key: Mutex<Option<String>>,
    fail_status: AtomicU16,
}

impl FakeServerState {
    fn record(&self, name: &'static str, q: &HashMap<String, String>) -> Option<Response> {
        if let Ok(mut hits) = self.hits.lock() {
            *hits.entry(name).or_default() += 1;
        }
        if let Ok(mut key) = self.last_key.lock() {
            *key = q.get("key").cloned();
        }
        match self.fail_status.load(Ordering::SeqCst) {
            0 => None,
            code => {
                let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Some((status, "fake failure").into_response())
            }
        }
    }
}

/// Handle to a fake Steam Web API listening on an ephemeral local port.
pub struct FakeSteamServer {
    pub base_url: String,
    state: Arc<FakeServerState>,
}

impl FakeSteamServer {
    /// Requests seen for an endpoint (`ResolveVanityURL`, `GetPlayerSummaries`, `GetSteamLevel`).
    pub fn hits(&self, name: &str) -> usize {
        self.state.hits.lock().map(|h| h.get(name).copied().unwrap_or(0)).unwrap_or(0)
    }

    pub fn last_key(&self) -> Option<String> {
        self.state.last_key.lock().ok().and_then(|k| k.clone())
    }

    /// Make every following request answer with `status`.
    pub fn fail_with(&self, status: u16) {
        self.state.fail_status.store(status, Ordering::SeqCst);
    }
}

type Q = Query<HashMap<String, String>>;

async fn resolve_vanity(State(s): State<Arc<FakeServerState>>, Query(q): Q) -> Response {
    if let Some(resp) = s.record("ResolveVanityURL", &q) {
        return resp;
    }
    let body = match q.get("vanityurl").map(String::as_str) {
        Some(GABEN) => json!({"response": {"steamid": GABEN_ID, "success": 1}}),
        _ => json!({"response": {"success": 42, "message": "No match"}}),
    };
    Json(body).into_response()
}

async fn player_summaries(State(s): State<Arc<FakeServerState>>, Query(q): Q) -> Response {
    if let Some(resp) = s.record("GetPlayerSummaries", &q) {
        return resp;
    }
    let players = match q.get("steamids").map(String::as_str) {
        Some(GABEN_ID) => json!([{
            "steamid": GABEN_ID,
            "personaname": "Rabscuttle",
            "profileurl": "https://steamcommunity.com/id/gabelogannewell/",
            "avatarfull": AVATAR,
        }]),
        _ => json!([]),
    };
    Json(json!({"response": {"players": players}})).into_response()
}

async fn steam_level(State(s): State<Arc<FakeServerState>>, Query(q): Q) -> Response {
    if let Some(resp) = s.record("GetSteamLevel", &q) {
        return resp;
    }
    let body = match q.get("steamid").map(String::as_str) {
        Some(GABEN_ID) => json!({"response": {"player_level": 42}}),
        _ => json!({"response": {}}),
    };
    Json(body).into_response()
}

pub async fn spawn_fake_steam() -> anyhow::Result<FakeSteamServer> {
    let state = Arc::new(FakeServerState::default());
    let app = Router::new()
        .route("/ISteamUser/ResolveVanityURL/v1/", get(resolve_vanity))
        .route("/ISteamUser/GetPlayerSummaries/v2/", get(player_summaries))
        .route("/IPlayerService/GetSteamLevel/v1/", get(steam_level))
        .with_state(Arc::clone(&state));

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("fake steam error: {}", e); }
    });
    Ok(FakeSteamServer { base_url: format!("http://{}", addr), state })
}
