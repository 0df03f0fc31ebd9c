#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::Service;
use uuid::Uuid;

pub const GABEN_VANITY: &str = "gabelogannewell";
pub const GABEN_ID: &str = "76561197960287930";
pub const GABEN_PROFILE_URL: &str = "https://steamcommunity.com/profiles/76561197960287930";

/// Call counters of the fake Steam Web API.
#[derive(Default)]
pub struct SteamHits {
    pub vanity: AtomicUsize,
    pub summaries: AtomicUsize,
    pub level: AtomicUsize,
}

impl SteamHits {
    pub fn vanity(&self) -> usize { self.vanity.load(Ordering::SeqCst) }
    pub fn profile_fetches(&self) -> usize {
        self.summaries.load(Ordering::SeqCst) + self.level.load(Ordering::SeqCst)
    }
}

type Q = Query<HashMap<String, String>>;

async fn resolve_vanity(State(h): State<Arc<SteamHits>>, Query(q): Q) -> Json<Value> {
    h.vanity.fetch_add(1, Ordering::SeqCst);
    match q.get("vanityurl").map(String::as_str) {
        Some(GABEN_VANITY) => Json(json!({"response": {"steamid": GABEN_ID, "success": 1}})),
        _ => Json(json!({"response": {"success": 42, "message": "No match"}})),
    }
}

async fn summaries(State(h): State<Arc<SteamHits>>, Query(q): Q) -> Json<Value> {
    h.summaries.fetch_add(1, Ordering::SeqCst);
    let id = q.get("steamids").cloned().unwrap_or_default();
    // any id that looks like a SteamID64 exists
    let players = if id.len() == 17 && id.chars().all(|c| c.is_ascii_digit()) {
        json!([{
            "steamid": id,
            "personaname": format!("player-{}", &id[12..]),
            "avatarfull": format!("https://avatars.example/{id}_full.jpg"),
        }])
    } else {
        json!([])
    };
    Json(json!({"response": {"players": players}}))
}

async fn level(State(h): State<Arc<SteamHits>>) -> Json<Value> {
    h.level.fetch_add(1, Ordering::SeqCst);
    Json(json!({"response": {"player_level": 12}}))
}

/// Start a fake Steam Web API on an ephemeral port; returns its base URL.
pub async fn spawn_fake_steam() -> anyhow::Result<(String, Arc<SteamHits>)> {
    let hits = Arc::new(SteamHits::default());
    let app = Router::new()
        .route("/ISteamUser/ResolveVanityURL/v1/", get(resolve_vanity))
        .route("/ISteamUser/GetPlayerSummaries/v2/", get(summaries))
        .route("/IPlayerService/GetSteamLevel/v1/", get(level))
        .with_state(Arc::clone(&hits));
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("fake steam error: {}", e); }
    });
    Ok((format!("http://{}", addr), hits))
}

pub struct TestApp {
    pub router: Router,
    pub steam: Arc<SteamHits>,
    pub store_path: PathBuf,
}

impl TestApp {
    pub async fn post(&self, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?;
        self.send(req).await
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        let req = Request::builder().method("GET").uri(uri).body(Body::empty())?;
        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
        let resp = self.router.clone().call(req).await?;
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(dir) = self.store_path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

pub fn config(store_path: &PathBuf, steam_base_url: &str) -> configs::AppConfig {
    let mut cfg = configs::AppConfig::default();
    cfg.store.path = store_path.display().to_string();
    cfg.steam.base_url = steam_base_url.to_string();
    cfg.steam.api_key = "test-key".into();
    cfg
}

/// Full app wired from configuration: JSON file store in target/test-data + fake Steam.
pub async fn build_app() -> anyhow::Result<TestApp> {
    let (base_url, steam) = spawn_fake_steam().await?;
    let store_path = PathBuf::from(format!("target/test-data/{}/db.json", Uuid::new_v4()));
    let router = server::build_app(&config(&store_path, &base_url)).await?;
    Ok(TestApp { router, steam, store_path })
}
