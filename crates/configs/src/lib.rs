use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

pub const DEFAULT_STEAM_BASE_URL: &str = "http://api.steampowered.com";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub steam: SteamConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: None }
    }
}

/// Steam Web API access. The key is a credential and is never baked into the binary.
#[derive(Clone)]
pub struct SteamConfig {
    pub api_key: String,
    pub base_url: String,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self { api_key: String::new(), base_url: default_base_url() }
    }
}

impl std::fmt::Debug for SteamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteamConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_base_url() -> String { DEFAULT_STEAM_BASE_URL.into() }
fn default_store_path() -> String { "data/db.json".into() }

/// What the TOML file actually sets. `None` (or an empty string) leaves the
/// field to the environment, then to the default.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: FileServer,
    #[serde(default)]
    steam: FileSteam,
    #[serde(default)]
    store: FileStore,
}

#[derive(Debug, Default, Deserialize)]
struct FileServer {
    host: Option<String>,
    port: Option<u16>,
    worker_threads: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSteam {
    api_key: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileStore {
    path: Option<String>,
}

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

/// Read and parse a TOML file, without consulting the environment.
pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Parse TOML, filling unset fields with defaults only.
pub fn parse(content: &str) -> Result<AppConfig> {
    Ok(AppConfig::layered(parse_file(content)?, |_| None))
}

fn parse_file(content: &str) -> Result<FileConfig> {
    Ok(toml::from_str(content)?)
}

fn set(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl AppConfig {
    /// Load `config.toml` when present, fill what it leaves unset from env vars, validate.
    /// A config file that exists but does not parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        let path = config_path();
        let file = if std::path::Path::new(&path).exists() {
            parse_file(&std::fs::read_to_string(&path)?)?
        } else {
            FileConfig::default()
        };
        let mut cfg = Self::layered(file, |k| std::env::var(k).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Parse `content` and fill every field it leaves unset or empty from `lookup`,
    /// then from the defaults. `lookup` is injected so tests stay hermetic.
    pub fn from_toml_with_env<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self::layered(parse_file(content)?, lookup))
    }

    fn layered<F>(file: FileConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |k: &str| set(lookup(k));
        let FileConfig { server, steam, store } = file;
        Self {
            server: ServerConfig {
                host: set(server.host).or_else(|| env("SERVER_HOST")).unwrap_or_else(default_host),
                port: server
                    .port
                    .or_else(|| env("SERVER_PORT").and_then(|p| p.parse().ok()))
                    .unwrap_or_else(default_port),
                worker_threads: server
                    .worker_threads
                    .or_else(|| env("TOKIO_WORKER_THREADS").and_then(|v| v.parse().ok())),
            },
            steam: SteamConfig {
                api_key: set(steam.api_key).or_else(|| env("STEAM_API_KEY")).unwrap_or_default(),
                base_url: set(steam.base_url)
                    .or_else(|| env("STEAM_API_BASE_URL"))
                    .unwrap_or_else(default_base_url),
            },
            store: StoreConfig {
                path: set(store.path).or_else(|| env("LEDGER_DB_PATH")).unwrap_or_else(default_store_path),
            },
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.steam.validate()?;
        if self.store.path.trim().is_empty() {
            return Err(anyhow!("store.path must not be empty"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl SteamConfig {
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("steam.api_key is empty; set it in config.toml or STEAM_API_KEY"));
        }
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("steam.base_url must start with http:// or https://"));
        }
        Ok(())
    }
}
