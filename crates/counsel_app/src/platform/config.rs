use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use counsel_engine::{EngineSettings, FetchSettings, LlmConfig, SearchSettings};
use engine_logging::{engine_info, engine_warn};
use serde::Deserialize;

const DEFAULT_SECRETS_FILE: &str = "secrets.ron";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_ADDR: &str = "127.0.0.1:8501";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read secrets from {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse secrets in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("{0} is not set in the secrets file or the environment")]
    Missing(&'static str),
    #[error("invalid bind address {0:?}")]
    BadAddr(String),
}

/// On-disk secrets store, e.g.
/// `(serp_api_key: "...", openai_api_key: "...", model: Some("gpt-4o-mini"))`.
#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    serp_api_key: Option<String>,
    #[serde(default)]
    openai_api_key: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub serp_api_key: String,
    pub openai_api_key: String,
    pub model: String,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Reads `COUNSEL_SECRETS` (default `secrets.ron`) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("COUNSEL_SECRETS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SECRETS_FILE));
        Self::load_from(&path, |name| std::env::var(name).ok())
    }

    /// Environment values win over file values; a missing file is not an error.
    pub fn load_from(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = read_secrets_file(path)?;
        let pick = |name: &str, from_file: Option<String>| {
            env(name)
                .filter(|value| !value.trim().is_empty())
                .or(from_file)
                .filter(|value| !value.trim().is_empty())
        };

        let serp_api_key =
            pick("SERP_API_KEY", file.serp_api_key).ok_or(ConfigError::Missing("SERP_API_KEY"))?;
        let openai_api_key = pick("OPENAI_API_KEY", file.openai_api_key)
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        let model = pick("OPENAI_MODEL", file.model).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let raw_addr = env("COUNSEL_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::BadAddr(raw_addr.clone()))?;

        Ok(Self {
            serp_api_key,
            openai_api_key,
            model,
            bind_addr,
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            search: SearchSettings::new(self.serp_api_key.clone()),
            fetch: FetchSettings::default(),
            llm: LlmConfig::new(self.model.clone(), self.openai_api_key.clone()),
        }
    }
}

fn read_secrets_file(path: &Path) -> Result<SecretsFile, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            engine_warn!("No secrets file at {:?}; relying on the environment", path);
            return Ok(SecretsFile::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let secrets = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    engine_info!("Loaded secrets from {:?}", path);
    Ok(secrets)
}
