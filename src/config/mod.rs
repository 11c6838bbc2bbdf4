//! Server configuration, read from a TOML file and overridden by environment
//! variables (`ROOMJOINT_BIND_ADDR`, `ROOMJOINT_WS_PATH`, `ROOMJOINT_LOG`).

use crate::joint::Admission;
use crate::room::{Right, Room, RoomElement, RoomKind};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

pub const ENV_BIND_ADDR: &str = "ROOMJOINT_BIND_ADDR";
pub const ENV_WS_PATH: &str = "ROOMJOINT_WS_PATH";
pub const ENV_LOG: &str = "ROOMJOINT_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub id: u64,
    pub kind: RoomKind,
    pub audio_only: bool,
    pub moderated: bool,
    pub allow_user_questions: bool,
    pub hidden_elements: BTreeSet<RoomElement>,
    /// Granted to every participant as it joins
    pub default_rights: Vec<Right>,
    pub first_is_moderator: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        RoomConfig {
            id: 1,
            kind: RoomKind::Conference,
            audio_only: false,
            moderated: false,
            allow_user_questions: true,
            hidden_elements: BTreeSet::new(),
            default_rights: vec![Right::Audio, Right::Video],
            first_is_moderator: true,
        }
    }
}

impl RoomConfig {
    pub fn room(&self) -> Room {
        Room {
            id: self.id,
            kind: self.kind,
            audio_only: self.audio_only,
            hidden_elements: self.hidden_elements.clone(),
            allow_user_questions: self.allow_user_questions,
            moderated: self.moderated,
        }
    }

    pub fn admission(&self) -> Admission {
        Admission {
            rights: self.default_rights.clone(),
            first_is_moderator: self.first_is_moderator,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JointConfig {
    pub bind_addr: String,
    pub ws_path: String,
    pub log_filter: String,
    pub room: RoomConfig,
}

impl Default for JointConfig {
    fn default() -> Self {
        JointConfig {
            bind_addr: "127.0.0.1:8080".to_string(),
            ws_path: "/ws".to_string(),
            log_filter: "info".to_string(),
            room: RoomConfig::default(),
        }
    }
}

impl JointConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads `path` if given, defaults otherwise, then applies the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Applies overrides looked up through `var`, ignoring empty values.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| var(key).filter(|v| !v.is_empty());
        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = addr;
        }
        if let Some(path) = lookup(ENV_WS_PATH) {
            self.ws_path = path;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
        self
    }
}
