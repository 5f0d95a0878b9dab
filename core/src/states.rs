/// summary of the server lifecycle shared with the presentation layer
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    #[default]
    Idle,
    Starting,
    Running,
    Stopped,
    Failed,
}

impl ServerState {
    pub fn is_active(&self) -> bool {
        matches!(self, ServerState::Starting | ServerState::Running)
    }
}

/// one running (or starting) served directory on a port
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub directory: PathBuf,
    pub port: u16,
}

impl ServerInfo {
    pub fn base_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }
}
