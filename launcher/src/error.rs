use thiserror::Error;
use tokio::sync::mpsc::error::SendError;

use crate::server::ServerEvent;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Custom Error: {0}")]
    Custom(String),

    #[error("Error using servr lib: {0}")]
    Lib(#[from] servr_core::error::Error),

    #[error("a server is already running")]
    AlreadyRunning,

    #[error("no server is running")]
    NotRunning,

    #[error("port {0} is outside the serveable range (1000-65535)")]
    PortOutOfRange(u16),

    #[error("port {0} is already in use")]
    PortUnavailable(u16),

    #[error("failed to spawn server process `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("failed to open browser: {0}")]
    OpenBrowser(std::io::Error),

    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Unix Error: {0}")]
    Nix(#[from] nix::Error),

    #[error("Join Error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Event Send Error: {0}")]
    EventSend(#[from] SendError<ServerEvent>),
}
