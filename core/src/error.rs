use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Custom Error: {0}")]
    Custom(String),

    #[error("folder does not exist: {0}")]
    DirectoryMissing(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization/Deserialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
