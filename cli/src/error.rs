use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error using servr lib: {0}")]
    Lib(#[from] servr_core::error::Error),

    #[error("{0}")]
    Launcher(#[from] servr_launcher::error::Error),

    #[error("Error initializing logger: {0}")]
    Logger(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),
}
