use std::path::Path;

use servr_core::{
    events::ServerNotification,
    folder::{self, FolderEntry},
    projects::ProjectStore,
    states::{ServerInfo, ServerState},
};
use tokio::sync::mpsc;

use crate::{
    command::ServeCommand,
    prelude::*,
    server::{Server, ServerHandle},
};

/// lower bound of the serveable port range
const MIN_PORT: u16 = 1000;

struct ActiveServer {
    info: ServerInfo,
    handle: ServerHandle,
    worker: ServerTask,
}

/// The control-thread owner of the single optional server session and
/// the recent-projects store. Workers only emit notifications; every
/// state mutation happens here, on the caller's thread.
pub struct Launcher {
    command: ServeCommand,
    store: ProjectStore,
    status_tx: mpsc::UnboundedSender<ServerNotification>,
    active: Option<ActiveServer>,
    state: ServerState,
}

impl Launcher {
    /// a launcher over the user-scoped store, plus the status feed its
    /// workers will report into
    pub fn new() -> Result<(Self, mpsc::UnboundedReceiver<ServerNotification>)> {
        Ok(Self::with_store(ProjectStore::open_default()?, ServeCommand::default()))
    }

    pub fn with_store(
        store: ProjectStore,
        command: ServeCommand,
    ) -> (Self, mpsc::UnboundedReceiver<ServerNotification>) {
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        (
            Self {
                command,
                store,
                status_tx,
                active: None,
                state: ServerState::Idle,
            },
            status_rx,
        )
    }

    /// Fail-fast preconditions, then spawn. Nothing changes unless the
    /// whole start succeeds; "started" arrives on the status feed once
    /// the child is alive.
    #[instrument(skip(self))]
    pub fn start(&mut self, directory: &Path, port: u16) -> Result<ServerInfo> {
        if self.active.is_some() {
            return Err(Error::AlreadyRunning);
        }
        if port < MIN_PORT {
            return Err(Error::PortOutOfRange(port));
        }
        folder::validate_dir(directory)?;
        let directory = directory.canonicalize()?;
        if !folder::is_port_available(port) {
            return Err(Error::PortUnavailable(port));
        }

        let (handle, worker) = Server::spawn(directory.clone(), port, &self.command, self.status_tx.clone())?;
        let info = ServerInfo { directory, port };
        info!(directory = %info.directory.display(), port, "server starting");
        self.active = Some(ActiveServer {
            info: info.clone(),
            handle,
            worker,
        });
        self.state = ServerState::Starting;
        Ok(info)
    }

    /// Idempotent: stopping an idle launcher is a no-op. Bounded by the
    /// worker's SIGTERM grace window.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Result<()> {
        let Some(active) = self.active.take() else {
            return Ok(());
        };
        if let Err(e) = active.handle.stop().await {
            // the worker already exited on its own
            debug!("stop not delivered: {e}");
        }
        active.worker.await??;
        self.state = ServerState::Stopped;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some() && self.state.is_active()
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn current(&self) -> Option<&ServerInfo> {
        self.active.as_ref().map(|active| &active.info)
    }

    /// Control-thread reaction to a delivered worker notification; a
    /// terminal notification releases the session handle so a new start
    /// can follow.
    pub fn on_notification(&mut self, notification: &ServerNotification) {
        match notification {
            ServerNotification::Started { port } => {
                debug!(port, "server confirmed started");
                self.state = ServerState::Running;
            }
            ServerNotification::Stopped => {
                self.state = ServerState::Stopped;
                self.active = None;
            }
            ServerNotification::Failed { message } => {
                warn!("server failed: {message}");
                self.state = ServerState::Failed;
                self.active = None;
            }
        }
    }

    pub fn list_recent(&mut self, n: usize) -> Vec<(String, u64)> {
        self.store.top_n(n)
    }

    pub fn record_use(&mut self, path: &Path) {
        self.store.add(path.to_string_lossy());
    }

    pub fn clear_recent(&mut self) {
        self.store.clear();
    }

    pub fn validate_folder(path: &Path) -> Result<()> {
        Ok(folder::validate_dir(path)?)
    }

    pub fn list_folder(path: &Path) -> Result<Vec<FolderEntry>> {
        Ok(folder::list_contents(path)?)
    }

    /// the URL the browser should land on: the directory's index file
    /// per the conventional-name policy, else the server root
    pub fn serve_url(&self) -> Option<String> {
        let info = self.current()?;
        let base = info.base_url();
        match folder::find_index_file(&info.directory) {
            Some(file) => Some(format!("{base}/{file}")),
            None => Some(base),
        }
    }

    /// hands the serve URL to the platform's default browser
    pub fn open_browser(&self) -> Result<()> {
        let url = self.serve_url().ok_or(Error::NotRunning)?;
        info!(url, "opening browser");
        open::that(&url).map_err(Error::OpenBrowser)
    }
}
