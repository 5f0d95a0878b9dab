use std::path::PathBuf;
use std::time::Duration;

use nix::{
    sys::signal::{Signal, kill},
    unistd::Pid,
};
use servr_core::events::ServerNotification;
use tokio::{process::Child, sync::mpsc, time::timeout};
use tracing::Instrument;

use crate::{command::ServeCommand, prelude::*};

/// how long a stopped child gets to exit on SIGTERM before SIGKILL
const STOP_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub enum ServerEvent {
    Stop,
}
use ServerEvent::*;

/// Worker actor for one server session: owns the spawned child process,
/// blocks on its exit, and reports lifecycle transitions on the status
/// channel. The worker is the only sender for its session, so `Started`
/// always precedes the terminal notification.
pub struct Server {
    tx: mpsc::Sender<ServerEvent>,
    rx: mpsc::Receiver<ServerEvent>,
    directory: PathBuf,
    port: u16,
    status_tx: mpsc::UnboundedSender<ServerNotification>,
}

impl Server {
    #[instrument(skip(command, status_tx))]
    pub fn spawn(
        directory: PathBuf,
        port: u16,
        command: &ServeCommand,
        status_tx: mpsc::UnboundedSender<ServerNotification>,
    ) -> Result<(ServerHandle, ServerTask)> {
        let server = Server::new(directory, port, status_tx);
        server.run(command)
    }

    fn new(directory: PathBuf, port: u16, status_tx: mpsc::UnboundedSender<ServerNotification>) -> Self {
        let (tx, rx) = mpsc::channel::<ServerEvent>(10);
        Self {
            tx,
            rx,
            directory,
            port,
            status_tx,
        }
    }

    #[instrument(skip(self, command))]
    fn run(mut self, command: &ServeCommand) -> Result<(ServerHandle, ServerTask)> {
        let span = tracing::Span::current();
        debug!("spawning child server process");
        let mut child = command
            .build(&self.directory, self.port)
            .spawn()
            .map_err(|source| Error::Spawn {
                command: command.display(self.port),
                source,
            })?;

        let handle = ServerHandle { tx: self.tx.clone() };
        let task: ServerTask = tokio::spawn({
            async move {
                if let Some(pid) = child.id() {
                    debug!("child PID: {pid}");
                }
                self.emit(ServerNotification::Started { port: self.port });

                loop {
                    tokio::select! {
                        status = child.wait() => {
                            match status {
                                Ok(status) if status.success() => {
                                    info!("server process exited cleanly");
                                    self.emit(ServerNotification::Stopped);
                                }
                                Ok(status) => {
                                    warn!("server process exited: {status}");
                                    self.emit(ServerNotification::Failed {
                                        message: format!("server process exited: {status}"),
                                    });
                                }
                                Err(e) => {
                                    error!("could not wait on server process: {e}");
                                    self.emit(ServerNotification::Failed { message: e.to_string() });
                                }
                            }
                            break;
                        },
                        Some(event) = self.rx.recv() => {
                            match event {
                                Stop => {
                                    debug!("Server: Stop");
                                    Self::handle_stop(&mut child).await?;
                                    self.emit(ServerNotification::Stopped);
                                    break;
                                }
                            }
                        },
                    }
                }
                debug!("stopping server worker");
                Ok(())
            }
            .instrument(span)
        });

        Ok((handle, task))
    }

    /// graceful terminate, bounded wait, forced kill on overrun
    async fn handle_stop(child: &mut Child) -> Result<()> {
        if let Some(pid) = child.id() {
            kill(Pid::from_raw(pid as i32), Signal::SIGTERM)?;
            match timeout(STOP_GRACE, child.wait()).await {
                Ok(status) => {
                    info!("server process exited after SIGTERM: {:?}", status?);
                    return Ok(());
                }
                Err(_elapsed) => {
                    warn!("server process ignored SIGTERM for {STOP_GRACE:?}, killing it");
                }
            }
        }
        child.kill().await?;
        Ok(())
    }

    fn emit(&self, notification: ServerNotification) {
        if self.status_tx.send(notification).is_err() {
            warn!("status listener is gone, dropping notification");
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerHandle {
    tx: mpsc::Sender<ServerEvent>,
}

impl ServerHandle {
    pub async fn stop(&self) -> Result<()> {
        Ok(self.tx.send(ServerEvent::Stop).await?)
    }
}
