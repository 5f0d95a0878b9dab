mod args;
mod error;

use std::path::{Path, PathBuf};

use clap::Parser;
use servr_core::{events::ServerNotification, projects::ProjectStore};
use servr_launcher::{command::ServeCommand, launcher::Launcher};
use tracing::{debug, instrument};

use crate::{
    args::{Args, Commands},
    error::Result,
};

#[tokio::main]
async fn main() {
    let cli = Args::parse();

    match setup_logging() {
        Ok(_guard) => {
            if let Err(e) = run(cli.command).await {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
}

fn setup_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::{non_blocking, rolling};
    use tracing_subscriber::{EnvFilter, fmt};

    let file_appender = rolling::daily("logs", "servr.log");
    let (non_blocking, guard) = non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt().with_writer(non_blocking).with_env_filter(env_filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}

#[instrument]
async fn run(command: Commands) -> Result<()> {
    debug!("Running command: {:?}", command);
    match command {
        Commands::Serve {
            directory,
            port,
            open,
            command,
        } => serve(directory, port, open, command).await,
        Commands::Recent { limit } => recent(limit),
        Commands::ClearRecent => clear_recent(),
        Commands::Ls { directory } => ls(&directory),
    }
}

#[instrument]
async fn serve(directory: PathBuf, port: u16, open: bool, command: Option<String>) -> Result<()> {
    let command = command.as_deref().and_then(ServeCommand::parse).unwrap_or_default();
    let (mut launcher, mut status_rx) = Launcher::with_store(ProjectStore::open_default()?, command);

    let info = launcher.start(&directory, port)?;
    launcher.record_use(&info.directory);
    println!("serving {} on {}", info.directory.display(), info.base_url());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("stopping server...");
                launcher.stop().await?;
                println!("server stopped");
                break;
            }
            notification = status_rx.recv() => {
                let Some(notification) = notification else { break };
                launcher.on_notification(&notification);
                match notification {
                    ServerNotification::Started { port } => {
                        println!("server started on port {port}");
                        if open {
                            match launcher.open_browser() {
                                Ok(()) => println!("browser opened: {}", launcher.serve_url().unwrap_or_default()),
                                Err(e) => eprintln!("failed to open browser: {e}"),
                            }
                        }
                    }
                    ServerNotification::Stopped => {
                        println!("server stopped");
                        break;
                    }
                    ServerNotification::Failed { message } => {
                        eprintln!("server failed: {message}");
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}

fn recent(limit: usize) -> Result<()> {
    let (mut launcher, _status_rx) = Launcher::with_store(ProjectStore::open_default()?, ServeCommand::default());
    let ranked = launcher.list_recent(limit);
    if ranked.is_empty() {
        println!("no recent projects");
        return Ok(());
    }
    for (project, count) in ranked {
        println!("{count:>4}x  {project}");
    }
    Ok(())
}

fn clear_recent() -> Result<()> {
    let (mut launcher, _status_rx) = Launcher::with_store(ProjectStore::open_default()?, ServeCommand::default());
    launcher.clear_recent();
    println!("recent projects cleared");
    Ok(())
}

fn ls(directory: &Path) -> Result<()> {
    for entry in Launcher::list_folder(directory)? {
        println!("{}", entry.label());
    }
    Ok(())
}
