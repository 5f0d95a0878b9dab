use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "servr", version, about = "serve local web builds")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// serve a directory and report status until interrupted
    Serve {
        directory: PathBuf,

        #[arg(short, long, default_value_t = 8000, value_parser = port_in_range)]
        port: u16,

        /// open the served site in the default browser once started
        #[arg(long)]
        open: bool,

        /// static file server command to spawn ("{port}" is substituted)
        #[arg(long)]
        command: Option<String>,
    },
    /// list recent projects, most used first
    Recent {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// forget all recent projects
    ClearRecent,
    /// list a folder the way the file explorer shows it
    Ls { directory: PathBuf },
}

fn port_in_range(raw: &str) -> Result<u16, String> {
    let port: u16 = raw.parse().map_err(|_| format!("`{raw}` is not a port number"))?;
    if port < 1000 {
        return Err(format!("port {port} is below the serveable range (1000-65535)"));
    }
    Ok(port)
}
