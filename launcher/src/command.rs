use std::path::Path;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

/// substituted with the chosen port wherever it appears in an argument
const PORT_PLACEHOLDER: &str = "{port}";

/// The external static-file-serving command: anything that binds
/// `localhost:<port>` over its working directory and runs until
/// terminated satisfies the contract. Defaults to the Python module
/// server so a bare system can serve without extra installs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServeCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for ServeCommand {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["-m".into(), "http.server".into(), PORT_PLACEHOLDER.into()],
        }
    }
}

impl ServeCommand {
    /// parses a whitespace-separated `program arg ..` line; None if empty
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// the command line as it will be spawned, for logs and errors
    pub fn display(&self, port: u16) -> String {
        let mut line = vec![self.program.clone()];
        line.extend(self.args.iter().map(|arg| substitute(arg, port)));
        line.join(" ")
    }

    /// cwd is the served directory, stdio is discarded, and the child is
    /// killed if its handle is ever dropped without a proper stop
    pub fn build(&self, directory: &Path, port: u16) -> Command {
        let mut command = Command::new(&self.program);
        for arg in &self.args {
            command.arg(substitute(arg, port));
        }
        command
            .current_dir(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

fn substitute(arg: &str, port: u16) -> String {
    arg.replace(PORT_PLACEHOLDER, &port.to_string())
}
