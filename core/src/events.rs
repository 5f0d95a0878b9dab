use serde::{Deserialize, Serialize};

/// status feed from a server worker to the control thread.
///
/// `Started` always precedes `Stopped`/`Failed` for the same session:
/// a single worker task is the only sender and the channel is FIFO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerNotification {
    Started { port: u16 },
    Stopped,
    Failed { message: String },
}
