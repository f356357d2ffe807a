//! sg-remote: Read-only client for the remote analysis server (SonarQube).

pub mod client;

pub use client::{check_remote_health, ProjectSearch, RemoteClient, RemoteConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("unable to connect to remote analysis server: {0}")]
    Unavailable(String),
    #[error("remote analysis server returned status {status}")]
    Status { status: u16, body: String },
    #[error("remote analysis server sent an unreadable response: {0}")]
    Decode(String),
}
