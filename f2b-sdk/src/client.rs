#![forbid(unsafe_code)]

use crate::{
    status::ServerStatus,
    transport::{SocketTransport, Transport},
};
use f2b_core::{ClientConfig, Reply, Result};
use tracing::debug;

/// Typed entry point to the fail2ban control socket.
///
/// Every call is an independent round trip; the client holds no connection
/// state and can be shared between tasks.
#[derive(Debug)]
pub struct Fail2banClient<T = SocketTransport> {
    transport: T,
}

impl Fail2banClient<SocketTransport> {
    pub fn new(cfg: ClientConfig) -> Self { Self { transport: SocketTransport::new(cfg) } }
}

impl<T: Transport> Fail2banClient<T> {
    pub fn with_transport(transport: T) -> Self { Self { transport } }

    pub fn transport(&self) -> &T { &self.transport }

    /// Send raw command tokens and return the undecoded answer.
    pub async fn command(&self, tokens: &[&str]) -> Result<Reply> {
        let command: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        let reply = self.transport.request(&command).await?;
        debug!(verb = tokens.first().copied().unwrap_or(""), kind = reply.kind(), "fail2ban reply");
        Ok(reply)
    }

    pub async fn ping(&self) -> Result<String> {
        self.command(&["ping"]).await?.scalar_text("ping")
    }

    pub async fn version(&self) -> Result<String> {
        self.command(&["version"]).await?.scalar_text("version")
    }

    pub async fn server_status(&self) -> Result<ServerStatus> {
        ServerStatus::from_reply(&self.command(&["status"]).await?)
    }

    pub async fn log_level(&self) -> Result<String> {
        self.command(&["get", "loglevel"]).await?.scalar_text("loglevel")
    }

    pub async fn set_log_level(&self, level: &str) -> Result<String> {
        self.command(&["set", "loglevel", level]).await?.scalar_text("loglevel")
    }
}
