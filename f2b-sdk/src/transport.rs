#![forbid(unsafe_code)]

use async_trait::async_trait;
use f2b_core::{codec, ClientConfig, Error, Reply, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::{timeout, Duration, Instant};
use tracing::{debug, warn};

/// One command in, one decoded answer out.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, command: &[String]) -> Result<Reply>;
}

/// Talks to the daemon over its Unix domain socket, one connection per request.
#[derive(Debug, Clone)]
pub struct SocketTransport {
    cfg: ClientConfig,
}

impl SocketTransport {
    pub fn new(cfg: ClientConfig) -> Self { Self { cfg } }

    pub fn config(&self) -> &ClientConfig { &self.cfg }

    fn limit(&self) -> Duration { Duration::from_millis(self.cfg.request_timeout_ms) }
}

#[async_trait]
impl Transport for SocketTransport {
    async fn request(&self, command: &[String]) -> Result<Reply> {
        let frame = codec::encode_command(command)?;
        debug!(
            verb = command.first().map(String::as_str).unwrap_or(""),
            socket = %self.cfg.socket_path,
            "fail2ban request"
        );

        let mut stream = timeout(self.limit(), UnixStream::connect(&self.cfg.socket_path))
            .await
            .map_err(|_| Error::Timeout)??;
        timeout(self.limit(), stream.write_all(&frame)).await.map_err(|_| Error::Timeout)??;
        timeout(self.limit(), stream.flush()).await.map_err(|_| Error::Timeout)??;

        let mut buf = Vec::with_capacity(4096);
        read_frame_with_timeout(&mut stream, &mut buf, self.cfg.request_timeout_ms, self.cfg.max_response_bytes).await?;
        let reply = codec::decode_reply(&buf);

        // The daemon keeps the connection open until told otherwise.
        match timeout(self.limit(), stream.write_all(&codec::close_frame())).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "failed to send close command"),
            Err(_) => warn!("timed out sending close command"),
        }
        reply
    }
}

/// Read until the end-of-command terminator; `out` holds the frame without it.
pub(crate) async fn read_frame_with_timeout<R: AsyncRead + Unpin>(
    reader: &mut R,
    out: &mut Vec<u8>,
    timeout_ms: u64,
    max_bytes: usize,
) -> Result<()> {
    let deadline = Duration::from_millis(timeout_ms);
    let start = Instant::now();
    out.clear();
    let mut chunk = [0u8; 4096];
    loop {
        let remain = deadline.saturating_sub(start.elapsed());
        if remain.is_zero() { return Err(Error::Timeout); }
        let n = timeout(remain, reader.read(&mut chunk)).await.map_err(|_| Error::Timeout)??;
        if n == 0 {
            return Err(Error::protocol(format!("connection closed after {} byte(s) without end marker", out.len())));
        }
        // Only the tail can contain a terminator that was split across reads.
        let scan_from = out.len().saturating_sub(codec::END_COMMAND.len());
        out.extend_from_slice(&chunk[..n]);
        let end = codec::frame_end(&out[scan_from..]).map(|pos| scan_from + pos);
        if end.unwrap_or(out.len()) > max_bytes { return Err(Error::protocol("response too large")); }
        if let Some(end) = end {
            out.truncate(end);
            return Ok(());
        }
    }
}
