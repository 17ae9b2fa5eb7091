// A fail2ban look-alike listening on a temporary Unix socket.
//
// Speaks the same framing as the real server: pickled command list,
// `<F2B_END_COMMAND>` terminator, pickled `(code, value)` answer, and a
// `<F2B_CLOSE_COMMAND>` frame ends the connection.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use f2b_core::{codec, ClientConfig};
use f2b_sdk::Fail2banClient;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::daemon_state::DaemonState;

/// Test result type alias
pub type TestResult<T> = Result<T>;

/// Handle to a running fake daemon; the listener stops on drop.
pub struct FakeDaemon {
    dir: TempDir,
    state: Arc<Mutex<DaemonState>>,
    log: Arc<Mutex<Vec<Vec<String>>>>,
    task: JoinHandle<()>,
}

impl FakeDaemon {
    pub async fn start(state: DaemonState) -> TestResult<Self> {
        let dir = tempfile::tempdir().context("creating socket directory")?;
        let path = dir.path().join("fail2ban.sock");
        let listener = UnixListener::bind(&path).with_context(|| format!("binding {}", path.display()))?;
        info!("fake fail2ban listening on {}", path.display());

        let state = Arc::new(Mutex::new(state));
        let log = Arc::new(Mutex::new(Vec::new()));
        let task = tokio::spawn(accept_loop(listener, state.clone(), log.clone()));
        Ok(Self { dir, state, log, task })
    }

    pub fn socket_path(&self) -> PathBuf { self.dir.path().join("fail2ban.sock") }

    pub fn config(&self) -> ClientConfig {
        ClientConfig { socket_path: self.socket_path().display().to_string(), request_timeout_ms: 2_000, ..Default::default() }
    }

    pub fn client(&self) -> Fail2banClient { Fail2banClient::new(self.config()) }

    /// Every command received so far, in arrival order.
    pub fn commands(&self) -> Vec<Vec<String>> { lock(&self.log).clone() }

    pub fn state(&self) -> MutexGuard<'_, DaemonState> { lock(&self.state) }
}

impl Drop for FakeDaemon {
    fn drop(&mut self) { self.task.abort(); }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn accept_loop(listener: UnixListener, state: Arc<Mutex<DaemonState>>, log: Arc<Mutex<Vec<Vec<String>>>>) {
    loop {
        match listener.accept().await {
            Ok((sock, _)) => {
                let (state, log) = (state.clone(), log.clone());
                tokio::spawn(async move {
                    if let Err(e) = serve(sock, state, log).await {
                        warn!("fake daemon connection ended with error: {e:#}");
                    }
                });
            }
            Err(e) => {
                warn!("accept failed: {e}");
                return;
            }
        }
    }
}

async fn serve(mut sock: UnixStream, state: Arc<Mutex<DaemonState>>, log: Arc<Mutex<Vec<Vec<String>>>>) -> Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        while let Some(end) = codec::frame_end(&buf) {
            let frame: Vec<u8> = buf.drain(..end + codec::END_COMMAND.len()).take(end).collect();
            if frame == codec::CLOSE_COMMAND {
                debug!("client closed");
                return Ok(());
            }
            let command = codec::decode_command(&frame).context("decoding command")?;
            lock(&log).push(command.clone());
            let (code, payload) = lock(&state).handle(&command);
            debug!(?command, code, "answering");
            sock.write_all(&codec::encode_reply(code, &payload)?).await?;
        }
        let n = sock.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}
