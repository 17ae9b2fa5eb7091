#![forbid(unsafe_code)]

//! Client for the fail2ban control socket.
//!
//! - Error/Result types re-exported from `f2b-core`
//! - `Transport`: the request seam, with `SocketTransport` speaking the
//!   pickle protocol over the daemon's Unix domain socket
//! - `Fail2banClient`: typed server and jail operations
//! - `status`: typed models of `status` answers

pub mod client;
pub mod jail;
pub mod status;
pub mod transport;


pub use client::Fail2banClient;
pub use f2b_core::{ClientConfig, Error, Reply, Result};
pub use status::{ActionStatus, FilterStatus, JailStatus, ServerStatus};
pub use transport::{SocketTransport, Transport};
