#![forbid(unsafe_code)]

//! Core building blocks for talking to the fail2ban control socket.
//!
//! - `error`: the crate-wide `Error` / `Result<T>`
//! - `config`: `ClientConfig` (TOML file + `F2B_*` environment)
//! - `reply`: the decoded value model with checked accessors
//! - `codec`: pickle framing with the `<F2B_END_COMMAND>` terminator

pub mod codec;
pub mod config;
pub mod error;
pub mod reply;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use reply::{Labeled, Reply};
