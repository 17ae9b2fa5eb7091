#![forbid(unsafe_code)]

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

/// Where and how to reach the fail2ban control socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
	pub socket_path: String,
	pub request_timeout_ms: u64,
	pub max_response_bytes: usize,
	pub log_level: String,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			socket_path: Self::DEFAULT_SOCKET.into(),
			request_timeout_ms: Self::DEFAULT_TIMEOUT_MS,
			max_response_bytes: Self::DEFAULT_MAX_RESPONSE_BYTES,
			log_level: "info".into(),
		}
	}
}

impl ClientConfig {
	pub const DEFAULT_SOCKET: &'static str = "/var/run/fail2ban/fail2ban.sock";
	pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
	pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;
	const MIN_RESPONSE_BYTES: usize = 1024;

	/// Read and validate a config file on its own.
	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
		let mut cfg = Self::parse_file(path)?;
		cfg.normalize();
		cfg.validate()?;
		Ok(cfg)
	}

	/// Parse a config file without validating, for use as one layer of several.
	pub fn parse_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let data = fs::read_to_string(path)?;
		let cfg: Self = toml::from_str(&data).map_err(|e| Error::config(format!("toml parse error: {e}")))?;
		debug!(path = %path.display(), socket = %cfg.socket_path, "loaded client config");
		Ok(cfg)
	}

	pub fn from_env() -> Result<Self> {
		let mut cfg = Self::default();
		cfg.apply_env()?;
		Ok(cfg)
	}

	/// Overlay `F2B_*` environment variables on top of the current values, then validate.
	pub fn apply_env(&mut self) -> Result<()> {
		self.overlay_env(|key| std::env::var(key).ok())?;
		self.normalize();
		self.validate()
	}

	/// Overlay `F2B_*` values looked up through `var`. Only parses; call
	/// [`ClientConfig::validate`] once every layer is in place.
	pub fn overlay_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
		if let Some(v) = var("F2B_SOCKET") {
			let v = v.trim();
			if !v.is_empty() { self.socket_path = v.to_string(); }
		}
		if let Some(v) = var("F2B_REQUEST_TIMEOUT_MS") {
			self.request_timeout_ms = v.trim().parse().map_err(|e| Error::config(format!("F2B_REQUEST_TIMEOUT_MS: {e}")))?;
		}
		if let Some(v) = var("F2B_MAX_RESPONSE_BYTES") {
			self.max_response_bytes = v.trim().parse().map_err(|e| Error::config(format!("F2B_MAX_RESPONSE_BYTES: {e}")))?;
		}
		if let Some(v) = var("F2B_LOG_LEVEL") { self.log_level = v; }
		Ok(())
	}

	/// Log levels compare case-insensitively whichever layer set them.
	pub fn normalize(&mut self) { self.log_level = self.log_level.trim().to_ascii_lowercase(); }

	pub fn validate(&self) -> Result<()> {
		if self.socket_path.trim().is_empty() {
			return Err(Error::config("socket_path must not be empty"));
		}
		if self.request_timeout_ms == 0 {
			return Err(Error::config("request_timeout_ms must be at least 1"));
		}
		if self.max_response_bytes < Self::MIN_RESPONSE_BYTES {
			return Err(Error::config(format!("max_response_bytes must be at least {}", Self::MIN_RESPONSE_BYTES)));
		}
		let allowed = ["trace", "debug", "info", "warn", "error"];
		if !allowed.contains(&self.log_level.as_str()) {
			return Err(Error::config(format!("invalid log_level: {}", self.log_level)));
		}
		Ok(())
	}
}
