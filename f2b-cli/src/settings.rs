use anyhow::Context;
use f2b_core::ClientConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Effective configuration and the file it was read from, if any.
#[derive(Debug)]
pub struct Resolved {
	pub config: ClientConfig,
	pub source: Option<PathBuf>,
}

/// Defaults, then the config file, then `F2B_*` env, then flags.
pub fn resolve(explicit: Option<PathBuf>, socket: Option<String>, timeout_ms: Option<u64>) -> anyhow::Result<Resolved> {
	resolve_with(explicit, socket, timeout_ms, |key| std::env::var(key).ok())
}

/// Layers are merged first and validated once, so a later layer may fix an earlier one.
fn resolve_with(
	explicit: Option<PathBuf>,
	socket: Option<String>,
	timeout_ms: Option<u64>,
	env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Resolved> {
	let source = explicit.or_else(find_config_file);
	let mut config = match &source {
		Some(path) => ClientConfig::parse_file(path).with_context(|| format!("loading {}", path.display()))?,
		None => ClientConfig::default(),
	};
	config.overlay_env(env)?;
	if let Some(s) = socket { config.socket_path = s; }
	if let Some(t) = timeout_ms { config.request_timeout_ms = t; }
	config.normalize();
	config.validate()?;
	Ok(Resolved { config, source })
}

fn find_config_file() -> Option<PathBuf> {
	candidates().into_iter().find(|p| p.is_file())
}

fn candidates() -> Vec<PathBuf> {
	let mut out = Vec::new();
	if let Ok(p) = std::env::var("F2B_CONFIG") { out.push(PathBuf::from(p)); }
	out.push(PathBuf::from("f2b.toml"));
	if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") { out.push(PathBuf::from(xdg).join("f2b").join("f2b.toml")); }
	if let Ok(home) = std::env::var("HOME") { out.push(PathBuf::from(home).join(".config").join("f2b").join("f2b.toml")); }
	out
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr so stdout stays JSON.
pub fn init_logging(level: &str) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
