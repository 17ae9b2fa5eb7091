#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

/// Crate-wide result alias.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors surfaced by the fail2ban client.
///
/// Three families exist: transport failures (`Io`, `Timeout`, `Protocol`,
/// `Pickle`, `Daemon`), shape failures where the daemon answered with an
/// unexpected structure (`Shape`), and domain failures (`RegexNotFound`).
#[derive(Debug, ThisError)]
pub enum Error {
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	#[error("pickle: {0}")]
	Pickle(#[from] serde_pickle::Error),
	#[error("config: {0}")]
	Config(String),
	#[error("protocol: {0}")]
	Protocol(String),
	#[error("timeout")]
	Timeout,
	/// The daemon processed the command and reported failure.
	#[error("daemon returned code {code}: {message}")]
	Daemon { code: i64, message: String },
	#[error("unexpected reply shape in {context}: expected {expected}, found {found}")]
	Shape { context: String, expected: &'static str, found: String },
	#[error("regex is not in jail {jail}: {regex}")]
	RegexNotFound { jail: String, regex: String },
}

impl Error {
	pub fn config(msg: impl Into<String>) -> Self { Self::Config(msg.into()) }
	pub fn protocol(msg: impl Into<String>) -> Self { Self::Protocol(msg.into()) }

	pub fn shape(context: impl Into<String>, expected: &'static str, found: impl Into<String>) -> Self {
		Self::Shape { context: context.into(), expected, found: found.into() }
	}

	/// Socket, framing or daemon-side failure.
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Io(_) | Self::Pickle(_) | Self::Protocol(_) | Self::Timeout | Self::Daemon { .. })
	}

	pub fn is_shape(&self) -> bool { matches!(self, Self::Shape { .. }) }

	pub fn is_domain(&self) -> bool { matches!(self, Self::RegexNotFound { .. }) }
}
