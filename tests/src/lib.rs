// Integration test support for the fail2ban client.
//
// `FakeDaemon` serves the control-socket protocol from a temporary directory
// so the SDK can be exercised end to end without a real fail2ban install.

pub mod fake_daemon;

pub use daemon_state::{DaemonState, FakeAction, FakeJail};
pub use fake_daemon::{FakeDaemon, TestResult};

/// Route test logs through the test writer; repeated calls are harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
