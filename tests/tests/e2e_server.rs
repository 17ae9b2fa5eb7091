// Server-wide commands and concurrent use of one client.

use f2b_integration_tests::{init_tracing, DaemonState, FakeDaemon, TestResult};
use std::sync::Arc;

#[tokio::test]
async fn ping_version_and_status() -> TestResult<()> {
    init_tracing();
    let daemon = FakeDaemon::start(DaemonState::with_jails(&["sshd", "nginx-http"])).await?;
    let client = daemon.client();

    assert_eq!(client.ping().await?, "pong");
    assert_eq!(client.version().await?, "1.0.2");
    let st = client.server_status().await?;
    assert_eq!(st.jail_count, 2);
    assert_eq!(st.jails, vec!["sshd", "nginx-http"]);
    Ok(())
}

#[tokio::test]
async fn log_level_round_trip() -> TestResult<()> {
    let daemon = FakeDaemon::start(DaemonState::default()).await?;
    let client = daemon.client();
    assert_eq!(client.log_level().await?, "INFO");
    assert_eq!(client.set_log_level("debug").await?, "DEBUG");
    assert_eq!(client.log_level().await?, "DEBUG");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_use_separate_connections() -> TestResult<()> {
    let daemon = FakeDaemon::start(DaemonState::with_jails(&["sshd"])).await?;
    let client = Arc::new(daemon.client());

    let mut handles = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        handles.push(tokio::spawn(async move { client.jail_ban_ip("sshd", &format!("192.0.2.{i}")).await }));
    }
    for h in handles {
        assert_eq!(h.await??, "1");
    }
    let st = client.jail_status("sshd").await?;
    assert_eq!(st.actions.banned_ips.len(), 16);
    Ok(())
}
