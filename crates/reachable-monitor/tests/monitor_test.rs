//! Integration tests for Monitor

use reachable::{Checker, Probe, Target};
use reachable_monitor::{Config, Monitor};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;

/// Probe with a fixed answer
struct Fixed(bool);

#[async_trait::async_trait]
impl Probe for Fixed {
    async fn check(&self) -> bool {
        self.0
    }
}

/// Helper to build a checker that forwards notifications to a channel
fn channel_checker(host: &str, up: bool, tx: mpsc::UnboundedSender<(String, bool)>) -> Checker {
    let name = host.to_string();
    Checker::new(host.parse::<Target>().unwrap(), move |r| {
        let _ = tx.send((name.clone(), r));
    })
    .with_interval(Duration::from_millis(20))
    .with_probe(Arc::new(Fixed(up)))
}

#[tokio::test]
async fn test_run_until_shutdown() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let monitor = Monitor::with_checkers(vec![
        channel_checker("a.example:80", true, tx.clone()),
        channel_checker("b.example:443", false, tx),
    ]);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(monitor.run(async {
        let _ = stop_rx.await;
    }));

    let mut seen = Vec::new();
    for _ in 0..2 {
        let event = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("Timeout waiting for notification")
            .expect("Channel closed");
        seen.push(event);
    }
    seen.sort();
    assert_eq!(
        seen,
        vec![("a.example:80".to_string(), true), ("b.example:443".to_string(), false)]
    );

    stop_tx.send(()).unwrap();
    timeout(Duration::from_secs(2), handle)
        .await
        .expect("Monitor did not shut down")
        .unwrap()
        .unwrap();

    // Checkers are gone: the channel closes once every notifier is dropped.
    while let Ok(Some(extra)) = timeout(Duration::from_millis(200), rx.recv()).await {
        panic!("Unexpected notification after shutdown: {:?}", extra);
    }
}

#[tokio::test]
async fn test_from_config_with_report() {
    let yaml = r#"
hosts:
  - "127.0.0.1:9"
  - example.com
checker:
  interval: 1h
  timeout: 100ms
report:
  host: "127.0.0.1:9"
  interval: 10ms
"#;
    let config = Config::from_yaml(yaml).unwrap();
    let mut monitor = Monitor::from_config(&config).unwrap();

    assert_eq!(reachable::defaults::interval(), Duration::from_secs(3600));
    assert_eq!(reachable::defaults::timeout(), Duration::from_millis(100));

    let targets: Vec<String> = monitor.checkers().iter().map(|c| c.target().to_string()).collect();
    assert_eq!(targets, vec!["127.0.0.1:9".to_string(), "example.com:80".to_string()]);

    monitor.start().unwrap();
    assert!(monitor.checkers().iter().all(Checker::is_running));

    // Hour-long interval: no probe has run, the shared flag keeps its default.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(reachable::network_is_reachable());

    monitor.stop().await.unwrap();
    assert!(monitor.checkers().iter().all(|c| !c.is_running()));
    assert!(reachable::network_is_reachable());
}
