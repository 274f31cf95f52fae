//! Integration tests for the process-wide default checker

use common::Error;
use std::time::Duration;

// Single test: everything here touches process-wide state.
#[test]
fn test_default_state_and_misuse() {
    assert!(reachable::network_is_reachable(), "flag defaults to reachable");

    assert!(matches!(reachable::stop(), Err(Error::NotRunning)));
    assert!(reachable::network_is_reachable());

    assert!(matches!(reachable::start(""), Err(Error::InvalidTarget { .. })));
    assert!(matches!(reachable::start("example.com"), Err(Error::NoRuntime)));
    assert!(matches!(reachable::stop(), Err(Error::NotRunning)));

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        reachable::defaults::set_interval(Duration::from_secs(3600));
        reachable::start("127.0.0.1:9").unwrap();
        assert!(matches!(reachable::start("127.0.0.1:9"), Err(Error::AlreadyRunning)));

        // No tick can fire within an hour-long interval, so the flag is untouched.
        assert!(reachable::network_is_reachable());
        reachable::stop().unwrap();
        assert!(reachable::network_is_reachable());
        reachable::defaults::set_interval(Duration::ZERO);
    });
}
