//! Integration tests for the periodic tick driver.
//!
//! Uses Tokio's paused clock so `sleep_until` resolves as soon as the
//! runtime is idle and `advance` can simulate a stalled host.

use std::time::Duration;

use duelyard_tick::{DriverConfig, OverrunPolicy, TickDriver};

// =========================================================================
// Helpers
// =========================================================================

fn once_per_second() -> DriverConfig {
    DriverConfig {
        initial_jitter_us: 0,
        ..DriverConfig::default()
    }
}

// =========================================================================
// DriverConfig
// =========================================================================

#[test]
fn test_default_config_fires_once_per_second() {
    let cfg = DriverConfig::default();
    assert_eq!(cfg.host_rate_hz, 20);
    assert_eq!(cfg.period_ticks, 20);
    assert_eq!(cfg.period(), Some(Duration::from_secs(1)));
}

#[test]
fn test_with_period_scales_by_host_rate() {
    let cfg = DriverConfig::with_period(20, 10);
    assert_eq!(cfg.period(), Some(Duration::from_millis(500)));
}

#[test]
fn test_zero_host_rate_disables_driver() {
    let cfg = DriverConfig::with_period(0, 20);
    assert_eq!(cfg.period(), None);
}

#[test]
fn test_validated_clamps_values() {
    let cfg = DriverConfig {
        host_rate_hz: 1_000,
        period_ticks: 0,
        budget_warn_threshold: 4.0,
        ..DriverConfig::default()
    }
    .validated();
    assert_eq!(cfg.host_rate_hz, DriverConfig::MAX_HOST_RATE_HZ);
    assert_eq!(cfg.period_ticks, 1);
    assert_eq!(cfg.budget_warn_threshold, 1.0);
}

// =========================================================================
// Firing
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_fires_with_increasing_run_numbers() {
    let mut driver = TickDriver::new(once_per_second());
    let start = tokio::time::Instant::now();

    for expected in 1..=3 {
        let info = driver.wait_for_tick().await;
        assert_eq!(info.run, expected);
        assert!(!info.overrun);
        driver.record_tick_end();
    }

    assert_eq!(driver.runs(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_disabled_driver_never_fires() {
    let mut driver = TickDriver::new(DriverConfig::with_period(0, 20));
    assert!(driver.is_disabled());

    let result = tokio::time::timeout(Duration::from_secs(30), driver.wait_for_tick()).await;
    assert!(result.is_err(), "disabled driver should pend forever");
}

#[tokio::test(start_paused = true)]
async fn test_skip_policy_drops_missed_firings() {
    let mut driver = TickDriver::new(once_per_second());

    tokio::time::advance(Duration::from_millis(3_500)).await;
    let info = driver.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.skipped, 2);
    assert_eq!(driver.skipped_total(), 2);

    // Next firing is a full period after the late one.
    let before = tokio::time::Instant::now();
    driver.wait_for_tick().await;
    assert_eq!(before.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_keep_policy_preserves_cadence() {
    let mut driver = TickDriver::new(DriverConfig {
        policy: OverrunPolicy::Keep,
        ..once_per_second()
    });

    tokio::time::advance(Duration::from_millis(1_600)).await;
    let info = driver.wait_for_tick().await;
    assert!(info.overrun);
    assert_eq!(info.skipped, 0);

    // Original schedule: the second firing is due at t = 2 s.
    let before = tokio::time::Instant::now();
    driver.wait_for_tick().await;
    assert_eq!(before.elapsed(), Duration::from_millis(400));
}

// =========================================================================
// Pause / resume
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_pause_stops_firing() {
    let mut driver = TickDriver::new(once_per_second());
    driver.wait_for_tick().await;

    driver.pause();
    assert!(driver.is_paused());
    let result = tokio::time::timeout(Duration::from_secs(5), driver.wait_for_tick()).await;
    assert!(result.is_err(), "paused driver should pend");
}

#[tokio::test(start_paused = true)]
async fn test_resume_restarts_a_full_period_later() {
    let mut driver = TickDriver::new(once_per_second());
    driver.wait_for_tick().await;

    driver.pause();
    driver.pause();
    tokio::time::advance(Duration::from_secs(10)).await;
    driver.resume();
    driver.resume();
    assert!(!driver.is_paused());

    let before = tokio::time::Instant::now();
    let info = driver.wait_for_tick().await;
    assert_eq!(info.run, 2);
    assert!(!info.overrun);
    assert_eq!(before.elapsed(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_record_tick_end_without_firing_is_noop() {
    let mut driver = TickDriver::every_second();
    driver.record_tick_end();
    assert_eq!(driver.runs(), 0);
}

// =========================================================================
// select! loop, as used by the arena runtime
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_select_loop_with_commands() {
    let mut driver = TickDriver::new(once_per_second());
    let (tx, mut rx) = tokio::sync::mpsc::channel::<&str>(4);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(3_200)).await;
        tx.send("stop").await.ok();
    });

    let mut fired = 0;
    loop {
        tokio::select! {
            Some(cmd) = rx.recv() => {
                assert_eq!(cmd, "stop");
                break;
            }
            info = driver.wait_for_tick() => {
                fired += 1;
                assert_eq!(info.run, fired);
                driver.record_tick_end();
            }
        }
    }

    assert_eq!(fired, 3);
}
