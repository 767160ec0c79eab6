//! Cooperative periodic driver for Duelyard.
//!
//! Hosts run on a fixed clock (20 Hz for the engines Duelyard targets) and
//! let plugins register repeating tasks with a period expressed in host
//! ticks. Arena schedulers run every 20 host ticks, i.e. once per second.
//! [`TickDriver`] reproduces that contract on Tokio: register once, then
//! await [`TickDriver::wait_for_tick`] for every firing.
//!
//! # Integration
//!
//! The driver sits inside an arena actor's `tokio::select!` loop, next to
//! the command channel, so a firing never interleaves with a command:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* join, leave, host events */ }
//!         _ = driver.wait_for_tick() => {
//!             scheduler.tick(&mut arena, &mut host);
//!             driver.record_tick_end();
//!         }
//!     }
//! }
//! ```
//!
//! Resetting countdowns is the arena scheduler's business; the driver
//! registration itself is never torn down until the actor exits.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do when the driver wakes up late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverrunPolicy {
    /// Forget the missed firings and schedule the next one from now.
    #[default]
    Skip,
    /// Keep the original cadence; the next firing may come early.
    Keep,
}

/// Configuration for a [`TickDriver`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Host clock rate in Hz. 0 disables the driver (it never fires).
    pub host_rate_hz: u32,
    /// Number of host ticks between two firings.
    pub period_ticks: u32,
    /// Overrun handling.
    pub policy: OverrunPolicy,
    /// Fraction of the period a task may use before a warning is logged.
    pub budget_warn_threshold: f64,
    /// Random delay (0..max µs) added to the first firing so arenas
    /// created together don't fire in lockstep.
    pub initial_jitter_us: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            host_rate_hz: 20,
            period_ticks: 20,
            policy: OverrunPolicy::default(),
            budget_warn_threshold: 0.5,
            initial_jitter_us: 2_000,
        }
    }
}

impl DriverConfig {
    /// Highest host clock rate accepted.
    pub const MAX_HOST_RATE_HZ: u32 = 128;

    /// Config firing every `period_ticks` host ticks at `host_rate_hz`.
    pub fn with_period(host_rate_hz: u32, period_ticks: u32) -> Self {
        Self {
            host_rate_hz,
            period_ticks,
            ..Default::default()
        }
    }

    /// Clamps out-of-range values. Called by [`TickDriver::new`].
    pub fn validated(mut self) -> Self {
        if self.host_rate_hz > Self::MAX_HOST_RATE_HZ {
            warn!(
                rate = self.host_rate_hz,
                max = Self::MAX_HOST_RATE_HZ,
                "host_rate_hz exceeds maximum, clamping"
            );
            self.host_rate_hz = Self::MAX_HOST_RATE_HZ;
        }
        if self.period_ticks == 0 {
            warn!("period_ticks of 0 is invalid, using 1");
            self.period_ticks = 1;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self
    }

    /// Wall-clock length of one period, or `None` when disabled.
    pub fn period(&self) -> Option<Duration> {
        if self.host_rate_hz == 0 {
            None
        } else {
            Some(Duration::from_secs_f64(
                self.period_ticks.max(1) as f64 / self.host_rate_hz as f64,
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Firing info
// ---------------------------------------------------------------------------

/// Returned by [`TickDriver::wait_for_tick`] for each firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Firing number, starting at 1.
    pub run: u64,
    /// `true` if the driver woke up noticeably late.
    pub overrun: bool,
    /// Firings dropped because of the overrun.
    pub skipped: u64,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// A repeating task registration on a Tokio clock.
pub struct TickDriver {
    config: DriverConfig,
    period: Option<Duration>,
    runs: u64,
    skipped_total: u64,
    next_fire: Option<TokioInstant>,
    run_start: Option<Instant>,
    paused: bool,
}

impl TickDriver {
    /// Registers a new periodic task.
    pub fn new(config: DriverConfig) -> Self {
        let config = config.validated();
        let period = config.period();

        let next_fire = period.map(|p| {
            let jitter = if config.initial_jitter_us > 0 {
                Duration::from_micros(rand::rng().random_range(0..config.initial_jitter_us))
            } else {
                Duration::ZERO
            };
            TokioInstant::now() + p + jitter
        });

        match period {
            Some(p) => debug!(
                host_rate_hz = config.host_rate_hz,
                period_ticks = config.period_ticks,
                period_ms = p.as_secs_f64() * 1000.0,
                "tick driver registered"
            ),
            None => debug!("tick driver registered with host clock disabled"),
        }

        Self {
            config,
            period,
            runs: 0,
            skipped_total: 0,
            next_fire,
            run_start: None,
            paused: false,
        }
    }

    /// Driver at the default cadence (20 ticks at 20 Hz).
    pub fn every_second() -> Self {
        Self::new(DriverConfig::default())
    }

    /// Waits for the next firing.
    ///
    /// Pends forever while paused or when the host clock is disabled, so it
    /// is safe to use as a `select!` branch unconditionally.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let (due, period) = match (self.next_fire, self.period) {
            (Some(due), Some(period)) if !self.paused => (due, period),
            _ => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        time::sleep_until(due).await;

        let now = TokioInstant::now();
        self.runs += 1;
        self.run_start = Some(Instant::now());

        let late_by = now.saturating_duration_since(due);
        let overrun = late_by > period / 10;
        let mut skipped = 0;

        self.next_fire = Some(match self.config.policy {
            OverrunPolicy::Skip => {
                if overrun {
                    skipped = (late_by.as_nanos() / period.as_nanos()) as u64;
                    if skipped > 0 {
                        warn!(
                            run = self.runs,
                            skipped,
                            late_ms = late_by.as_secs_f64() * 1000.0,
                            "tick driver late, skipping ahead"
                        );
                    }
                }
                now + period
            }
            OverrunPolicy::Keep => due + period,
        });
        self.skipped_total += skipped;

        trace!(run = self.runs, overrun, "tick driver fired");

        TickInfo {
            run: self.runs,
            overrun,
            skipped,
        }
    }

    /// Marks the end of the work done for the current firing.
    ///
    /// Logs a warning when the work used more than the configured share of
    /// the period.
    pub fn record_tick_end(&mut self) {
        let (Some(start), Some(period)) = (self.run_start.take(), self.period) else {
            return;
        };
        let elapsed = start.elapsed();
        let share = elapsed.as_secs_f64() / period.as_secs_f64();
        if share >= self.config.budget_warn_threshold {
            warn!(
                run = self.runs,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                share_pct = format!("{:.1}", share * 100.0),
                "scheduled task is using a large share of its period"
            );
        }
    }

    /// Stops firing until [`resume`](Self::resume). Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(run = self.runs, "tick driver paused");
        }
    }

    /// Resumes firing one full period from now.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            if let Some(period) = self.period {
                self.next_fire = Some(TokioInstant::now() + period);
            }
            debug!(run = self.runs, "tick driver resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// `true` when the host clock is disabled and the driver never fires.
    pub fn is_disabled(&self) -> bool {
        self.period.is_none()
    }

    /// Number of firings so far.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Total firings skipped because of overruns.
    pub fn skipped_total(&self) -> u64 {
        self.skipped_total
    }

    /// Wall-clock period between firings.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }
}
