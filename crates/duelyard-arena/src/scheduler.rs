//! Per-arena countdowns, advanced once per base interval.
//!
//! The scheduler owns the countdown counters and nothing else. It reads
//! the arena's phase and calls the arena's transition methods; it never
//! edits arena state directly.

use duelyard_protocol::MessageKind;
use serde::{Deserialize, Serialize};

use crate::{Arena, Host, Phase};

/// Countdown lengths, in scheduler ticks (seconds at the default cadence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Lobby countdown once enough players are in.
    pub start_countdown: u32,
    /// Match time limit. The match ends without a winner when it runs out
    /// with more than one player left.
    pub game_time: u32,
    /// Settle delay between match end and the fresh lobby.
    pub restart_delay: u32,
    /// Players needed before the lobby countdown runs. Capped at the
    /// arena's capacity.
    pub min_players: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            start_countdown: 10,
            game_time: 20 * 60,
            restart_delay: 10,
            min_players: 2,
        }
    }
}

/// What a [`ArenaScheduler::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Arena is in setup mode; nothing to do.
    Inactive,
    /// Lobby below the minimum player count; countdown idle.
    Waiting,
    /// Lobby countdown running, with ticks left.
    Countdown(u32),
    /// Lobby → Game happened on this tick.
    Started,
    /// Match running, with ticks left on the time limit.
    Running(u32),
    /// Game → Restart happened on this tick.
    Ended,
    /// Settle delay running, with ticks left.
    Settling(u32),
    /// Restart → Lobby happened on this tick.
    Reloaded,
}

/// Drives one arena's phase timers.
#[derive(Debug, Clone)]
pub struct ArenaScheduler {
    config: ScheduleConfig,
    start_time: u32,
    game_time: u32,
    restart_time: u32,
    ticks: u64,
}

impl ArenaScheduler {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            start_time: config.start_countdown,
            game_time: config.game_time,
            restart_time: config.restart_delay,
            ticks: 0,
            config,
        }
    }

    /// Resets every countdown to its configured length.
    ///
    /// The periodic registration driving [`tick`](Self::tick) is not
    /// affected.
    pub fn reload_timer(&mut self) {
        self.start_time = self.config.start_countdown;
        self.game_time = self.config.game_time;
        self.restart_time = self.config.restart_delay;
    }

    /// Advances the arena by one base interval.
    pub fn tick<H: Host + ?Sized>(&mut self, arena: &mut Arena, host: &mut H) -> TickOutcome {
        self.ticks += 1;
        if arena.is_setup() {
            return TickOutcome::Inactive;
        }
        let outcome = match arena.phase() {
            Phase::Lobby => self.tick_lobby(arena, host),
            Phase::Game => self.tick_game(arena, host),
            Phase::Restart => self.tick_restart(arena, host),
        };
        tracing::debug!(arena = arena.name(), tick = self.ticks, ?outcome, "scheduler tick");
        outcome
    }

    fn tick_lobby<H: Host + ?Sized>(&mut self, arena: &mut Arena, host: &mut H) -> TickOutcome {
        let needed = self.config.min_players.min(arena.capacity()).max(1);
        if arena.participant_count() < needed {
            arena.broadcast(host, "You need more players to start a game!", MessageKind::Tip, "");
            self.start_time = self.config.start_countdown;
            return TickOutcome::Waiting;
        }

        arena.broadcast(
            host,
            &format!("Starting in {} sec", self.start_time),
            MessageKind::Tip,
            "",
        );
        self.start_time = self.start_time.saturating_sub(1);
        if self.start_time > 0 {
            return TickOutcome::Countdown(self.start_time);
        }

        self.start_time = self.config.start_countdown;
        if arena.start_game(host) {
            self.game_time = self.config.game_time;
            TickOutcome::Started
        } else {
            TickOutcome::Waiting
        }
    }

    fn tick_game<H: Host + ?Sized>(&mut self, arena: &mut Arena, host: &mut H) -> TickOutcome {
        if arena.check_end() {
            arena.start_restart(host);
            return TickOutcome::Ended;
        }

        self.game_time = self.game_time.saturating_sub(1);
        if self.game_time > 0 {
            return TickOutcome::Running(self.game_time);
        }

        tracing::info!(arena = arena.name(), "match time limit reached");
        arena.start_restart(host);
        TickOutcome::Ended
    }

    fn tick_restart<H: Host + ?Sized>(&mut self, arena: &mut Arena, host: &mut H) -> TickOutcome {
        self.restart_time = self.restart_time.saturating_sub(1);
        if self.restart_time > 0 {
            arena.broadcast(
                host,
                &format!("Restarting in {} sec", self.restart_time),
                MessageKind::Tip,
                "",
            );
            return TickOutcome::Settling(self.restart_time);
        }

        arena.send_participants_home(host);
        if let Err(e) = arena.load_arena(host, true) {
            tracing::error!(arena = arena.name(), error = %e, "restart reload failed");
        }
        self.reload_timer();
        TickOutcome::Reloaded
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Ticks left on the lobby countdown.
    pub fn start_time(&self) -> u32 {
        self.start_time
    }

    /// Ticks left on the match time limit.
    pub fn game_time(&self) -> u32 {
        self.game_time
    }

    /// Ticks left on the settle delay.
    pub fn restart_time(&self) -> u32 {
        self.restart_time
    }

    /// Ticks processed since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for ArenaScheduler {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}
