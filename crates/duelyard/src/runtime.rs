//! Arena runtime: an isolated Tokio task that owns one arena.
//!
//! The task owns the [`Arena`], its [`ArenaScheduler`], the [`Host`] and
//! a [`TickDriver`]. Commands arrive over an mpsc channel and the driver
//! is polled in the same `select!` loop, so a scheduler tick never runs
//! in the middle of a join or a host event. Outward [`ArenaEvent`]s are
//! fanned out on a broadcast channel.

use duelyard_arena::{
    Arena, ArenaData, ArenaEvent, ArenaInfo, ArenaScheduler, EventAdapter, Host, HostEvent,
    JoinRejection, ScheduleConfig, SetupError, SlotIndex,
};
use duelyard_protocol::PlayerHandle;
use duelyard_tick::{DriverConfig, TickDriver};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::DuelyardError;

/// Settings for [`ArenaRuntime::spawn`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Countdown lengths, in driver firings.
    pub schedule: ScheduleConfig,
    /// Cadence of the scheduler.
    pub driver: DriverConfig,
    /// Command channel bound. Senders wait when it is full.
    pub channel_size: usize,
    /// Events buffered per subscriber before slow subscribers lag.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            schedule: ScheduleConfig::default(),
            driver: DriverConfig::default(),
            channel_size: 64,
            event_capacity: 64,
        }
    }
}

/// Commands sent to an arena task.
enum ArenaCommand {
    Join {
        player: PlayerHandle,
        reply: oneshot::Sender<Result<SlotIndex, JoinRejection>>,
    },
    Leave {
        player: PlayerHandle,
        reason: String,
        reply: oneshot::Sender<bool>,
    },
    /// A host event; the reply carries it back with its outputs set.
    Host {
        event: HostEvent,
        reply: oneshot::Sender<HostEvent>,
    },
    /// Re-validates the arena, optionally with new data first.
    Enable {
        data: Option<ArenaData>,
        reply: oneshot::Sender<Result<(), SetupError>>,
    },
    Info {
        reply: oneshot::Sender<ArenaInfo>,
    },
    Shutdown,
}

/// Handle to a running arena task.
///
/// Cheap to clone. Every method fails with
/// [`DuelyardError::Unavailable`] once the task has stopped.
#[derive(Clone)]
pub struct ArenaRuntime {
    name: String,
    sender: mpsc::Sender<ArenaCommand>,
    events: broadcast::Sender<ArenaEvent>,
}

impl ArenaRuntime {
    /// Moves `arena` and `host` into a new task and starts its driver.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<H>(arena: Arena, host: H, config: RuntimeConfig) -> Self
    where
        H: Host + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.channel_size.max(1));
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let name = arena.name().to_string();

        let actor = RuntimeActor {
            arena,
            scheduler: ArenaScheduler::new(config.schedule),
            host,
            driver: TickDriver::new(config.driver),
            receiver: rx,
            events: events.clone(),
        };
        tokio::spawn(actor.run());

        Self {
            name,
            sender: tx,
            events,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Receives every [`ArenaEvent`] published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ArenaEvent> {
        self.events.subscribe()
    }

    /// Adds a player to the lobby. A rejection comes back as
    /// [`DuelyardError::Arena`]; the player has already been notified.
    pub async fn join(&self, player: PlayerHandle) -> Result<SlotIndex, DuelyardError> {
        let slot = self
            .request(|reply| ArenaCommand::Join { player, reply })
            .await?;
        Ok(slot?)
    }

    /// Removes a player. Returns `false` if they weren't a participant.
    pub async fn leave(
        &self,
        player: PlayerHandle,
        reason: impl Into<String>,
    ) -> Result<bool, DuelyardError> {
        let reason = reason.into();
        self.request(|reply| ArenaCommand::Leave {
            player,
            reason,
            reply,
        })
        .await
    }

    /// Runs a host event through the arena's [`EventAdapter`] and returns
    /// it with its cancel flag and outputs updated.
    pub async fn dispatch(&self, event: HostEvent) -> Result<HostEvent, DuelyardError> {
        self.request(|reply| ArenaCommand::Host { event, reply })
            .await
    }

    /// Validates the arena and leaves setup mode, loading a fresh lobby.
    ///
    /// With `data`, the arena's data is replaced first. Either way,
    /// current participants are reset and sent to the default spawn before
    /// the lobby reloads. Countdowns restart from their full length.
    pub async fn enable(&self, data: Option<ArenaData>) -> Result<(), DuelyardError> {
        self.request(|reply| ArenaCommand::Enable { data, reply })
            .await?
            .map_err(DuelyardError::from)
    }

    pub async fn info(&self) -> Result<ArenaInfo, DuelyardError> {
        self.request(|reply| ArenaCommand::Info { reply }).await
    }

    /// Stops the task. Queued commands ahead of it still run.
    pub async fn shutdown(&self) -> Result<(), DuelyardError> {
        self.sender
            .send(ArenaCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }

    /// Sends a command built around a fresh reply channel and waits for
    /// the answer.
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> ArenaCommand,
    ) -> Result<T, DuelyardError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> DuelyardError {
        DuelyardError::Unavailable(self.name.clone())
    }
}

/// State owned by the arena task.
struct RuntimeActor<H> {
    arena: Arena,
    scheduler: ArenaScheduler,
    host: H,
    driver: TickDriver,
    receiver: mpsc::Receiver<ArenaCommand>,
    events: broadcast::Sender<ArenaEvent>,
}

impl<H: Host> RuntimeActor<H> {
    async fn run(mut self) {
        tracing::info!(arena = %self.arena.name(), "arena runtime started");
        self.publish();

        loop {
            tokio::select! {
                command = self.receiver.recv() => match command {
                    Some(ArenaCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                info = self.driver.wait_for_tick() => {
                    let outcome = self.scheduler.tick(&mut self.arena, &mut self.host);
                    self.driver.record_tick_end();
                    tracing::trace!(
                        arena = %self.arena.name(),
                        run = info.run,
                        ?outcome,
                        "arena ticked"
                    );
                }
            }
            self.publish();
        }

        tracing::info!(arena = %self.arena.name(), "arena runtime stopped");
    }

    fn handle(&mut self, command: ArenaCommand) {
        match command {
            ArenaCommand::Join { player, reply } => {
                let result = self.arena.join(&mut self.host, &player);
                let _ = reply.send(result);
            }
            ArenaCommand::Leave {
                player,
                reason,
                reply,
            } => {
                let left = self.arena.leave(&mut self.host, &player, &reason, None);
                let _ = reply.send(left);
            }
            ArenaCommand::Host { mut event, reply } => {
                EventAdapter::dispatch(&mut self.arena, &mut self.host, &mut event);
                let _ = reply.send(event);
            }
            ArenaCommand::Enable { data, reply } => {
                let _ = reply.send(self.enable(data));
            }
            ArenaCommand::Info { reply } => {
                let _ = reply.send(self.arena.info());
            }
            // Handled by the loop.
            ArenaCommand::Shutdown => {}
        }
    }

    fn enable(&mut self, data: Option<ArenaData>) -> Result<(), SetupError> {
        if let Some(data) = data {
            self.arena.send_participants_home(&mut self.host);
            self.arena.set_data(data);
        }
        if !self.arena.enable(&mut self.host, true) {
            return Err(self
                .arena
                .last_setup_error()
                .cloned()
                .unwrap_or(SetupError::MissingLevel));
        }
        self.scheduler.reload_timer();
        Ok(())
    }

    /// Forwards queued arena events to subscribers.
    fn publish(&mut self) {
        for event in self.arena.drain_events() {
            // No subscribers is fine; events are advisory.
            let _ = self.events.send(event);
        }
    }
}
