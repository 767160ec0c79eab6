//! The arena lifecycle: setup, joins, departures and phase transitions.
//!
//! An [`Arena`] owns its [`ArenaState`] outright. Everything that changes
//! it goes through the methods here, so slot and capacity invariants are
//! checked in one place. The host is passed into each call rather than
//! stored, which keeps the arena `Send` and lets one host serve several
//! arenas.

use std::sync::Arc;

use duelyard_protocol::{GameMode, Item, Location, MessageKind, PlayerHandle, PlayerId, Position};

use crate::kit::fallback_loadout;
use crate::{
    ArenaConfig, ArenaData, ArenaError, ArenaEvent, ArenaInfo, ArenaState, Host, JoinRejection,
    JoinSign, Phase, SetupError, SharedConfig, SlotIndex,
};

/// How far a lobby participant may drift from their spawn before being
/// pulled back.
pub const SPAWN_TOLERANCE: f64 = 1.0;

const FULL_HEALTH: f32 = 20.0;
const FULL_FOOD: f32 = 20.0;

/// How a participant died, for [`Arena::leave`].
#[derive(Debug, Clone, PartialEq)]
pub struct Death {
    /// Where the items are dropped.
    pub location: Location,
    pub drops: Vec<Item>,
    /// Already translated death message, broadcast to the remaining players.
    pub message: String,
}

/// One arena instance.
pub struct Arena {
    name: String,
    data: ArenaData,
    config: Option<ArenaConfig>,
    setup: bool,
    setup_error: Option<SetupError>,
    shared: Arc<SharedConfig>,
    state: ArenaState,
    outbox: Vec<ArenaEvent>,
}

impl Arena {
    /// Creates an arena from its persisted data.
    ///
    /// Valid data enables and loads the arena straight away. Invalid data
    /// leaves it in setup mode; the reason is kept in
    /// [`last_setup_error`](Self::last_setup_error).
    pub fn new<H: Host + ?Sized>(
        name: impl Into<String>,
        data: ArenaData,
        shared: Arc<SharedConfig>,
        host: &mut H,
    ) -> Self {
        let mut arena = Self {
            name: name.into(),
            data,
            config: None,
            setup: true,
            setup_error: None,
            shared,
            state: ArenaState::new(None),
            outbox: Vec::new(),
        };
        if arena.enable(host, false) {
            if let Err(e) = arena.load_arena(host, false) {
                tracing::error!(arena = %arena.name, error = %e, "failed to load arena");
            }
        }
        arena
    }

    // -- Setup --------------------------------------------------------------

    /// Validates the arena data without changing anything.
    pub fn validate<H: Host + ?Sized>(&self, host: &H) -> Result<ArenaConfig, SetupError> {
        ArenaConfig::from_data(&self.data, host)
    }

    /// Validates the data and leaves setup mode on success.
    ///
    /// On failure the arena (re-)enters setup mode and `false` is returned.
    /// With `load` set, a successful enable also loads a fresh lobby.
    pub fn enable<H: Host + ?Sized>(&mut self, host: &mut H, load: bool) -> bool {
        let config = match self.validate(host) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(arena = %self.name, error = %e, "arena stays in setup mode");
                if self.state.phase() != Phase::Lobby {
                    // A match can't run without a config; end it cleanly.
                    self.send_participants_home(host);
                    let previous = std::mem::take(&mut self.state);
                    self.state = ArenaState::next_cycle(previous, None);
                }
                self.setup = true;
                self.data.enabled = false;
                self.config = None;
                self.setup_error = Some(e);
                return false;
            }
        };

        if !host.is_world_loaded(config.level()) && !host.load_world(config.level()) {
            tracing::warn!(arena = %self.name, level = config.level(), "level failed to load");
        }

        tracing::info!(
            arena = %self.name,
            level = config.level(),
            capacity = config.capacity(),
            "arena enabled"
        );
        self.config = Some(config);
        self.data.enabled = true;
        self.setup = false;
        self.setup_error = None;

        if load {
            // Loading replaces the state; nobody is dropped silently.
            self.send_participants_home(host);
            if let Err(e) = self.load_arena(host, false) {
                tracing::error!(arena = %self.name, error = %e, "failed to load arena");
            }
        }
        true
    }

    /// Replaces the arena data and puts the arena into setup mode.
    ///
    /// Current participants are dropped. Call [`enable`](Self::enable) to
    /// validate the new data.
    pub fn set_data(&mut self, data: ArenaData) {
        tracing::info!(arena = %self.name, "arena data replaced, entering setup mode");
        self.data = data;
        self.data.enabled = false;
        self.config = None;
        self.setup = true;
        self.setup_error = None;
        let previous = std::mem::take(&mut self.state);
        self.state = ArenaState::next_cycle(previous, None);
    }

    /// Starts a fresh lobby: participants cleared, kit re-rolled.
    ///
    /// `restart` is set when coming back from a finished match; the level
    /// is then assumed loaded and an [`ArenaEvent::Restarted`] is queued.
    pub fn load_arena<H: Host + ?Sized>(&mut self, host: &mut H, restart: bool) -> Result<(), ArenaError> {
        let Some(config) = self.config.as_ref().filter(|_| self.data.enabled) else {
            tracing::error!(arena = %self.name, "can not load arena: arena is not enabled");
            return Err(ArenaError::NotEnabled(self.name.clone()));
        };

        if !restart && !host.is_world_loaded(config.level()) {
            host.load_world(config.level());
        }

        let kit = self.shared.kits.choose(&mut rand::rng()).map(str::to_owned);
        let previous = std::mem::take(&mut self.state);
        self.state = ArenaState::next_cycle(previous, kit);

        tracing::info!(
            arena = %self.name,
            restart,
            kit = self.state.kit().unwrap_or("<fallback>"),
            "arena loaded"
        );
        if restart {
            self.outbox.push(ArenaEvent::Restarted {
                arena: self.name.clone(),
            });
        }
        Ok(())
    }

    // -- Players ------------------------------------------------------------

    /// Adds a player to the lobby.
    ///
    /// A rejection is sent to the player as a notice and returned; it
    /// changes nothing. On success the player is bound to the lowest free
    /// slot, teleported to its spawn, reset and equipped.
    pub fn join<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        player: &PlayerHandle,
    ) -> Result<SlotIndex, JoinRejection> {
        let (slot, spawn) = match self.admit(player) {
            Ok(found) => found,
            Err(rejection) => {
                tracing::debug!(
                    arena = %self.name,
                    player = %player.id,
                    %rejection,
                    "join rejected"
                );
                host.send_message(player, &rejection.notice());
                return Err(rejection);
            }
        };

        host.teleport(player, &spawn);
        self.state.bind(player.clone(), slot);
        tracing::info!(
            arena = %self.name,
            player = %player.id,
            %slot,
            players = self.state.participant_count(),
            "player joined"
        );

        self.broadcast(
            host,
            &format!(
                "> Player {} joined the match! [{}/{}]",
                player.name,
                self.state.participant_count(),
                self.capacity()
            ),
            MessageKind::Message,
            "",
        );

        self.reset_player(host, player, GameMode::Adventure);
        self.equip(host, player);
        Ok(slot)
    }

    /// Checks a join request and picks the slot and spawn for it.
    fn admit(&self, player: &PlayerHandle) -> Result<(SlotIndex, Location), JoinRejection> {
        let config = match &self.config {
            Some(config) if !self.setup && self.data.enabled => config,
            _ => return Err(JoinRejection::UnderSetup),
        };
        if self.state.participant_count() >= config.capacity() {
            return Err(JoinRejection::Full);
        }
        if self.state.contains(player.id) {
            return Err(JoinRejection::AlreadyQueued);
        }
        match self.state.phase() {
            Phase::Lobby => {}
            Phase::Game => return Err(JoinRejection::InGame),
            Phase::Restart => return Err(JoinRejection::Restarting),
        }
        let slot = self
            .state
            .free_slot(config.capacity())
            .ok_or(JoinRejection::Full)?;
        let spawn = config.spawns().spawn(slot).ok_or(JoinRejection::Full)?;
        Ok((slot, Location::new(config.level(), spawn)))
    }

    fn reset_player<H: Host + ?Sized>(&self, host: &mut H, player: &PlayerHandle, mode: GameMode) {
        host.clear_inventory(player);
        host.set_game_mode(player, mode);
        host.set_health(player, FULL_HEALTH);
        host.set_food(player, FULL_FOOD);
    }

    /// Hands out the cycle's kit, or the fallback kit if none is selected.
    fn equip<H: Host + ?Sized>(&mut self, host: &mut H, player: &PlayerHandle) {
        let kit = self
            .state
            .kit()
            .and_then(|name| self.shared.kits.get(name));
        let loadout = match kit {
            Some(kit) => kit.loadout(),
            None => fallback_loadout(),
        };
        for (slot, item) in loadout {
            host.equip(player, slot, item);
        }
        self.outbox.push(ArenaEvent::Equipped {
            arena: self.name.clone(),
            player: player.clone(),
            kit: kit.and(self.state.kit().map(str::to_owned)),
        });
    }

    /// Removes a participant, whatever the phase.
    ///
    /// With `death`, drops land at the death location and the player is
    /// queued for a respawn at the host's default spawn. Otherwise the
    /// player is reset and sent to the default spawn right away. A
    /// non-empty `reason` is sent to the player. Returns `false` if the
    /// player wasn't a participant.
    pub fn leave<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        player: &PlayerHandle,
        reason: &str,
        death: Option<Death>,
    ) -> bool {
        if self.state.remove(player.id).is_none() {
            return false;
        }
        let remaining = self.state.participant_count();

        let line = match death {
            Some(death) => {
                for item in death.drops {
                    host.drop_item(&death.location, item);
                }
                self.state.queue_respawn(player.id);
                format!("> {} [{}/{}]", death.message, remaining, self.capacity())
            }
            None => {
                self.reset_player(host, player, GameMode::Survival);
                let home = host.default_spawn();
                host.teleport(player, &home);
                format!(
                    "> Player {} left the game. [{}/{}]",
                    player.name,
                    remaining,
                    self.capacity()
                )
            }
        };
        self.broadcast(host, &line, MessageKind::Message, "");

        if !reason.is_empty() {
            host.send_message(player, &format!("> {reason}"));
        }
        tracing::info!(
            arena = %self.name,
            player = %player.id,
            phase = %self.state.phase(),
            players = remaining,
            "player left"
        );
        true
    }

    /// Whether `player` is bound to a slot.
    pub fn is_participant(&self, player: PlayerId) -> bool {
        self.state.contains(player)
    }

    /// Pulls a lobby participant back to their spawn if they moved away.
    ///
    /// Returns `true` if a teleport was issued.
    pub fn enforce_spawn<H: Host + ?Sized>(
        &self,
        host: &mut H,
        player: &PlayerHandle,
        position: Position,
    ) -> bool {
        if self.state.phase() != Phase::Lobby {
            return false;
        }
        let (Some(participant), Some(config)) = (self.state.participant(player.id), &self.config)
        else {
            return false;
        };
        let Some(spawn) = config.spawns().spawn(participant.slot) else {
            return false;
        };
        if position.distance(&spawn) <= SPAWN_TOLERANCE {
            return false;
        }
        host.teleport(player, &Location::new(config.level(), spawn));
        true
    }

    /// Consumes a queued respawn override for `player`.
    pub fn take_pending_respawn(&mut self, player: PlayerId) -> bool {
        self.state.take_pending_respawn(player)
    }

    // -- Transitions --------------------------------------------------------

    /// `true` once at most one participant is left.
    pub fn check_end(&self) -> bool {
        self.state.participant_count() <= 1
    }

    /// Lobby → Game. Returns `false` if the arena isn't in the lobby.
    pub fn start_game<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.state.advance(Phase::Game) {
            tracing::warn!(arena = %self.name, phase = %self.state.phase(), "cannot start game");
            return false;
        }
        let players = self.state.snapshot_for_match();
        tracing::info!(arena = %self.name, players = players.len(), "match started");
        self.broadcast(host, "Match Started!", MessageKind::Title, "");
        self.outbox.push(ArenaEvent::MatchStarted {
            arena: self.name.clone(),
            players,
        });
        true
    }

    /// Game → Restart, announcing the winner if exactly one online player
    /// is left.
    ///
    /// Returns the winner, if any. Does nothing outside the Game phase.
    pub fn start_restart<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<PlayerHandle> {
        if !self.state.advance(Phase::Restart) {
            tracing::warn!(arena = %self.name, phase = %self.state.phase(), "cannot end game");
            return None;
        }

        let mut remaining = self.state.participants();
        let winner = match (remaining.next(), remaining.next()) {
            (Some(last), None) if host.is_online(&last.player) => Some(last.player.clone()),
            _ => None,
        };

        let Some(winner) = winner else {
            tracing::info!(arena = %self.name, "match ended without a winner");
            return None;
        };

        host.send_title(&winner, "YOU WON!", "");
        let level = self.config.as_ref().map_or("", |c| c.level());
        host.broadcast_server_message(&format!(
            "[Duelyard] Player {} won the match at {}!",
            winner.name, level
        ));
        tracing::info!(arena = %self.name, player = %winner.id, "match won");
        self.outbox.push(ArenaEvent::Won {
            arena: self.name.clone(),
            player: winner.clone(),
        });
        Some(winner)
    }

    /// Resets every remaining participant the way [`leave`](Self::leave)
    /// does and sends them to the host's default spawn.
    ///
    /// Used right before a reload clears the participant list.
    pub fn send_participants_home<H: Host + ?Sized>(&self, host: &mut H) {
        let home = host.default_spawn();
        for participant in self.state.participants() {
            self.reset_player(host, &participant.player, GameMode::Survival);
            host.teleport(&participant.player, &home);
        }
    }

    // -- Messaging ----------------------------------------------------------

    /// Sends `message` to every participant on the `kind` channel.
    pub fn broadcast<H: Host + ?Sized>(
        &self,
        host: &mut H,
        message: &str,
        kind: MessageKind,
        subtitle: &str,
    ) {
        for participant in self.state.participants() {
            host.send(&participant.player, kind, message, subtitle);
        }
    }

    /// [`broadcast`](Self::broadcast) with a raw numeric kind. Unknown
    /// codes send nothing.
    pub fn broadcast_code<H: Host + ?Sized>(
        &self,
        host: &mut H,
        message: &str,
        code: u8,
        subtitle: &str,
    ) {
        if let Some(kind) = MessageKind::from_code(code) {
            self.broadcast(host, message, kind, subtitle);
        }
    }

    // -- Accessors ----------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn state(&self) -> &ArenaState {
        &self.state
    }

    pub fn data(&self) -> &ArenaData {
        &self.data
    }

    /// Validated configuration; `None` in setup mode.
    pub fn config(&self) -> Option<&ArenaConfig> {
        self.config.as_ref()
    }

    pub fn shared(&self) -> &Arc<SharedConfig> {
        &self.shared
    }

    pub fn join_sign(&self) -> Option<&JoinSign> {
        self.config.as_ref().map(ArenaConfig::join_sign)
    }

    /// `true` while the arena is in setup mode.
    pub fn is_setup(&self) -> bool {
        self.setup
    }

    /// Why the last [`enable`](Self::enable) failed.
    pub fn last_setup_error(&self) -> Option<&SetupError> {
        self.setup_error.as_ref()
    }

    /// Slot count, or 0 in setup mode.
    pub fn capacity(&self) -> usize {
        self.config.as_ref().map_or(0, ArenaConfig::capacity)
    }

    pub fn participant_count(&self) -> usize {
        self.state.participant_count()
    }

    /// Slot held by `player`.
    pub fn slot_of(&self, player: PlayerId) -> Option<SlotIndex> {
        self.state.participant(player).map(|p| p.slot)
    }

    /// Takes all queued outward events.
    pub fn drain_events(&mut self) -> Vec<ArenaEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn info(&self) -> ArenaInfo {
        ArenaInfo {
            name: self.name.clone(),
            phase: self.state.phase(),
            player_count: self.state.participant_count(),
            capacity: self.capacity(),
            setup: self.setup,
            kit: self.state.kit().map(str::to_owned),
        }
    }
}
