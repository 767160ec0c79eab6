//! Error types for the arena layer.

use duelyard_protocol::ProtocolError;

/// Why an arena's configuration was refused.
///
/// Any of these keeps the arena in setup mode: it stays alive but
/// ignores joins until a later [`Arena::enable`](crate::Arena::enable)
/// succeeds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SetupError {
    /// No level has been assigned to the arena.
    #[error("no level is set")]
    MissingLevel,

    /// The level is named but the host has never generated it.
    #[error("level `{0}` does not exist")]
    LevelNotGenerated(String),

    /// Slot count must be a positive integer.
    #[error("slot count must be positive, got {0}")]
    InvalidSlots(i64),

    /// The number of spawns doesn't match the slot count.
    #[error("{spawns} spawns configured for {slots} slots")]
    SpawnCountMismatch { slots: usize, spawns: usize },

    /// A spawn coordinate could not be parsed.
    #[error("spawn for slot {slot} is invalid: {source}")]
    InvalidSpawn {
        slot: usize,
        #[source]
        source: ProtocolError,
    },

    /// The join sign must be `[coordinate, world]`.
    #[error("join sign must have exactly 2 fields, got {0}")]
    MalformedJoinSign(usize),

    /// The join sign coordinate could not be parsed.
    #[error("join sign position is invalid: {0}")]
    InvalidJoinSign(#[source] ProtocolError),
}

/// A join request the arena turned down.
///
/// The `Display` text is the notice shown to the player. Rejections never
/// change arena state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum JoinRejection {
    #[error("Arena is under setup!")]
    UnderSetup,

    #[error("Arena is full!")]
    Full,

    #[error("You are already in queue!")]
    AlreadyQueued,

    #[error("Arena is in-game")]
    InGame,

    #[error("Arena is restarting!")]
    Restarting,
}

impl JoinRejection {
    /// The chat line sent to the rejected player.
    pub fn notice(&self) -> String {
        format!("> {self}")
    }
}

/// Errors returned by arena operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArenaError {
    /// Configuration was refused.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// A join request was turned down.
    #[error(transparent)]
    Join(#[from] JoinRejection),

    /// The operation needs an enabled arena.
    #[error("arena `{0}` is not enabled")]
    NotEnabled(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_rejection_notice_text() {
        assert_eq!(JoinRejection::Full.notice(), "> Arena is full!");
        assert_eq!(JoinRejection::UnderSetup.notice(), "> Arena is under setup!");
        assert_eq!(
            JoinRejection::AlreadyQueued.notice(),
            "> You are already in queue!"
        );
    }

    #[test]
    fn test_from_setup_error() {
        let err: ArenaError = SetupError::MissingLevel.into();
        assert!(matches!(err, ArenaError::Setup(SetupError::MissingLevel)));
        assert_eq!(err.to_string(), "no level is set");
    }

    #[test]
    fn test_spawn_mismatch_message() {
        let err = SetupError::SpawnCountMismatch { slots: 2, spawns: 1 };
        assert_eq!(err.to_string(), "1 spawns configured for 2 slots");
    }
}
