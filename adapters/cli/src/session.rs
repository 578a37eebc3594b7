//! Drives a [`World`] from player input and enforces the reset policy.

use std::fmt;

use clap::ValueEnum;
use log::info;
use serde::Deserialize;
use tilemerge_core::MoveOutcome;
use tilemerge_world::{query, World};

use crate::input::Input;

/// Governs when a player may abandon a game for a new one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum ResetPolicy {
    /// A new game may start at any time.
    #[default]
    Always,
    /// A new game may start only once the current one is over.
    WhenFinished,
}

/// Result of handling one piece of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reply {
    /// The move changed the grid.
    Moved {
        /// Points earned by the move.
        score_delta: u64,
    },
    /// The move would not change the grid.
    Invalid,
    /// The game is over.
    GameOver,
    /// A new game started.
    Reset,
    /// The reset policy forbids starting a new game yet.
    ResetRefused,
    /// The player asked to stop.
    Quit,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moved { score_delta: 0 } => write!(f, "moved"),
            Self::Moved { score_delta } => write!(f, "moved, +{score_delta}"),
            Self::Invalid => write!(f, "nothing moves that way"),
            Self::GameOver => write!(f, "game over, enter n for a new game"),
            Self::Reset => write!(f, "new game"),
            Self::ResetRefused => write!(f, "finish the current game before starting another"),
            Self::Quit => write!(f, "bye"),
        }
    }
}

/// Interactive session wrapping the authoritative world.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    reset_policy: ResetPolicy,
}

impl Session {
    pub(crate) fn new(world: World, reset_policy: ResetPolicy) -> Self {
        Self {
            world,
            reset_policy,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies one input and describes what happened.
    pub(crate) fn handle(&mut self, input: Input) -> Reply {
        match input {
            Input::Play(direction) => match self.world.play(direction) {
                MoveOutcome::Moved { score_delta } => Reply::Moved { score_delta },
                MoveOutcome::Invalid => Reply::Invalid,
                MoveOutcome::GameOver => Reply::GameOver,
            },
            Input::Reset => {
                if self.reset_policy == ResetPolicy::WhenFinished
                    && !query::is_game_over(&self.world)
                {
                    info!("refusing to reset a game still in play");
                    return Reply::ResetRefused;
                }
                self.world.reset();
                Reply::Reset
            }
            Input::Quit => Reply::Quit,
        }
    }
}
