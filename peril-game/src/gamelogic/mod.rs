//! The game rules the messaging layer calls into.
//!
//! Handlers only see [`GameEngine`]; [`GameState`] is the in-memory
//! implementation the client runs.

mod commands;
mod state;
mod units;

pub use commands::{parse_client_command, parse_server_command, ClientCommand, ServerCommand};
pub use state::{malicious_log, GameState};
pub use units::{ArmyMove, Location, Player, RecognitionOfWar, Unit, UnitRank};

use crate::routing::PlayingState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The mover shares a location with us.
    MakeWar,
    Safe,
    /// Our own move echoed back through `army_moves.*`.
    SamePlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarOutcome {
    NotInvolved,
    NoUnits,
    OpponentWon,
    YouWon,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarResolution {
    pub outcome: WarOutcome,
    pub winner: String,
    pub loser: String,
}

impl WarResolution {
    pub fn without_battle(outcome: WarOutcome) -> Self {
        Self {
            outcome,
            winner: String::new(),
            loser: String::new(),
        }
    }
}

pub trait GameEngine: Send + 'static {
    fn username(&self) -> &str;

    /// Snapshot of the local player as published in moves and wars.
    fn player(&self) -> Player;

    fn handle_pause(&mut self, state: PlayingState);

    fn handle_move(&mut self, mv: &ArmyMove) -> MoveOutcome;

    fn handle_war(&mut self, rw: &RecognitionOfWar) -> WarResolution;
}
