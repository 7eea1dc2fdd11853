//! Errors raised by game commands.

use crate::gamelogic::{Location, UnitRank};

/// A REPL command that could not be parsed or was refused by the rules.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid location: {0} (expected one of {locations})", locations = Location::names())]
    InvalidLocation(String),

    #[error("invalid rank: {0} (expected one of {ranks})", ranks = UnitRank::names())]
    InvalidRank(String),

    #[error("invalid unit id: {0}")]
    InvalidUnitId(String),

    #[error("no unit with id {0}")]
    UnknownUnit(u32),

    #[error("the game is paused, you can not move units")]
    Paused,

    #[error("username must not be empty")]
    EmptyUsername,
}
