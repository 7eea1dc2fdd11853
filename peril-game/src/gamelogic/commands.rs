use super::{Location, UnitRank};
use crate::GameError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Spawn { location: Location, rank: UnitRank },
    Move { to: Location, unit_ids: Vec<u32> },
    Status,
    Spam(u32),
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerCommand {
    Pause,
    Resume,
    Help,
    Quit,
}

/// Parses one REPL line. Blank lines yield `Ok(None)`.
pub fn parse_client_command(line: &str) -> Result<Option<ClientCommand>, GameError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&verb, args)) = words.split_first() else {
        return Ok(None);
    };

    let cmd = match verb {
        "spawn" => match args {
            [location, rank] => ClientCommand::Spawn {
                location: location.parse()?,
                rank: rank.parse()?,
            },
            _ => return Err(GameError::Usage("spawn <location> <rank>")),
        },
        "move" => match args {
            [to, ids @ ..] if !ids.is_empty() => ClientCommand::Move {
                to: to.parse()?,
                unit_ids: ids
                    .iter()
                    .map(|id| {
                        id.parse()
                            .map_err(|_| GameError::InvalidUnitId((*id).to_string()))
                    })
                    .collect::<Result<_, _>>()?,
            },
            _ => return Err(GameError::Usage("move <location> <unitID> [unitID...]")),
        },
        "status" => ClientCommand::Status,
        "spam" => match args {
            [n] => ClientCommand::Spam(n.parse().map_err(|_| GameError::Usage("spam <count>"))?),
            _ => return Err(GameError::Usage("spam <count>")),
        },
        "help" => ClientCommand::Help,
        "quit" => ClientCommand::Quit,
        other => return Err(GameError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

pub fn parse_server_command(line: &str) -> Result<Option<ServerCommand>, GameError> {
    match line.split_whitespace().next() {
        None => Ok(None),
        Some("pause") => Ok(Some(ServerCommand::Pause)),
        Some("resume") => Ok(Some(ServerCommand::Resume)),
        Some("help") => Ok(Some(ServerCommand::Help)),
        Some("quit") => Ok(Some(ServerCommand::Quit)),
        Some(other) => Err(GameError::UnknownCommand(other.to_string())),
    }
}
