use rand::seq::IndexedRandom;
use tracing::info;

use super::{
    ArmyMove, GameEngine, Location, MoveOutcome, Player, RecognitionOfWar, Unit, UnitRank,
    WarOutcome, WarResolution,
};
use crate::routing::PlayingState;
use crate::GameError;

const MALICIOUS_LOGS: [&str; 6] = [
    "Never interrupt your enemy when he is making a mistake.",
    "The hardest thing of all for a soldier is to retreat.",
    "A soldier will fight long and hard for a bit of colored ribbon.",
    "It should be the function of the ruler to see that the soldiers are fed.",
    "Victory belongs to the most persevering.",
    "All war is deception.",
];

pub fn malicious_log() -> &'static str {
    MALICIOUS_LOGS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(MALICIOUS_LOGS[0])
}

#[derive(Debug, Clone)]
pub struct GameState {
    player: Player,
    paused: bool,
    next_unit_id: u32,
}

impl GameState {
    pub fn new(username: impl Into<String>) -> Result<Self, GameError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(GameError::EmptyUsername);
        }
        Ok(Self {
            player: Player::new(username),
            paused: false,
            next_unit_id: 1,
        })
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.player.units.values()
    }

    pub fn spawn(&mut self, location: Location, rank: UnitRank) -> Unit {
        let unit = Unit {
            id: self.next_unit_id,
            rank,
            location,
        };
        self.next_unit_id += 1;
        self.player.units.insert(unit.id, unit);
        unit
    }

    /// Moves the listed units and returns the move to broadcast.
    ///
    /// Nothing moves unless every id belongs to us.
    pub fn command_move(
        &mut self,
        to_location: Location,
        unit_ids: &[u32],
    ) -> Result<ArmyMove, GameError> {
        if self.paused {
            return Err(GameError::Paused);
        }
        if unit_ids.is_empty() {
            return Err(GameError::Usage("move <location> <unitID> [unitID...]"));
        }
        if let Some(missing) = unit_ids
            .iter()
            .find(|id| !self.player.units.contains_key(id))
        {
            return Err(GameError::UnknownUnit(*missing));
        }

        let mut moved = Vec::with_capacity(unit_ids.len());
        for id in unit_ids {
            if let Some(unit) = self.player.units.get_mut(id) {
                unit.location = to_location;
                moved.push(*unit);
            }
        }

        Ok(ArmyMove {
            player: self.player.clone(),
            units: moved,
            to_location,
        })
    }

    fn remove_units_at(&mut self, location: Location) {
        self.player.units.retain(|_, u| u.location != location);
    }
}

impl GameEngine for GameState {
    fn username(&self) -> &str {
        &self.player.username
    }

    fn player(&self) -> Player {
        self.player.clone()
    }

    fn handle_pause(&mut self, state: PlayingState) {
        self.paused = state.is_paused;
        if state.is_paused {
            info!("==== Pause Detected ====");
        } else {
            info!("==== Resume Detected ====");
        }
    }

    fn handle_move(&mut self, mv: &ArmyMove) -> MoveOutcome {
        info!(
            player = %mv.player.username,
            units = mv.units.len(),
            to = %mv.to_location,
            "move detected"
        );

        if mv.player.username == self.player.username {
            return MoveOutcome::SamePlayer;
        }
        match self.player.overlapping_location(&mv.player) {
            Some(location) => {
                info!(%location, enemy = %mv.player.username, "you are at war");
                MoveOutcome::MakeWar
            }
            None => {
                info!(enemy = %mv.player.username, "you are safe");
                MoveOutcome::Safe
            }
        }
    }

    fn handle_war(&mut self, rw: &RecognitionOfWar) -> WarResolution {
        let me = self.player.username.as_str();
        let is_attacker = rw.attacker.username == me;
        let is_defender = rw.defender.username == me;
        if !is_attacker && !is_defender {
            return WarResolution::without_battle(WarOutcome::NotInvolved);
        }

        let Some(location) = rw.attacker.overlapping_location(&rw.defender) else {
            info!("war declared but no units overlap");
            return WarResolution::without_battle(WarOutcome::NoUnits);
        };

        let attacker_power = rw.attacker.power_at(location);
        let defender_power = rw.defender.power_at(location);
        info!(
            %location,
            attacker = %rw.attacker.username,
            attacker_power,
            defender = %rw.defender.username,
            defender_power,
            "battle"
        );

        let (winner, loser) = if attacker_power >= defender_power {
            (&rw.attacker.username, &rw.defender.username)
        } else {
            (&rw.defender.username, &rw.attacker.username)
        };
        let resolution = |outcome| WarResolution {
            outcome,
            winner: winner.clone(),
            loser: loser.clone(),
        };

        if attacker_power == defender_power {
            self.remove_units_at(location);
            return resolution(WarOutcome::Draw);
        }
        if loser == me {
            self.remove_units_at(location);
            resolution(WarOutcome::OpponentWon)
        } else {
            resolution(WarOutcome::YouWon)
        }
    }
}
