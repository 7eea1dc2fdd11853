//! Event handlers: each turns a game event into an acknowledgement.
//!
//! The engine lock is held only for the engine call. Downstream publishes
//! happen after it is released, and when one fails the inbound event is
//! requeued so it is retried.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use peril_messaging_core::{AckType, Handler, Publisher};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::gamelogic::{ArmyMove, GameEngine, MoveOutcome, RecognitionOfWar, WarOutcome};
use crate::routing::{self, GameLog, PlayingState, EXCHANGE_PERIL_TOPIC};

pub type SharedEngine<E> = Arc<Mutex<E>>;

pub struct PauseHandler<E> {
    engine: SharedEngine<E>,
}

impl<E> PauseHandler<E> {
    pub fn new(engine: SharedEngine<E>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<E: GameEngine> Handler<PlayingState> for PauseHandler<E> {
    async fn handle(&self, state: PlayingState) -> AckType {
        self.engine.lock().await.handle_pause(state);
        AckType::Ack
    }
}

pub struct MoveHandler<E, P> {
    engine: SharedEngine<E>,
    publisher: P,
}

impl<E, P> MoveHandler<E, P> {
    pub fn new(engine: SharedEngine<E>, publisher: P) -> Self {
        Self { engine, publisher }
    }
}

#[async_trait]
impl<E: GameEngine, P: Publisher> Handler<ArmyMove> for MoveHandler<E, P> {
    async fn handle(&self, mv: ArmyMove) -> AckType {
        let (outcome, defender) = {
            let mut engine = self.engine.lock().await;
            let outcome = engine.handle_move(&mv);
            (outcome, engine.player())
        };

        match outcome {
            MoveOutcome::Safe => AckType::Ack,
            MoveOutcome::SamePlayer => AckType::NackDiscard,
            MoveOutcome::MakeWar => {
                let key = routing::war_recognition_key(&mv.player.username);
                let rw = RecognitionOfWar {
                    attacker: mv.player,
                    defender,
                };
                match self
                    .publisher
                    .publish_json(EXCHANGE_PERIL_TOPIC, &key, &rw)
                    .await
                {
                    Ok(()) => AckType::Ack,
                    Err(e) => {
                        error!(routing_key = %key, error = %e, "failed to publish war recognition");
                        AckType::NackRequeue
                    }
                }
            }
        }
    }
}

pub struct WarHandler<E, P> {
    engine: SharedEngine<E>,
    publisher: P,
}

impl<E, P> WarHandler<E, P> {
    pub fn new(engine: SharedEngine<E>, publisher: P) -> Self {
        Self { engine, publisher }
    }
}

#[async_trait]
impl<E: GameEngine, P: Publisher> Handler<RecognitionOfWar> for WarHandler<E, P> {
    async fn handle(&self, rw: RecognitionOfWar) -> AckType {
        let (resolution, username) = {
            let mut engine = self.engine.lock().await;
            let resolution = engine.handle_war(&rw);
            (resolution, engine.username().to_string())
        };

        let message = match resolution.outcome {
            WarOutcome::NotInvolved => return AckType::NackRequeue,
            WarOutcome::NoUnits => return AckType::NackDiscard,
            WarOutcome::OpponentWon | WarOutcome::YouWon => format!(
                "{} won a war against {}",
                resolution.winner, resolution.loser
            ),
            WarOutcome::Draw => format!(
                "A war between {} and {} resulted in a draw",
                resolution.winner, resolution.loser
            ),
        };

        let key = routing::game_log_key(&username);
        let log = GameLog::now(username, message);
        match self
            .publisher
            .publish_bincode(EXCHANGE_PERIL_TOPIC, &key, &log)
            .await
        {
            Ok(()) => AckType::Ack,
            Err(e) => {
                error!(routing_key = %key, error = %e, "failed to publish game log");
                AckType::NackRequeue
            }
        }
    }
}

/// Terminal consumer of the game log: appends each record to a file.
pub struct GameLogWriter {
    path: PathBuf,
}

impl GameLogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn append(&self, log: &GameLog) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let line = format!(
            "{} {}: {}\n",
            log.current_time.to_rfc3339(),
            log.username,
            log.message
        );
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

#[async_trait]
impl Handler<GameLog> for GameLogWriter {
    async fn handle(&self, log: GameLog) -> AckType {
        match self.append(&log).await {
            Ok(()) => {
                info!(username = %log.username, message = %log.message, "game log");
                AckType::Ack
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to write game log");
                AckType::NackRequeue
            }
        }
    }
}
