//! Exchange names, routing keys, queue names and the payloads that travel
//! on them. Every node in a game must agree on these byte for byte.

use chrono::{DateTime, Utc};
use peril_messaging_core::{QueueType, BINCODE_CONTENT_TYPE, JSON_CONTENT_TYPE};
use serde::{Deserialize, Serialize};

pub const EXCHANGE_PERIL_DIRECT: &str = "peril_direct";
pub const EXCHANGE_PERIL_TOPIC: &str = "peril_topic";
pub const EXCHANGE_PERIL_DLX: &str = "peril_dlx";

pub const PAUSE_KEY: &str = "pause";
pub const ARMY_MOVES_PREFIX: &str = "army_moves";
pub const WAR_RECOGNITIONS_PREFIX: &str = "war_recognitions";
pub const GAME_LOG_SLUG: &str = "game_logs";

/// Shared by every client so each recognition is resolved once.
pub const WAR_QUEUE: &str = "war";
pub const GAME_LOG_QUEUE: &str = GAME_LOG_SLUG;

pub const PAUSE_QUEUE_TYPE: QueueType = QueueType::Transient;
pub const ARMY_MOVES_QUEUE_TYPE: QueueType = QueueType::Transient;
pub const WAR_QUEUE_TYPE: QueueType = QueueType::Durable;
pub const GAME_LOG_QUEUE_TYPE: QueueType = QueueType::Durable;

fn player_key(prefix: &str, username: &str) -> String {
    format!("{prefix}.{username}")
}

fn wildcard(prefix: &str) -> String {
    format!("{prefix}.*")
}

/// Per-client pause queue; bound to [`PAUSE_KEY`] on the direct exchange.
pub fn pause_queue(username: &str) -> String {
    player_key(PAUSE_KEY, username)
}

/// Routing key a client publishes its moves on, and the name of its own
/// move queue.
pub fn army_moves_key(username: &str) -> String {
    player_key(ARMY_MOVES_PREFIX, username)
}

pub fn army_moves_binding() -> String {
    wildcard(ARMY_MOVES_PREFIX)
}

pub fn war_recognition_key(attacker: &str) -> String {
    player_key(WAR_RECOGNITIONS_PREFIX, attacker)
}

pub fn war_recognitions_binding() -> String {
    wildcard(WAR_RECOGNITIONS_PREFIX)
}

pub fn game_log_key(username: &str) -> String {
    player_key(GAME_LOG_SLUG, username)
}

pub fn game_logs_binding() -> String {
    wildcard(GAME_LOG_SLUG)
}

/// Encoding of the payloads on one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    Json,
    Bincode,
}

impl WireFormat {
    pub const fn content_type(self) -> &'static str {
        match self {
            WireFormat::Json => JSON_CONTENT_TYPE,
            WireFormat::Bincode => BINCODE_CONTENT_TYPE,
        }
    }
}

/// A consumer's queue together with the binding that feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRoute {
    pub exchange: &'static str,
    pub queue: String,
    pub binding: String,
    pub queue_type: QueueType,
    pub format: WireFormat,
}

pub fn pause_route(username: &str) -> QueueRoute {
    QueueRoute {
        exchange: EXCHANGE_PERIL_DIRECT,
        queue: pause_queue(username),
        binding: PAUSE_KEY.to_string(),
        queue_type: PAUSE_QUEUE_TYPE,
        format: WireFormat::Json,
    }
}

pub fn army_moves_route(username: &str) -> QueueRoute {
    QueueRoute {
        exchange: EXCHANGE_PERIL_TOPIC,
        queue: army_moves_key(username),
        binding: army_moves_binding(),
        queue_type: ARMY_MOVES_QUEUE_TYPE,
        format: WireFormat::Json,
    }
}

pub fn war_route() -> QueueRoute {
    QueueRoute {
        exchange: EXCHANGE_PERIL_TOPIC,
        queue: WAR_QUEUE.to_string(),
        binding: war_recognitions_binding(),
        queue_type: WAR_QUEUE_TYPE,
        format: WireFormat::Json,
    }
}

pub fn game_log_route() -> QueueRoute {
    QueueRoute {
        exchange: EXCHANGE_PERIL_TOPIC,
        queue: GAME_LOG_QUEUE.to_string(),
        binding: game_logs_binding(),
        queue_type: GAME_LOG_QUEUE_TYPE,
        format: WireFormat::Bincode,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlayingState {
    pub is_paused: bool,
}

/// One line of the append-only game log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameLog {
    pub current_time: DateTime<Utc>,
    pub message: String,
    pub username: String,
}

impl GameLog {
    pub fn now(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            current_time: Utc::now(),
            message: message.into(),
            username: username.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peril_messaging_core::{BincodeCodec, Codec, JsonCodec};

    #[test]
    fn routing_keys() {
        assert_eq!(pause_queue("p1"), "pause.p1");
        assert_eq!(army_moves_key("p1"), "army_moves.p1");
        assert_eq!(army_moves_binding(), "army_moves.*");
        assert_eq!(war_recognition_key("A"), "war_recognitions.A");
        assert_eq!(war_recognitions_binding(), "war_recognitions.*");
        assert_eq!(game_log_key("p1"), "game_logs.p1");
        assert_eq!(game_logs_binding(), "game_logs.*");
    }

    #[test]
    fn queue_types() {
        assert_eq!(PAUSE_QUEUE_TYPE, QueueType::Transient);
        assert_eq!(ARMY_MOVES_QUEUE_TYPE, QueueType::Transient);
        assert_eq!(WAR_QUEUE_TYPE, QueueType::Durable);
        assert_eq!(GAME_LOG_QUEUE_TYPE, QueueType::Durable);
    }

    fn row(route: &QueueRoute) -> (&str, &str, &str, QueueType, &str) {
        (
            route.exchange,
            &route.queue,
            &route.binding,
            route.queue_type,
            route.format.content_type(),
        )
    }

    #[test]
    fn client_routes() {
        assert_eq!(
            row(&pause_route("p1")),
            (
                "peril_direct",
                "pause.p1",
                "pause",
                QueueType::Transient,
                "application/json"
            )
        );
        assert_eq!(
            row(&army_moves_route("p1")),
            (
                "peril_topic",
                "army_moves.p1",
                "army_moves.*",
                QueueType::Transient,
                "application/json"
            )
        );
        assert_eq!(
            row(&war_route()),
            (
                "peril_topic",
                "war",
                "war_recognitions.*",
                QueueType::Durable,
                "application/json"
            )
        );
    }

    #[test]
    fn server_route() {
        assert_eq!(
            row(&game_log_route()),
            (
                "peril_topic",
                "game_logs",
                "game_logs.*",
                QueueType::Durable,
                "application/x-bincode"
            )
        );
    }

    #[test]
    fn per_player_queues_differ() {
        assert_ne!(pause_route("p1").queue, pause_route("p2").queue);
        assert_ne!(army_moves_route("p1").queue, army_moves_route("p2").queue);
        assert_eq!(pause_route("p1").binding, pause_route("p2").binding);
    }

    #[test]
    fn playing_state_wire_shape() {
        let bytes = JsonCodec.encode(&PlayingState { is_paused: true }).unwrap();
        assert_eq!(bytes, br#"{"IsPaused":true}"#);
        let back: PlayingState = JsonCodec.decode(&bytes).unwrap();
        assert!(back.is_paused);
    }

    #[test]
    fn game_log_survives_bincode() {
        let log = GameLog::now("p1", "p1 won a war against p2");
        let bytes = BincodeCodec.encode(&log).unwrap();
        let back: GameLog = BincodeCodec.decode(&bytes).unwrap();
        assert_eq!(back, log);
    }
}
