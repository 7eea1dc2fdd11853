//! Subscriptions each node opens at startup.

use std::path::PathBuf;
use std::sync::Arc;

use peril_messaging_core::{Handler, MessagingError};
use peril_messaging_rabbitmq::{RabbitBroker, Subscription};
use serde::de::DeserializeOwned;

use crate::gamelogic::{ArmyMove, GameEngine, RecognitionOfWar};
use crate::handlers::{GameLogWriter, MoveHandler, PauseHandler, SharedEngine, WarHandler};
use crate::routing::{self, GameLog, PlayingState, QueueRoute, WireFormat};

async fn subscribe_route<T, H>(
    broker: &RabbitBroker,
    route: &QueueRoute,
    handler: H,
) -> Result<Subscription, MessagingError>
where
    T: DeserializeOwned + Send + 'static,
    H: Handler<T> + 'static,
{
    let QueueRoute {
        exchange,
        queue,
        binding,
        queue_type,
        format,
    } = route;
    match format {
        WireFormat::Json => {
            broker
                .subscribe_json::<T, _>(exchange, queue, binding, *queue_type, handler)
                .await
        }
        WireFormat::Bincode => {
            broker
                .subscribe_bincode::<T, _>(exchange, queue, binding, *queue_type, handler)
                .await
        }
    }
}

/// Pause, move and war subscriptions for one player.
///
/// The move and war handlers each get their own publish channel.
pub async fn subscribe_client<E: GameEngine>(
    broker: &RabbitBroker,
    engine: SharedEngine<E>,
) -> Result<Vec<Subscription>, MessagingError> {
    let username = engine.lock().await.username().to_string();

    let pause = subscribe_route::<PlayingState, _>(
        broker,
        &routing::pause_route(&username),
        PauseHandler::new(Arc::clone(&engine)),
    )
    .await?;

    let moves = subscribe_route::<ArmyMove, _>(
        broker,
        &routing::army_moves_route(&username),
        MoveHandler::new(Arc::clone(&engine), broker.publisher().await?),
    )
    .await?;

    let wars = subscribe_route::<RecognitionOfWar, _>(
        broker,
        &routing::war_route(),
        WarHandler::new(engine, broker.publisher().await?),
    )
    .await?;

    Ok(vec![pause, moves, wars])
}

/// The server's game log consumer.
pub async fn subscribe_server(
    broker: &RabbitBroker,
    game_log: impl Into<PathBuf>,
) -> Result<Subscription, MessagingError> {
    subscribe_route::<GameLog, _>(
        broker,
        &routing::game_log_route(),
        GameLogWriter::new(game_log),
    )
    .await
}
