//! Runs against a live broker: `cargo test -- --ignored`.
//! Uses the built-in `amq.direct` / `amq.topic` exchanges.

use peril_messaging_core::{handler_fn, AckType, MessagingError, Publisher, QueueType};
use peril_messaging_rabbitmq::{RabbitBroker, RabbitMqOptions, DEFAULT_AMQP_URI};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PlayingState {
    is_paused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Seq(u32);

fn unique(name: &str) -> String {
    format!("it.{name}.{}", std::process::id())
}

async fn connect() -> Result<RabbitBroker, MessagingError> {
    let uri = std::env::var("PERIL_AMQP_URL").unwrap_or_else(|_| DEFAULT_AMQP_URI.into());
    RabbitBroker::connect(RabbitMqOptions::new(uri)).await
}

#[tokio::test]
#[ignore = "requires a running RabbitMQ broker"]
async fn pause_flow_reaches_subscriber() -> Result<(), Box<dyn std::error::Error>> {
    let broker = connect().await?;
    let queue = unique("pause");
    let key = format!("pause.{queue}");

    let (tx, mut rx) = mpsc::unbounded_channel();
    broker
        .subscribe_json::<PlayingState, _>(
            "amq.direct",
            &queue,
            &key,
            QueueType::Transient,
            handler_fn(move |state: PlayingState| {
                let _ = tx.send(state);
                AckType::Ack
            }),
        )
        .await?;

    let publisher = broker.publisher().await?;
    publisher
        .publish_json("amq.direct", &key, &PlayingState { is_paused: true })
        .await?;

    let got = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await?;
    assert_eq!(got, Some(PlayingState { is_paused: true }));
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running RabbitMQ broker"]
async fn redeclaring_same_shape_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let broker = connect().await?;
    let queue = unique("idempotent");

    let (_, first) = broker
        .declare_and_bind("amq.topic", &queue, "idempotent.*", QueueType::Transient)
        .await?;
    let (_, second) = broker
        .declare_and_bind("amq.topic", &queue, "idempotent.*", QueueType::Transient)
        .await?;

    assert_eq!(first.name(), second.name());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running RabbitMQ broker"]
async fn conflicting_redeclare_is_a_topology_error() -> Result<(), Box<dyn std::error::Error>> {
    let broker = connect().await?;
    let queue = unique("conflict");

    broker
        .declare_and_bind("amq.topic", &queue, "conflict.*", QueueType::Transient)
        .await?;
    let err = broker
        .declare_and_bind("amq.topic", &queue, "conflict.*", QueueType::Durable)
        .await
        .unwrap_err();

    assert!(matches!(err, MessagingError::Topology(_)), "{err}");
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running RabbitMQ broker"]
async fn unknown_exchange_is_a_topology_error() -> Result<(), Box<dyn std::error::Error>> {
    let broker = connect().await?;
    let err = broker
        .declare_and_bind(
            "peril_no_such_exchange",
            &unique("orphan"),
            "orphan",
            QueueType::Transient,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MessagingError::Topology(_)), "{err}");
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running RabbitMQ broker"]
async fn topic_deliveries_arrive_in_publish_order() -> Result<(), Box<dyn std::error::Error>> {
    let broker = connect().await?;
    let queue = unique("order");
    let prefix = queue.clone();

    let (tx, mut rx) = mpsc::unbounded_channel();
    broker
        .subscribe_json::<Seq, _>(
            "amq.topic",
            &queue,
            &format!("{prefix}.*"),
            QueueType::Transient,
            handler_fn(move |s: Seq| {
                let _ = tx.send(s.0);
                AckType::Ack
            }),
        )
        .await?;

    let publisher = broker.publisher().await?;
    for n in 0..50 {
        publisher
            .publish_json("amq.topic", &format!("{prefix}.p1"), &Seq(n))
            .await?;
    }

    let mut got = Vec::new();
    while got.len() < 50 {
        match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await? {
            Some(n) => got.push(n),
            None => break,
        }
    }
    assert_eq!(got, (0..50).collect::<Vec<_>>());
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running RabbitMQ broker"]
async fn bad_payload_between_good_ones_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let broker = connect().await?;
    let queue = unique("isolation");
    let key = format!("{queue}.p1");

    let (tx, mut rx) = mpsc::unbounded_channel();
    broker
        .subscribe_bincode::<Seq, _>(
            "amq.topic",
            &queue,
            &key,
            QueueType::Transient,
            handler_fn(move |s: Seq| {
                let _ = tx.send(s.0);
                AckType::Ack
            }),
        )
        .await?;

    let publisher = broker.publisher().await?;
    publisher.publish_bincode("amq.topic", &key, &Seq(1)).await?;
    publisher.publish_bincode("amq.topic", &key, &0u8).await?;
    publisher.publish_bincode("amq.topic", &key, &Seq(2)).await?;

    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await?;
    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await?;
    assert_eq!((first, second), (Some(1), Some(2)));
    Ok(())
}

#[tokio::test]
#[ignore = "requires a running RabbitMQ broker"]
async fn unroutable_publish_is_confirmed_and_dropped() -> Result<(), Box<dyn std::error::Error>> {
    let broker = connect().await?;
    let publisher = broker.publisher().await?;

    // Confirm mode: each publish waits for the broker's ack.
    for n in 0..3 {
        publisher
            .publish_bincode("amq.topic", &unique("nobody.listens"), &Seq(n))
            .await?;
    }
    broker.close().await;
    Ok(())
}
