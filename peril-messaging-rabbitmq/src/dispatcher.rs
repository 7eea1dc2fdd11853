use std::fmt::Display;

use futures_util::{Stream, StreamExt};
use peril_messaging_core::{AckType, Codec, Handler};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::delivery::AmqpDelivery;

/// Drains `deliveries` in order until the stream ends or fails.
///
/// Each body is decoded with `codec` and handed to `handler`; the decision
/// is applied before the next delivery is pulled. Undecodable bodies are
/// dead-lettered and never reach the handler. Returns the number of
/// deliveries settled.
pub async fn dispatch<T, C, H, S, D, E>(
    queue: &str,
    mut deliveries: S,
    codec: &C,
    handler: &H,
) -> u64
where
    T: DeserializeOwned + Send + 'static,
    C: Codec,
    H: Handler<T> + ?Sized,
    S: Stream<Item = Result<D, E>> + Unpin,
    D: AmqpDelivery,
    E: Display,
{
    let mut settled = 0u64;

    while let Some(next) = deliveries.next().await {
        let delivery = match next {
            Ok(d) => d,
            Err(e) => {
                error!(queue, error = %e, "delivery stream failed");
                break;
            }
        };

        let decision = match codec.decode::<T>(delivery.body()) {
            Ok(value) => handler.handle(value).await,
            Err(e) => {
                warn!(
                    queue,
                    routing_key = delivery.routing_key(),
                    error = %e,
                    "discarding undecodable message"
                );
                AckType::NackDiscard
            }
        };

        match delivery.settle(decision).await {
            Ok(()) => {
                settled += 1;
                debug!(queue, ?decision, "delivery settled");
            }
            Err(e) => {
                error!(queue, ?decision, error = %e, "failed to settle delivery");
            }
        }
    }

    info!(queue, settled, "delivery stream ended");
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures_util::stream;
    use peril_messaging_core::{handler_fn, BincodeCodec, JsonCodec};
    use serde::{Deserialize, Serialize};
    use std::sync::{Arc, Mutex};

    type Ledger = Arc<Mutex<Vec<(Vec<u8>, AckType)>>>;

    struct FakeDelivery {
        body: Vec<u8>,
        ledger: Ledger,
    }

    #[async_trait]
    impl AmqpDelivery for FakeDelivery {
        fn body(&self) -> &[u8] {
            &self.body
        }

        fn routing_key(&self) -> &str {
            "army_moves.p1"
        }

        async fn settle(&self, decision: AckType) -> Result<(), lapin::Error> {
            self.ledger
                .lock()
                .unwrap()
                .push((self.body.clone(), decision));
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct PlayingState {
        is_paused: bool,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Seq(u32);

    fn deliveries(
        bodies: Vec<Vec<u8>>,
        ledger: &Ledger,
    ) -> impl Stream<Item = Result<FakeDelivery, std::io::Error>> + Unpin {
        let ledger = Arc::clone(ledger);
        stream::iter(bodies.into_iter().map(move |body| {
            Ok(FakeDelivery {
                body,
                ledger: Arc::clone(&ledger),
            })
        }))
    }

    #[tokio::test]
    async fn preserves_delivery_order() {
        let ledger = Ledger::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler = handler_fn(move |s: Seq| {
            sink.lock().unwrap().push(s.0);
            AckType::Ack
        });

        let bodies = (0..20).map(|n| JsonCodec.encode(&Seq(n)).unwrap()).collect();
        let stream = deliveries(bodies, &ledger);
        let run = dispatch::<Seq, _, _, _, _, _>("q", stream, &JsonCodec, &handler);
        let settled = run.await;

        assert_eq!(settled, 20);
        assert_eq!(*seen.lock().unwrap(), (0..20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn malformed_body_does_not_stop_the_loop() {
        let ledger = Ledger::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handler = handler_fn(move |s: PlayingState| {
            sink.lock().unwrap().push(s);
            AckType::Ack
        });

        let bodies = vec![
            JsonCodec.encode(&PlayingState { is_paused: true }).unwrap(),
            b"{not json".to_vec(),
            JsonCodec.encode(&PlayingState { is_paused: false }).unwrap(),
        ];
        let stream = deliveries(bodies, &ledger);
        let run = dispatch::<PlayingState, _, _, _, _, _>("pause", stream, &JsonCodec, &handler);
        run.await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                PlayingState { is_paused: true },
                PlayingState { is_paused: false },
            ]
        );
        let decisions: Vec<AckType> = ledger.lock().unwrap().iter().map(|(_, d)| *d).collect();
        let expected = [AckType::Ack, AckType::NackDiscard, AckType::Ack];
        assert_eq!(decisions, expected);
    }

    #[tokio::test]
    async fn handler_decision_is_applied_to_its_own_delivery() {
        let ledger = Ledger::default();
        let handler = handler_fn(|s: Seq| match s.0 {
            0 => AckType::Ack,
            1 => AckType::NackRequeue,
            _ => AckType::NackDiscard,
        });

        let bodies: Vec<Vec<u8>> = (0..3)
            .map(|n| BincodeCodec.encode(&Seq(n)).unwrap())
            .collect();
        let stream = deliveries(bodies.clone(), &ledger);
        let run = dispatch::<Seq, _, _, _, _, _>("game_logs", stream, &BincodeCodec, &handler);
        run.await;

        let recorded = ledger.lock().unwrap().clone();
        assert_eq!(
            recorded,
            vec![
                (bodies[0].clone(), AckType::Ack),
                (bodies[1].clone(), AckType::NackRequeue),
                (bodies[2].clone(), AckType::NackDiscard),
            ]
        );
    }

    #[tokio::test]
    async fn stream_error_ends_dispatch() {
        let ledger = Ledger::default();
        let handler = handler_fn(|_: Seq| AckType::Ack);
        let items: Vec<Result<FakeDelivery, std::io::Error>> = vec![
            Ok(FakeDelivery {
                body: JsonCodec.encode(&Seq(1)).unwrap(),
                ledger: Arc::clone(&ledger),
            }),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "closed")),
            Ok(FakeDelivery {
                body: JsonCodec.encode(&Seq(2)).unwrap(),
                ledger: Arc::clone(&ledger),
            }),
        ];

        let stream = stream::iter(items);
        let run = dispatch::<Seq, _, _, _, _, _>("q", stream, &JsonCodec, &handler);
        let settled = run.await;
        assert_eq!(settled, 1);
        assert_eq!(ledger.lock().unwrap().len(), 1);
    }
}
