use lapin::{
    options::{BasicConsumeOptions, BasicQosOptions},
    types::FieldTable,
};
use peril_messaging_core::{BincodeCodec, Codec, Handler, JsonCodec, MessagingError, QueueType};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::info;

use crate::dispatcher::dispatch;
use crate::RabbitBroker;

/// A running dispatch loop over one queue.
pub struct Subscription {
    queue: String,
    task: JoinHandle<u64>,
}

impl Subscription {
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Waits for the loop to end and returns how many deliveries it
    /// settled. The loop only ends when the consumer stream does.
    pub async fn join(self) -> Result<u64, MessagingError> {
        self.task
            .await
            .map_err(|e| MessagingError::Subscribe(format!("dispatch on {}: {e}", self.queue)))
    }
}

impl RabbitBroker {
    /// Declares and binds `queue`, then consumes it with manual
    /// acknowledgement on a background task.
    ///
    /// Returns as soon as the consumer is registered.
    pub async fn subscribe<T, C, H>(
        &self,
        exchange: &str,
        queue: &str,
        key: &str,
        queue_type: QueueType,
        codec: C,
        handler: H,
    ) -> Result<Subscription, MessagingError>
    where
        T: DeserializeOwned + Send + 'static,
        C: Codec,
        H: Handler<T> + 'static,
    {
        let (ch, declared) = self
            .declare_and_bind(exchange, queue, key, queue_type)
            .await
            .map_err(|e| MessagingError::Subscribe(e.to_string()))?;

        if self.opts.prefetch > 0 {
            ch.basic_qos(self.opts.prefetch, BasicQosOptions { global: false })
                .await
                .map_err(|e| MessagingError::Subscribe(format!("basic_qos: {e}")))?;
        }

        let queue_name = declared.name().as_str().to_string();
        let consumer = ch
            .basic_consume(
                &queue_name,
                &self.opts.consumer_tag(&queue_name),
                BasicConsumeOptions {
                    no_ack: false,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| MessagingError::Subscribe(format!("consume {queue_name}: {e}")))?;

        info!(queue = %queue_name, exchange, key, "consuming");

        let loop_queue = queue_name.clone();
        let task = tokio::spawn(async move {
            // The channel lives as long as its consumer.
            let _channel = ch;
            dispatch::<T, _, _, _, _, _>(&loop_queue, consumer, &codec, &handler).await
        });

        Ok(Subscription {
            queue: queue_name,
            task,
        })
    }

    pub async fn subscribe_json<T, H>(
        &self,
        exchange: &str,
        queue: &str,
        key: &str,
        queue_type: QueueType,
        handler: H,
    ) -> Result<Subscription, MessagingError>
    where
        T: DeserializeOwned + Send + 'static,
        H: Handler<T> + 'static,
    {
        self.subscribe(exchange, queue, key, queue_type, JsonCodec, handler)
            .await
    }

    pub async fn subscribe_bincode<T, H>(
        &self,
        exchange: &str,
        queue: &str,
        key: &str,
        queue_type: QueueType,
        handler: H,
    ) -> Result<Subscription, MessagingError>
    where
        T: DeserializeOwned + Send + 'static,
        H: Handler<T> + 'static,
    {
        self.subscribe(exchange, queue, key, queue_type, BincodeCodec, handler)
            .await
    }
}
