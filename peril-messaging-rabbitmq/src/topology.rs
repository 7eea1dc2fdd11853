use lapin::{options::QueueBindOptions, types::FieldTable, Channel, Queue};
use peril_messaging_core::{MessagingError, QueueType};
use tracing::debug;

use crate::options::{queue_arguments, queue_declare_options};
use crate::RabbitBroker;

impl RabbitBroker {
    /// Opens a fresh channel, declares `queue` with the shape of
    /// `queue_type` and binds it to `exchange` under `key`.
    ///
    /// Redeclaring an existing queue with the same shape is a no-op; a
    /// shape mismatch or an unknown exchange is a `Topology` error, and
    /// the broker closes the channel it happened on.
    pub async fn declare_and_bind(
        &self,
        exchange: &str,
        queue: &str,
        key: &str,
        queue_type: QueueType,
    ) -> Result<(Channel, Queue), MessagingError> {
        let ch = self.open_channel().await?;

        let declared = ch
            .queue_declare(
                queue,
                queue_declare_options(queue_type),
                queue_arguments(&self.opts.dead_letter_exchange),
            )
            .await
            .map_err(|e| MessagingError::Topology(format!("declare {queue}: {e}")))?;

        ch.queue_bind(
            queue,
            exchange,
            key,
            QueueBindOptions { nowait: false },
            FieldTable::default(),
        )
        .await
        .map_err(|e| {
            MessagingError::Topology(format!("bind {queue} to {exchange} ({key}): {e}"))
        })?;

        debug!(queue, exchange, key, ?queue_type, "queue declared and bound");
        Ok((ch, declared))
    }
}
