use lapin::{options::ConfirmSelectOptions, Channel, Connection, ConnectionProperties};
use peril_messaging_core::MessagingError;
use tracing::{info, warn};

use crate::options::RabbitMqOptions;
use crate::publisher::ChannelPublisher;

/// The one broker connection a process holds, plus its options.
///
/// Channels are never shared: every subscription opens its own, and each
/// producing task asks for its own [`ChannelPublisher`].
pub struct RabbitBroker {
    pub(crate) opts: RabbitMqOptions,
    conn: Connection,
}

impl RabbitBroker {
    pub async fn connect(opts: RabbitMqOptions) -> Result<Self, MessagingError> {
        let conn = Connection::connect(&opts.uri, ConnectionProperties::default())
            .await
            .map_err(|e| MessagingError::Connection(e.to_string()))?;

        info!(dlx = %opts.dead_letter_exchange, "RabbitMQ connected");
        Ok(Self { opts, conn })
    }

    pub async fn open_channel(&self) -> Result<Channel, MessagingError> {
        self.conn
            .create_channel()
            .await
            .map_err(|e| MessagingError::Connection(e.to_string()))
    }

    /// Opens a dedicated confirm-mode channel for one producing task.
    pub async fn publisher(&self) -> Result<ChannelPublisher, MessagingError> {
        let channel = self.open_channel().await?;
        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(|e| MessagingError::Connection(format!("confirm_select: {e}")))?;
        Ok(ChannelPublisher::new(channel))
    }

    pub async fn close(self) {
        match self.conn.close(200, "bye").await {
            Ok(()) => info!("closed RabbitMQ connection"),
            Err(e) => warn!(error = %e, "error closing RabbitMQ connection"),
        }
    }
}
