use async_trait::async_trait;
use lapin::{options::BasicPublishOptions, BasicProperties, Channel};
use peril_messaging_core::{encode_body, Codec, MessagingError, Publisher};
use serde::Serialize;
use tracing::debug;

/// A [`Publisher`] that owns one channel in confirm mode.
pub struct ChannelPublisher {
    channel: Channel,
}

impl ChannelPublisher {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl Publisher for ChannelPublisher {
    async fn publish<C, T>(
        &self,
        exchange: &str,
        routing_key: &str,
        codec: &C,
        value: &T,
    ) -> Result<(), MessagingError>
    where
        C: Codec,
        T: Serialize + Send + Sync,
    {
        let body = encode_body(codec, value)?;

        let confirm = self
            .channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions {
                    mandatory: false,
                    immediate: false,
                },
                &body,
                BasicProperties::default().with_content_type(codec.content_type().into()),
            )
            .await
            .map_err(|e| MessagingError::Publish(e.to_string()))?
            .await
            .map_err(|e| MessagingError::Publish(e.to_string()))?;

        if confirm.is_nack() {
            return Err(MessagingError::Publish(format!(
                "broker nacked publish to {exchange} ({routing_key})"
            )));
        }

        debug!(exchange, routing_key, bytes = body.len(), "published");
        Ok(())
    }
}
