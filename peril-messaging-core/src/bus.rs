// peril-messaging-core/src/bus.rs
use async_trait::async_trait;
use serde::Serialize;

use crate::{BincodeCodec, Codec, JsonCodec, MessagingError};

/// Encodes a value for the wire; a failure here is a failed publish.
pub fn encode_body<C, T>(codec: &C, value: &T) -> Result<Vec<u8>, MessagingError>
where
    C: Codec,
    T: Serialize + ?Sized,
{
    codec
        .encode(value)
        .map_err(|e| MessagingError::Publish(e.to_string()))
}

/// Sends encoded values to an exchange.
///
/// Implementations own a single channel and must not be shared between
/// concurrently publishing tasks; give each producing task its own.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Encodes `value` with `codec` and publishes it non-mandatory, so an
    /// unroutable message is dropped by the broker.
    async fn publish<C, T>(
        &self,
        exchange: &str,
        routing_key: &str,
        codec: &C,
        value: &T,
    ) -> Result<(), MessagingError>
    where
        C: Codec,
        T: Serialize + Send + Sync;

    async fn publish_json<T>(
        &self,
        exchange: &str,
        routing_key: &str,
        value: &T,
    ) -> Result<(), MessagingError>
    where
        T: Serialize + Send + Sync,
    {
        self.publish(exchange, routing_key, &JsonCodec, value).await
    }

    async fn publish_bincode<T>(
        &self,
        exchange: &str,
        routing_key: &str,
        value: &T,
    ) -> Result<(), MessagingError>
    where
        T: Serialize + Send + Sync,
    {
        self.publish(exchange, routing_key, &BincodeCodec, value).await
    }
}

#[async_trait]
impl<P> Publisher for std::sync::Arc<P>
where
    P: Publisher,
{
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
        (**self).publish(exchange, routing_key, codec, value).await
    }
}
