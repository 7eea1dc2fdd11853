use async_trait::async_trait;
use lapin::options::{BasicAckOptions, BasicNackOptions};
use peril_messaging_core::{AckType, BrokerAck};

/// The slice of a broker delivery the dispatcher needs.
#[async_trait]
pub trait AmqpDelivery: Send {
    fn body(&self) -> &[u8];

    fn routing_key(&self) -> &str;

    /// Applies `decision` to this delivery on the broker.
    async fn settle(&self, decision: AckType) -> Result<(), lapin::Error>;
}

#[async_trait]
impl AmqpDelivery for lapin::message::Delivery {
    fn body(&self) -> &[u8] {
        &self.data
    }

    fn routing_key(&self) -> &str {
        self.routing_key.as_str()
    }

    async fn settle(&self, decision: AckType) -> Result<(), lapin::Error> {
        match decision.broker_ack() {
            BrokerAck::Ack { multiple } => self
                .acker
                .ack(BasicAckOptions { multiple })
                .await
                .map(drop),
            BrokerAck::Nack { multiple, requeue } => self
                .acker
                .nack(BasicNackOptions { multiple, requeue })
                .await
                .map(drop),
        }
    }
}
