// peril-messaging-core/src/ack.rs

/// What a handler wants done with the delivery it just processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckType {
    /// Remove the message from the queue for good.
    Ack,
    /// Put the message back on the queue for redelivery.
    NackRequeue,
    /// Remove the message and let the broker dead-letter it.
    NackDiscard,
}

/// The broker primitive a decision maps to, with its exact flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerAck {
    Ack { multiple: bool },
    Nack { multiple: bool, requeue: bool },
}

impl AckType {
    /// Every decision settles exactly one delivery.
    pub const fn broker_ack(self) -> BrokerAck {
        match self {
            Self::Ack => BrokerAck::Ack { multiple: false },
            Self::NackRequeue => BrokerAck::Nack {
                multiple: false,
                requeue: true,
            },
            Self::NackDiscard => BrokerAck::Nack {
                multiple: false,
                requeue: false,
            },
        }
    }
}
