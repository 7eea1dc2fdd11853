pub mod ack;
pub mod bus;
pub mod codec;
pub mod error;
pub mod handler;
pub mod queue;

pub use ack::{AckType, BrokerAck};
pub use bus::{encode_body, Publisher};
pub use codec::{
    BincodeCodec, Codec, CodecError, JsonCodec, BINCODE_CONTENT_TYPE, JSON_CONTENT_TYPE,
};
pub use error::MessagingError;
pub use handler::{handler_fn, FnHandler, Handler};
pub use queue::QueueType;
