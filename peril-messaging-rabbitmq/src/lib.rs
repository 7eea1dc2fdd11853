mod delivery;
mod dispatcher;
mod options;
mod publisher;
mod rabbit_broker;
mod subscriber;
mod topology;

pub use delivery::AmqpDelivery;
pub use dispatcher::dispatch;
pub use options::{
    queue_arguments, queue_declare_options, RabbitMqOptions, DEFAULT_AMQP_URI,
    DEFAULT_DEAD_LETTER_EXCHANGE,
};
pub use publisher::ChannelPublisher;
pub use rabbit_broker::RabbitBroker;
pub use subscriber::Subscription;
