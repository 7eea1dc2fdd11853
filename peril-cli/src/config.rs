use std::path::PathBuf;

use clap::{Args, Parser};
use peril_messaging_rabbitmq::{RabbitMqOptions, DEFAULT_AMQP_URI, DEFAULT_DEAD_LETTER_EXCHANGE};

#[derive(Debug, Clone, Args)]
pub struct BrokerArgs {
    /// AMQP endpoint including credentials and vhost.
    #[arg(long, env = "PERIL_AMQP_URL", default_value = DEFAULT_AMQP_URI)]
    pub amqp_url: String,

    /// Exchange that every declared queue dead-letters into.
    #[arg(long, env = "PERIL_DLX", default_value = DEFAULT_DEAD_LETTER_EXCHANGE)]
    pub dead_letter_exchange: String,

    /// Unacknowledged deliveries per consumer; 0 means unlimited.
    #[arg(long, env = "PERIL_PREFETCH", default_value_t = 0)]
    pub prefetch: u16,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BrokerArgs {
    pub fn options(&self) -> RabbitMqOptions {
        RabbitMqOptions {
            uri: self.amqp_url.clone(),
            dead_letter_exchange: self.dead_letter_exchange.clone(),
            prefetch: self.prefetch,
            ..RabbitMqOptions::default()
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "peril-client", version, about = "Play Peril")]
pub struct ClientArgs {
    #[command(flatten)]
    pub broker: BrokerArgs,

    /// Player name; prompted for when absent.
    #[arg(short, long, env = "PERIL_USERNAME")]
    pub username: Option<String>,
}

#[derive(Debug, Parser)]
#[command(name = "peril-server", version, about = "Coordinate a game of Peril")]
pub struct ServerArgs {
    #[command(flatten)]
    pub broker: BrokerArgs,

    /// File the game log is appended to.
    #[arg(long, env = "PERIL_GAME_LOG", default_value = "game.log")]
    pub game_log: PathBuf,
}
