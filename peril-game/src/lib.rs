//! Peril game glue: who publishes what, on which key, and what each
//! event handler acknowledges.

mod error;

pub mod gamelogic;
pub mod handlers;
pub mod routing;
pub mod wiring;

pub use error::GameError;
pub use gamelogic::{GameEngine, GameState};
pub use handlers::SharedEngine;
