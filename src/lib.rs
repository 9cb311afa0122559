mod client;
mod common;
mod config;
mod fleet;
mod game;
mod logging;
mod matchmaker;
mod player;
pub mod protocol;
mod server;
mod session;
mod ship;
pub mod sync;
pub mod transport;

pub use client::*;
pub use common::*;
pub use config::*;
pub use fleet::*;
pub use game::*;
pub use logging::init_logging;
pub use matchmaker::*;
pub use player::*;
pub use protocol::*;
pub use server::*;
pub use session::*;
pub use ship::*;
pub use sync::{Arrival, ReadinessBarrier, Signal, SignalReceiver, Signals};
pub use transport::in_memory::InMemoryTransport;
pub use transport::tcp::TcpTransport;
pub use transport::Transport;
