pub mod codec;
pub mod config;
pub mod connection;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod framer;
pub mod observer;
pub mod port;
pub mod reaper;
pub mod ring;
pub mod shadow;

pub use controller::{spawn_link, LinkCommand, LinkController, LinkStatus};
pub use error::{LinkError, Result};
