//! # Hornet Blaster
//!
//! A click-to-blast game built with the Bevy game engine. Hornets appear at
//! random positions and expire after a while; every click is streamed over a
//! serial port to the microcontroller driving the physical blaster.
//!
//! ## Architecture
//!
//! - [`target`]: hornet geometry, the creation-ordered registry and the spawner
//! - [`reporter`]: the X-then-Y serial handshake for each click
//! - [`schedule`]: single dispatch queue of timed tasks
//! - [`controller`]: owns the game state and dispatches clicks and tasks
//! - [`link`]: serial device selection, writer, watcher and transcript
//! - [`game`]: Bevy plugin wiring input, timers and rendering to the controller
//! - [`config`]: RON configuration
//! - [`error`]: custom error types for the application

pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod link;
pub mod reporter;
pub mod schedule;
pub mod target;

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::{CONFIG_FILE, GameConfig};
    pub use crate::controller::Controller;
    pub use crate::error::*;
    pub use crate::game::HornetPlugin;
    pub use crate::link::{LinkWriter, SerialLink};
    pub use crate::target::{Point, Rect, Target};
}
