//! Flappy Bird in the terminal.
//!
//! The simulation ([`avatar`], [`obstacle`], [`stream`], [`game`]) is pure
//! and driven by an injected RNG; [`render`], [`audio`] and [`score`] are the
//! collaborators the binary wires around it.

pub mod assets;
pub mod audio;
pub mod avatar;
pub mod config;
pub mod game;
pub mod obstacle;
pub mod rect;
pub mod render;
pub mod score;
pub mod stream;

pub use config::{Settings, Tuning};
pub use game::{Game, GameEvent, GameState, Session};
