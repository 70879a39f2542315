//! Tile-grid raycaster core: fixed-step ray marching, perspective wall
//! strips with a per-column depth buffer, depth-sorted billboard sprites, and
//! the menu/playing/victory state machine that owns the world.
//!
//! The crate never touches a window. Everything is drawn through
//! [`frame::PixelSink`] and audio is signalled through [`game::CueSink`].

pub mod camera;
pub mod config;
pub mod frame;
pub mod game;
pub mod level;
pub mod player;
pub mod raycast;
pub mod sprites;
pub mod textures;
pub mod walls;
pub mod world;

pub use config::{ConfigError, GameConfig};
pub use frame::{FrameBuffer, PixelSink, Rgb};
pub use game::{Cue, CueSink, FrameInput, Game, GameState, Silent};
pub use level::{Level, LevelCatalog, LevelError};
pub use player::Player;
pub use world::{GridTemplate, Tile, WorldGrid};
