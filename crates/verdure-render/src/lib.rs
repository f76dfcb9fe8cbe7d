//! Animated software rendering of a procedurally grown plant.
//!
//! A [`Scenery`] grows a plant once at startup, then animates it tick by
//! tick: the view sways between two bounds, leaves occasionally detach
//! and twirl to the ground, and the ground itself undulates on a noise
//! field. Each tick transforms all geometry, depth-sorts it back to
//! front, and paints it through a host-provided [`DrawSurface`].
//!
//! The host owns the frame scheduler; it calls
//! [`Scenery::frame`] on every refresh and the internal gate throttles
//! the simulation to the configured tick rate.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use verdure_noise::Value3;
//! use verdure_render::{Config, DrawSurface, Scenery};
//! use verdure_scene::Color;
//!
//! struct Sink;
//!
//! impl DrawSurface for Sink {
//!     fn draw_line(&mut self, _: Vec2, _: Vec2, _: Color, _: f32) {}
//!     fn draw_polygon(&mut self, _: &[Vec2], _: Color, _: Option<Color>, _: f32, _: f32) {}
//! }
//!
//! let config = Config {
//!     iterations: 2,
//!     ..Config::default()
//! };
//! let mut scenery = Scenery::new(config, Value3::with_seed(1), 42).unwrap();
//! scenery.frame(0.0, &mut Sink);
//! ```

mod config;
mod ground;
mod scenery;
mod timing;

pub use config::Config;
pub use ground::{GroundTile, ground_tiles};
pub use scenery::{DrawSurface, Scenery};
pub use timing::{Sway, TickGate};

pub use verdure_lsystem::{Grammar, Rule, WalkError, presets};
