//! Scene configuration.

use glam::Vec3;
use verdure_lsystem::{Grammar, presets};
use verdure_scene::{Color, palette};

/// Every tunable constant in one place, fixed at startup.
///
/// The default values reproduce the reference scene: a five-round plant
/// swaying over a 5x5 field of undulating ground tiles, shedding at most
/// three leaves at a time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Axiom and rule table to grow the plant from.
    pub grammar: Grammar,
    /// Grammar expansion rounds.
    pub iterations: usize,
    /// Branch angle in degrees.
    pub angle: f32,
    /// Forward step distance.
    pub step: f32,
    /// Shift applied to emitted plant vertices, rooting the plant below
    /// the world origin.
    pub offset: Vec3,
    /// Stroke palette cycled by the turtle's color symbol.
    pub strokes: Vec<Color>,
    /// The palette entry marking leaves (unfilled, and allowed to fall).
    pub leaf: Color,
    /// Ground tile stroke.
    pub tile_stroke: Color,
    /// Ground tile fill.
    pub tile_fill: Color,
    /// Half-extent of one ground tile in world units.
    pub tile_scale: f32,
    /// Noise frequency for ground undulation.
    pub frequency: f32,
    /// Noise amplitude for ground undulation.
    pub amplitude: f32,
    /// Resting height of the ground relative to the world origin.
    pub baseline: f32,
    /// Maximum number of concurrently falling leaves.
    pub max_fallen: usize,
    /// Per-tick probability of shedding a leaf.
    pub fallen_chance: f32,
    /// Opacity lost per tick by a falling leaf.
    pub opacity_decay: f32,
    /// Opacity at or below which a falling leaf is dropped.
    pub opacity_threshold: f32,
    /// Downward drift per tick of a falling leaf.
    pub gravity: f32,
    /// Sideways drift per tick of a falling leaf.
    pub wind: f32,
    /// Per-tick spin of a falling leaf about its own center, in degrees.
    pub twirl: f32,
    /// Initial tilt of the view about the X axis, in degrees.
    pub tilt: f32,
    /// Camera reference point for depth comparisons.
    pub camera_offset: Vec3,
    /// Per-tick camera sway step in degrees.
    pub sway_step: f32,
    /// Simulation clock advance per tick.
    pub dt: f32,
    /// Target tick rate per second.
    pub tick_rate: f32,
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Camera zoom factor.
    pub zoom: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grammar: presets::plant(),
            iterations: 5,
            angle: 18.0,
            step: 0.72,
            offset: Vec3::new(0.0, -12.5, 0.0),
            strokes: palette::CYCLE.to_vec(),
            leaf: palette::LEAF,
            tile_stroke: palette::TILE,
            tile_fill: palette::BACKGROUND,
            tile_scale: 5.0,
            frequency: 0.2,
            amplitude: 3.0,
            baseline: -14.0,
            max_fallen: 3,
            fallen_chance: 0.05,
            opacity_decay: 0.02,
            opacity_threshold: 0.05,
            gravity: 0.5,
            wind: 0.2,
            twirl: 10.0,
            tilt: -20.0,
            camera_offset: Vec3::new(0.0, 50.0, -100.0),
            sway_step: 0.2,
            dt: 0.05,
            tick_rate: 60.0,
            width: 1024.0,
            height: 768.0,
            zoom: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_finite() {
        let config = Config::default();
        for value in [
            config.angle,
            config.step,
            config.frequency,
            config.amplitude,
            config.baseline,
            config.fallen_chance,
            config.opacity_decay,
            config.opacity_threshold,
            config.gravity,
            config.wind,
            config.twirl,
            config.tilt,
            config.sway_step,
            config.dt,
            config.tick_rate,
            config.zoom,
        ] {
            assert!(value.is_finite());
        }
        assert!(!config.strokes.is_empty());
    }
}
