//! The animated scene: plant, ground, falling leaves, and the per-tick
//! transform/sort/paint pipeline.

use glam::{Mat4, Vec2, Vec3};
use verdure_lsystem::{TurtleConfig, WalkError, walk};
use verdure_noise::Noise3;
use verdure_scene::{Camera, Color, SceneBuilder, SceneObject, ShapeKind, depth_sort, rotate_around};

use crate::config::Config;
use crate::ground::{GroundTile, ground_tiles};
use crate::timing::{Sway, TickGate};

/// Receives projected 2D geometry, one object at a time, back to front.
///
/// Implementations wrap whatever the host draws with: a canvas context,
/// a pixel buffer, a plotter.
pub trait DrawSurface {
    /// Draws a stroked segment.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);

    /// Draws a closed polygon ring.
    fn draw_polygon(
        &mut self,
        points: &[Vec2],
        stroke: Color,
        fill: Option<Color>,
        width: f32,
        opacity: f32,
    );
}

/// Xorshift generator for leaf-spawn draws.
#[derive(Debug, Clone)]
struct SpawnRng {
    state: u64,
}

impl SpawnRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    fn next_f32(&mut self) -> f32 {
        (self.next_u64() as f64 / u64::MAX as f64) as f32
    }

    fn index(&mut self, len: usize) -> usize {
        (self.next_u64() % len as u64) as usize
    }
}

/// The whole animated scene and its per-tick state.
///
/// Construction expands the grammar and walks the turtle once; the
/// resulting tree is read-only afterwards, serving only as the pool that
/// falling leaves are cloned from. Everything that moves - the view
/// matrix, the sway phase, the falling leaves, the clock - lives here
/// and is mutated exclusively by [`tick`](Scenery::tick).
#[derive(Debug)]
pub struct Scenery<N: Noise3> {
    config: Config,
    camera: Camera,
    /// Running view accumulator, nudged about Y every tick.
    perspective: Mat4,
    /// Depth reference point, fixed at the initial view transform.
    camera_ref: Vec3,
    tree: Vec<SceneObject>,
    tiles: Vec<GroundTile>,
    fallen: Vec<SceneObject>,
    sway: Sway,
    gate: TickGate,
    noise: N,
    rng: SpawnRng,
    time: f32,
}

impl<N: Noise3> Scenery<N> {
    /// Grows the plant and sets up the animation state.
    ///
    /// Fails only if the grammar produces unbalanced branches, which the
    /// shipped preset never does.
    pub fn new(config: Config, noise: N, seed: u64) -> Result<Self, WalkError> {
        let system = config.grammar.generate(config.iterations);
        let turtle = TurtleConfig::default()
            .with_angle(config.angle)
            .with_step(config.step);

        let mut builder = SceneBuilder::new(config.strokes.clone(), config.leaf, config.offset);
        walk(&system, &turtle, &mut builder)?;

        let perspective = Mat4::from_rotation_x(config.tilt.to_radians());
        let camera_ref = perspective.transform_point3(config.camera_offset);

        Ok(Self {
            camera: Camera::new(config.width, config.height, config.zoom),
            perspective,
            camera_ref,
            tree: builder.into_objects(),
            tiles: ground_tiles(config.tile_scale),
            fallen: Vec::new(),
            sway: Sway::new(config.sway_step),
            gate: TickGate::new(config.tick_rate),
            noise,
            rng: SpawnRng::new(seed),
            time: 0.0,
            config,
        })
    }

    /// The permanent plant geometry.
    pub fn tree(&self) -> &[SceneObject] {
        &self.tree
    }

    /// The currently falling leaves.
    pub fn fallen(&self) -> &[SceneObject] {
        &self.fallen
    }

    /// The simulation clock.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Host entry point: runs a tick if `now_ms` opens a new time
    /// bucket, otherwise does nothing. Returns whether a tick ran.
    ///
    /// Hosts call this from every scheduler callback; the gate holds the
    /// simulation to the configured rate.
    pub fn frame<S: DrawSurface>(&mut self, now_ms: f64, surface: &mut S) -> bool {
        if !self.gate.admit(now_ms) {
            return false;
        }

        self.tick(surface);
        true
    }

    /// Advances the simulation one step and paints the frame.
    pub fn tick<S: DrawSurface>(&mut self, surface: &mut S) {
        let step = self.sway.advance();
        self.perspective = Mat4::from_rotation_y(step.to_radians()) * self.perspective;

        self.shed_leaf();
        self.age_leaves();

        let mut objects: Vec<SceneObject> = Vec::with_capacity(
            self.tree.len() + self.fallen.len() + self.tiles.len() * 6,
        );
        objects.extend(
            self.tree
                .iter()
                .chain(self.fallen.iter())
                .map(|obj| obj.transformed(&self.perspective)),
        );
        for face in self.ground_faces() {
            objects.push(face.transformed(&self.perspective));
        }

        depth_sort(&mut objects, self.camera_ref, &self.perspective);

        for object in &objects {
            let projected: Vec<Vec2> = object
                .vertices
                .iter()
                .map(|&v| self.camera.project(v))
                .collect();

            match object.kind {
                ShapeKind::Line => {
                    surface.draw_line(projected[0], projected[1], object.stroke, 1.0)
                }
                ShapeKind::Polygon => surface.draw_polygon(
                    &projected,
                    object.stroke,
                    object.fill,
                    1.0,
                    object.opacity,
                ),
            }
        }

        self.time += self.config.dt;
    }

    /// Occasionally promotes a random leaf into the falling set.
    ///
    /// Skipped when the set is at capacity, the draw misses, or the tree
    /// grew no leaves at all.
    fn shed_leaf(&mut self) {
        if self.fallen.len() >= self.config.max_fallen {
            return;
        }
        if self.rng.next_f32() >= self.config.fallen_chance {
            return;
        }

        let pool: Vec<&SceneObject> = self
            .tree
            .iter()
            .filter(|obj| obj.stroke == self.config.leaf)
            .collect();
        if pool.is_empty() {
            return;
        }

        let mut leaf = pool[self.rng.index(pool.len())].clone();
        leaf.opacity = 1.0;
        self.fallen.push(leaf);
    }

    /// Drops spent leaves, then drifts, twirls, and fades the rest.
    fn age_leaves(&mut self) {
        let threshold = self.config.opacity_threshold;
        self.fallen.retain(|leaf| leaf.opacity > threshold);

        let drift = Vec3::new(self.config.wind, self.config.gravity, 0.0);
        let twirl = self.config.twirl.to_radians();

        for leaf in &mut self.fallen {
            leaf.center -= drift;
            for vertex in &mut leaf.vertices {
                *vertex = rotate_around(*vertex - drift, leaf.center, Vec3::Y, twirl);
            }
            leaf.opacity -= self.config.opacity_decay;
        }
    }

    /// Expands every tile into its six faces at this tick's noise lift.
    fn ground_faces(&self) -> Vec<SceneObject> {
        let c = &self.config;
        let mut faces = Vec::with_capacity(self.tiles.len() * 6);

        for tile in &self.tiles {
            let anchor = tile.anchor();
            let sample = self.noise.sample_signed(
                anchor.x * 2.0 * c.tile_scale * c.frequency,
                anchor.y * anchor.z * 2.0 * c.tile_scale * c.frequency,
                self.time * c.frequency,
            );
            let lift = c.baseline + sample * c.amplitude;

            faces.extend(tile.faces(lift, c.tile_stroke, c.tile_fill));
        }

        faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdure_noise::Value3;

    /// Surface that counts draw calls.
    #[derive(Default)]
    struct Counter {
        lines: usize,
        polygons: usize,
    }

    impl DrawSurface for Counter {
        fn draw_line(&mut self, _from: Vec2, _to: Vec2, _color: Color, _width: f32) {
            self.lines += 1;
        }

        fn draw_polygon(
            &mut self,
            _points: &[Vec2],
            _stroke: Color,
            _fill: Option<Color>,
            _width: f32,
            _opacity: f32,
        ) {
            self.polygons += 1;
        }
    }

    fn small_config() -> Config {
        Config {
            iterations: 3,
            ..Config::default()
        }
    }

    fn always_shedding() -> Config {
        Config {
            fallen_chance: 1.1,
            ..small_config()
        }
    }

    #[test]
    fn startup_grows_a_tree_with_leaves() {
        let scenery = Scenery::new(small_config(), Value3::new(), 7).unwrap();
        assert!(!scenery.tree().is_empty());
        assert!(
            scenery
                .tree()
                .iter()
                .any(|obj| obj.stroke == Config::default().leaf)
        );
    }

    #[test]
    fn every_tick_paints_tree_and_ground() {
        let config = Config {
            fallen_chance: 0.0,
            ..small_config()
        };
        let mut scenery = Scenery::new(config, Value3::new(), 7).unwrap();
        let mut surface = Counter::default();
        scenery.tick(&mut surface);

        let lines = scenery
            .tree()
            .iter()
            .filter(|o| o.kind == ShapeKind::Line)
            .count();
        assert_eq!(surface.lines, lines);
        // Tree polygons plus 6 faces for each of the 25 tiles.
        let polygons = scenery.tree().len() - lines;
        assert_eq!(surface.polygons, polygons + 25 * 6);
    }

    #[test]
    fn fallen_leaves_never_exceed_the_cap() {
        let mut scenery = Scenery::new(always_shedding(), Value3::new(), 7).unwrap();
        let mut surface = Counter::default();

        for _ in 0..200 {
            scenery.tick(&mut surface);
            assert!(scenery.fallen().len() <= 3);
        }
    }

    #[test]
    fn leaf_opacity_decays_until_removal() {
        let mut scenery = Scenery::new(always_shedding(), Value3::new(), 7).unwrap();
        let mut surface = Counter::default();

        scenery.tick(&mut surface);
        assert_eq!(scenery.fallen().len(), 1);

        let mut last = scenery.fallen()[0].opacity;
        assert_eq!(last, 1.0 - 0.02);

        // Cap the pool at one leaf so the decay of the first is easy to
        // follow: each tick loses exactly one decay step.
        scenery.config.max_fallen = 1;

        for _ in 0..47 {
            scenery.tick(&mut surface);
            let opacity = scenery.fallen()[0].opacity;
            assert!(opacity < last);
            assert!((last - opacity - 0.02).abs() < 1e-6);
            last = opacity;
        }

        // 48 ticks bring opacity to 0.04, at or below the 0.05
        // threshold: the next tick drops the leaf, and the one after
        // sheds a fresh replacement.
        scenery.tick(&mut surface);
        assert!(scenery.fallen().is_empty());

        scenery.tick(&mut surface);
        assert_eq!(scenery.fallen().len(), 1);
        assert_eq!(scenery.fallen()[0].opacity, 1.0 - 0.02);
    }

    #[test]
    fn falling_leaves_drift_with_wind_and_gravity() {
        let mut scenery = Scenery::new(always_shedding(), Value3::new(), 7).unwrap();
        let mut surface = Counter::default();

        scenery.tick(&mut surface);
        let before = scenery.fallen()[0].center;

        scenery.config.max_fallen = 1;
        scenery.tick(&mut surface);
        let after = scenery.fallen()[0].center;

        assert!((before - after - Vec3::new(0.2, 0.5, 0.0)).length() < 1e-6);
    }

    #[test]
    fn ground_lift_is_deterministic_across_runs() {
        let a = Scenery::new(small_config(), Value3::with_seed(11), 7).unwrap();
        let b = Scenery::new(small_config(), Value3::with_seed(11), 99).unwrap();

        // Same noise seed, same clock: identical faces regardless of the
        // spawn seed.
        let fa = a.ground_faces();
        let fb = b.ground_faces();
        assert_eq!(fa.len(), fb.len());
        for (x, y) in fa.iter().zip(&fb) {
            assert_eq!(x.vertices, y.vertices);
        }
    }

    #[test]
    fn frame_throttles_to_the_tick_rate() {
        let mut scenery = Scenery::new(small_config(), Value3::new(), 7).unwrap();
        let mut surface = Counter::default();

        assert!(scenery.frame(1000.0, &mut surface));
        // Duplicate callbacks inside the same bucket are no-ops.
        assert!(!scenery.frame(1002.0, &mut surface));
        assert!(scenery.frame(1020.0, &mut surface));
        assert!((scenery.time() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn spawn_skips_when_no_leaves_exist() {
        let mut config = always_shedding();
        // A bark-only palette: nothing qualifies as a leaf.
        config.strokes = vec![verdure_scene::palette::BARK];

        let mut scenery = Scenery::new(config, Value3::new(), 7).unwrap();
        let mut surface = Counter::default();

        for _ in 0..10 {
            scenery.tick(&mut surface);
        }
        assert!(scenery.fallen().is_empty());
    }
}
