//! L-system grammar expansion and 3D turtle interpretation.
//!
//! A [`Grammar`] rewrites an axiom string into a long symbol sequence;
//! [`walk`] interprets that sequence as a branching 3D turtle path,
//! reporting drawable geometry to a [`TurtleSink`].
//!
//! # Example
//!
//! ```
//! use verdure_lsystem::{Grammar, Rule, TurtleConfig, walk};
//!
//! let grammar = Grammar::new("P").with_rule(Rule::new('P', "F+F"));
//! let system = grammar.generate(1);
//! assert_eq!(system, "F+F");
//!
//! let config = TurtleConfig::default().with_angle(90.0).with_step(1.0);
//! let paths = walk(&system, &config, &mut ()).unwrap();
//! assert_eq!(paths.len(), 1);
//! ```

use std::collections::HashMap;

use glam::Vec3;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Turtle command symbols.
///
/// Symbols outside this set are inert: the grammar passes them through
/// unexpanded and the turtle ignores them.
pub mod symbols {
    /// Step forward, drawing a line.
    pub const FORWARD: char = 'F';
    /// Step forward without drawing (used to trace polygon outlines).
    pub const FORWARD_SKIP: char = 'f';
    /// Yaw left.
    pub const TURN_LEFT: char = '+';
    /// Yaw right.
    pub const TURN_RIGHT: char = '-';
    /// Pitch down.
    pub const PITCH_DOWN: char = '&';
    /// Pitch up.
    pub const PITCH_UP: char = '^';
    /// Roll left.
    pub const ROLL_LEFT: char = '<';
    /// Roll right.
    pub const ROLL_RIGHT: char = '>';
    /// Yaw 180 degrees.
    pub const TURN_AROUND: char = '|';
    /// Advance to the next palette color.
    pub const NEXT_COLOR: char = '#';
    /// Save state and begin a branch.
    pub const BRANCH_START: char = '[';
    /// Flush the branch polyline and restore the saved state.
    pub const BRANCH_END: char = ']';
    /// Begin accumulating a filled polygon.
    pub const POLYGON_START: char = '{';
    /// Close the accumulated polygon.
    pub const POLYGON_END: char = '}';
}

// Heading accumulator component order.
const ROLL: usize = 0;
const PITCH: usize = 1;
const YAW: usize = 2;

// ============================================================================
// Grammar
// ============================================================================

/// A production rule: one symbol and its replacement string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    /// The symbol to replace.
    pub symbol: char,
    /// The replacement string.
    pub replacement: String,
}

impl Rule {
    /// Creates a rule replacing `symbol` with `replacement`.
    pub fn new(symbol: char, replacement: &str) -> Self {
        Self {
            symbol,
            replacement: replacement.to_string(),
        }
    }
}

/// A deterministic context-free rewriting grammar.
///
/// Each call to [`generate`](Grammar::generate) rewrites the axiom the
/// requested number of rounds. Every symbol with a rule is replaced each
/// round; everything else passes through unchanged, so control symbols
/// like `[` and `+` survive expansion verbatim.
///
/// String length grows multiplicatively per round; callers bound the
/// iteration count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grammar {
    /// The starting string.
    pub axiom: String,
    rules: HashMap<char, String>,
}

impl Grammar {
    /// Creates a grammar with the given axiom and no rules.
    pub fn new(axiom: &str) -> Self {
        Self {
            axiom: axiom.to_string(),
            rules: HashMap::new(),
        }
    }

    /// Adds a production rule. A later rule for the same symbol wins.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.insert(rule.symbol, rule.replacement);
        self
    }

    /// Rewrites the axiom for `iterations` rounds.
    ///
    /// `generate(0)` returns the axiom itself.
    pub fn generate(&self, iterations: usize) -> String {
        let mut current = self.axiom.clone();

        for _ in 0..iterations {
            let mut next = String::with_capacity(current.len() * 2);

            for c in current.chars() {
                match self.rules.get(&c) {
                    Some(replacement) => next.push_str(replacement),
                    None => next.push(c),
                }
            }

            current = next;
        }

        current
    }
}

// ============================================================================
// Turtle interpretation
// ============================================================================

/// Configuration for the turtle walk.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TurtleConfig {
    /// Rotation increment in degrees for each turn/pitch/roll symbol.
    pub angle: f32,
    /// Step distance for forward symbols.
    pub step: f32,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            angle: 18.0,
            step: 0.72,
        }
    }
}

impl TurtleConfig {
    /// Sets the rotation increment in degrees.
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Sets the step distance.
    pub fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }
}

/// Receives geometry events from [`walk`].
///
/// The interpreter tracks position and branching; what becomes of the
/// reported segments and polygon outlines is the sink's concern. All
/// methods default to no-ops so sinks implement only what they consume.
pub trait TurtleSink {
    /// A forward step that draws: a line from `from` to `to`.
    fn line(&mut self, from: Vec3, to: Vec3, color: usize) {
        let _ = (from, to, color);
    }

    /// A forward step that does not draw (polygon outline tracing).
    fn advance(&mut self, from: Vec3, to: Vec3, color: usize) {
        let _ = (from, to, color);
    }

    /// A polygon opens at `at`.
    fn polygon_start(&mut self, at: Vec3, color: usize) {
        let _ = (at, color);
    }

    /// The open polygon closes at `at`.
    fn polygon_end(&mut self, at: Vec3, color: usize) {
        let _ = (at, color);
    }
}

/// The no-op sink, for callers that only want the returned polylines.
impl TurtleSink for () {}

/// Errors from [`walk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WalkError {
    /// A `]` appeared with no open branch. The rule table is malformed.
    #[error("unbalanced branch: ']' at symbol index {index} with no open branch")]
    UnbalancedBranch {
        /// Index of the offending symbol in the input string.
        index: usize,
    },
}

/// Live turtle state: where the turtle is, how it is rotated, and the
/// polyline it is currently tracing.
///
/// Branches deep-copy the whole state; restoring a snapshot discards
/// everything the branch accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct TurtleState {
    /// Accumulated rotation angles in radians: x=roll, y=pitch, z=yaw.
    pub headings: Vec3,
    /// Current position.
    pub position: Vec3,
    /// Points of the polyline traced since the last branch start.
    pub geometry: Vec<Vec3>,
    /// Which heading axes have been rotated at all, in roll/pitch/yaw
    /// order. An axis never touched contributes no rotation term.
    pub rotations: [bool; 3],
    /// Palette color index (consumers wrap it modulo their palette).
    pub color: usize,
}

impl TurtleState {
    fn new() -> Self {
        Self {
            headings: Vec3::ZERO,
            position: Vec3::ZERO,
            geometry: vec![Vec3::ZERO],
            rotations: [false; 3],
            color: 0,
        }
    }

    /// Builds the forward step vector from the heading accumulators.
    ///
    /// The step starts along +Y and the three planar rotations apply in
    /// fixed order: yaw in the X/Y plane, pitch in the X/Z plane, roll in
    /// the Y/Z plane, each folding in the components the previous one
    /// produced. Axes whose dirty flag is unset are skipped entirely.
    fn step_vector(&self, distance: f32) -> Vec3 {
        let mut step = Vec3::new(0.0, distance, 0.0);
        let Vec3 {
            x: roll,
            y: pitch,
            z: yaw,
        } = self.headings;

        if self.rotations[YAW] {
            let (x, y) = (step.x, step.y);
            step.x = x * yaw.cos() - y * yaw.sin();
            step.y = x * yaw.sin() + y * yaw.cos();
        }

        if self.rotations[PITCH] {
            let (x, z) = (step.x, step.z);
            step.x = x * pitch.cos() + z * pitch.sin();
            step.z = -x * pitch.sin() + z * pitch.cos();
        }

        if self.rotations[ROLL] {
            let (y, z) = (step.y, step.z);
            step.y = y * roll.cos() + z * roll.sin();
            step.z = -y * roll.sin() + z * roll.cos();
        }

        step
    }
}

/// Interprets a symbol string as a branching 3D turtle path.
///
/// Walks `system` left to right, maintaining one [`TurtleState`] and a
/// stack of branch snapshots. Forward steps and polygon events are
/// reported to `sink`; the return value is the list of traced polylines,
/// one per completed branch plus the trunk, in flush order.
///
/// Unknown symbols are ignored. A `]` with no open branch returns
/// [`WalkError::UnbalancedBranch`].
pub fn walk<S: TurtleSink>(
    system: &str,
    config: &TurtleConfig,
    sink: &mut S,
) -> Result<Vec<Vec<Vec3>>, WalkError> {
    let angle = config.angle.to_radians();
    let mut stack: Vec<TurtleState> = Vec::new();
    let mut paths: Vec<Vec<Vec3>> = Vec::new();
    let mut state = TurtleState::new();

    for (index, symbol) in system.chars().enumerate() {
        match symbol {
            symbols::TURN_LEFT => {
                state.headings.z += angle;
                state.rotations[YAW] = true;
            }
            symbols::TURN_RIGHT => {
                state.headings.z -= angle;
                state.rotations[YAW] = true;
            }
            symbols::PITCH_DOWN => {
                state.headings.y += angle;
                state.rotations[PITCH] = true;
            }
            symbols::PITCH_UP => {
                state.headings.y -= angle;
                state.rotations[PITCH] = true;
            }
            symbols::ROLL_LEFT => {
                state.headings.x += angle;
                state.rotations[ROLL] = true;
            }
            symbols::ROLL_RIGHT => {
                state.headings.x -= angle;
                state.rotations[ROLL] = true;
            }
            symbols::TURN_AROUND => {
                state.headings.z += std::f32::consts::PI;
                state.rotations[YAW] = true;
            }
            symbols::BRANCH_START => {
                stack.push(state.clone());
                state.geometry = vec![state.position];
            }
            symbols::BRANCH_END => {
                if state.geometry.len() > 1 {
                    paths.push(std::mem::take(&mut state.geometry));
                }
                state = stack.pop().ok_or(WalkError::UnbalancedBranch { index })?;
            }
            symbols::NEXT_COLOR => {
                state.color += 1;
            }
            symbols::FORWARD | symbols::FORWARD_SKIP => {
                let from = state.position;
                let to = from + state.step_vector(config.step);

                if symbol == symbols::FORWARD {
                    sink.line(from, to, state.color);
                } else {
                    sink.advance(from, to, state.color);
                }

                state.position = to;
                state.geometry.push(to);
            }
            symbols::POLYGON_START => {
                sink.polygon_start(state.position, state.color);
            }
            symbols::POLYGON_END => {
                sink.polygon_end(state.position, state.color);
            }
            _ => {}
        }
    }

    paths.push(state.geometry);

    Ok(paths)
}

// ============================================================================
// Presets
// ============================================================================

/// Ready-made grammars.
pub mod presets {
    use super::{Grammar, Rule};

    /// A flowering plant with leaves, stem segments, and five-petaled
    /// flowers, meant for five rounds of expansion at an 18 degree
    /// branch angle.
    pub fn plant() -> Grammar {
        Grammar::new("P")
            // plant
            .with_rule(Rule::new('P', "I+[P+W]--<[--L]I[++L]-[PW]++PW"))
            // internode
            .with_rule(Rule::new('I', "FS[>&&L][<^^L]FS"))
            // stem segment
            .with_rule(Rule::new('S', "SFS"))
            // leaf outline
            .with_rule(Rule::new('L', "[#{+f-ff-f+|+f-ff-f}]"))
            // flower: pedicel plus five wedges rolled around the stem
            .with_rule(Rule::new('W', "[C##<D<<<<D<<<<D<<<<D<<<<D]"))
            // pedicel
            .with_rule(Rule::new('C', "FF"))
            // flower wedge: one filament and one petal
            .with_rule(Rule::new('D', "[#^F][{^^^^-f+f|-f+f}]"))
    }
}
