//! Drawable scene objects and the turtle sink that builds them.

use glam::{Mat4, Vec3};
use verdure_lsystem::TurtleSink;

use crate::color::Color;

/// Which drawing primitive an object maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    /// A stroked segment between two vertices.
    Line,
    /// A closed, optionally filled ring of vertices.
    Polygon,
}

/// A drawable object: a line segment or a closed polygon.
///
/// `center` is the depth-sort reference point, not a true centroid: lines
/// use `to + (to - from) / 2` and polygons `v0 + (v0 - v2) / 2`. Painted
/// order depends on these exact points, so they are kept as-is.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneObject {
    /// Drawing primitive.
    pub kind: ShapeKind,
    /// Depth-sort reference point.
    pub center: Vec3,
    /// Line endpoints, or a closed polygon ring (first vertex repeated).
    pub vertices: Vec<Vec3>,
    /// Stroke color.
    pub stroke: Color,
    /// Fill color; `None` draws the outline only.
    pub fill: Option<Color>,
    /// Opacity in [0, 1].
    pub opacity: f32,
}

impl SceneObject {
    /// Returns a copy with every vertex transformed by `matrix`.
    ///
    /// The center is left untouched; depth ordering transforms it
    /// separately.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|&v| matrix.transform_point3(v))
                .collect(),
            ..self.clone()
        }
    }
}

/// Builds the permanent tree geometry from turtle walk events.
///
/// Drawing steps become [`ShapeKind::Line`] objects. Non-drawing steps
/// between a polygon start and end trace a vertex ring that closes into a
/// [`ShapeKind::Polygon`]. The configured offset shifts emitted vertices
/// so the plant is rooted below the world origin.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    objects: Vec<SceneObject>,
    polygon: Vec<Vec3>,
    palette: Vec<Color>,
    leaf: Color,
    offset: Vec3,
}

impl SceneBuilder {
    /// Creates a builder over a stroke palette.
    ///
    /// Polygons stroked in `leaf` are left unfilled; the render loop also
    /// uses that color to find objects that may fall.
    pub fn new(palette: Vec<Color>, leaf: Color, offset: Vec3) -> Self {
        Self {
            objects: Vec::new(),
            polygon: Vec::new(),
            palette,
            leaf,
            offset,
        }
    }

    /// Consumes the builder, returning the accumulated objects.
    pub fn into_objects(self) -> Vec<SceneObject> {
        self.objects
    }

    fn stroke(&self, color: usize) -> Color {
        self.palette[color % self.palette.len()]
    }
}

impl TurtleSink for SceneBuilder {
    fn line(&mut self, from: Vec3, to: Vec3, color: usize) {
        self.objects.push(SceneObject {
            kind: ShapeKind::Line,
            // The sort reference stays in unoffset space while the
            // vertices shift; painted order depends on this.
            center: to + (to - from) / 2.0,
            vertices: vec![from + self.offset, to + self.offset],
            stroke: self.stroke(color),
            fill: None,
            opacity: 1.0,
        });
    }

    fn advance(&mut self, _from: Vec3, to: Vec3, _color: usize) {
        self.polygon.push(to + self.offset);
    }

    fn polygon_start(&mut self, at: Vec3, _color: usize) {
        self.polygon = vec![at + self.offset];
    }

    fn polygon_end(&mut self, _at: Vec3, color: usize) {
        if self.polygon.is_empty() {
            return;
        }

        let stroke = self.stroke(color);
        let mut vertices = std::mem::take(&mut self.polygon);
        vertices.push(vertices[0]);

        let anchor = vertices[(vertices.len() - 1).min(2)];
        let center = vertices[0] + (vertices[0] - anchor) / 2.0;

        self.objects.push(SceneObject {
            kind: ShapeKind::Polygon,
            center,
            vertices,
            stroke,
            fill: if stroke == self.leaf {
                None
            } else {
                Some(stroke)
            },
            opacity: 1.0,
        });
    }
}
