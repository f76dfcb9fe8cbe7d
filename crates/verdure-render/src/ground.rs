//! Undulating ground tiles.

use glam::Vec3;
use verdure_scene::{Color, SceneObject, ShapeKind};

/// Corner template for one tile: a flat cuboid centered on the tile
/// position, half-extent 1 and half-height 0.3 before scaling.
const CORNERS: [Vec3; 8] = [
    Vec3::new(1.0, 0.3, 1.0),
    Vec3::new(-1.0, 0.3, 1.0),
    Vec3::new(1.0, -0.3, 1.0),
    Vec3::new(-1.0, -0.3, 1.0),
    Vec3::new(1.0, 0.3, -1.0),
    Vec3::new(-1.0, 0.3, -1.0),
    Vec3::new(1.0, -0.3, -1.0),
    Vec3::new(-1.0, -0.3, -1.0),
];

/// Corner indices of the six cuboid faces.
const FACES: [[usize; 4]; 6] = [
    [3, 2, 6, 7], // bottom
    [1, 3, 7, 5], // left
    [0, 1, 3, 2], // back
    [6, 7, 5, 4], // front
    [2, 6, 4, 0], // right
    [0, 1, 5, 4], // top
];

/// One ground cell: eight cuboid corners at their resting position.
///
/// Tiles are templates; each frame they are displaced vertically by the
/// noise field and expanded into six polygons.
#[derive(Debug, Clone)]
pub struct GroundTile {
    /// Resting corner positions.
    pub corners: [Vec3; 8],
}

impl GroundTile {
    /// The resting position of the tile's first corner, which anchors
    /// the noise sample for the whole tile.
    pub fn anchor(&self) -> Vec3 {
        self.corners[0]
    }

    /// Expands the tile into its six faces, lifted vertically by `lift`.
    pub fn faces(&self, lift: f32, stroke: Color, fill: Color) -> Vec<SceneObject> {
        let lifted = self.corners.map(|c| c + Vec3::new(0.0, lift, 0.0));
        let center = lifted[0] + (lifted[0] - lifted[3]) / 2.0;

        FACES
            .iter()
            .map(|face| SceneObject {
                kind: ShapeKind::Polygon,
                center,
                vertices: face.iter().map(|&i| lifted[i]).collect(),
                stroke,
                fill: Some(fill),
                opacity: 1.0,
            })
            .collect()
    }
}

/// Lays out the 5x5 tile grid for the given tile scale.
pub fn ground_tiles(scale: f32) -> Vec<GroundTile> {
    let mut tiles = Vec::new();

    for x in -2..=2 {
        for z in -2..=2 {
            let base = Vec3::new(
                x as f32 * 2.0 * scale + scale,
                0.0,
                z as f32 * 2.0 * scale + scale,
            );
            tiles.push(GroundTile {
                corners: CORNERS.map(|c| base + c * scale),
            });
        }
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdure_scene::palette;

    #[test]
    fn grid_has_25_tiles() {
        assert_eq!(ground_tiles(5.0).len(), 25);
    }

    #[test]
    fn tiles_are_centered_between_grid_lines() {
        let tiles = ground_tiles(5.0);
        // First tile sits at grid (-2, -2): base (-15, 0, -15).
        let anchor = tiles[0].anchor();
        assert_eq!(anchor, Vec3::new(-15.0 + 5.0, 1.5, -15.0 + 5.0));
    }

    #[test]
    fn faces_share_one_center() {
        let tiles = ground_tiles(5.0);
        let faces = tiles[0].faces(-14.0, palette::TILE, palette::BACKGROUND);

        assert_eq!(faces.len(), 6);
        let center = faces[0].center;
        assert!(faces.iter().all(|f| f.center == center));
        assert!(faces.iter().all(|f| f.vertices.len() == 4));
    }

    #[test]
    fn lift_translates_vertically() {
        let tiles = ground_tiles(5.0);
        let level = tiles[0].faces(0.0, palette::TILE, palette::BACKGROUND);
        let sunken = tiles[0].faces(-14.0, palette::TILE, palette::BACKGROUND);

        for (a, b) in level[0].vertices.iter().zip(&sunken[0].vertices) {
            assert_eq!(a.x, b.x);
            assert_eq!(a.z, b.z);
            assert_eq!(a.y, b.y + 14.0);
        }
    }
}
