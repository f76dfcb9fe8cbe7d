//! Painter's-algorithm depth ordering.

use glam::{Mat4, Vec3};

use crate::object::SceneObject;

/// Sorts objects back to front for painting.
///
/// Each object's center is transformed by the current `perspective`
/// matrix and compared through its offset from `camera_ref`, ordering by
/// z, then y, then x. The sort is stable: objects at the same depth keep
/// their input order, so repeated frames never flicker.
pub fn depth_sort(objects: &mut [SceneObject], camera_ref: Vec3, perspective: &Mat4) {
    objects.sort_by(|a, b| {
        let da = camera_ref - perspective.transform_point3(a.center);
        let db = camera_ref - perspective.transform_point3(b.center);

        da.z.total_cmp(&db.z)
            .then(da.y.total_cmp(&db.y))
            .then(da.x.total_cmp(&db.x))
    });
}
