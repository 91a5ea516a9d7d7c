/// Rigid transforms applied to scene geometry
use nalgebra::{Isometry3, Point3, Unit, UnitQuaternion, Vector3};

use crate::geometry::Mesh;

/// Transform builder for rigid 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation of `degrees` about `axis`, anchored at `pivot`
    pub fn rotation_about(
        axis: &Unit<Vector3<f64>>,
        degrees: f64,
        pivot: &Point3<f64>,
    ) -> Isometry3<f64> {
        let rotation = UnitQuaternion::from_axis_angle(axis, degrees.to_radians());
        Isometry3::rotation_wrt_point(rotation, *pivot)
    }

    /// Rotation that carries `+z` onto `direction`.
    ///
    /// Falls back to a half turn about `+x` when `direction` points down `-z`.
    pub fn align_z(direction: &Unit<Vector3<f64>>) -> UnitQuaternion<f64> {
        UnitQuaternion::rotation_between(&Vector3::z(), direction.as_ref()).unwrap_or_else(|| {
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI)
        })
    }
}

/// Rotate every vertex of `mesh` in place.
///
/// Calling this repeatedly compounds rounding error; see
/// [`crate::animation::frame_at`] for the drift-free alternative.
pub fn rotate(mesh: &mut Mesh, axis: &Unit<Vector3<f64>>, degrees: f64, pivot: &Point3<f64>) {
    let isometry = Transform::rotation_about(axis, degrees, pivot);
    for vertex in &mut mesh.vertices {
        *vertex = isometry.transform_point(vertex);
    }
}

impl Mesh {
    /// Method form of [`rotate`]
    pub fn rotate(&mut self, axis: &Unit<Vector3<f64>>, degrees: f64, pivot: &Point3<f64>) {
        rotate(self, axis, degrees, pivot);
    }

    /// Copy of the mesh rotated about `pivot`
    pub fn rotated(&self, axis: &Unit<Vector3<f64>>, degrees: f64, pivot: &Point3<f64>) -> Mesh {
        let mut mesh = self.clone();
        mesh.rotate(axis, degrees, pivot);
        mesh
    }
}
