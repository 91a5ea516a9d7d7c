//! Parametric construction of the scene's meshes and curves
//!
//! Every builder is a pure function of its parameters. Invalid parameters are
//! reported as [`GeometryError::InvalidParameter`] naming the offending input.
use nalgebra::{Point3, Unit, Vector3};
use std::f64::consts::TAU;
use tracing::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::{Curve, Face, Mesh};
use crate::transform::Transform;

/// `n` evenly spaced values from `start` to `end`, both included
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| {
                if i == n - 1 {
                    end
                } else {
                    lerp(start, end, i as f64 / (n - 1) as f64)
                }
            })
            .collect(),
    }
}

/// `n` copies of `value`
pub fn constant(value: f64, n: usize) -> Vec<f64> {
    vec![value; n]
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn require_samples(sample_count: usize) -> Result<()> {
    if sample_count < 2 {
        return Err(GeometryError::invalid(
            "sample_count",
            format!("must be at least 2, got {}", sample_count),
        ));
    }
    Ok(())
}

fn require_profile(name: &'static str, profile: &[f64], sample_count: usize) -> Result<()> {
    if profile.len() != sample_count {
        return Err(GeometryError::invalid(
            name,
            format!("has {} samples, expected {}", profile.len(), sample_count),
        ));
    }
    Ok(())
}

/// Sample a helix whose radius tapers linearly from `radius_start` to
/// `radius_end` while it climbs `height` over `turns` revolutions.
///
/// The first point sits at `z_offset`, the last at `z_offset + height`.
pub fn build_spiral_curve(
    turns: f64,
    height: f64,
    radius_start: f64,
    radius_end: f64,
    z_offset: f64,
    sample_count: usize,
) -> Result<Curve> {
    require_samples(sample_count)?;

    let points = (0..sample_count)
        .map(|i| {
            let t = i as f64 / (sample_count - 1) as f64;
            let theta = t * turns * TAU;
            let r = lerp(radius_start, radius_end, t);
            let h = lerp(0.0, height, t);
            Point3::new(r * theta.cos(), r * theta.sin(), h + z_offset)
        })
        .collect();

    debug!(sample_count, turns, "built spiral curve");
    Ok(Curve::new(points))
}

/// Loft a strip between two edge profiles swept through `angle_span` radians.
///
/// Vertex `i` lies on the outer edge and vertex `sample_count + i` on the inner
/// edge at the same angle and height. Each quad walks forward along the outer
/// edge and back along the inner one. The strip is open: the last sample is
/// not joined to the first.
pub fn build_ruled_strip(
    angle_span: f64,
    sample_count: usize,
    outer_radius_profile: &[f64],
    inner_radius_profile: &[f64],
    z_profile: &[f64],
) -> Result<Mesh> {
    require_samples(sample_count)?;
    require_profile("outer_radius_profile", outer_radius_profile, sample_count)?;
    require_profile("inner_radius_profile", inner_radius_profile, sample_count)?;
    require_profile("z_profile", z_profile, sample_count)?;

    let n = sample_count;
    let mut mesh = Mesh::with_capacity(2 * n, n - 1);
    let angles: Vec<f64> = (0..n)
        .map(|i| i as f64 / (n - 1) as f64 * angle_span)
        .collect();

    for profile in [outer_radius_profile, inner_radius_profile] {
        for ((&theta, &r), &z) in angles.iter().zip(profile).zip(z_profile) {
            mesh.add_vertex(Point3::new(r * theta.cos(), r * theta.sin(), z));
        }
    }

    for i in 0..n - 1 {
        mesh.add_face(Face::quad(i, i + 1, n + i + 1, n + i));
    }

    debug!(sample_count, angle_span, "built ruled strip");
    Ok(mesh)
}

/// A capped cylinder centred on `center` with its axis along `direction`.
///
/// The side is made of `resolution` quads wrapping all the way round; each
/// end is closed by one polygon wound to face outward. A disk is a short
/// cylinder.
pub fn cylinder(
    center: Point3<f64>,
    direction: Vector3<f64>,
    radius: f64,
    height: f64,
    resolution: usize,
) -> Result<Mesh> {
    if resolution < 3 {
        return Err(GeometryError::invalid(
            "resolution",
            format!("must be at least 3, got {}", resolution),
        ));
    }
    if radius.is_nan() || radius < 0.0 {
        return Err(GeometryError::invalid("radius", format!("must be >= 0, got {}", radius)));
    }
    if height.is_nan() || height < 0.0 {
        return Err(GeometryError::invalid("height", format!("must be >= 0, got {}", height)));
    }
    let axis = Unit::try_new(direction, 1e-12)
        .ok_or_else(|| GeometryError::invalid("direction", "must be a non-zero vector"))?;

    let orientation = Transform::align_z(&axis);
    let n = resolution;
    let mut mesh = Mesh::with_capacity(2 * n, n + 2);

    for z in [-height / 2.0, height / 2.0] {
        for i in 0..n {
            let theta = i as f64 / n as f64 * TAU;
            let local = Vector3::new(radius * theta.cos(), radius * theta.sin(), z);
            mesh.add_vertex(center + orientation * local);
        }
    }

    for i in 0..n {
        let next = (i + 1) % n;
        mesh.add_face(Face::quad(i, next, n + next, n + i));
    }
    mesh.add_face(Face::new((n..2 * n).collect()));
    mesh.add_face(Face::new((0..n).rev().collect()));

    debug!(resolution, radius, height, "built cylinder");
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 0), Vec::<f64>::new());
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        let falling = linspace(1.0, 0.2, 150);
        assert_eq!(falling[0], 1.0);
        assert_eq!(falling[149], 0.2);
    }

    #[test]
    fn test_spiral_curve_heights() {
        for &(turns, height, n) in &[(1.5, 1.2, 200), (0.25, 0.0, 2), (3.0, 7.5, 17)] {
            let curve = build_spiral_curve(turns, height, 1.0, 0.2, 1.2, n).unwrap();
            assert_eq!(curve.len(), n);
            assert!((curve.points[0].z - 1.2).abs() < 1e-9);
            assert!((curve.points[n - 1].z - (1.2 + height)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spiral_curve_tapers() {
        let curve = build_spiral_curve(1.5, 1.2, 1.0, 0.2, 0.0, 200).unwrap();
        let first = curve.points[0];
        let last = curve.points[199];
        assert!((first - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-9);
        // 1.5 turns ends half way round
        assert!((last - Point3::new(-0.2, 0.0, 1.2)).norm() < 1e-9);
        let radii: Vec<f64> = curve.points.iter().map(|p| p.coords.xy().norm()).collect();
        assert!(radii.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_spiral_curve_rejects_single_sample() {
        assert_eq!(
            build_spiral_curve(1.5, 1.2, 1.0, 0.2, 1.2, 1).unwrap_err(),
            GeometryError::invalid("sample_count", "must be at least 2, got 1")
        );
    }

    #[test]
    fn test_ruled_strip_counts_and_indices() {
        for n in [2usize, 3, 10, 150] {
            let strip = build_ruled_strip(
                PI,
                n,
                &linspace(1.0, 0.5, n),
                &constant(0.1, n),
                &linspace(0.0, 1.0, n),
            )
            .unwrap();
            assert_eq!(strip.vertices.len(), 2 * n);
            assert_eq!(strip.faces.len(), n - 1);
            for face in &strip.faces {
                assert_eq!(face.indices.len(), 4);
                assert!(face.indices.iter().all(|&i| i < 2 * n));
            }
        }
    }

    #[test]
    fn test_ruled_strip_screw_blade() {
        let n = 150;
        let strip = build_ruled_strip(
            3.0 * PI,
            n,
            &linspace(1.0, 0.2, n),
            &constant(0.05, n),
            &linspace(0.0, 1.2, n),
        )
        .unwrap();

        assert_eq!(strip.vertices.len(), 300);
        assert_eq!(strip.faces.len(), 149);
        assert!((strip.vertices[0] - Point3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
        assert!((strip.vertices[149] - Point3::new(-0.2, 0.0, 1.2)).norm() < 1e-6);
        assert!((strip.vertices[150] - Point3::new(0.05, 0.0, 0.0)).norm() < 1e-6);
        assert_eq!(strip.faces[0].indices, vec![0, 1, 151, 150]);
        assert_eq!(strip.faces[148].indices, vec![148, 149, 299, 298]);
    }

    #[test]
    fn test_ruled_strip_edges_share_angles() {
        let n = 12;
        let strip =
            build_ruled_strip(2.0, n, &constant(2.0, n), &constant(1.0, n), &constant(0.5, n))
                .unwrap();
        for i in 0..n {
            let outer = strip.vertices[i];
            let inner = strip.vertices[n + i];
            assert!((outer.coords - inner.coords * 2.0).xy().norm() < 1e-12);
            assert_eq!(outer.z, inner.z);
        }
    }

    #[test]
    fn test_ruled_strip_rejects_bad_profiles() {
        let n = 5;
        let ok = linspace(0.0, 1.0, n);
        let short = linspace(0.0, 1.0, n - 1);

        assert!(matches!(
            build_ruled_strip(PI, 1, &[1.0], &[0.5], &[0.0]),
            Err(GeometryError::InvalidParameter { name: "sample_count", .. })
        ));
        assert!(matches!(
            build_ruled_strip(PI, n, &short, &ok, &ok),
            Err(GeometryError::InvalidParameter { name: "outer_radius_profile", .. })
        ));
        assert!(matches!(
            build_ruled_strip(PI, n, &ok, &short, &ok),
            Err(GeometryError::InvalidParameter { name: "inner_radius_profile", .. })
        ));
        assert!(matches!(
            build_ruled_strip(PI, n, &ok, &ok, &short),
            Err(GeometryError::InvalidParameter { name: "z_profile", .. })
        ));
    }

    #[test]
    fn test_cylinder_shape() {
        let mesh = cylinder(Point3::new(0.0, 0.0, 0.9), Vector3::z(), 0.05, 1.8, 100).unwrap();
        assert_eq!(mesh.vertices.len(), 200);
        assert_eq!(mesh.faces.len(), 102);
        assert!(mesh.check_indices().is_ok());

        for v in &mesh.vertices {
            assert!((v.coords.xy().norm() - 0.05).abs() < 1e-12);
            assert!(v.z.abs() < 1e-12 || (v.z - 1.8).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cylinder_faces_point_outward() {
        let mesh = cylinder(Point3::origin(), Vector3::z(), 1.0, 0.2, 16).unwrap();
        let top = &mesh.faces[16];
        let bottom = &mesh.faces[17];
        assert!((top.normal(&mesh.vertices) - Vector3::z()).norm() < 1e-9);
        assert!((bottom.normal(&mesh.vertices) + Vector3::z()).norm() < 1e-9);

        let side = &mesh.faces[0];
        let centroid = side
            .indices
            .iter()
            .fold(Vector3::zeros(), |acc, &i| acc + mesh.vertices[i].coords)
            / 4.0;
        assert!(side.normal(&mesh.vertices).dot(&centroid) > 0.0);
    }

    #[test]
    fn test_cylinder_along_x() {
        let mesh = cylinder(Point3::origin(), Vector3::new(2.0, 0.0, 0.0), 1.0, 4.0, 8).unwrap();
        for v in &mesh.vertices {
            assert!((v.x.abs() - 2.0).abs() < 1e-12);
            assert!((v.coords.yz().norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cylinder_rejects_bad_parameters() {
        let c = Point3::origin();
        assert!(cylinder(c, Vector3::z(), 1.0, 1.0, 2).is_err());
        assert!(cylinder(c, Vector3::z(), -1.0, 1.0, 8).is_err());
        assert!(cylinder(c, Vector3::z(), 1.0, f64::NAN, 8).is_err());
        assert!(matches!(
            cylinder(c, Vector3::zeros(), 1.0, 1.0, 8),
            Err(GeometryError::InvalidParameter { name: "direction", .. })
        ));
    }
}
