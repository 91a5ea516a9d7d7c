/// Geometry primitives for the scene model
use nalgebra::{Point3, Vector3};

use crate::error::{GeometryError, Result};

/// A planar polygon given as an ordered list of vertex indices.
///
/// Index order defines the winding and so the direction of the normal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn quad(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self::new(vec![a, b, c, d])
    }

    /// Calculate the face normal with Newell's method.
    ///
    /// Works for any planar polygon; returns the zero vector when the face
    /// is degenerate.
    pub fn normal(&self, vertices: &[Point3<f64>]) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        let count = self.indices.len();
        for i in 0..count {
            let current = vertices[self.indices[i]];
            let next = vertices[self.indices[(i + 1) % count]];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
    }

    fn offset(&self, by: usize) -> Self {
        Self::new(self.indices.iter().map(|i| i + by).collect())
    }
}

/// A connected path through mesh vertices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polyline {
    pub indices: Vec<usize>,
}

impl Polyline {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    fn offset(&self, by: usize) -> Self {
        Self::new(self.indices.iter().map(|i| i + by).collect())
    }
}

/// An ordered sequence of points
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub points: Vec<Point3<f64>>,
}

impl Curve {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Resample the curve as a Catmull-Rom spline through its points.
    ///
    /// The result has `sample_count` points spaced uniformly in the spline
    /// parameter and passes exactly through the first and last point.
    pub fn spline(&self, sample_count: usize) -> Result<Curve> {
        if self.points.len() < 2 {
            return Err(GeometryError::invalid(
                "points",
                format!("a spline needs at least 2 points, got {}", self.points.len()),
            ));
        }
        if sample_count < 2 {
            return Err(GeometryError::invalid(
                "sample_count",
                format!("must be at least 2, got {}", sample_count),
            ));
        }

        let last = self.points.len() - 1;
        let at = |i: isize| self.points[i.clamp(0, last as isize) as usize].coords;

        let points = (0..sample_count)
            .map(|s| {
                let u = s as f64 / (sample_count - 1) as f64 * last as f64;
                let segment = (u.floor() as usize).min(last - 1);
                let t = u - segment as f64;
                let i = segment as isize;
                let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));

                let t2 = t * t;
                let t3 = t2 * t;
                let coords = ((p1 * 2.0)
                    + (p2 - p0) * t
                    + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
                    + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
                    * 0.5;
                Point3::from(coords)
            })
            .collect();

        Ok(Curve::new(points))
    }
}

/// A polygon mesh with optional polylines, stored as shared vertex data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<Face>,
    pub lines: Vec<Polyline>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
            lines: Vec::new(),
        }
    }

    /// Push a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Point3<f64>) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Append `other`, shifting its indices past the vertices already here
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(other.faces.iter().map(|f| f.offset(offset)));
        self.lines.extend(other.lines.iter().map(|l| l.offset(offset)));
    }

    /// Concatenate meshes in order.
    ///
    /// No vertices are welded and no topology is checked.
    pub fn union<'a>(parts: impl IntoIterator<Item = &'a Mesh>) -> Mesh {
        let mut result = Mesh::new();
        for part in parts {
            result.append(part);
        }
        result
    }

    /// Verify that every face and line references an existing vertex
    pub fn check_indices(&self) -> Result<()> {
        let count = self.vertices.len();
        let faces = self.faces.iter().map(|f| &f.indices);
        let lines = self.lines.iter().map(|l| &l.indices);
        for indices in faces.chain(lines) {
            if let Some(bad) = indices.iter().find(|&&i| i >= count) {
                return Err(GeometryError::invalid(
                    "indices",
                    format!("index {} out of range for {} vertices", bad, count),
                ));
            }
        }
        Ok(())
    }

    /// Per-vertex normals: the normalized sum of incident face normals.
    ///
    /// Vertices with no faces (curve points) get the zero vector.
    pub fn vertex_normals(&self) -> Vec<Vector3<f64>> {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];
        for face in &self.faces {
            let normal = face.normal(&self.vertices);
            for &i in &face.indices {
                normals[i] += normal;
            }
        }
        normals
            .into_iter()
            .map(|n| n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros))
            .collect()
    }
}

impl From<Curve> for Mesh {
    /// A curve becomes a face-less mesh holding one polyline over its points
    fn from(curve: Curve) -> Self {
        let indices = (0..curve.points.len()).collect();
        Self {
            vertices: curve.points,
            faces: Vec::new(),
            lines: vec![Polyline::new(indices)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
        mesh.add_face(Face::quad(0, 1, 2, 3));
        mesh
    }

    #[test]
    fn test_face_normal_follows_winding() {
        let mesh = unit_square();
        let normal = mesh.faces[0].normal(&mesh.vertices);
        assert!((normal - Vector3::z()).norm() < 1e-12);

        let reversed = Face::quad(3, 2, 1, 0).normal(&mesh.vertices);
        assert!((reversed + Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_degenerate_face_normal_is_zero() {
        let vertices = vec![Point3::origin(); 3];
        assert_eq!(Face::new(vec![0, 1, 2]).normal(&vertices), Vector3::zeros());
    }

    #[test]
    fn test_union_offsets_indices() {
        let a = unit_square();
        let b = Mesh::from(Curve::new(vec![
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
        ]));
        let c = unit_square();

        let model = Mesh::union([&a, &b, &c]);
        assert_eq!(model.vertices.len(), 4 + 2 + 4);
        assert_eq!(model.faces.len(), 2);
        assert_eq!(model.faces[0].indices, vec![0, 1, 2, 3]);
        assert_eq!(model.lines[0].indices, vec![4, 5]);
        assert_eq!(model.faces[1].indices, vec![6, 7, 8, 9]);
        assert!(model.check_indices().is_ok());
    }

    #[test]
    fn test_check_indices_rejects_out_of_range() {
        let mut mesh = unit_square();
        mesh.add_face(Face::quad(0, 1, 2, 4));
        assert!(matches!(
            mesh.check_indices(),
            Err(GeometryError::InvalidParameter { name: "indices", .. })
        ));
    }

    #[test]
    fn test_vertex_normals() {
        let mut mesh = unit_square();
        mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));
        let normals = mesh.vertex_normals();
        assert_eq!(normals.len(), 5);
        for normal in &normals[..4] {
            assert!((normal - Vector3::z()).norm() < 1e-12);
        }
        assert_eq!(normals[4], Vector3::zeros());
    }

    #[test]
    fn test_spline_passes_through_endpoints() {
        let curve = Curve::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 1.0),
        ]);
        let spline = curve.spline(9).unwrap();
        assert_eq!(spline.len(), 9);
        assert!((spline.points[0] - curve.points[0]).norm() < 1e-12);
        assert!((spline.points[4] - curve.points[1]).norm() < 1e-12);
        assert!((spline.points[8] - curve.points[2]).norm() < 1e-12);
    }

    #[test]
    fn test_spline_of_line_stays_on_line() {
        let curve = Curve::new(vec![Point3::origin(), Point3::new(3.0, 0.0, 0.0)]);
        let spline = curve.spline(4).unwrap();
        for p in &spline.points {
            assert!(p.y.abs() < 1e-12 && p.z.abs() < 1e-12);
        }
        assert!(spline.points.windows(2).all(|w| w[1].x > w[0].x));
        assert!((spline.points[3].x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_spline_rejects_bad_input() {
        let single = Curve::new(vec![Point3::origin()]);
        assert!(single.spline(10).is_err());

        let pair = Curve::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert!(pair.spline(1).is_err());
    }
}
