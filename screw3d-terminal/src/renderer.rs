/// Character-cell rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use screw3d_core::{Camera, Material, Mesh, Rgb};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Character used for polylines
const LINE_CHAR: char = 'o';

const AMBIENT: f64 = 0.15;
const DIFFUSE: f64 = 0.85;
const SHININESS: i32 = 32;

/// Polylines are pulled this far toward the camera in NDC depth so they win
/// against the surface they trace.
const LINE_DEPTH_BIAS: f64 = 1e-4;

/// Projected vertex with its lighting terms
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f64,
    y: f64,
    depth: f64,
    intensity: f64,
    highlight: f64,
}

/// Renderer that converts meshes to colored terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    background: Rgb,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Rgb>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            background: Rgb::default(),
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Rgb::default(); size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate the buffers for a new viewport size
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            background: self.background,
            ..Self::new(width, height)
        };
    }

    pub fn clear(&mut self, background: Rgb) {
        self.background = background;
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(background);
    }

    /// Character and color at a cell, if it is inside the viewport
    pub fn cell(&self, x: usize, y: usize) -> Option<(char, Rgb)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y * self.width + x;
        Some((self.char_buffer[idx], self.color_buffer[idx]))
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, camera: &Camera, material: &Material) {
        let view_projection = camera.view_projection();
        let eye = camera.pose.eye;

        let vertex_normals = if material.smooth_shading {
            mesh.vertex_normals()
        } else {
            Vec::new()
        };

        for face in &mesh.faces {
            if face.indices.len() < 3 {
                continue;
            }
            let face_light = if material.smooth_shading {
                None
            } else {
                let centroid = face
                    .indices
                    .iter()
                    .fold(Vector3::zeros(), |acc, &i| acc + mesh.vertices[i].coords)
                    / face.indices.len() as f64;
                Some(lighting(
                    &face.normal(&mesh.vertices),
                    &Point3::from(centroid),
                    &eye,
                    material,
                ))
            };

            let mut corners = Vec::with_capacity(face.indices.len());
            for &i in &face.indices {
                let (intensity, highlight) = match face_light {
                    Some(light) => light,
                    None => lighting(&vertex_normals[i], &mesh.vertices[i], &eye, material),
                };
                match self.project(camera, &view_projection, &mesh.vertices[i]) {
                    Some((x, y, depth)) => corners.push(ScreenVertex {
                        x,
                        y,
                        depth,
                        intensity,
                        highlight,
                    }),
                    None => break,
                }
            }
            // Faces reaching behind the camera are dropped whole
            if corners.len() != face.indices.len() {
                continue;
            }

            // Fan triangulation; faces are planar and convex
            for pair in corners[1..].windows(2) {
                self.rasterize_triangle([corners[0], pair[0], pair[1]], material.color);
            }
        }

        let line_color = material.color.scale(1.25);
        for line in &mesh.lines {
            for segment in line.indices.windows(2) {
                let a = self.project(camera, &view_projection, &mesh.vertices[segment[0]]);
                let b = self.project(camera, &view_projection, &mesh.vertices[segment[1]]);
                if let (Some(a), Some(b)) = (a, b) {
                    self.rasterize_segment(a, b, line_color);
                }
            }
        }
    }

    fn project(
        &self,
        camera: &Camera,
        view_projection: &Matrix4<f64>,
        point: &Point3<f64>,
    ) -> Option<(f64, f64, f64)> {
        camera.project(view_projection, point, self.width as u32, self.height as u32)
    }

    fn rasterize_triangle(&mut self, v: [ScreenVertex; 3], base_color: Rgb) {
        let [v0, v1, v2] = v;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    let intensity = w0 * v0.intensity + w1 * v1.intensity + w2 * v2.intensity;
                    let highlight = w0 * v0.highlight + w1 * v1.highlight + w2 * v2.highlight;
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = shade_char(intensity + highlight);
                    self.color_buffer[idx] = shade_color(base_color, intensity, highlight);
                }
            }
        }
    }

    fn rasterize_segment(&mut self, a: (f64, f64, f64), b: (f64, f64, f64), color: Rgb) {
        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = a.0 + (b.0 - a.0) * t;
            let y = a.1 + (b.1 - a.1) * t;
            if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
                continue;
            }
            let depth = a.2 + (b.2 - a.2) * t - LINE_DEPTH_BIAS;
            if !(-1.0..=1.0).contains(&depth) {
                continue;
            }
            let idx = y as usize * self.width + x as usize;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = LINE_CHAR;
                self.color_buffer[idx] = color;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(to_color(self.background)))?;
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(to_color(color)))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Headlight shading: the light sits at the eye, so the half vector is the
/// view vector. Two-sided, since the blade is an open surface.
fn lighting(
    normal: &Vector3<f64>,
    point: &Point3<f64>,
    eye: &Point3<f64>,
    material: &Material,
) -> (f64, f64) {
    let to_eye = (eye - point).try_normalize(1e-12).unwrap_or_else(Vector3::z);
    let facing = normal.dot(&to_eye).abs();
    let intensity = AMBIENT + DIFFUSE * facing;
    let highlight = material.specular * facing.powi(SHININESS);
    (intensity, highlight)
}

fn shade_char(brightness: f64) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (brightness.clamp(0.0, 1.0) * last as f64).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

fn shade_color(base: Rgb, intensity: f64, highlight: f64) -> Rgb {
    base.scale(intensity).saturating_add(Rgb::WHITE.scale(highlight * 0.5))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
