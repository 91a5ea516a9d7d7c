/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Where the camera sits, what it looks at, and which way is up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
}

impl CameraPose {
    pub fn new(eye: Point3<f64>, target: Point3<f64>, up: Vector3<f64>) -> Self {
        Self { eye, target, up }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 5.0), Point3::origin(), Vector3::y())
    }
}

/// Perspective camera for 3D rendering
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pose: CameraPose,
    /// Vertical field of view in radians
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Camera for a viewport of square pixels
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_pixel_aspect(width, height, 1.0)
    }

    /// Camera for a viewport whose pixels are `pixel_aspect` times as wide as
    /// they are tall (terminal cells are roughly 0.5)
    pub fn with_pixel_aspect(width: u32, height: u32, pixel_aspect: f64) -> Self {
        Self {
            pose: CameraPose::default(),
            fov: 30f64.to_radians(),
            aspect: aspect_ratio(width, height, pixel_aspect),
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
    }

    /// Recompute the aspect ratio after the viewport changed size
    pub fn resize(&mut self, width: u32, height: u32, pixel_aspect: f64) {
        self.aspect = aspect_ratio(width, height, pixel_aspect);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.pose.eye, &self.pose.target, &self.pose.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `x` and `y` in pixels from the top-left
    /// corner and `depth` in normalized device coordinates. Points on or
    /// behind the near plane yield `None`; points beside the viewport are
    /// still returned so that primitives crossing the edge can be clipped by
    /// the rasterizer.
    pub fn project(
        &self,
        view_projection: &Matrix4<f64>,
        point: &Point3<f64>,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        let clip = view_projection * point.to_homogeneous();
        if clip.w < self.near {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f64;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f64;

        Some((screen_x, screen_y, depth))
    }
}

fn aspect_ratio(width: u32, height: u32, pixel_aspect: f64) -> f64 {
    width.max(1) as f64 * pixel_aspect / height.max(1) as f64
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
