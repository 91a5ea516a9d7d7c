//! Per-frame camera orbit and model spin
//!
//! The update is a pure function from one [`AnimationState`] to the next, so
//! the host loop decides when frames happen and tests can drive it directly.
use nalgebra::{Point3, Unit, Vector3};

use crate::geometry::Mesh;
use crate::projection::CameraPose;

/// How the spin is applied to the model each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinMode {
    /// Rotate the current mesh by one step, compounding rounding error
    #[default]
    Incremental,
    /// Recompute the mesh from the base by the total angle so far
    Absolute,
}

/// Camera orbit and model spin parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Horizontal distance of the eye from the z axis
    pub radius: f64,
    pub eye_height: f64,
    pub bob_amplitude: f64,
    /// Bob cycles per orbit radian
    pub bob_frequency: f64,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Orbit parameter advance per frame
    pub time_step: f64,
    pub spin_axis: Unit<Vector3<f64>>,
    /// Model spin per frame, in degrees
    pub spin_degrees: f64,
    pub pivot: Point3<f64>,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            radius: 4.0,
            eye_height: 2.5,
            bob_amplitude: 0.2,
            bob_frequency: 2.0,
            target: Point3::new(0.0, 0.0, 0.8),
            up: Vector3::z(),
            time_step: 0.02,
            spin_axis: Vector3::z_axis(),
            spin_degrees: 0.5,
            pivot: Point3::new(0.0, 0.0, 0.8),
        }
    }
}

/// Camera pose on the orbit at parameter `t`
pub fn camera_pose_at(params: &OrbitParams, t: f64) -> CameraPose {
    let eye = Point3::new(
        params.radius * t.cos(),
        params.radius * t.sin(),
        params.eye_height + params.bob_amplitude * (t * params.bob_frequency).sin(),
    );
    CameraPose::new(eye, params.target, params.up)
}

/// Everything that changes from one frame to the next
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationState {
    pub camera: CameraPose,
    pub mesh: Mesh,
    /// Orbit parameter for the next frame
    pub t: f64,
    /// Frames advanced so far
    pub frame: u64,
}

impl AnimationState {
    pub fn new(camera: CameraPose, mesh: Mesh) -> Self {
        Self {
            camera,
            mesh,
            t: 0.0,
            frame: 0,
        }
    }
}

/// Advance one frame: place the camera at the current `t`, spin the mesh by
/// one step, then move `t` forward.
pub fn advance(state: AnimationState, params: &OrbitParams) -> AnimationState {
    let AnimationState {
        mut mesh, t, frame, ..
    } = state;
    mesh.rotate(&params.spin_axis, params.spin_degrees, &params.pivot);

    AnimationState {
        camera: camera_pose_at(params, t),
        mesh,
        t: t + params.time_step,
        frame: frame + 1,
    }
}

/// State after `frame` calls to [`advance`], computed directly from the base
/// mesh so no rounding error accumulates in the vertices.
pub fn frame_at(
    base: &Mesh,
    initial_camera: CameraPose,
    params: &OrbitParams,
    frame: u64,
) -> AnimationState {
    let camera = match frame {
        0 => initial_camera,
        _ => camera_pose_at(params, (frame - 1) as f64 * params.time_step),
    };
    let angle = frame as f64 * params.spin_degrees;

    AnimationState {
        camera,
        mesh: base.rotated(&params.spin_axis, angle, &params.pivot),
        t: frame as f64 * params.time_step,
        frame,
    }
}

/// Advance one frame using `mode`
pub fn step(
    state: AnimationState,
    base: &Mesh,
    initial_camera: CameraPose,
    params: &OrbitParams,
    mode: SpinMode,
) -> AnimationState {
    match mode {
        SpinMode::Incremental => advance(state, params),
        SpinMode::Absolute => frame_at(base, initial_camera, params, state.frame + 1),
    }
}
