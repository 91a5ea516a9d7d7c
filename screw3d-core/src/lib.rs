//! screw3d Core Library - Scene geometry and animation
//!
//! This library builds the aerial screw model from parametric formulas and
//! provides the camera and per-frame update used to animate it. Rendering is
//! left to a front end such as `screw3d-terminal`.

pub mod animation;
pub mod builder;
pub mod color;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use animation::{AnimationState, OrbitParams, SpinMode};
pub use builder::{build_ruled_strip, build_spiral_curve, cylinder};
pub use color::Rgb;
pub use error::GeometryError;
pub use geometry::{Curve, Face, Mesh, Polyline};
pub use projection::{Camera, CameraPose};
pub use scene::{build_scene, Material, Scene, SceneConfig, Title, TitlePosition};
pub use transform::{rotate, Transform};
