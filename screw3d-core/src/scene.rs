/// The aerial screw scene and its parameters
use nalgebra::{Point3, Vector3};
use std::f64::consts::TAU;
use tracing::{debug, info};

use crate::animation::{OrbitParams, SpinMode};
use crate::builder::{build_ruled_strip, build_spiral_curve, constant, cylinder, linspace};
use crate::color::Rgb;
use crate::error::Result;
use crate::geometry::Mesh;
use crate::projection::CameraPose;

/// Shape of the screw's spiral, shared by the blade surface and its rim
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelixParams {
    pub turns: f64,
    pub height: f64,
    /// Blade radius at the bottom of the spiral
    pub radius_start: f64,
    /// Blade radius at the top of the spiral
    pub radius_end: f64,
    /// Height at which the spiral starts
    pub z_offset: f64,
    /// Radius of the blade's inner edge, where it meets the mast
    pub hub_radius: f64,
    pub curve_samples: usize,
    pub strip_samples: usize,
}

impl HelixParams {
    /// Angle the blade sweeps through, in radians
    pub fn angle_span(&self) -> f64 {
        self.turns * TAU
    }

    /// The blade rim as a spline through the sampled spiral
    pub fn build_rim(&self) -> Result<Mesh> {
        let spiral = build_spiral_curve(
            self.turns,
            self.height,
            self.radius_start,
            self.radius_end,
            self.z_offset,
            self.curve_samples,
        )?;
        Ok(Mesh::from(spiral.spline(self.curve_samples)?))
    }

    /// The blade surface between the rim and the mast
    pub fn build_blade(&self) -> Result<Mesh> {
        let n = self.strip_samples;
        let z: Vec<f64> = linspace(0.0, self.height, n)
            .into_iter()
            .map(|z| z + self.z_offset)
            .collect();
        build_ruled_strip(
            self.angle_span(),
            n,
            &linspace(self.radius_start, self.radius_end, n),
            &constant(self.hub_radius, n),
            &z,
        )
    }
}

impl Default for HelixParams {
    fn default() -> Self {
        Self {
            turns: 1.5,
            height: 1.2,
            radius_start: 1.0,
            radius_end: 0.2,
            z_offset: 1.2,
            hub_radius: 0.05,
            curve_samples: 200,
            strip_samples: 150,
        }
    }
}

/// A capped cylinder primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderParams {
    pub center: Point3<f64>,
    pub direction: Vector3<f64>,
    pub radius: f64,
    pub height: f64,
    pub resolution: usize,
}

impl CylinderParams {
    pub fn build(&self) -> Result<Mesh> {
        cylinder(
            self.center,
            self.direction,
            self.radius,
            self.height,
            self.resolution,
        )
    }
}

/// Surface appearance of the model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    /// Weight of the specular highlight, 0 to 1
    pub specular: f64,
    pub smooth_shading: bool,
}

/// Where the title is anchored on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePosition {
    UpperEdge,
    LowerEdge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub text: String,
    pub color: Rgb,
    pub position: TitlePosition,
}

/// Material as configured, with the color still a `#rrggbb` literal
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialConfig {
    pub color: String,
    pub specular: f64,
    pub smooth_shading: bool,
}

impl MaterialConfig {
    pub fn resolve(&self) -> Result<Material> {
        Ok(Material {
            color: Rgb::from_hex(&self.color)?,
            specular: self.specular,
            smooth_shading: self.smooth_shading,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleConfig {
    pub text: String,
    pub color: String,
    pub position: TitlePosition,
}

impl TitleConfig {
    pub fn resolve(&self) -> Result<Title> {
        Ok(Title {
            text: self.text.clone(),
            color: Rgb::from_hex(&self.color)?,
            position: self.position,
        })
    }
}

/// Every constant that defines the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub base: CylinderParams,
    pub mast: CylinderParams,
    pub helix: HelixParams,
    pub material: MaterialConfig,
    pub background: String,
    pub title: TitleConfig,
    pub initial_camera: CameraPose,
    pub orbit: OrbitParams,
    pub spin_mode: SpinMode,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            base: CylinderParams {
                center: Point3::origin(),
                direction: Vector3::z(),
                radius: 1.0,
                height: 0.2,
                resolution: 100,
            },
            mast: CylinderParams {
                center: Point3::new(0.0, 0.0, 0.9),
                direction: Vector3::z(),
                radius: 0.05,
                height: 1.8,
                resolution: 100,
            },
            helix: HelixParams::default(),
            material: MaterialConfig {
                color: "#bfa063".to_string(),
                specular: 0.8,
                smooth_shading: true,
            },
            background: "#1a0f00".to_string(),
            title: TitleConfig {
                text: "Leonardo da Vinci's aerial screw (3D simulation)".to_string(),
                color: "#d2b48c".to_string(),
                position: TitlePosition::UpperEdge,
            },
            initial_camera: CameraPose::new(
                Point3::new(4.0, 4.0, 2.5),
                Point3::new(0.0, 0.0, 0.8),
                Vector3::z(),
            ),
            orbit: OrbitParams::default(),
            spin_mode: SpinMode::default(),
        }
    }
}

/// The built scene, ready to hand to a renderer
#[derive(Debug, Clone)]
pub struct Scene {
    pub model: Mesh,
    pub material: Material,
    pub background: Rgb,
    pub title: Title,
    pub initial_camera: CameraPose,
    pub orbit: OrbitParams,
    pub spin_mode: SpinMode,
}

/// Build every part of the screw and union them into one model.
///
/// Fails on the first color or part whose parameters are invalid.
pub fn build_scene(config: &SceneConfig) -> Result<Scene> {
    let material = config.material.resolve()?;
    let background = Rgb::from_hex(&config.background)?;
    let title = config.title.resolve()?;

    let base = config.base.build()?;
    let mast = config.mast.build()?;
    let blade = config.helix.build_blade()?;
    let rim = config.helix.build_rim()?;
    debug!(
        base = base.vertices.len(),
        mast = mast.vertices.len(),
        blade = blade.vertices.len(),
        rim = rim.vertices.len(),
        "built scene parts"
    );

    let model = Mesh::union([&base, &mast, &blade, &rim]);
    model.check_indices()?;
    info!(
        vertices = model.vertices.len(),
        faces = model.faces.len(),
        lines = model.lines.len(),
        "scene ready"
    );

    Ok(Scene {
        model,
        material,
        background,
        title,
        initial_camera: config.initial_camera,
        orbit: config.orbit,
        spin_mode: config.spin_mode,
    })
}
