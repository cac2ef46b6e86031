//! # Scene
//!
//! What the two demos draw: materials, lights and the uniform block that carries
//! them to the mesh shader, plus the spinning cube's geometry and motion.

pub mod cube;
pub mod lights;

use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix4, SquareMatrix};

use crate::config::Rgb;

use super::camera_state::camera::CameraUniform;
use lights::{pack_lights, DirectionalLight, LightUniform, MAX_LIGHTS};

/// Lighting model evaluated by the mesh shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Shading {
    /// Diffuse only
    Lambert = 0,
    /// Diffuse plus a Blinn-Phong highlight
    Phong = 1,
}

/// Surface appearance of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub specular: Rgb,
    pub shininess: f32,
    pub shading: Shading,
}

impl Material {
    pub fn lambert(color: Rgb) -> Self {
        Self {
            color,
            specular: Rgb::from_hex(0x000000),
            shininess: 0.0,
            shading: Shading::Lambert,
        }
    }

    pub fn phong(color: Rgb, specular: Rgb, shininess: f32) -> Self {
        Self {
            color,
            specular,
            shininess,
            shading: Shading::Phong,
        }
    }
}

/// Everything the mesh shader reads, in one uniform buffer.
///
/// The layout matches `Scene` in `mesh.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniform {
    pub camera: CameraUniform,
    pub model: [[f32; 4]; 4],
    /// Linear RGB, alpha 1
    pub base_color: [f32; 4],
    /// Linear RGB and shininess in `w`
    pub specular: [f32; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
    pub light_count: u32,
    pub shading: u32,
    pub _pad: [u32; 2],
}

impl SceneUniform {
    pub fn new(material: &Material, lights: &[DirectionalLight]) -> Self {
        let [r, g, b] = material.color.to_linear();
        let [sr, sg, sb] = material.specular.to_linear();
        let (lights, light_count) = pack_lights(lights);
        Self {
            camera: CameraUniform::new(),
            model: Matrix4::<f32>::identity().into(),
            base_color: [r, g, b, 1.0],
            specular: [sr, sg, sb, material.shininess],
            lights,
            light_count,
            shading: material.shading as u32,
            _pad: [0; 2],
        }
    }

    pub fn set_camera(&mut self, camera: CameraUniform) {
        self.camera = camera;
    }

    pub fn set_model(&mut self, model: Matrix4<f32>) {
        self.model = model.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LightConfig;

    #[test]
    fn test_uniform_size_is_a_multiple_of_sixteen() {
        let size = std::mem::size_of::<SceneUniform>();
        assert_eq!(size, 256);
        assert_eq!(size % 16, 0);
    }

    #[test]
    fn test_phong_material_is_packed() {
        let material = Material::phong(Rgb::from_hex(0x44aa88), Rgb::from_hex(0x111111), 30.0);
        let light = DirectionalLight::from(&LightConfig::default());
        let uniform = SceneUniform::new(&material, &[light]);

        assert_eq!(uniform.shading, Shading::Phong as u32);
        assert_eq!(uniform.light_count, 1);
        assert_eq!(uniform.specular[3], 30.0);
        assert_eq!(uniform.base_color[3], 1.0);
        assert_eq!(&uniform.base_color[..3], &Rgb::from_hex(0x44aa88).to_linear());
    }

    #[test]
    fn test_lambert_material_has_no_highlight() {
        let uniform = SceneUniform::new(&Material::lambert(Rgb::from_hex(0x008000)), &[]);
        assert_eq!(uniform.shading, 0);
        assert_eq!(uniform.light_count, 0);
        assert_eq!(&uniform.specular[..3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_model_matrix_is_column_major() {
        let mut uniform = SceneUniform::new(&Material::lambert(Rgb::from_hex(0xffffff)), &[]);
        uniform.set_model(Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(uniform.model[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
