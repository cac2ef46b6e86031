//! Directional lights.

use bytemuck::{Pod, Zeroable};
use cgmath::{InnerSpace, Vector3};

use crate::config::{LightConfig, Rgb};

/// Most lights the mesh shader evaluates.
pub const MAX_LIGHTS: usize = 2;

/// A light infinitely far away, shining from `direction_from` towards the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction_from: Vector3<f32>,
    pub color: Rgb,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Unit vector pointing at the light. Zero when the light sits at the origin.
    pub fn direction_to_light(&self) -> Vector3<f32> {
        if self.direction_from.magnitude2() == 0.0 {
            return Vector3::new(0.0, 0.0, 0.0);
        }
        self.direction_from.normalize()
    }

    pub fn to_uniform(&self) -> LightUniform {
        LightUniform {
            direction: self.direction_to_light().into(),
            _pad: 0.0,
            color: self.color.to_linear(),
            intensity: self.intensity,
        }
    }
}

impl From<&LightConfig> for DirectionalLight {
    fn from(config: &LightConfig) -> Self {
        Self {
            direction_from: config.position.into(),
            color: config.color,
            intensity: config.intensity,
        }
    }
}

/// Light layout shared with the shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// Normalized vector towards the light
    pub direction: [f32; 3],
    pub _pad: f32,
    /// Linear RGB
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Packs up to [`MAX_LIGHTS`] lights, returning them and how many are in use.
pub fn pack_lights(lights: &[DirectionalLight]) -> ([LightUniform; MAX_LIGHTS], u32) {
    let mut packed = [LightUniform::default(); MAX_LIGHTS];
    let count = lights.len().min(MAX_LIGHTS);
    if lights.len() > MAX_LIGHTS {
        log::warn!("Only the first {} of {} lights are used", MAX_LIGHTS, lights.len());
    }
    for (slot, light) in packed.iter_mut().zip(lights) {
        *slot = light.to_uniform();
    }
    (packed, count as u32)
}
