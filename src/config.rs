//! # Demo Configuration
//!
//! Every tunable of the two demos lives here. The defaults reproduce the stock scenes;
//! a JSON file can override any subset of fields since every struct uses `#[serde(default)]`.
//!
//! ```json
//! {
//!     "demo": "voxels",
//!     "voxels": { "cell_size": 128, "seed": 7, "terrain": { "shape": "sine" } }
//! }
//! ```

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{engine_state::voxels::world::MAX_CELL_SIZE, error::DemoError};

/// Which of the two demos to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    /// A single lit box spinning about its X and Y axes
    Cube,
    /// A noise-generated voxel cell viewed with an orbit camera
    #[default]
    Voxels,
}

impl FromStr for DemoKind {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cube" => Ok(DemoKind::Cube),
            "voxels" | "voxel" | "terrain" => Ok(DemoKind::Voxels),
            other => Err(DemoError::UnknownDemo(other.to_string())),
        }
    }
}

/// An sRGB colour parsed from a CSS name or a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Converts to linear floating point, which is what the shaders and an sRGB surface expect.
    pub fn to_linear(self) -> [f32; 3] {
        fn channel(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b] = self.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let named = match s.as_str() {
            "black" => Some(0x000000),
            "white" => Some(0xffffff),
            "green" => Some(0x008000),
            "lightblue" => Some(0xadd8e6),
            "red" => Some(0xff0000),
            "blue" => Some(0x0000ff),
            "gray" | "grey" => Some(0x808080),
            _ => None,
        };
        if let Some(hex) = named {
            return Ok(Rgb::from_hex(hex));
        }

        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .ok_or_else(|| format!("unrecognised colour '{}'", s))?;
        if digits.len() != 6 {
            return Err(format!("expected six hex digits in '{}'", s));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb::from_hex)
            .map_err(|e| format!("invalid hex colour '{}': {}", s, e))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A directional light shining from `position` towards the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: Rgb,
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [-1.0, 2.0, 4.0],
            color: Rgb::from_hex(0xffffff),
            intensity: 3.0,
        }
    }
}

/// Perspective camera parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Settings for the spinning cube demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    pub size: [f32; 3],
    pub color: Rgb,
    pub specular: Rgb,
    pub shininess: f32,
    pub light: LightConfig,
    pub camera: PerspectiveConfig,
    /// Distance of the camera from the cube along +Z
    pub camera_distance: f32,
    /// Radians per second about both the X and Y axes
    pub rotation_speed: f32,
    pub background: Rgb,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            size: [1.0, 1.0, 1.0],
            color: Rgb::from_hex(0x44aa88),
            specular: Rgb::from_hex(0x111111),
            shininess: 30.0,
            light: LightConfig::default(),
            camera: PerspectiveConfig {
                fov_degrees: 75.0,
                near: 0.1,
                far: 5.0,
            },
            camera_distance: 2.0,
            rotation_speed: 1.0,
            background: Rgb::from_hex(0x000000),
        }
    }
}

/// Which noise generator feeds the terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseSource {
    /// The crate's own improved noise with a shuffled permutation table
    #[default]
    Improved,
    /// `noise::Perlin` from the noise crate
    Perlin,
}

/// How the terrain decides whether a voxel is solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum TerrainShape {
    /// Column height from 2D noise: `noise(x*f/size, sample_y, z*f/size) * size * amplitude + size * base`
    Heightmap {
        frequency: f64,
        sample_y: f64,
        amplitude: f64,
        base: f64,
    },
    /// Column height from two sine waves; needs no noise at all
    Sine,
    /// Solid wherever 3D noise exceeds `threshold`, which produces overhangs and caves
    Density { threshold: f64 },
}

impl Default for TerrainShape {
    fn default() -> Self {
        TerrainShape::Heightmap {
            frequency: 5.0,
            sample_y: 0.5,
            amplitude: 0.2,
            base: 0.4,
        }
    }
}

/// What is drawn behind the terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Background {
    Color { color: Rgb },
    /// A picture stretched over the viewport. `source` is a file path natively and a URL on the web.
    Image { source: String, fallback: Rgb },
}

impl Background {
    pub fn clear_color(&self) -> Rgb {
        match self {
            Background::Color { color } => *color,
            Background::Image { fallback, .. } => *fallback,
        }
    }

    pub fn image_source(&self) -> Option<&str> {
        match self {
            Background::Color { .. } => None,
            Background::Image { source, .. } => Some(source),
        }
    }
}

/// URL of the sky picture used behind the terrain by default on the web.
pub const DEFAULT_BACKGROUND_URL: &str =
    "https://images.pexels.com/photos/1205301/pexels-photo-1205301.jpeg";

const DEFAULT_SKY_COLOR: Rgb = Rgb::from_hex(0xadd8e6);

impl Default for Background {
    /// The sky picture on the web. Native builds only read local files, so they clear
    /// to the sky colour instead.
    fn default() -> Self {
        if cfg!(target_family = "wasm") {
            Background::Image {
                source: DEFAULT_BACKGROUND_URL.to_string(),
                fallback: DEFAULT_SKY_COLOR,
            }
        } else {
            Background::Color {
                color: DEFAULT_SKY_COLOR,
            }
        }
    }
}

/// Settings for the voxel terrain viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelsConfig {
    /// Edge length of the single voxel cell
    pub cell_size: u32,
    /// Seed for the permutation shuffle; `None` draws a new terrain every run
    pub seed: Option<u64>,
    pub noise: NoiseSource,
    pub terrain: TerrainShape,
    /// Fraction of the cell height below which nothing is generated
    pub floor: f64,
    pub color: Rgb,
    pub lights: Vec<LightConfig>,
    pub camera: PerspectiveConfig,
    /// Camera start position as fractions of the cell size
    pub camera_position: [f32; 3],
    /// Orbit target as fractions of the cell size
    pub orbit_target: [f32; 3],
    pub background: Background,
}

impl Default for VoxelsConfig {
    fn default() -> Self {
        Self {
            cell_size: 250,
            seed: None,
            noise: NoiseSource::default(),
            terrain: TerrainShape::default(),
            floor: 0.2,
            color: Rgb::from_hex(0x008000),
            lights: vec![
                LightConfig::default(),
                LightConfig {
                    position: [1.0, -1.0, -2.0],
                    ..LightConfig::default()
                },
            ],
            camera: PerspectiveConfig::default(),
            camera_position: [-0.3, 0.8, -0.3],
            orbit_target: [0.5, 1.0 / 3.0, 0.5],
            background: Background::default(),
        }
    }
}

impl VoxelsConfig {
    /// Rejects cells too large to address.
    pub fn validate(&self) -> Result<(), DemoError> {
        if self.cell_size > MAX_CELL_SIZE {
            return Err(DemoError::InvalidConfig(format!(
                "voxels.cell_size {} exceeds the maximum of {}",
                self.cell_size, MAX_CELL_SIZE
            )));
        }
        Ok(())
    }
}

/// Top level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub demo: DemoKind,
    pub window_title: String,
    pub cube: CubeConfig,
    pub voxels: VoxelsConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            demo: DemoKind::default(),
            window_title: String::from("Voxel Demos"),
            cube: CubeConfig::default(),
            voxels: VoxelsConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Default settings for the given demo.
    pub fn for_demo(demo: DemoKind) -> Self {
        Self {
            demo,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, DemoError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DemoError> {
        self.voxels.validate()
    }
}

/// Reads a JSON configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DemoConfig, DemoError> {
    let contents = std::fs::read_to_string(path)?;
    DemoConfig::from_json(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_hex_colors() {
        assert_eq!("green".parse::<Rgb>().unwrap(), Rgb::from_hex(0x008000));
        assert_eq!("LightBlue".parse::<Rgb>().unwrap(), Rgb::from_hex(0xadd8e6));
        assert_eq!("#44aa88".parse::<Rgb>().unwrap(), Rgb { r: 0x44, g: 0xaa, b: 0x88 });
        assert_eq!("0x44AA88".parse::<Rgb>().unwrap(), Rgb::from_hex(0x44aa88));
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("chartreuse".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_linear_conversion_endpoints() {
        assert_eq!(Rgb::from_hex(0x000000).to_linear(), [0.0, 0.0, 0.0]);
        let white = Rgb::from_hex(0xffffff).to_linear();
        for c in white {
            assert!((c - 1.0).abs() < 1e-5);
        }
        // sRGB mid grey is much darker in linear space
        let grey = Rgb::from_hex(0x808080).to_linear()[0];
        assert!(grey > 0.2 && grey < 0.23);
    }

    #[test]
    fn test_defaults_match_stock_scenes() {
        let config = DemoConfig::default();
        assert_eq!(config.demo, DemoKind::Voxels);
        assert_eq!(config.voxels.cell_size, 250);
        assert_eq!(config.voxels.lights.len(), 2);
        assert_eq!(config.voxels.camera.far, 1000.0);
        assert_eq!(config.cube.camera.far, 5.0);
        assert_eq!(config.cube.color, Rgb::from_hex(0x44aa88));
        assert_eq!(config.voxels.background.clear_color(), Rgb::from_hex(0xadd8e6));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DemoConfig::from_json(
            r#"{
                "demo": "cube",
                "voxels": { "cell_size": 32, "seed": 9, "terrain": { "shape": "density", "threshold": -0.1 } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.demo, DemoKind::Cube);
        assert_eq!(config.voxels.cell_size, 32);
        assert_eq!(config.voxels.seed, Some(9));
        assert_eq!(config.voxels.terrain, TerrainShape::Density { threshold: -0.1 });
        assert_eq!(config.voxels.floor, 0.2);
        assert_eq!(config.cube, CubeConfig::default());
    }

    #[test]
    fn test_color_background_round_trips_through_json() {
        let mut config = DemoConfig::default();
        config.voxels.background = Background::Color {
            color: Rgb::from_hex(0xadd8e6),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("#add8e6"));
        assert_eq!(DemoConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json_is_a_config_error() {
        let err = DemoConfig::from_json(r#"{ "demo": "teapot" }"#).unwrap_err();
        assert!(matches!(err, DemoError::Config(_)));
    }

    #[test]
    fn test_unaddressable_cell_size_is_rejected() {
        let json = format!(r#"{{ "voxels": {{ "cell_size": {} }} }}"#, MAX_CELL_SIZE as u64 + 1);
        let err = DemoConfig::from_json(&json).unwrap_err();
        assert!(matches!(err, DemoError::InvalidConfig(_)));

        let err = DemoConfig::from_json(r#"{ "voxels": { "cell_size": 4294967295 } }"#).unwrap_err();
        assert!(matches!(err, DemoError::InvalidConfig(_)));

        let config = DemoConfig::from_json(r#"{ "voxels": { "cell_size": 1200 } }"#).unwrap();
        assert_eq!(config.voxels.cell_size, 1200);
    }

    #[cfg(not(target_family = "wasm"))]
    #[test]
    fn test_native_default_background_is_a_color() {
        let background = VoxelsConfig::default().background;
        assert_eq!(background.image_source(), None);
        assert_eq!(background.clear_color(), Rgb::from_hex(0xadd8e6));
    }

    #[test]
    fn test_demo_kind_from_str() {
        assert_eq!("Cube".parse::<DemoKind>().unwrap(), DemoKind::Cube);
        assert_eq!("terrain".parse::<DemoKind>().unwrap(), DemoKind::Voxels);
        assert!(matches!("teapot".parse::<DemoKind>(), Err(DemoError::UnknownDemo(_))));
    }
}
