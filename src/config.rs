use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::instance::default_positions;
use crate::view::texture::{Channels, TextureSpec};

fn default_title() -> String {
    "texcubes".to_string()
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_maximized() -> bool {
    true
}

fn default_vsync() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WindowSettings {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_maximized")]
    pub maximized: bool,

    #[serde(default = "default_vsync")]
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            maximized: default_maximized(),
            vsync: default_vsync(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 1.0, 3.0]
}

fn default_yaw() -> f32 {
    -90.0
}

fn default_pitch() -> f32 {
    0.0
}

fn default_linear_speed() -> f32 {
    2.5
}

fn default_rotation_speed() -> f32 {
    90.0
}

fn default_sensitivity() -> f32 {
    0.1
}

/// Starting pose and tuning. Angles in degrees.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],

    #[serde(default = "default_yaw")]
    pub yaw: f32,

    #[serde(default = "default_pitch")]
    pub pitch: f32,

    #[serde(default = "default_linear_speed")]
    pub linear_speed: f32,

    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,

    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            yaw: default_yaw(),
            pitch: default_pitch(),
            linear_speed: default_linear_speed(),
            rotation_speed: default_rotation_speed(),
            sensitivity: default_sensitivity(),
        }
    }
}

fn default_clear_color() -> [f32; 4] {
    [0.2, 0.3, 0.3, 1.0]
}

fn default_textures() -> [TextureSpec; 2] {
    [
        TextureSpec::new("assets/container.png", Channels::Rgb),
        TextureSpec::new("assets/awesomeface.png", Channels::Rgba),
    ]
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SceneSettings {
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],

    /// Bound to texture units 0 and 1, in order.
    #[serde(default = "default_textures")]
    pub textures: [TextureSpec; 2],

    #[serde(default = "default_positions")]
    pub instances: Vec<[f32; 3]>,
}

impl SceneSettings {
    pub fn instance_positions(&self) -> Vec<Vec3> {
        self.instances.iter().copied().map(Vec3::from).collect()
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            clear_color: default_clear_color(),
            textures: default_textures(),
            instances: default_positions(),
        }
    }
}

/// Optional files replacing the built-in shader stages.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ShaderSettings {
    #[serde(default)]
    pub vertex: Option<PathBuf>,

    #[serde(default)]
    pub fragment: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowSettings,

    #[serde(default)]
    pub camera: CameraSettings,

    #[serde(default)]
    pub scene: SceneSettings,

    #[serde(default)]
    pub shaders: ShaderSettings,
}

impl Config {
    pub const FILE_NAME: &'static str = "texcubes.toml";

    /// Reads `path`, falling back to defaults when it does not exist. A file
    /// that exists but cannot be read or parsed is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        info!("Reading {}", path.display());
        let txt = read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&txt).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("{config:#?}");
        Ok(config)
    }

    pub fn parse(txt: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(txt)
    }
}
