//! Runtime configuration.
//!
//! Settings come from an optional INI file. Every key is optional and falls
//! back to the defaults below, so an absent file simply means "defaults".
//!
//! ```ini
//! [display]
//! title = trr
//! width = 640
//! height = 480
//! fps = 60
//!
//! [render]
//! ; rgba | bgr
//! channel_order = rgba
//! ; offset | yaw_pitch
//! camera = offset
//! depth_test = true
//! ; barycentric | scanline
//! rasterizer = barycentric
//! ; filled | wireframe | filled_wireframe
//! mode = filled
//! parallel = false
//! backface_culling = false
//! depth_range = 255
//!
//! [camera]
//! move_step = 0.1
//! turn_step = 0.05
//!
//! [mesh]
//! path = assets/cube.obj
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;
use log::info;

use crate::camera::CameraModel;
use crate::color::PixelFormat;
use crate::engine::RenderMode;
use crate::render::RasterizerType;

pub const DEFAULT_CONFIG_PATH: &str = "trr.ini";

#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed.
    Ini(ini::Error),
    /// A key holds a value of the wrong shape.
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Ini(e) => write!(f, "failed to load config: {e}"),
            ConfigError::InvalidValue {
                section,
                key,
                value,
            } => write!(f, "invalid value '{value}' for [{section}] {key}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Ini(e) => Some(e),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

impl From<ini::Error> for ConfigError {
    fn from(e: ini::Error) -> Self {
        ConfigError::Ini(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "trr".to_string(),
            width: 640,
            height: 480,
            fps: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub channel_order: PixelFormat,
    pub camera: CameraModel,
    pub depth_test: bool,
    pub rasterizer: RasterizerType,
    pub mode: RenderMode,
    pub parallel: bool,
    pub backface_culling: bool,
    pub depth_range: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            channel_order: PixelFormat::Rgba32,
            camera: CameraModel::Offset,
            depth_test: true,
            rasterizer: RasterizerType::Barycentric,
            mode: RenderMode::Filled,
            parallel: false,
            backface_culling: false,
            depth_range: 255,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub move_step: f64,
    /// Radians per frame.
    pub turn_step: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            move_step: 0.1,
            turn_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshConfig {
    pub path: PathBuf,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/cube.obj"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub display: DisplayConfig,
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub mesh: MeshConfig,
}

impl Config {
    /// Loads `path`, failing if it cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load(path)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let reader = Reader(ini);

        let display = DisplayConfig {
            title: reader
                .raw("display", "title")
                .map_or(defaults.display.title, str::to_string),
            width: reader.parse("display", "width", defaults.display.width)?,
            height: reader.parse("display", "height", defaults.display.height)?,
            fps: reader.parse("display", "fps", defaults.display.fps)?,
        };

        let d = defaults.render;
        let render = RenderConfig {
            channel_order: reader.parse("render", "channel_order", d.channel_order)?,
            camera: reader.parse("render", "camera", d.camera)?,
            depth_test: reader.flag("render", "depth_test", d.depth_test)?,
            rasterizer: reader.parse("render", "rasterizer", d.rasterizer)?,
            mode: reader.parse("render", "mode", d.mode)?,
            parallel: reader.flag("render", "parallel", d.parallel)?,
            backface_culling: reader.flag("render", "backface_culling", d.backface_culling)?,
            depth_range: reader.parse("render", "depth_range", d.depth_range)?,
        };
        if render.depth_range == 0 || render.depth_range > 255 {
            return Err(reader.invalid("render", "depth_range"));
        }

        let camera = CameraConfig {
            move_step: reader.parse("camera", "move_step", defaults.camera.move_step)?,
            turn_step: reader.parse("camera", "turn_step", defaults.camera.turn_step)?,
        };

        let mesh = MeshConfig {
            path: reader
                .raw("mesh", "path")
                .map_or(defaults.mesh.path, PathBuf::from),
        };

        Ok(Self {
            display,
            render,
            camera,
            mesh,
        })
    }
}

/// Typed lookups over an [`Ini`].
struct Reader<'a>(&'a Ini);

impl Reader<'_> {
    fn raw(&self, section: &str, key: &str) -> Option<&str> {
        self.0.get_from(Some(section), key).map(str::trim)
    }

    fn invalid(&self, section: &str, key: &str) -> ConfigError {
        ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: self.raw(section, key).unwrap_or_default().to_string(),
        }
    }

    fn parse<T: FromStr>(&self, section: &str, key: &str, default: T) -> Result<T, ConfigError> {
        match self.raw(section, key) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|_| self.invalid(section, key)),
        }
    }

    fn flag(&self, section: &str, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.raw(section, key) {
            None => Ok(default),
            Some(value) => parse_bool(value).ok_or_else(|| self.invalid(section, key)),
        }
    }
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
