use std::path::Path;

use bevy::math::Vec3;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};
use vx_render::{
    ChunkMaterial, LightingQualityPreset, MovementSettings, RenderDebugSettings, WorldSettings,
};
use vx_utils::TerrainSettings;

pub const DEFAULT_CONFIG_PATH: &str = "vx-client.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid material: {0}")]
    InvalidMaterial(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub material: MaterialConfig,
    pub world: WorldConfig,
    pub camera: MovementSettings,
    pub lighting: LightingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub reflectance: f32,
    pub perceptual_roughness: f32,
    pub metallic: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        let material = ChunkMaterial::default();
        Self {
            reflectance: material.reflectance,
            perceptual_roughness: material.perceptual_roughness,
            metallic: material.metallic,
        }
    }
}

impl TryFrom<MaterialConfig> for ChunkMaterial {
    type Error = ConfigError;

    fn try_from(config: MaterialConfig) -> Result<Self, Self::Error> {
        for (name, value) in [
            ("reflectance", config.reflectance),
            ("perceptual_roughness", config.perceptual_roughness),
            ("metallic", config.metallic),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidMaterial(format!(
                    "{name} = {value} is outside 0..=1"
                )));
            }
        }
        Ok(ChunkMaterial {
            reflectance: config.reflectance,
            perceptual_roughness: config.perceptual_roughness,
            metallic: config.metallic,
            wireframe: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub radius_chunks: i32,
    pub min_chunk_y: i32,
    pub max_chunk_y: i32,
    pub camera_start: [f32; 3],
    pub terrain: TerrainSettings,
}

impl Default for WorldConfig {
    fn default() -> Self {
        let world = WorldSettings::default();
        Self {
            radius_chunks: world.radius_chunks,
            min_chunk_y: world.min_chunk_y,
            max_chunk_y: world.max_chunk_y,
            camera_start: world.camera_start.to_array(),
            terrain: world.terrain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub preset: LightingQualityPreset,
    pub shadows: bool,
    pub wireframe: bool,
}

impl Default for LightingConfig {
    fn default() -> Self {
        let debug = RenderDebugSettings::default();
        Self {
            preset: debug.lighting_quality,
            shadows: debug.shadows_enabled,
            wireframe: debug.wireframe,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(text: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Loads the config at `path`. A missing file at the default location
    /// falls back to defaults; a missing explicit path is an error.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        let display_path = path.display().to_string();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml_str(&text, &display_path)?;
                info!(path = %display_path, "loaded config");
                Ok(config)
            }
            Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %display_path, "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: display_path,
                source,
            }),
        }
    }

    pub fn chunk_material(&self) -> Result<ChunkMaterial, ConfigError> {
        self.material.try_into()
    }

    pub fn world_settings(&self) -> Result<WorldSettings, ConfigError> {
        Ok(WorldSettings {
            terrain: self.world.terrain,
            radius_chunks: self.world.radius_chunks,
            min_chunk_y: self.world.min_chunk_y,
            max_chunk_y: self.world.max_chunk_y,
            material: self.chunk_material()?,
            camera_start: Vec3::from_array(self.world.camera_start),
        })
    }

    pub fn debug_settings(&self) -> RenderDebugSettings {
        RenderDebugSettings {
            shadows_enabled: self.lighting.shadows,
            wireframe: self.lighting.wireframe,
            lighting_quality: self.lighting.preset,
        }
    }
}
