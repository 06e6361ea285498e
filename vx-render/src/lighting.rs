use bevy::prelude::*;
use serde::Deserialize;

use crate::collaborators::{PbrFunctions, PbrInput};
use crate::components::SunLight;
use crate::debug::RenderDebugSettings;

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingQualityPreset {
    Fast,
    #[default]
    Standard,
    #[serde(alias = "fancylow")]
    FancyLow,
    #[serde(alias = "fancyhigh")]
    FancyHigh,
}

impl LightingQualityPreset {
    pub const ALL: [Self; 4] = [Self::Fast, Self::Standard, Self::FancyLow, Self::FancyHigh];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fast => "Fast",
            Self::Standard => "Standard",
            Self::FancyLow => "Fancy Low",
            Self::FancyHigh => "Fancy High",
        }
    }

    pub fn from_options_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fast" => Some(Self::Fast),
            "standard" => Some(Self::Standard),
            "fancy_low" | "fancylow" => Some(Self::FancyLow),
            "fancy_high" | "fancyhigh" => Some(Self::FancyHigh),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub const fn allows_shadows(self) -> bool {
        matches!(self, Self::FancyLow | Self::FancyHigh)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingPresetParams {
    pub sun_dir: Vec3,
    pub sun_strength: f32,
    pub ambient_strength: f32,
    pub fog_start: f32,
    pub fog_end: f32,
    pub fog_color: Vec3,
}

pub fn preset_params(preset: LightingQualityPreset) -> LightingPresetParams {
    let fog_color = Vec3::new(0.62, 0.72, 0.86);
    match preset {
        LightingQualityPreset::Fast => LightingPresetParams {
            sun_dir: Vec3::new(0.35, 0.86, 0.36).normalize(),
            sun_strength: 0.0,
            ambient_strength: 1.0,
            fog_start: 0.0,
            fog_end: 0.0,
            fog_color,
        },
        LightingQualityPreset::Standard => LightingPresetParams {
            sun_dir: Vec3::new(0.30, 0.86, 0.42).normalize(),
            sun_strength: 0.48,
            ambient_strength: 0.62,
            fog_start: 0.0,
            fog_end: 0.0,
            fog_color,
        },
        LightingQualityPreset::FancyLow => LightingPresetParams {
            sun_dir: Vec3::new(0.22, 0.88, 0.41).normalize(),
            sun_strength: 0.56,
            ambient_strength: 0.52,
            fog_start: 70.0,
            fog_end: 220.0,
            fog_color,
        },
        LightingQualityPreset::FancyHigh => LightingPresetParams {
            sun_dir: Vec3::new(0.19, 0.90, 0.39).normalize(),
            sun_strength: 0.62,
            ambient_strength: 0.48,
            fog_start: 52.0,
            fog_end: 170.0,
            fog_color,
        },
    }
}

/// CPU stand-in for the PBR lighting library: Lambert sun, flat ambient,
/// a roughness-shaped Blinn-Phong lobe and linear distance fog.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceLighting {
    pub camera_position: Vec3,
    pub camera_forward: Vec3,
    pub orthographic: bool,
    pub params: LightingPresetParams,
}

impl ReferenceLighting {
    pub fn new(preset: LightingQualityPreset, camera_position: Vec3) -> Self {
        Self {
            camera_position,
            camera_forward: (-camera_position).normalize_or_zero(),
            orthographic: false,
            params: preset_params(preset),
        }
    }
}

impl PbrFunctions for ReferenceLighting {
    fn is_orthographic(&self) -> bool {
        self.orthographic
    }

    fn calculate_view(&self, world_position: Vec4, is_orthographic: bool) -> Vec3 {
        if is_orthographic {
            return -self.camera_forward;
        }
        (self.camera_position - world_position.truncate()).normalize_or_zero()
    }

    fn apply_pbr_lighting(&self, input: &PbrInput) -> Vec4 {
        let m = &input.material;
        let base = m.base_color.truncate();
        let p = &self.params;

        let n_dot_l = input.n.dot(p.sun_dir).max(0.0);
        let diffuse = base * (1.0 - m.metallic) * (p.ambient_strength + p.sun_strength * n_dot_l);

        let half = (p.sun_dir + input.v).normalize_or_zero();
        let roughness = m.perceptual_roughness.clamp(0.089, 1.0);
        let shininess = 2.0 / (roughness * roughness * roughness * roughness) - 2.0;
        let f0 = Vec3::splat(0.16 * m.reflectance * m.reflectance * (1.0 - m.metallic))
            + base * m.metallic;
        let specular = if n_dot_l > 0.0 {
            f0 * input.n.dot(half).max(0.0).powf(shininess.max(1.0)) * p.sun_strength
        } else {
            Vec3::ZERO
        };

        (diffuse + specular).extend(m.base_color.w)
    }

    fn main_pass_post_lighting_processing(&self, input: &PbrInput, color: Vec4) -> Vec4 {
        let p = &self.params;
        if p.fog_end <= p.fog_start {
            return color;
        }
        let distance = self.camera_position.distance(input.world_position.truncate());
        let fog = ((distance - p.fog_start) / (p.fog_end - p.fog_start)).clamp(0.0, 1.0);
        color.truncate().lerp(p.fog_color, fog).extend(color.w)
    }
}

pub fn apply_lighting_quality(
    settings: Res<RenderDebugSettings>,
    mut ambient: ResMut<AmbientLight>,
    mut lights: Query<&mut DirectionalLight, With<SunLight>>,
) {
    if !settings.is_changed() {
        return;
    }

    let params = preset_params(settings.lighting_quality);
    ambient.brightness = 250.0 * params.ambient_strength;
    let shadows = settings.shadows_enabled && settings.lighting_quality.allows_shadows();
    for mut light in &mut lights {
        light.shadows_enabled = shadows;
        light.illuminance = if settings.lighting_quality.allows_shadows() {
            9_000.0
        } else {
            7_000.0
        };
    }
    debug!(
        preset = settings.lighting_quality.label(),
        shadows, "applied lighting preset"
    );
}
