//! Seeded 3D noise terrain used to fill chunks.
//!
//! A voxel is solid where the fractal Perlin field, scaled by `height_scale`,
//! rises above its world y. Sampling in 3D rather than per column is what
//! lets the surface fold over itself.

use std::fmt;

use bevy::math::IVec3;
use bracket_noise::prelude::{FastNoise, NoiseType};
use serde::Deserialize;

use crate::chunk::{Chunk, ChunkPos};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub seed: u64,
    pub frequency: f32,
    pub height_scale: f32,
    /// Added to the scaled noise before comparing against world y.
    pub base_height: f32,
    pub octaves: i32,
    pub lacunarity: f32,
    pub gain: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: 0.0375,
            height_scale: 64.0,
            base_height: 0.0,
            octaves: 8,
            lacunarity: 2.0,
            gain: 0.25,
        }
    }
}

pub struct Terrain {
    settings: TerrainSettings,
    noise: FastNoise,
}

impl fmt::Debug for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terrain")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Terrain {
    pub fn new(settings: TerrainSettings) -> Self {
        let mut noise = FastNoise::seeded(settings.seed);
        noise.set_noise_type(NoiseType::PerlinFractal);
        noise.set_frequency(settings.frequency);
        noise.set_fractal_octaves(settings.octaves.max(1));
        noise.set_fractal_lacunarity(settings.lacunarity);
        noise.set_fractal_gain(settings.gain);
        Self { settings, noise }
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    /// Scaled noise at a world position. The voxel there is solid when this
    /// exceeds its y.
    pub fn density(&self, world: IVec3) -> f32 {
        let n = self
            .noise
            .get_noise3d(world.x as f32, world.y as f32, world.z as f32);
        self.settings.base_height + n * self.settings.height_scale
    }

    pub fn is_solid(&self, world: IVec3) -> bool {
        self.density(world) > world.y as f32
    }

    pub fn generate_chunk(&self, chunk_pos: ChunkPos) -> Chunk {
        Chunk::from_solid_fn(chunk_pos, |world| self.is_solid(world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_chunk() {
        let a = Terrain::new(TerrainSettings::default());
        let b = Terrain::new(TerrainSettings::default());
        let pos = ChunkPos::new(1, 0, -2);
        assert_eq!(a.generate_chunk(pos), b.generate_chunk(pos));
    }

    #[test]
    fn density_stays_within_scale() {
        let terrain = Terrain::new(TerrainSettings {
            base_height: 10.0,
            height_scale: 20.0,
            ..TerrainSettings::default()
        });
        for x in -20..20 {
            for y in -5..5 {
                for z in -20..20 {
                    let d = terrain.density(IVec3::new(x * 7, y * 11, z * 3));
                    assert!((-12.0..=32.0).contains(&d), "density {d} at {x},{y},{z}");
                }
            }
        }
    }

    #[test]
    fn seeds_change_the_field() {
        let a = Terrain::new(TerrainSettings::default());
        let b = Terrain::new(TerrainSettings {
            seed: 42,
            ..TerrainSettings::default()
        });
        let differs = (0..64).any(|i| {
            let p = IVec3::new(i * 5, i - 32, i * 3);
            a.density(p) != b.density(p)
        });
        assert!(differs);
    }

    #[test]
    fn field_is_continuous_between_neighbours() {
        let terrain = Terrain::new(TerrainSettings::default());
        for i in 0..32 {
            let p = IVec3::new(i * 3, 0, -i);
            let step = terrain.density(p + IVec3::X) - terrain.density(p);
            // One voxel is a small fraction of a noise period.
            assert!(step.abs() < 16.0, "jump of {step} at {p}");
        }
    }

    #[test]
    fn solidity_follows_world_height() {
        let terrain = Terrain::new(TerrainSettings::default());
        let low = terrain.generate_chunk(ChunkPos::new(0, -4, 0));
        let high = terrain.generate_chunk(ChunkPos::new(0, 4, 0));
        assert!(low.is_full());
        assert!(high.is_empty());
    }

    #[test]
    fn generated_voxels_match_is_solid() {
        let terrain = Terrain::new(TerrainSettings::default());
        let pos = ChunkPos::new(0, 0, 0);
        let chunk = terrain.generate_chunk(pos);
        for index in (0..crate::CHUNK_VOLUME).step_by(97) {
            let voxel = crate::VoxelPos::from_index(index);
            let world = pos.world_origin() + voxel.to_ivec3();
            assert_eq!(chunk.get(voxel).is_solid(), terrain.is_solid(world));
        }
    }
}
