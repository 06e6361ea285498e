use std::path::{Path, PathBuf};

pub mod chunk;
pub mod direction;
pub mod error;
pub mod terrain;
pub mod vertex;
pub mod voxel;

pub use chunk::{CHUNK_SIZE, CHUNK_VOLUME, Chunk, ChunkPos, VoxelPos};
pub use direction::{Direction, NORMALS, Quad, generate_indices};
pub use error::VertexError;
pub use terrain::{Terrain, TerrainSettings};
pub use vertex::{PackedVertex, VertexFields, extract_field, pack_field};
pub use voxel::{Voxel, VoxelType};

pub const VX_ASSETS_ROOT_ENV: &str = "VX_ASSETS_ROOT";

pub fn assets_root() -> PathBuf {
    if let Ok(explicit) = std::env::var(VX_ASSETS_ROOT_ENV) {
        let path = PathBuf::from(explicit);
        if path.exists() {
            return path;
        }
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(exe_dir) = exe.parent()
    {
        let sibling_assets = exe_dir.join("assets");
        if sibling_assets.exists() {
            return sibling_assets;
        }
    }

    let repo_assets = Path::new(env!("CARGO_MANIFEST_DIR")).join("../vx-client/assets");
    if repo_assets.exists() {
        return repo_assets;
    }

    PathBuf::from("assets")
}
