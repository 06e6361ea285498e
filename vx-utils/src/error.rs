use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VertexError {
    #[error("position component {axis} = {value} does not fit in 6 bits")]
    PositionOutOfRange { axis: char, value: u32 },

    #[error("{field} = {value} does not fit in its {bits}-bit field")]
    FieldTooWide {
        field: &'static str,
        value: u32,
        bits: u32,
    },

    #[error("ambient occlusion level {0} has no ambient weight (expected 0..=3)")]
    InvalidAmbientLevel(u32),

    #[error("normal index {0} does not name a face direction (expected 0..=5)")]
    InvalidNormalIndex(u32),

    #[error("block index {0} does not fit in the 8 bits left in the packed word")]
    BlockOutOfRange(u32),

    #[error("voxel type {0} not recognised")]
    UnknownVoxelType(u32),
}
