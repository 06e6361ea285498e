use crate::error::VertexError;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VoxelType {
    #[default]
    Air,
    Block,
}

impl VoxelType {
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Block)
    }

    /// Value written into the block field of a packed vertex.
    pub const fn block_index(self) -> u32 {
        match self {
            Self::Air => 0,
            Self::Block => 1,
        }
    }
}

impl From<VoxelType> for u32 {
    fn from(voxel_type: VoxelType) -> Self {
        voxel_type.block_index()
    }
}

impl TryFrom<u32> for VoxelType {
    type Error = VertexError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Air),
            1 => Ok(Self::Block),
            other => Err(VertexError::UnknownVoxelType(other)),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Voxel {
    pub voxel_type: VoxelType,
}

impl Voxel {
    pub const AIR: Self = Self::new(VoxelType::Air);

    pub const fn new(voxel_type: VoxelType) -> Self {
        Self { voxel_type }
    }

    pub const fn is_solid(self) -> bool {
        self.voxel_type.is_solid()
    }
}
