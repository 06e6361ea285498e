//! 32-bit packed chunk vertex.
//!
//! Layout, low bit first:
//!
//! | bits    | field        | range    |
//! |---------|--------------|----------|
//! | 0..6    | x            | 0..=63   |
//! | 6..12   | y            | 0..=63   |
//! | 12..18  | z            | 0..=63   |
//! | 18..21  | ao level     | 0..=7    |
//! | 21..24  | normal index | 0..=7    |
//! | 24..35  | block index  | 0..=2047 |
//!
//! The block field is nominally 11 bits wide but only its low 8 bits survive
//! in a 32-bit word. The same layout is decoded by `shaders/chunk.wgsl`.

use crate::error::VertexError;

pub const X_OFFSET: u32 = 0;
pub const Y_OFFSET: u32 = 6;
pub const Z_OFFSET: u32 = 12;
pub const AO_OFFSET: u32 = 18;
pub const NORMAL_OFFSET: u32 = 21;
pub const BLOCK_OFFSET: u32 = 24;

pub const POSITION_BITS: u32 = 6;
pub const AO_BITS: u32 = 3;
pub const NORMAL_BITS: u32 = 3;
pub const BLOCK_BITS: u32 = 11;

/// Largest block index that survives packing.
pub const MAX_PACKED_BLOCK: u32 = (1 << (u32::BITS - BLOCK_OFFSET)) - 1;

#[inline]
pub const fn field_mask(width: u32) -> u32 {
    if width >= u32::BITS {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}

/// Reads the `width`-bit field starting at bit `offset`. Offsets past bit 31 read as zero.
#[inline]
pub const fn extract_field(packed: u32, offset: u32, width: u32) -> u32 {
    if offset >= u32::BITS {
        0
    } else {
        (packed >> offset) & field_mask(width)
    }
}

/// Places `value` into the `width`-bit field at `offset`. Bits of `value` above
/// `width`, and bits shifted past bit 31, are dropped.
#[inline]
pub const fn pack_field(value: u32, offset: u32, width: u32) -> u32 {
    if offset >= u32::BITS {
        0
    } else {
        (value & field_mask(width)) << offset
    }
}

#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackedVertex(pub u32);

impl PackedVertex {
    #[inline]
    pub const fn x(self) -> u32 {
        extract_field(self.0, X_OFFSET, POSITION_BITS)
    }

    #[inline]
    pub const fn y(self) -> u32 {
        extract_field(self.0, Y_OFFSET, POSITION_BITS)
    }

    #[inline]
    pub const fn z(self) -> u32 {
        extract_field(self.0, Z_OFFSET, POSITION_BITS)
    }

    #[inline]
    pub const fn ao(self) -> u32 {
        extract_field(self.0, AO_OFFSET, AO_BITS)
    }

    #[inline]
    pub const fn normal_index(self) -> u32 {
        extract_field(self.0, NORMAL_OFFSET, NORMAL_BITS)
    }

    #[inline]
    pub const fn block(self) -> u32 {
        extract_field(self.0, BLOCK_OFFSET, BLOCK_BITS)
    }

    pub const fn decode(self) -> VertexFields {
        VertexFields {
            x: self.x(),
            y: self.y(),
            z: self.z(),
            ao: self.ao(),
            normal_index: self.normal_index(),
            block: self.block(),
        }
    }
}

impl From<u32> for PackedVertex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<PackedVertex> for u32 {
    fn from(vertex: PackedVertex) -> Self {
        vertex.0
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VertexFields {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub ao: u32,
    pub normal_index: u32,
    pub block: u32,
}

impl VertexFields {
    pub const fn new(x: u32, y: u32, z: u32, ao: u32, normal_index: u32, block: u32) -> Self {
        Self {
            x,
            y,
            z,
            ao,
            normal_index,
            block,
        }
    }

    /// Packs the fields, rejecting anything the 32-bit layout cannot carry.
    pub fn pack(self) -> Result<PackedVertex, VertexError> {
        let position_max = field_mask(POSITION_BITS);
        for (axis, value) in [('x', self.x), ('y', self.y), ('z', self.z)] {
            if value > position_max {
                return Err(VertexError::PositionOutOfRange { axis, value });
            }
        }
        if self.ao > field_mask(AO_BITS) {
            return Err(VertexError::FieldTooWide {
                field: "ao",
                value: self.ao,
                bits: AO_BITS,
            });
        }
        if self.normal_index > field_mask(NORMAL_BITS) {
            return Err(VertexError::FieldTooWide {
                field: "normal_index",
                value: self.normal_index,
                bits: NORMAL_BITS,
            });
        }
        if self.block > MAX_PACKED_BLOCK {
            return Err(VertexError::BlockOutOfRange(self.block));
        }
        Ok(self.pack_unchecked())
    }

    /// Packs the fields, masking each one to its width.
    #[inline]
    pub const fn pack_unchecked(self) -> PackedVertex {
        PackedVertex(
            pack_field(self.x, X_OFFSET, POSITION_BITS)
                | pack_field(self.y, Y_OFFSET, POSITION_BITS)
                | pack_field(self.z, Z_OFFSET, POSITION_BITS)
                | pack_field(self.ao, AO_OFFSET, AO_BITS)
                | pack_field(self.normal_index, NORMAL_OFFSET, NORMAL_BITS)
                | pack_field(self.block, BLOCK_OFFSET, BLOCK_BITS),
        )
    }
}

impl From<PackedVertex> for VertexFields {
    fn from(vertex: PackedVertex) -> Self {
        vertex.decode()
    }
}
