use bevy::math::{IVec3, Vec3};

use crate::error::VertexError;

/// Face normals in normal-index order. The mesher writes these indices into
/// packed vertices and `shaders/chunk.wgsl` reads them back, so the order is
/// fixed.
pub const NORMALS: [[f32; 3]; 6] = [
    [-1.0, 0.0, 0.0], // Left
    [1.0, 0.0, 0.0],  // Right
    [0.0, 0.0, 1.0],  // Back
    [0.0, 0.0, -1.0], // Front
    [0.0, 1.0, 0.0],  // Up
    [0.0, -1.0, 0.0], // Down
];

#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Back,
    Front,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Self; 6] = [
        Self::Left,
        Self::Right,
        Self::Back,
        Self::Front,
        Self::Up,
        Self::Down,
    ];

    pub const fn normal_index(self) -> u32 {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Back => 2,
            Self::Front => 3,
            Self::Up => 4,
            Self::Down => 5,
        }
    }

    pub fn normal(self) -> Vec3 {
        Vec3::from_array(NORMALS[self.normal_index() as usize])
    }

    pub fn offset(self) -> IVec3 {
        self.normal().as_ivec3()
    }

    /// Axis the face is perpendicular to (0 = x, 1 = y, 2 = z).
    pub const fn axis(self) -> usize {
        match self {
            Self::Left | Self::Right => 0,
            Self::Up | Self::Down => 1,
            Self::Back | Self::Front => 2,
        }
    }

    /// Unit-cube corners of this face, counter-clockwise seen from outside.
    pub const fn corners(self) -> [[u32; 3]; 4] {
        match self {
            Self::Left => [[0, 0, 0], [0, 0, 1], [0, 1, 1], [0, 1, 0]],
            Self::Right => [[1, 0, 0], [1, 1, 0], [1, 1, 1], [1, 0, 1]],
            Self::Back => [[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]],
            Self::Front => [[0, 0, 0], [0, 1, 0], [1, 1, 0], [1, 0, 0]],
            Self::Up => [[0, 1, 0], [0, 1, 1], [1, 1, 1], [1, 1, 0]],
            Self::Down => [[0, 0, 0], [1, 0, 0], [1, 0, 1], [0, 0, 1]],
        }
    }
}

impl TryFrom<u32> for Direction {
    type Error = VertexError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(VertexError::InvalidNormalIndex(index))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quad {
    pub corners: [[u32; 3]; 4],
    pub dir: Direction,
}

impl Quad {
    pub fn from_dir(pos: [u32; 3], dir: Direction) -> Self {
        let corners = dir
            .corners()
            .map(|c| [pos[0] + c[0], pos[1] + c[1], pos[2] + c[2]]);
        Self { corners, dir }
    }
}

/// Index buffer for a vertex list made of quads, two triangles per quad.
pub fn generate_indices(vertex_count: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity((vertex_count / 4) * 6);
    for base in (0..vertex_count as u32).step_by(4) {
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_indices_match_table_order() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.normal_index() as usize, i);
            assert_eq!(Direction::try_from(i as u32).unwrap(), *dir);
        }
        assert_eq!(Direction::Left.normal(), Vec3::NEG_X);
        assert_eq!(Direction::Right.normal(), Vec3::X);
        assert_eq!(Direction::Back.normal(), Vec3::Z);
        assert_eq!(Direction::Front.normal(), Vec3::NEG_Z);
        assert_eq!(Direction::Up.normal(), Vec3::Y);
        assert_eq!(Direction::Down.normal(), Vec3::NEG_Y);
    }

    #[test]
    fn invalid_normal_indices_are_rejected() {
        assert_eq!(Direction::try_from(6), Err(VertexError::InvalidNormalIndex(6)));
        assert_eq!(Direction::try_from(7), Err(VertexError::InvalidNormalIndex(7)));
    }

    #[test]
    fn corners_wind_counter_clockwise_from_outside() {
        for dir in Direction::ALL {
            let c = dir.corners().map(|p| Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32));
            for [a, b, d] in [[0, 1, 2], [0, 2, 3]] {
                let face_normal = (c[b] - c[a]).cross(c[d] - c[a]).normalize();
                assert_eq!(face_normal, dir.normal(), "{dir:?}");
            }
            let axis = dir.axis();
            let plane = if dir.normal()[axis] > 0.0 { 1 } else { 0 };
            assert!(dir.corners().iter().all(|p| p[axis] == plane));
        }
    }

    #[test]
    fn indices_cover_each_quad() {
        assert_eq!(generate_indices(8), vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert!(generate_indices(0).is_empty());
    }

    #[test]
    fn quad_offsets_corners_by_position() {
        let quad = Quad::from_dir([3, 4, 5], Direction::Up);
        assert_eq!(quad.corners[0], [3, 5, 5]);
        assert_eq!(quad.corners[2], [4, 5, 6]);
    }
}
