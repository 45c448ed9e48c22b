use cgmath::{Point3, Vector3};

use crate::engine_state::{config::UvRect, voxels::block::block_side::BlockSide};

/// Unit-cube corners of each face, in emission order.
///
/// Together with the fixed triangle pattern `(0, 1, 2)`, `(1, 3, 2)` these
/// orderings make every triangle's normal point out of the block.
const FACE_CORNERS: [[[u8; 3]; 4]; 6] = [
    // RIGHT
    [[1, 0, 0], [1, 1, 0], [1, 0, 1], [1, 1, 1]],
    // LEFT
    [[0, 0, 0], [0, 0, 1], [0, 1, 0], [0, 1, 1]],
    // FRONT
    [[1, 1, 1], [0, 1, 1], [1, 0, 1], [0, 0, 1]],
    // BACK
    [[0, 0, 0], [0, 1, 0], [1, 0, 0], [1, 1, 0]],
    // TOP
    [[0, 1, 0], [0, 1, 1], [1, 1, 0], [1, 1, 1]],
    // BOTTOM
    [[1, 0, 1], [0, 0, 1], [1, 0, 0], [0, 0, 0]],
];

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by its four corner points in emission order and the
/// atlas coordinates belonging to each corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Corner positions in chunk-local world units
    pub corners: [Point3<f32>; 4],
    /// Atlas coordinates, one per corner
    pub uvs: [[f32; 2]; 4],
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the block at `position`.
    ///
    /// # Arguments
    /// * `position` - Local block position inside the chunk
    /// * `block_side` - Which side of the block to emit
    /// * `uv_rect` - Atlas rectangle of the block's type
    /// * `block_scale` - World units per block
    pub fn new(
        position: Point3<i32>,
        block_side: BlockSide,
        uv_rect: &UvRect,
        block_scale: f32,
    ) -> Self {
        let base = position.cast::<f32>().unwrap_or(Point3::new(0.0, 0.0, 0.0));
        let table = &FACE_CORNERS[block_side as usize];

        let mut corners = [Point3::new(0.0, 0.0, 0.0); 4];
        let mut uvs = [[0.0; 2]; 4];
        for (i, corner) in table.iter().enumerate() {
            let offset = Vector3::new(corner[0] as f32, corner[1] as f32, corner[2] as f32);
            corners[i] = (base + offset) * block_scale;
            uvs[i] = Self::corner_uv(block_side, corner, uv_rect);
        }

        Face {
            corners,
            uvs,
            block_side,
        }
    }

    /// Maps a unit-cube corner onto the atlas rectangle.
    ///
    /// Side faces run `v` up the y axis and `u` along their horizontal axis;
    /// top and bottom faces use x for `u` and z for `v`.
    fn corner_uv(block_side: BlockSide, corner: &[u8; 3], uv_rect: &UvRect) -> [f32; 2] {
        let (u, v) = match block_side {
            BlockSide::RIGHT | BlockSide::LEFT => (corner[2], corner[1]),
            BlockSide::FRONT | BlockSide::BACK => (corner[0], corner[1]),
            BlockSide::TOP | BlockSide::BOTTOM => (corner[0], corner[2]),
        };
        let pick = |t: u8, axis: usize| {
            if t == 0 {
                uv_rect.min[axis]
            } else {
                uv_rect.max[axis]
            }
        };
        [pick(u, 0), pick(v, 1)]
    }
}
