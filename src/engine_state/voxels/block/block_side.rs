//! # Block Side Module
//!
//! This module defines the different faces/sides of a voxel block.
//! It provides the neighbor offsets used for face culling.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminants give the order in which the mesh builder tests
/// neighbors: [RIGHT, LEFT, FRONT, BACK, TOP, BOTTOM]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The right face (facing positive X)
    RIGHT = 0,

    /// The left face (facing negative X)
    LEFT = 1,

    /// The front face (facing positive Z)
    FRONT = 2,

    /// The back face (facing negative Z)
    BACK = 3,

    /// The top face (facing positive Y)
    TOP = 4,

    /// The bottom face (facing negative Y)
    BOTTOM = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [RIGHT, LEFT, FRONT, BACK, TOP, BOTTOM]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::TOP,
            BlockSide::BOTTOM,
        ]
    }

    /// Unit offset from a block to the neighbor sharing this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
        }
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        self.offset().cast::<f32>().unwrap_or_else(|| Vector3::new(0.0, 0.0, 0.0))
    }
}
