//! Chunk coordinate arithmetic.
//!
//! Chunks tile the world on the horizontal plane only; every chunk spans the
//! full world height. A [`ChunkCoordinate`] is therefore 2D, with its `y`
//! component addressing the world z axis.

use cgmath::{Point2, Point3};

/// Position of a chunk on the horizontal lattice. `y` is the world z axis.
pub type ChunkCoordinate = Point2<i32>;

/// Splits a world block position into the owning chunk and the local position
/// inside it.
///
/// Uses floor division on both axes, so `-1` lands in chunk `-1` at local
/// `width - 1` and `width` lands in chunk `1` at local `0`. The vertical
/// component is passed through unchanged.
pub fn world_to_chunk(world: Point3<i32>, width: i32) -> (ChunkCoordinate, Point3<i32>) {
    let chunk = Point2::new(world.x.div_euclid(width), world.z.div_euclid(width));
    let local = Point3::new(world.x.rem_euclid(width), world.y, world.z.rem_euclid(width));
    (chunk, local)
}

/// Inverse of [`world_to_chunk`].
pub fn chunk_to_world(chunk: ChunkCoordinate, local: Point3<i32>, width: i32) -> Point3<i32> {
    Point3::new(chunk.x * width + local.x, local.y, chunk.y * width + local.z)
}

/// Resolves a local position that may have stepped out of its chunk
/// horizontally by at most one chunk width.
///
/// Returns the adjacent chunk coordinate and the position wrapped back into
/// `[0, width)`. Positions already inside the chunk come back unchanged.
pub fn wrap_to_neighbor(
    chunk: ChunkCoordinate,
    mut local: Point3<i32>,
    width: i32,
) -> (ChunkCoordinate, Point3<i32>) {
    let mut neighbor = chunk;

    if local.x < 0 {
        neighbor.x -= 1;
        local.x += width;
    } else if local.x >= width {
        neighbor.x += 1;
        local.x -= width;
    }

    if local.z < 0 {
        neighbor.y -= 1;
        local.z += width;
    } else if local.z >= width {
        neighbor.y += 1;
        local.z -= width;
    }

    (neighbor, local)
}

/// World-space origin of a chunk.
pub fn chunk_origin(chunk: ChunkCoordinate, world_width: f32) -> Point3<f32> {
    Point3::new(chunk.x as f32 * world_width, 0.0, chunk.y as f32 * world_width)
}

/// The chunk containing a world-space position (e.g. the viewer's).
pub fn chunk_of_world_position(position: Point3<f32>, world_width: f32) -> ChunkCoordinate {
    Point2::new(
        (position.x / world_width).floor() as i32,
        (position.z / world_width).floor() as i32,
    )
}

/// Chunks that share a vertical face with the block at `local`.
///
/// Only blocks on the horizontal rim of their chunk have any; a block in a
/// corner column has two. The top and bottom of the world are not chunk
/// boundaries and never contribute.
pub fn boundary_neighbors(
    chunk: ChunkCoordinate,
    local: Point3<i32>,
    width: i32,
) -> Vec<ChunkCoordinate> {
    let mut neighbors = Vec::with_capacity(2);

    if local.x == 0 {
        neighbors.push(Point2::new(chunk.x - 1, chunk.y));
    }
    if local.x == width - 1 {
        neighbors.push(Point2::new(chunk.x + 1, chunk.y));
    }
    if local.z == 0 {
        neighbors.push(Point2::new(chunk.x, chunk.y - 1));
    }
    if local.z == width - 1 {
        neighbors.push(Point2::new(chunk.x, chunk.y + 1));
    }

    neighbors
}

/// The four chunks sharing an edge with `chunk`.
pub fn adjacent_chunks(chunk: ChunkCoordinate) -> [ChunkCoordinate; 4] {
    [
        Point2::new(chunk.x + 1, chunk.y),
        Point2::new(chunk.x - 1, chunk.y),
        Point2::new(chunk.x, chunk.y + 1),
        Point2::new(chunk.x, chunk.y - 1),
    ]
}

/// Every chunk coordinate in `[-radius, radius)` around `center` on both
/// axes, x-outer and z-inner.
pub fn chunks_in_radius(center: ChunkCoordinate, radius: i32) -> Vec<ChunkCoordinate> {
    let side = (2 * radius.max(0)) as usize;
    let mut coordinates = Vec::with_capacity(side * side);
    for x in -radius..radius {
        for z in -radius..radius {
            coordinates.push(Point2::new(center.x + x, center.y + z));
        }
    }
    coordinates
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn negative_positions_floor_into_negative_chunks() {
        let (chunk, local) = world_to_chunk(Point3::new(-1, 5, -10), 10);
        assert_eq!(chunk, Point2::new(-1, -1));
        assert_eq!(local, Point3::new(9, 5, 0));

        let (chunk, local) = world_to_chunk(Point3::new(-11, 0, -20), 10);
        assert_eq!(chunk, Point2::new(-2, -2));
        assert_eq!(local, Point3::new(9, 0, 0));
    }

    #[test]
    fn positions_beyond_one_chunk_on_the_positive_axis() {
        let (chunk, local) = world_to_chunk(Point3::new(25, 0, 10), 10);
        assert_eq!(chunk, Point2::new(2, 1));
        assert_eq!(local, Point3::new(5, 0, 0));
    }

    #[test]
    fn wraps_into_each_horizontal_neighbor() {
        let origin = Point2::new(0, 0);
        assert_eq!(
            wrap_to_neighbor(origin, Point3::new(-1, 3, 4), 10),
            (Point2::new(-1, 0), Point3::new(9, 3, 4))
        );
        assert_eq!(
            wrap_to_neighbor(origin, Point3::new(10, 3, 4), 10),
            (Point2::new(1, 0), Point3::new(0, 3, 4))
        );
        assert_eq!(
            wrap_to_neighbor(origin, Point3::new(2, 3, -1), 10),
            (Point2::new(0, -1), Point3::new(2, 3, 9))
        );
        assert_eq!(
            wrap_to_neighbor(origin, Point3::new(2, 3, 10), 10),
            (Point2::new(0, 1), Point3::new(2, 3, 0))
        );
    }

    #[test]
    fn viewer_chunk_uses_block_scale() {
        assert_eq!(
            chunk_of_world_position(Point3::new(39.9, 100.0, -0.1), 20.0),
            Point2::new(1, -1)
        );
    }

    #[test]
    fn interior_blocks_have_no_boundary_neighbors() {
        assert!(boundary_neighbors(Point2::new(0, 0), Point3::new(4, 0, 4), 10).is_empty());
    }

    #[test]
    fn corner_blocks_touch_two_neighbors() {
        let neighbors = boundary_neighbors(Point2::new(3, 3), Point3::new(9, 127, 0), 10);
        assert_eq!(neighbors, vec![Point2::new(4, 3), Point2::new(3, 2)]);
    }

    #[test]
    fn radius_covers_a_half_open_square() {
        let coordinates = chunks_in_radius(Point2::new(0, 0), 5);
        assert_eq!(coordinates.len(), 100);
        assert_eq!(coordinates[0], Point2::new(-5, -5));
        assert_eq!(coordinates[1], Point2::new(-5, -4));
        assert_eq!(*coordinates.last().unwrap(), Point2::new(4, 4));
    }

    proptest! {
        #[test]
        fn world_to_chunk_round_trips(
            x in -10_000i32..10_000,
            y in 0i32..128,
            z in -10_000i32..10_000,
            width in 1i32..64,
        ) {
            let world = Point3::new(x, y, z);
            let (chunk, local) = world_to_chunk(world, width);
            prop_assert!((0..width).contains(&local.x));
            prop_assert!((0..width).contains(&local.z));
            prop_assert_eq!(chunk_to_world(chunk, local, width), world);
        }

        #[test]
        fn wrapping_agrees_with_world_arithmetic(
            cx in -100i32..100,
            cz in -100i32..100,
            lx in -1i32..=10,
            lz in -1i32..=10,
        ) {
            let width = 10;
            let chunk = Point2::new(cx, cz);
            let local = Point3::new(lx, 0, lz);
            let world = chunk_to_world(chunk, local, width);
            prop_assert_eq!(wrap_to_neighbor(chunk, local, width), world_to_chunk(world, width));
        }
    }
}
