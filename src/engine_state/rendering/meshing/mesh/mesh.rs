//! Mesh data structures and operations for voxel rendering.
//!
//! A [`GeneratedMesh`] is rebuilt from scratch whenever a chunk changes; there
//! is no incremental update. Buffers are plain arrays so they can be handed to
//! a GPU or a collision system without conversion.

use std::collections::HashMap;

use cgmath::{InnerSpace, Point3, Vector3};

use super::face::Face;

/// Axis-aligned bounding box of a mesh, in chunk-local world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest corner
    pub min: Point3<f32>,
    /// Largest corner
    pub max: Point3<f32>,
}

/// One vertex of a quad as raw bits: position xyz then uv, for exact,
/// order-independent comparison of meshes.
pub type QuadKey = [[u32; 5]; 4];

/// Geometry of one chunk: the visible faces only.
///
/// Without compaction the buffers hold exactly four vertices per quad and six
/// indices per quad, with `uvs` and `normals` in lock-step with `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedMesh {
    /// Vertex positions in chunk-local world units
    pub vertices: Vec<[f32; 3]>,
    /// Atlas coordinates, one per vertex
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
    /// Per-vertex normals recomputed from triangle winding
    pub normals: Vec<[f32; 3]>,
    /// Bounding box, `None` for an empty mesh
    pub bounds: Option<Bounds>,
}

impl GeneratedMesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        GeneratedMesh::default()
    }

    /// Appends a face: four vertices, four uvs and two triangles.
    ///
    /// With `n` the vertex count after the append, the triangles are
    /// `(n-4, n-3, n-2)` and `(n-3, n-1, n-2)`.
    pub fn add_face(&mut self, face: &Face) {
        for (corner, uv) in face.corners.iter().zip(face.uvs.iter()) {
            self.vertices.push([corner.x, corner.y, corner.z]);
            self.uvs.push(*uv);
        }

        let n = self.vertices.len() as u32;
        self.indices
            .extend_from_slice(&[n - 4, n - 3, n - 2, n - 3, n - 1, n - 2]);
    }

    /// Number of quads described by the index buffer.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Whether the mesh has no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Recomputes per-vertex normals from the winding of every triangle that
    /// uses the vertex.
    pub fn recalculate_normals(&mut self) {
        let mut accumulated = vec![Vector3::new(0.0f32, 0.0, 0.0); self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
            let pa = Point3::from(self.vertices[a]);
            let pb = Point3::from(self.vertices[b]);
            let pc = Point3::from(self.vertices[c]);
            let face_normal = (pb - pa).cross(pc - pa);
            for i in [a, b, c] {
                accumulated[i] += face_normal;
            }
        }

        self.normals = accumulated
            .into_iter()
            .map(|n| {
                if n.magnitude2() > 0.0 {
                    n.normalize().into()
                } else {
                    [0.0; 3]
                }
            })
            .collect();
    }

    /// Recomputes the bounding box from the vertex positions.
    pub fn recalculate_bounds(&mut self) {
        let mut vertices = self.vertices.iter();
        let Some(first) = vertices.next() else {
            self.bounds = None;
            return;
        };

        let mut min = Point3::from(*first);
        let mut max = min;
        for v in vertices {
            min.x = min.x.min(v[0]);
            min.y = min.y.min(v[1]);
            min.z = min.z.min(v[2]);
            max.x = max.x.max(v[0]);
            max.y = max.y.max(v[1]);
            max.z = max.z.max(v[2]);
        }
        self.bounds = Some(Bounds { min, max });
    }

    /// Merges vertices with identical position, uv and normal and rewrites the
    /// index buffer to match. Geometry is unchanged; only buffer sizes shrink.
    pub fn compact(&mut self) {
        let mut remap: HashMap<[u32; 8], u32> = HashMap::with_capacity(self.vertices.len());
        let mut vertices = Vec::with_capacity(self.vertices.len());
        let mut uvs = Vec::with_capacity(self.uvs.len());
        let mut normals = Vec::with_capacity(self.normals.len());
        let mut old_to_new = Vec::with_capacity(self.vertices.len());

        for i in 0..self.vertices.len() {
            let v = self.vertices[i];
            let uv = self.uvs[i];
            let n = self.normals.get(i).copied().unwrap_or([0.0; 3]);
            let key = [
                v[0].to_bits(),
                v[1].to_bits(),
                v[2].to_bits(),
                uv[0].to_bits(),
                uv[1].to_bits(),
                n[0].to_bits(),
                n[1].to_bits(),
                n[2].to_bits(),
            ];
            let index = *remap.entry(key).or_insert_with(|| {
                vertices.push(v);
                uvs.push(uv);
                normals.push(n);
                (vertices.len() - 1) as u32
            });
            old_to_new.push(index);
        }

        for index in &mut self.indices {
            *index = old_to_new[*index as usize];
        }
        self.vertices = vertices;
        self.uvs = uvs;
        self.normals = normals;
    }

    /// The quads of this mesh as sorted bit patterns.
    ///
    /// Two meshes with equal keys draw the same faces with the same textures,
    /// whatever order they were emitted in and whether or not they were
    /// compacted.
    pub fn quad_keys(&self) -> Vec<QuadKey> {
        let mut keys: Vec<QuadKey> = self
            .indices
            .chunks_exact(6)
            .map(|quad| {
                [quad[0], quad[1], quad[2], quad[4]].map(|i| {
                    let v = self.vertices[i as usize];
                    let uv = self.uvs[i as usize];
                    [
                        v[0].to_bits(),
                        v[1].to_bits(),
                        v[2].to_bits(),
                        uv[0].to_bits(),
                        uv[1].to_bits(),
                    ]
                })
            })
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Vertex positions as raw bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Indices as raw bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::{config::UvRect, voxels::block::block_side::BlockSide};

    fn cube() -> GeneratedMesh {
        let rect = UvRect::new([0.0, 0.0], [1.0, 1.0]);
        let mut mesh = GeneratedMesh::new();
        for side in BlockSide::all() {
            mesh.add_face(&Face::new(Point3::new(0, 0, 0), side, &rect, 1.0));
        }
        mesh
    }

    #[test]
    fn faces_append_quads_in_lock_step() {
        let mesh = cube();
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.uvs.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert_eq!(mesh.quad_count(), 6);
        assert_eq!(&mesh.indices[6..12], &[4, 5, 6, 5, 7, 6]);
    }

    #[test]
    fn normals_follow_winding() {
        let mut mesh = cube();
        mesh.recalculate_normals();
        for (quad, side) in BlockSide::all().iter().enumerate() {
            let expected: [f32; 3] = side.normal().into();
            for v in 0..4 {
                assert_eq!(mesh.normals[quad * 4 + v], expected);
            }
        }
    }

    #[test]
    fn bounds_enclose_the_cube() {
        let mut mesh = cube();
        mesh.recalculate_bounds();
        let bounds = mesh.bounds.unwrap();
        assert_eq!(bounds.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3::new(1.0, 1.0, 1.0));

        let mut empty = GeneratedMesh::new();
        empty.recalculate_bounds();
        assert_eq!(empty.bounds, None);
    }

    #[test]
    fn compaction_keeps_the_quads() {
        let rect = UvRect::new([0.0, 0.0], [1.0, 1.0]);
        let mut mesh = GeneratedMesh::new();
        // Two coplanar top faces share an edge.
        mesh.add_face(&Face::new(Point3::new(0, 0, 0), BlockSide::TOP, &rect, 1.0));
        mesh.add_face(&Face::new(Point3::new(1, 0, 0), BlockSide::TOP, &rect, 1.0));
        mesh.recalculate_normals();
        let before = mesh.quad_keys();

        mesh.compact();

        assert!(mesh.vertices.len() <= 8);
        assert_eq!(mesh.uvs.len(), mesh.vertices.len());
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        assert_eq!(mesh.quad_keys(), before);
    }

    #[test]
    fn byte_views_match_buffer_sizes() {
        let mesh = cube();
        assert_eq!(mesh.vertex_bytes().len(), 24 * 12);
        assert_eq!(mesh.index_bytes().len(), 36 * 4);
    }
}
