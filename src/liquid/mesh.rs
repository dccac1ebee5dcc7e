use bevy::math::Vec3;
use bevy::mesh::{Mesh, PrimitiveTopology, VertexAttributeValues};

use crate::liquid::LiquidError;

/// Vertex access needed by the liquid animators.
///
/// Positions are addressed by vertex index; after a batch of writes the
/// animators call `mark_positions_dirty` and then `recompute_normals`.
pub trait VertexMesh {
    fn vertex_count(&self) -> usize;

    fn position(&self, index: usize) -> Vec3;

    fn set_position(&mut self, index: usize, position: Vec3);

    /// Signal that positions changed. Most backends track this themselves.
    fn mark_positions_dirty(&mut self) {}

    fn recompute_normals(&mut self);
}

/// Bevy [`Mesh`] viewed as a [`VertexMesh`].
///
/// Construction checks the mesh has `Float32x3` positions and triangle-list
/// topology, so normal recomputation can't panic later.
pub struct MeshBuffer<'a> {
    mesh: &'a mut Mesh,
}

impl<'a> MeshBuffer<'a> {
    pub fn new(mesh: &'a mut Mesh) -> Result<Self, LiquidError> {
        if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
            return Err(LiquidError::UnsupportedMesh("topology is not a triangle list"));
        }

        let problem = match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(_)) => None,
            Some(_) => Some("positions are not Float32x3"),
            None => Some("mesh has no position attribute"),
        };

        match problem {
            Some(reason) => Err(LiquidError::UnsupportedMesh(reason)),
            None => Ok(Self { mesh }),
        }
    }

    fn positions(&self) -> &[[f32; 3]] {
        match self.mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(positions)) => positions.as_slice(),
            _ => &[],
        }
    }
}

impl VertexMesh for MeshBuffer<'_> {
    fn vertex_count(&self) -> usize {
        self.positions().len()
    }

    fn position(&self, index: usize) -> Vec3 {
        Vec3::from_array(self.positions()[index])
    }

    fn set_position(&mut self, index: usize, position: Vec3) {
        if let Some(VertexAttributeValues::Float32x3(positions)) =
            self.mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
        {
            positions[index] = position.to_array();
        }
    }

    fn recompute_normals(&mut self) {
        // Indexed meshes get smooth normals, unindexed ones flat normals
        self.mesh.compute_normals();
    }
}
