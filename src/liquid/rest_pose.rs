use bevy::math::Vec3;

use super::mesh::VertexMesh;

/// Unperturbed vertex positions the liquid returns to after interaction
#[derive(Debug, Clone, PartialEq)]
pub struct RestPose {
    positions: Vec<Vec3>,
}

impl RestPose {
    /// Capture the rest pose from a freshly loaded mesh.
    ///
    /// The vertical component is scaled by `shrink` on both the live buffer
    /// and the captured pose, pulling the liquid surface just inside the glass.
    pub fn capture(mesh: &mut impl VertexMesh, shrink: f32) -> Self {
        let positions: Vec<Vec3> = (0..mesh.vertex_count())
            .map(|i| {
                let p = mesh.position(i);
                Vec3::new(p.x, p.y * shrink, p.z)
            })
            .collect();

        for (i, p) in positions.iter().enumerate() {
            mesh.set_position(i, *p);
        }
        mesh.mark_positions_dirty();
        mesh.recompute_normals();

        RestPose { positions }
    }

    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        RestPose { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Largest per-coordinate distance between the mesh and this pose
    pub fn max_offset(&self, mesh: &impl VertexMesh) -> f32 {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, rest)| (mesh.position(i) - *rest).abs().max_element())
            .fold(0.0, f32::max)
    }
}
