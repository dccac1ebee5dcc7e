use bevy::math::Vec3;

use super::{mesh::VertexMesh, rest_pose::RestPose};
use crate::config::RelaxSettings;

/// Outcome of a single relaxation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelaxStatus {
    /// Still away from rest; step again next frame
    Running,
    /// Every coordinate came within epsilon; mesh snapped to rest
    Converged,
    /// Hit the step bound without converging; mesh snapped to rest
    Exhausted,
}

/// Damped return of the liquid to its rest pose.
///
/// The per-vertex delta is measured once, when the relaxation begins. Each
/// step applies the delta scaled by a gain that shrinks by `1 - speed`, so the
/// remaining offset after `n` steps is `(1 - speed)^n` of the starting offset.
#[derive(Debug, Clone)]
pub struct Relaxation {
    delta: Vec<Vec3>,
    gain: f32,
    decay: f32,
    epsilon: f32,
    max_steps: u32,
    steps: u32,
}

impl Relaxation {
    pub fn begin(mesh: &impl VertexMesh, rest: &RestPose, settings: &RelaxSettings) -> Self {
        debug_assert_eq!(mesh.vertex_count(), rest.len());

        let delta = rest
            .positions()
            .iter()
            .enumerate()
            .map(|(i, target)| (*target - mesh.position(i)) * settings.speed)
            .collect();

        Relaxation {
            delta,
            gain: 1.0,
            decay: 1.0 - settings.speed,
            epsilon: settings.epsilon,
            max_steps: settings.max_steps,
            steps: 0,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn step(&mut self, mesh: &mut impl VertexMesh, rest: &RestPose) -> RelaxStatus {
        self.steps += 1;

        let mut converged = true;
        for (i, delta) in self.delta.iter().enumerate() {
            let p = mesh.position(i) + *delta * self.gain;
            mesh.set_position(i, p);

            if converged && (p - rest.get(i)).abs().max_element() >= self.epsilon {
                converged = false;
            }
        }
        self.gain *= self.decay;

        let status = if converged {
            RelaxStatus::Converged
        } else if self.steps >= self.max_steps {
            RelaxStatus::Exhausted
        } else {
            RelaxStatus::Running
        };

        if status != RelaxStatus::Running {
            for (i, target) in rest.positions().iter().enumerate() {
                mesh.set_position(i, *target);
            }
        }

        mesh.mark_positions_dirty();
        mesh.recompute_normals();

        match status {
            RelaxStatus::Converged => log::debug!("liquid relaxed in {} steps", self.steps),
            RelaxStatus::Exhausted => log::warn!(
                "liquid relaxation gave up after {} steps; snapping to rest",
                self.steps
            ),
            RelaxStatus::Running => {}
        }

        status
    }
}
