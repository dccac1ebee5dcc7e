use bevy::prelude::Component;

use super::{
    LiquidError,
    mesh::VertexMesh,
    relax::{RelaxStatus, Relaxation},
    rest_pose::RestPose,
    wave::apply_wave,
};
use crate::config::{LiquidConfig, RelaxSettings, WaveParams};

/// Edge-triggered pointer input, as seen by the liquid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerInteraction {
    Started,
    Ended,
}

/// Which animator currently owns the live vertex buffer
#[derive(Debug, Clone)]
pub enum LiquidPhase {
    Idle,
    Displacing,
    Relaxing(Relaxation),
}

/// Payload-free view of [`LiquidPhase`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Idle,
    Displacing,
    Relaxing,
}

impl LiquidPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            LiquidPhase::Idle => PhaseKind::Idle,
            LiquidPhase::Displacing => PhaseKind::Displacing,
            LiquidPhase::Relaxing(_) => PhaseKind::Relaxing,
        }
    }
}

/// What a pointer input does in a given phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    StartDisplacing,
    BeginRelaxing,
}

/// Transition table for pointer inputs. Convergence is handled by `tick`.
pub fn transition(phase: PhaseKind, input: PointerInteraction) -> Transition {
    match (phase, input) {
        (PhaseKind::Idle, PointerInteraction::Started) => Transition::StartDisplacing,
        (PhaseKind::Relaxing, PointerInteraction::Started) => Transition::StartDisplacing,
        (PhaseKind::Displacing, PointerInteraction::Started) => Transition::Stay,
        (PhaseKind::Idle, PointerInteraction::Ended) => Transition::BeginRelaxing,
        (PhaseKind::Displacing, PointerInteraction::Ended) => Transition::BeginRelaxing,
        (PhaseKind::Relaxing, PointerInteraction::Ended) => Transition::Stay,
    }
}

/// Animation state of one liquid mesh, created when the mesh is loaded
#[derive(Component, Debug, Clone)]
pub struct LiquidSession {
    rest: RestPose,
    phase: LiquidPhase,
    elapsed: f32,
    wave: WaveParams,
    relax: RelaxSettings,
}

impl LiquidSession {
    /// Capture the rest pose from `mesh` and start idle
    pub fn capture(mesh: &mut impl VertexMesh, config: &LiquidConfig) -> Self {
        let rest = RestPose::capture(mesh, config.rest_shrink);
        Self::new(rest, config)
    }

    pub fn new(rest: RestPose, config: &LiquidConfig) -> Self {
        LiquidSession {
            rest,
            phase: LiquidPhase::Idle,
            elapsed: 0.0,
            wave: config.wave,
            relax: config.relax,
        }
    }

    pub fn rest_pose(&self) -> &RestPose {
        &self.rest
    }

    pub fn phase(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Apply a pointer input. Beginning a relaxation measures its delta from
    /// the mesh as it is now.
    pub fn handle(
        &mut self,
        input: PointerInteraction,
        mesh: &impl VertexMesh,
    ) -> Result<PhaseKind, LiquidError> {
        match transition(self.phase.kind(), input) {
            Transition::Stay => {}
            Transition::StartDisplacing => self.phase = LiquidPhase::Displacing,
            Transition::BeginRelaxing => self.begin_reset(mesh)?,
        }
        Ok(self.phase.kind())
    }

    /// Start relaxing toward the rest pose. Ignored while a relaxation runs.
    pub fn begin_reset(&mut self, mesh: &impl VertexMesh) -> Result<(), LiquidError> {
        if matches!(self.phase, LiquidPhase::Relaxing(_)) {
            return Ok(());
        }
        self.check_len(mesh)?;

        self.phase = LiquidPhase::Relaxing(Relaxation::begin(mesh, &self.rest, &self.relax));
        Ok(())
    }

    /// Per-frame update. Returns the phase after the frame.
    pub fn tick(&mut self, mesh: &mut impl VertexMesh) -> Result<PhaseKind, LiquidError> {
        if matches!(self.phase, LiquidPhase::Idle) {
            return Ok(PhaseKind::Idle);
        }
        if let Err(e) = self.check_len(mesh) {
            self.phase = LiquidPhase::Idle;
            return Err(e);
        }

        let finished = match &mut self.phase {
            LiquidPhase::Idle => false,
            LiquidPhase::Displacing => {
                self.elapsed += self.wave.time_step;
                apply_wave(mesh, &self.rest, &self.wave, self.elapsed);
                false
            }
            LiquidPhase::Relaxing(relaxation) => {
                relaxation.step(mesh, &self.rest) != RelaxStatus::Running
            }
        };

        if finished {
            self.phase = LiquidPhase::Idle;
        }
        Ok(self.phase.kind())
    }

    fn check_len(&self, mesh: &impl VertexMesh) -> Result<(), LiquidError> {
        if mesh.vertex_count() != self.rest.len() {
            return Err(LiquidError::VertexCountMismatch {
                expected: self.rest.len(),
                actual: mesh.vertex_count(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquid::mesh::testing::TestMesh;
    use bevy::math::Vec3;

    fn bottle_liquid() -> TestMesh {
        // Rim ring above the threshold plus a few body vertices below it
        let mut positions = Vec::new();
        for i in 0..16 {
            let angle = i as f32 / 16.0 * std::f32::consts::TAU;
            positions.push(Vec3::new(angle.cos() * 0.04, 0.18, angle.sin() * 0.04));
            positions.push(Vec3::new(angle.cos() * 0.04, 0.02, angle.sin() * 0.04));
        }
        TestMesh::new(positions)
    }

    #[test]
    fn test_transition_table() {
        use PhaseKind::*;
        use PointerInteraction::*;

        assert_eq!(transition(Idle, Started), Transition::StartDisplacing);
        assert_eq!(transition(Displacing, Started), Transition::Stay);
        assert_eq!(transition(Displacing, Ended), Transition::BeginRelaxing);
        assert_eq!(transition(Relaxing, Ended), Transition::Stay);
        assert_eq!(transition(Relaxing, Started), Transition::StartDisplacing);
        assert_eq!(transition(Idle, Ended), Transition::BeginRelaxing);
    }

    #[test]
    fn test_idle_tick_leaves_mesh_alone() {
        let mut mesh = bottle_liquid();
        let mut session = LiquidSession::capture(&mut mesh, &LiquidConfig::default());
        let before = mesh.clone();

        assert_eq!(session.tick(&mut mesh).unwrap(), PhaseKind::Idle);
        assert_eq!(mesh.positions, before.positions);
        assert_eq!(mesh.normal_recomputes, before.normal_recomputes);
    }

    #[test]
    fn test_displacing_advances_time_and_moves_rim() {
        let config = LiquidConfig::default();
        let mut mesh = bottle_liquid();
        let mut session = LiquidSession::capture(&mut mesh, &config);

        session.handle(PointerInteraction::Started, &mesh).unwrap();
        assert_eq!(session.phase(), PhaseKind::Displacing);

        session.tick(&mut mesh).unwrap();
        session.tick(&mut mesh).unwrap();

        assert!((session.elapsed() - 2.0 * config.wave.time_step).abs() < 1e-6);
        let moved = (0..mesh.positions.len())
            .filter(|&i| mesh.positions[i] != session.rest_pose().get(i))
            .count();
        assert!(moved > 0);
    }

    #[test]
    fn test_second_reset_while_relaxing_is_noop() {
        let mut mesh = bottle_liquid();
        let mut session = LiquidSession::capture(&mut mesh, &LiquidConfig::default());

        session.handle(PointerInteraction::Started, &mesh).unwrap();
        for _ in 0..5 {
            session.tick(&mut mesh).unwrap();
        }
        session.handle(PointerInteraction::Ended, &mesh).unwrap();
        session.tick(&mut mesh).unwrap();

        let mut reference_mesh = mesh.clone();
        let mut reference = session.clone();

        // A reset request mid-relaxation must not restart the delta schedule
        session.begin_reset(&mesh).unwrap();
        assert_eq!(mesh.positions, reference_mesh.positions);
        session.handle(PointerInteraction::Ended, &mesh).unwrap();
        assert_eq!(mesh.positions, reference_mesh.positions);

        session.tick(&mut mesh).unwrap();
        reference.tick(&mut reference_mesh).unwrap();
        assert_eq!(mesh.positions, reference_mesh.positions);
    }

    #[test]
    fn test_wave_then_relax_returns_to_rest() {
        let mut mesh = bottle_liquid();
        let config = LiquidConfig::default();
        let mut session = LiquidSession::capture(&mut mesh, &config);

        session.handle(PointerInteraction::Started, &mesh).unwrap();
        for _ in 0..40 {
            session.tick(&mut mesh).unwrap();
        }
        session.handle(PointerInteraction::Ended, &mesh).unwrap();

        let mut frames = 0;
        while session.tick(&mut mesh).unwrap() == PhaseKind::Relaxing {
            frames += 1;
            assert!(frames < config.relax.max_steps);
        }

        assert_eq!(session.phase(), PhaseKind::Idle);
        for (live, rest) in mesh.positions.iter().zip(session.rest_pose().positions()) {
            assert!((*live - *rest).abs().max_element() < config.relax.epsilon);
        }
    }

    #[test]
    fn test_press_during_relaxation_supersedes_it() {
        let mut mesh = bottle_liquid();
        let mut session = LiquidSession::capture(&mut mesh, &LiquidConfig::default());

        session.handle(PointerInteraction::Started, &mesh).unwrap();
        session.tick(&mut mesh).unwrap();
        session.handle(PointerInteraction::Ended, &mesh).unwrap();
        assert_eq!(session.phase(), PhaseKind::Relaxing);

        session.handle(PointerInteraction::Started, &mesh).unwrap();
        assert_eq!(session.phase(), PhaseKind::Displacing);
    }

    #[test]
    fn test_vertex_count_mismatch_is_reported() {
        let mut mesh = bottle_liquid();
        let mut session = LiquidSession::capture(&mut mesh, &LiquidConfig::default());
        session.handle(PointerInteraction::Started, &mesh).unwrap();

        mesh.positions.pop();

        assert_eq!(
            session.tick(&mut mesh),
            Err(LiquidError::VertexCountMismatch {
                expected: 32,
                actual: 31
            })
        );
        assert_eq!(session.phase(), PhaseKind::Idle);
    }
}
