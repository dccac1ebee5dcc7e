use bevy::math::Vec3;

use super::{mesh::VertexMesh, rest_pose::RestPose};
use crate::config::WaveParams;

/// Height of a displaced rim vertex at horizontal position `x`
pub fn wave_height(rest_y: f32, x: f32, elapsed: f32, params: &WaveParams) -> f32 {
    rest_y + ((x + elapsed * params.frequency) * params.shape).sin() * params.amplitude
}

/// Run one displacement pass over the liquid's top rim.
///
/// Vertices whose rest height exceeds `params.threshold` get their height
/// recomputed from the rest pose; everything else is left as is. Normals are
/// recomputed every pass.
pub fn apply_wave(
    mesh: &mut impl VertexMesh,
    rest: &RestPose,
    params: &WaveParams,
    elapsed: f32,
) {
    debug_assert_eq!(mesh.vertex_count(), rest.len());

    let mut displaced = 0usize;
    for (i, rest_position) in rest.positions().iter().enumerate() {
        if rest_position.y <= params.threshold {
            continue;
        }

        let current = mesh.position(i);
        let y = wave_height(rest_position.y, current.x, elapsed, params);
        mesh.set_position(i, Vec3::new(current.x, y, current.z));
        displaced += 1;
    }

    mesh.mark_positions_dirty();
    mesh.recompute_normals();

    log::trace!("wave pass at t={:.2} displaced {} vertices", elapsed, displaced);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquid::mesh::testing::TestMesh;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_positions(rng: &mut StdRng, count: usize) -> Vec<Vec3> {
        (0..count)
            .map(|_| {
                Vec3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-0.5..0.5),
                    rng.random_range(-1.0..1.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_vertices_at_or_below_threshold_untouched() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let positions = random_positions(&mut rng, 64);
            let rest = RestPose::from_positions(positions.clone());
            let mut mesh = TestMesh::new(positions.clone());
            let params = WaveParams {
                amplitude: rng.random_range(0.0..0.2),
                frequency: rng.random_range(0.0..3.0),
                ..WaveParams::default()
            };

            apply_wave(&mut mesh, &rest, &params, rng.random_range(0.0..50.0));

            for (before, after) in positions.iter().zip(&mesh.positions) {
                if before.y <= params.threshold {
                    assert_eq!(before, after);
                } else {
                    assert_eq!(before.x, after.x);
                    assert_eq!(before.z, after.z);
                }
            }
        }
    }

    #[test]
    fn test_rim_vertex_follows_closed_form() {
        let params = WaveParams {
            amplitude: 0.01,
            frequency: 0.5,
            threshold: 0.1,
            ..WaveParams::default()
        };
        let x = 0.3;
        let rest = RestPose::from_positions(vec![Vec3::new(x, 0.2, 0.0)]);
        let mut mesh = TestMesh::new(rest.positions().to_vec());

        apply_wave(&mut mesh, &rest, &params, 0.0);

        let expected = 0.2 + (x * params.shape).sin() * 0.01;
        assert!((mesh.positions[0].y - expected).abs() < 1e-6);
    }

    #[test]
    fn test_height_is_recomputed_from_rest_not_accumulated() {
        let params = WaveParams::default();
        let rest = RestPose::from_positions(vec![Vec3::new(0.4, 0.5, 0.0)]);
        let mut mesh = TestMesh::new(rest.positions().to_vec());

        for _ in 0..10 {
            apply_wave(&mut mesh, &rest, &params, 2.0);
        }

        let expected = wave_height(0.5, 0.4, 2.0, &params);
        assert!((mesh.positions[0].y - expected).abs() < 1e-6);
    }

    #[test]
    fn test_zero_amplitude_still_recomputes_normals() {
        let params = WaveParams {
            amplitude: 0.0,
            frequency: 0.0,
            ..WaveParams::default()
        };
        let rest = RestPose::from_positions(vec![Vec3::new(0.0, 1.0, 0.0)]);
        let mut mesh = TestMesh::new(rest.positions().to_vec());

        apply_wave(&mut mesh, &rest, &params, 3.0);

        assert_eq!(mesh.positions[0], Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(mesh.dirty_marks, 1);
        assert_eq!(mesh.normal_recomputes, 1);
    }
}
