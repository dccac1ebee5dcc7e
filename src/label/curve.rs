use bevy::math::Vec3;

use crate::liquid::VertexMesh;

/// Wrap a flat mesh in the XY plane around a vertical cylinder.
///
/// `x` becomes arc length on a cylinder of `radius` whose front touches
/// `z = 0`; depth bends back by `cos(x/r)·r − r`.
pub fn curve_around_cylinder(mesh: &mut impl VertexMesh, radius: f32) {
    if radius <= 0.0 {
        log::warn!("Ignoring cylinder curve with radius {}", radius);
        return;
    }

    for i in 0..mesh.vertex_count() {
        let p = mesh.position(i);
        mesh.set_position(i, curve_point(p, radius));
    }
    mesh.mark_positions_dirty();
    mesh.recompute_normals();

    log::debug!(
        "Curved {} vertices around radius {}",
        mesh.vertex_count(),
        radius
    );
}

fn curve_point(p: Vec3, radius: f32) -> Vec3 {
    let (sin, cos) = (p.x / radius).sin_cos();
    Vec3::new(sin * radius, p.y, p.z + cos * radius - radius)
}
