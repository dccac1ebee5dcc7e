use bevy::math::Affine3A;
use bevy::mesh::VertexAttributeValues;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use super::{
    materials::apply_part_materials,
    parts::{BottlePart, BottleParts, PartHandle, SceneError},
};
use crate::{
    config::LiquidConfig,
    liquid::{LiquidSession, MeshBuffer},
};

const BOTTLE_SCENE: &str = "bottle_without_neck.glb";

/// Warm off-white backdrop
const BACKGROUND: Color = Color::srgb(0xfc as f32 / 255.0, 0xf6 as f32 / 255.0, 0xdf as f32 / 255.0);

/// Illuminance of the main shadow-casting light
const KEY_LIGHT_LUX: f32 = 4000.0;

/// Marker for the bottle's scene root
#[derive(Component)]
pub struct Bottle;

/// Axis-aligned bounds accumulated point by point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Bounds { min: first, max: first }, |b, p| b.include(p)))
    }

    pub fn include(self, point: Vec3) -> Self {
        Bounds {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn union(self, other: Bounds) -> Self {
        self.include(other.min).include(other.max)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// System: Lights, background and the bottle scene
pub fn setup_scene(mut commands: Commands, asset_server: Res<AssetServer>) {
    // Ambient light lives on the camera
    commands.insert_resource(ClearColor(BACKGROUND));

    // Soft fill from straight above
    commands.spawn((
        DirectionalLight {
            illuminance: KEY_LIGHT_LUX * 0.7,
            ..default()
        },
        Transform::from_xyz(0.0, 100.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: KEY_LIGHT_LUX,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-205.0, 45.0, 235.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(BOTTLE_SCENE));
    commands
        .spawn((SceneRoot(scene), Transform::default(), Bottle))
        .observe(on_bottle_ready);

    info!("Loading bottle scene {}", BOTTLE_SCENE);
}

/// Transform of `entity` relative to `root`, composed from local transforms
fn affine_to_root(
    entity: Entity,
    root: Entity,
    parents: &Query<&ChildOf>,
    transforms: &Query<&Transform>,
) -> Affine3A {
    let mut affine = Affine3A::IDENTITY;
    let mut current = entity;
    while current != root {
        if let Ok(transform) = transforms.get(current) {
            affine = transform.compute_affine() * affine;
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.parent(),
            Err(_) => break,
        }
    }
    affine
}

/// The bottle part an entity belongs to, from its own name or an ancestor's
fn part_of(
    entity: Entity,
    root: Entity,
    parents: &Query<&ChildOf>,
    names: &Query<&Name>,
) -> Option<BottlePart> {
    let mut current = entity;
    loop {
        if let Some(part) = names
            .get(current)
            .ok()
            .and_then(|name| BottlePart::from_node_name(name.as_str()))
        {
            return Some(part);
        }
        if current == root {
            return None;
        }
        current = parents.get(current).ok()?.parent();
    }
}

fn mesh_bounds(mesh: &Mesh, affine: Affine3A) -> Option<Bounds> {
    match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(positions)) => Bounds::from_points(
            positions
                .iter()
                .map(|p| affine.transform_point3(Vec3::from_array(*p))),
        ),
        _ => None,
    }
}

/// Observer: Resolve the bottle's parts once its scene instance has spawned
#[allow(clippy::too_many_arguments)]
fn on_bottle_ready(
    ready: On<SceneInstanceReady>,
    mut commands: Commands,
    children: Query<&Children>,
    parents: Query<&ChildOf>,
    names: Query<&Name>,
    transforms: Query<&Transform>,
    mesh_entities: Query<(&Mesh3d, &MeshMaterial3d<StandardMaterial>)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<LiquidConfig>,
) {
    let root = ready.entity;

    let mut candidates = Vec::new();
    let mut bounds: Option<Bounds> = None;

    for entity in children.iter_descendants(root) {
        let Ok((mesh3d, material)) = mesh_entities.get(entity) else {
            continue;
        };

        if let Some(mesh) = meshes.get(&mesh3d.0) {
            let affine = affine_to_root(entity, root, &parents, &transforms);
            if let Some(b) = mesh_bounds(mesh, affine) {
                bounds = Some(bounds.map_or(b, |acc| acc.union(b)));
            }
        }

        if let Some(part) = part_of(entity, root, &parents, &names) {
            candidates.push((
                part,
                PartHandle {
                    entity,
                    mesh: mesh3d.0.clone(),
                    material: material.0.clone(),
                },
            ));
        }
    }

    if let Some(bounds) = bounds {
        let center = bounds.center();
        commands
            .entity(root)
            .insert(Transform::from_translation(-center));
        info!("Bottle centered (offset {:?})", -center);
    }

    let parts = match BottleParts::resolve(candidates) {
        Ok(parts) => parts,
        Err(e) => {
            error!("Bottle scene unusable: {}", e);
            return;
        }
    };

    apply_part_materials(&parts, &mut materials);

    match start_liquid_session(&parts, &mut meshes, &config) {
        Ok(session) => {
            info!(
                "Liquid session ready ({} vertices)",
                session.rest_pose().len()
            );
            commands.entity(parts.liquid.entity).insert(session);
        }
        Err(e) => error!("Liquid animation disabled: {}", e),
    }

    info!("Bottle parts resolved");
    commands.insert_resource(parts);
}

fn start_liquid_session(
    parts: &BottleParts,
    meshes: &mut Assets<Mesh>,
    config: &LiquidConfig,
) -> Result<LiquidSession, SceneError> {
    let Some(mesh) = meshes.get_mut(&parts.liquid.mesh) else {
        return Err(SceneError::MissingMesh(BottlePart::Liquid));
    };
    let mut buffer = MeshBuffer::new(&mut *mesh)?;
    Ok(LiquidSession::capture(&mut buffer, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_center() {
        let bounds = Bounds::from_points([
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, 4.0, -2.0),
            Vec3::new(0.0, 1.0, 0.0),
        ])
        .unwrap();

        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 4.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_bounds_union_and_empty() {
        assert!(Bounds::from_points(std::iter::empty()).is_none());

        let a = Bounds::from_points([Vec3::ZERO]).unwrap();
        let b = Bounds::from_points([Vec3::ONE * 2.0]).unwrap();
        assert_eq!(a.union(b).center(), Vec3::ONE);
    }

    #[test]
    fn test_affine_to_root_composes_parents() {
        let mut world = World::new();
        let root = world.spawn(Transform::from_xyz(100.0, 0.0, 0.0)).id();
        let node = world
            .spawn((Transform::from_xyz(0.0, 1.0, 0.0), ChildOf(root)))
            .id();
        let leaf = world
            .spawn((Transform::from_scale(Vec3::splat(2.0)), ChildOf(node)))
            .id();

        let mut state: bevy::ecs::system::SystemState<(Query<&ChildOf>, Query<&Transform>)> =
            bevy::ecs::system::SystemState::new(&mut world);
        let (parents, transforms) = state.get(&world);

        let affine = affine_to_root(leaf, root, &parents, &transforms);
        // Root transform is excluded: it is the one being recentered
        assert_eq!(affine.transform_point3(Vec3::X), Vec3::new(2.0, 1.0, 0.0));
    }
}
