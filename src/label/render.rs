use bevy::asset::RenderAssetUsages;
use bevy::camera::RenderTarget;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::ui::UiTargetCamera;

use super::{curve::curve_around_cylinder, text::LabelText};
use crate::liquid::{LiquidError, MeshBuffer};

/// Offscreen texture the label text is drawn into
const TEXTURE_SIZE: UVec2 = UVec2::new(1024, 256);

/// World-space size of the label surface, same aspect as the texture
const LABEL_SIZE: Vec2 = Vec2::new(0.14, 0.035);

const LABEL_RADIUS: f32 = 0.045;
const LABEL_POSITION: Vec3 = Vec3::new(0.0, 0.214, 0.045);
const LABEL_SUBDIVISIONS: u32 = 48;

/// Glyph height in texture pixels
const GLYPH_SIZE: f32 = 120.0;

/// The UI text drawn into the label texture
#[derive(Component)]
pub struct LabelGlyphs;

/// The curved plane on the bottle
#[derive(Component)]
pub struct LabelSurface;

fn label_image() -> Image {
    let size = Extent3d {
        width: TEXTURE_SIZE.x,
        height: TEXTURE_SIZE.y,
        ..default()
    };
    let mut image = Image::new_fill(
        size,
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT;
    image
}

/// Subdivided plane facing +Z, bent around the bottle
pub fn label_mesh(size: Vec2, radius: f32, subdivisions: u32) -> Result<Mesh, LiquidError> {
    let mut mesh = Mesh::from(Plane3d::new(Vec3::Z, size * 0.5).mesh().subdivisions(subdivisions));
    curve_around_cylinder(&mut MeshBuffer::new(&mut mesh)?, radius);
    Ok(mesh)
}

/// System: Texture camera, its UI text, and the curved surface showing it
pub fn setup_label(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    label: Res<LabelText>,
) {
    let image = images.add(label_image());

    let texture_camera = commands
        .spawn((
            Camera2d,
            Camera {
                target: RenderTarget::Image(image.clone().into()),
                order: -1,
                clear_color: ClearColorConfig::Custom(Color::NONE),
                ..default()
            },
        ))
        .id();

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            UiTargetCamera(texture_camera),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(label.text()),
                TextFont {
                    font_size: GLYPH_SIZE,
                    ..default()
                },
                TextColor(Color::BLACK),
                LabelGlyphs,
            ));
        });

    let mesh = match label_mesh(LABEL_SIZE, LABEL_RADIUS, LABEL_SUBDIVISIONS) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!("Label surface unavailable: {}", e);
            return;
        }
    };

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(image),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            cull_mode: None,
            ..default()
        })),
        Transform::from_translation(LABEL_POSITION),
        LabelSurface,
    ));

    info!("Label ready: {:?}", label.text());
}

/// System: Redraw the label text after edits
pub fn sync_label(label: Res<LabelText>, mut glyphs: Query<&mut Text, With<LabelGlyphs>>) {
    for mut text in &mut glyphs {
        if text.0 != label.text() {
            text.0 = label.text().to_string();
        }
    }
}
