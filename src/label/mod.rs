//! Editable brand label wrapped around the bottle

pub mod curve;
pub mod render;
pub mod text;

use bevy::prelude::*;

use text::LabelText;

pub struct LabelPlugin;

impl Plugin for LabelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LabelText>()
            .add_systems(Startup, (render::setup_label, text::spawn_error_text))
            .add_systems(
                Update,
                (
                    text::edit_label,
                    (render::sync_label, text::report_label)
                        .run_if(resource_changed::<LabelText>),
                )
                    .chain(),
            );
    }
}
