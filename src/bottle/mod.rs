pub mod materials;
pub mod parts;
pub mod scene;

use bevy::prelude::*;

use scene::setup_scene;

pub struct BottlePlugin;

impl Plugin for BottlePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}
