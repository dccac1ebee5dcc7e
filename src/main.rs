use bevy::prelude::*;

mod bottle;
mod camera;
mod config;
mod input;
mod label;
mod liquid;

use bevy::window::WindowResolution;
use bottle::BottlePlugin;
use camera::CameraPlugin;
use config::LiquidConfig;
use input::InputPlugin;
use label::LabelPlugin;
use liquid::LiquidPlugin;

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Bottle Viz".into(),
            resolution: WindowResolution::new(1280, 720),
            resizable: true,
            #[cfg(target_arch = "wasm32")]
            fit_canvas_to_parent: true,
            ..default()
        }),
        ..default()
    }));

    let config = LiquidConfig::load().unwrap_or_else(|e| {
        warn!("Liquid config rejected ({}), using defaults", e);
        LiquidConfig::default()
    });

    app.insert_resource(config)
        .add_plugins(CameraPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(BottlePlugin)
        .add_plugins(LiquidPlugin)
        .add_plugins(LabelPlugin);

    app.run();
}
