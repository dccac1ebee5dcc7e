//! Procedural liquid animation: a travelling wave on the top rim while the
//! pointer is held, and a damped return to the rest pose once it's released.

pub mod error;
pub mod mesh;
pub mod relax;
pub mod rest_pose;
pub mod session;
pub mod systems;
pub mod wave;

use bevy::prelude::*;

pub use error::LiquidError;
pub use mesh::{MeshBuffer, VertexMesh};
pub use session::{LiquidSession, PhaseKind};
pub use systems::{animate_liquid, route_pointer_events};

pub struct LiquidPlugin;

impl Plugin for LiquidPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (route_pointer_events, animate_liquid).chain());
    }
}
