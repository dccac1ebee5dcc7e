use bevy::prelude::*;

use super::{
    mesh::MeshBuffer,
    session::{LiquidSession, PhaseKind, PointerInteraction},
};
use crate::input::{PointerEvent, PointerEventType};

/// System: Feed pointer presses and releases to every liquid session
pub fn route_pointer_events(
    mut pointer_events: MessageReader<PointerEvent>,
    mut sessions: Query<(&mut LiquidSession, &Mesh3d)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for event in pointer_events.read() {
        let interaction = match event.event_type {
            PointerEventType::Down => PointerInteraction::Started,
            PointerEventType::Up | PointerEventType::Leave => PointerInteraction::Ended,
            PointerEventType::Move => continue,
        };

        for (mut session, mesh3d) in &mut sessions {
            let before = session.phase();
            let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
                continue;
            };
            let result = MeshBuffer::new(&mut *mesh)
                .and_then(|buffer| session.handle(interaction, &buffer));

            match result {
                Ok(after) if after != before => debug!("liquid {:?} -> {:?}", before, after),
                Ok(_) => {}
                Err(e) => error!("liquid input ignored: {}", e),
            }
        }
    }
}

/// System: Advance every non-idle liquid session by one frame
pub fn animate_liquid(
    mut sessions: Query<(&mut LiquidSession, &Mesh3d)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (mut session, mesh3d) in &mut sessions {
        // Skip idle sessions so their mesh isn't flagged as changed
        let before = session.phase();
        if before == PhaseKind::Idle {
            continue;
        }
        let Some(mesh) = meshes.get_mut(&mesh3d.0) else {
            continue;
        };

        let result = MeshBuffer::new(&mut *mesh).and_then(|mut buffer| session.tick(&mut buffer));
        match result {
            Ok(PhaseKind::Idle) if before == PhaseKind::Relaxing => {
                info!("Liquid back at rest");
            }
            Ok(_) => {}
            Err(e) => error!("liquid animation stopped: {}", e),
        }
    }
}
