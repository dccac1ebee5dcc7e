use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved};

pub struct InputPlugin;
impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CursorPos>()
            .add_message::<PointerEvent>()
            .add_systems(
                PreUpdate,
                (track_cursor_pos, collect_pointer_events)
                    .chain()
                    .after(bevy::input::InputSystems),
            );
    }
}

#[derive(Message, Debug, Clone)]
pub struct PointerEvent {
    /// Window (logical) coordinates
    pub position: Vec2,
    pub event_type: PointerEventType,
    /// 0 = mouse, >0 = touch id
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventType {
    Down,
    Move,
    Up,
    /// Pointer left the window or canvas
    Leave,
}

#[derive(Resource, Default, Debug, Clone, Copy)]
struct CursorPos(pub Option<Vec2>);

fn track_cursor_pos(mut ev_cursor: MessageReader<CursorMoved>, mut pos: ResMut<CursorPos>) {
    for e in ev_cursor.read() {
        // last event wins
        pos.0 = Some(e.position);
    }
}

fn collect_pointer_events(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut cursor: ResMut<CursorPos>,
    mut cursor_left: MessageReader<CursorLeft>,
    mut touch_events: MessageReader<TouchInput>,
    mut out: MessageWriter<PointerEvent>,
) {
    if let Some(p) = cursor.0 {
        if mouse_buttons.just_pressed(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Down,
                id: 0,
            });
        }
        if mouse_buttons.pressed(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Move,
                id: 0,
            });
        }
        if mouse_buttons.just_released(MouseButton::Left) {
            out.write(PointerEvent {
                position: p,
                event_type: PointerEventType::Up,
                id: 0,
            });
        }
    }

    if cursor_left.read().last().is_some() {
        out.write(PointerEvent {
            position: cursor.0.unwrap_or_default(),
            event_type: PointerEventType::Leave,
            id: 0,
        });
        // The next move after re-entering shouldn't look like a jump
        cursor.0 = None;
    }

    for ev in touch_events.read() {
        let event_type = match ev.phase {
            TouchPhase::Started => PointerEventType::Down,
            TouchPhase::Moved => PointerEventType::Move,
            TouchPhase::Ended => PointerEventType::Up,
            TouchPhase::Canceled => PointerEventType::Leave,
        };
        out.write(PointerEvent {
            position: ev.position,
            event_type,
            id: ev.id + 1,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::input::InputPlugin as BevyInputPlugin;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, BevyInputPlugin))
            .add_message::<CursorMoved>()
            .add_message::<CursorLeft>()
            .add_plugins(InputPlugin);
        app
    }

    fn drain(app: &mut App) -> Vec<PointerEventType> {
        app.world_mut()
            .resource_mut::<Messages<PointerEvent>>()
            .drain()
            .map(|e| e.event_type)
            .collect()
    }

    #[test]
    fn test_cursor_left_emits_leave() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<Messages<CursorLeft>>()
            .write(CursorLeft {
                window: Entity::PLACEHOLDER,
            });

        app.update();

        assert_eq!(drain(&mut app), vec![PointerEventType::Leave]);
    }

    #[test]
    fn test_no_mouse_events_without_cursor_position() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);

        app.update();

        assert!(drain(&mut app).is_empty());
    }
}
