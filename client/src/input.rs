use bevy::prelude::*;
use holefall_sim::Key;
use leafwing_input_manager::prelude::*;

use crate::world::{Session, session_ready};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Back,
    Left,
    Right,
    NextPlatform,
    ToggleObstacles,
}

impl InputAction {
    const ALL: [InputAction; 6] = [
        InputAction::Forward,
        InputAction::Back,
        InputAction::Left,
        InputAction::Right,
        InputAction::NextPlatform,
        InputAction::ToggleObstacles,
    ];

    fn key(self) -> Key {
        match self {
            InputAction::Forward => Key::Forward,
            InputAction::Back => Key::Back,
            InputAction::Left => Key::Left,
            InputAction::Right => Key::Right,
            InputAction::NextPlatform => Key::NextPlatform,
            InputAction::ToggleObstacles => Key::ToggleObstacles,
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::Forward, KeyCode::ArrowUp);
    input_map.insert(InputAction::Forward, KeyCode::KeyW);
    input_map.insert(InputAction::Back, KeyCode::ArrowDown);
    input_map.insert(InputAction::Back, KeyCode::KeyS);
    input_map.insert(InputAction::Left, KeyCode::ArrowLeft);
    input_map.insert(InputAction::Left, KeyCode::KeyA);
    input_map.insert(InputAction::Right, KeyCode::ArrowRight);
    input_map.insert(InputAction::Right, KeyCode::KeyD);
    input_map.insert(InputAction::NextPlatform, KeyCode::KeyN);
    input_map.insert(InputAction::ToggleObstacles, KeyCode::KeyO);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());

    app.add_systems(
        Update,
        forward_keys
            .run_if(session_ready)
            .before(crate::world::tick_session),
    );
}

/// Hand key transitions to the session, which owns the held-key state.
fn forward_keys(action_state: Res<ActionState<InputAction>>, mut session: ResMut<Session>) {
    for action in InputAction::ALL {
        if action_state.just_pressed(&action) {
            session.0.key_down(action.key());
        }
        if action_state.just_released(&action) {
            session.0.key_up(action.key());
        }
    }
}
