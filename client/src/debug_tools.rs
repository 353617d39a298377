//! Debug/performance tooling for native dev builds.
//!
//! Besides the perf overlay this exposes the live tuning knobs on the keyboard:
//! `[`/`]` ball speed, `-`/`=` camera tilt, `,`/`.` exposure, `;`/`'` bloom strength.

use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use iyes_perf_ui::prelude::*;

use crate::world::{Session, session_ready};

const BALL_SPEED_STEP: f32 = 0.5;
const CAMERA_TILT_STEP: f32 = 0.05;
const EXPOSURE_STEP: f32 = 0.5;
const BLOOM_STEP: f32 = 0.05;

/// Add debug/perf tooling (intended for `dev_native` builds only).
pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(Update, adjust_knobs.run_if(session_ready));
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn step(keys: &ButtonInput<KeyCode>, down: KeyCode, up: KeyCode, amount: f32) -> f32 {
    let mut delta = 0.0;
    if keys.just_pressed(down) {
        delta -= amount;
    }
    if keys.just_pressed(up) {
        delta += amount;
    }
    delta
}

fn adjust_knobs(keys: Res<ButtonInput<KeyCode>>, mut session: ResMut<Session>) {
    let speed = step(&keys, KeyCode::BracketLeft, KeyCode::BracketRight, BALL_SPEED_STEP);
    let tilt = step(&keys, KeyCode::Minus, KeyCode::Equal, CAMERA_TILT_STEP);
    let exposure = step(&keys, KeyCode::Comma, KeyCode::Period, EXPOSURE_STEP);
    let bloom = step(&keys, KeyCode::Semicolon, KeyCode::Quote, BLOOM_STEP);
    if speed == 0.0 && tilt == 0.0 && exposure == 0.0 && bloom == 0.0 {
        return;
    }

    let tuning = session.0.tuning_mut();
    tuning.ball_speed = (tuning.ball_speed + speed).max(0.0);
    tuning.camera_tilt = (tuning.camera_tilt + tilt).clamp(0.0, std::f32::consts::FRAC_PI_2);
    tuning.exposure += exposure;
    tuning.bloom_strength = (tuning.bloom_strength + bloom).max(0.0);
    info!(
        "tuning: ball_speed {:.2}, camera_tilt {:.2}, exposure {:.1}, bloom {:.2}",
        tuning.ball_speed, tuning.camera_tilt, tuning.exposure, tuning.bloom_strength
    );
}
