use bevy::{
    camera::Exposure,
    core_pipeline::tonemapping::Tonemapping,
    post_process::bloom::{Bloom, BloomPrefilter},
    prelude::*,
    window::WindowResized,
};
use holefall_sim::{Tuning, Viewport};

use crate::{
    convert,
    world::{Session, session_ready, tick_session},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera.run_if(session_ready));
    app.add_systems(
        Update,
        (on_window_resized, follow_ball.after(tick_session)).run_if(session_ready),
    );
}

fn add_camera(mut commands: Commands, session: Res<Session>) {
    let pose = session.0.camera();
    commands.spawn((
        Exposure {
            ev100: session.0.tuning().exposure,
        },
        Tonemapping::AcesFitted,
        bloom(session.0.tuning()),
        Camera3d::default(),
        AmbientLight {
            brightness: 200.0,
            ..default()
        },
        Transform::from_translation(convert::point3(&pose.eye))
            .looking_at(convert::point3(&pose.target), Vec3::Y),
    ));
}

/// Bloom settings for the current knobs.
fn bloom(tuning: &Tuning) -> Bloom {
    Bloom {
        intensity: tuning.bloom_strength,
        high_pass_frequency: tuning.bloom_radius.clamp(0.0, 1.0),
        prefilter: BloomPrefilter {
            threshold: tuning.bloom_threshold,
            threshold_softness: 0.5,
        },
        ..Bloom::NATURAL
    }
}

/// Copy the session's camera pose verbatim; the session already tracks the ball.
fn follow_ball(
    mut camera_q: Query<(&mut Transform, &mut Exposure, &mut Bloom), With<Camera3d>>,
    session: Res<Session>,
) {
    let Ok((mut cam_tf, mut exposure, mut glow)) = camera_q.single_mut() else {
        return;
    };

    let pose = session.0.camera();
    *cam_tf = Transform::from_translation(convert::point3(&pose.eye))
        .looking_at(convert::point3(&pose.target), Vec3::Y);

    let tuning = session.0.tuning();
    if exposure.ev100 != tuning.exposure {
        exposure.ev100 = tuning.exposure;
    }

    let wanted = bloom(tuning);
    if glow.intensity != wanted.intensity
        || glow.high_pass_frequency != wanted.high_pass_frequency
        || glow.prefilter.threshold != wanted.prefilter.threshold
    {
        *glow = wanted;
    }
}

fn on_window_resized(mut msgs: MessageReader<WindowResized>, mut session: ResMut<Session>) {
    for msg in msgs.read() {
        let viewport = Viewport {
            width: msg.width.max(0.0) as u32,
            height: msg.height.max(0.0) as u32,
        };
        session.0.resize(viewport);
        debug!(
            "viewport resized to {}x{} (aspect {:.3})",
            viewport.width,
            viewport.height,
            viewport.aspect()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bloom_follows_tuning_knobs() {
        let tuning = Tuning {
            bloom_strength: 0.7,
            bloom_threshold: 1.2,
            bloom_radius: 0.4,
            ..Tuning::default()
        };
        let b = bloom(&tuning);
        assert_eq!(b.intensity, 0.7);
        assert_eq!(b.prefilter.threshold, 1.2);
        assert_eq!(b.high_pass_frequency, 0.4);
    }

    #[test]
    fn zero_strength_turns_bloom_off() {
        let tuning = Tuning {
            bloom_strength: 0.0,
            ..Tuning::default()
        };
        assert_eq!(bloom(&tuning).intensity, 0.0);
    }
}
