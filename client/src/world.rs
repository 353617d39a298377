use bevy::{
    asset::RenderAssetUsages,
    mesh::{Indices, PrimitiveTopology},
    platform::collections::{HashMap, HashSet},
    prelude::*,
};
use holefall_sim::{
    GameConfig, GameSession, MaterialKind, MeshAsset, MeshBuffers, MeshHandle, ObjectId, Tuning,
};

use crate::convert;

const CONFIG_PATH: &str = "holefall.toml";

/// The one simulation session driven by this app.
#[derive(Resource)]
pub struct Session(pub GameSession);

/// Ties a simulation object id to the bevy entity drawing it.
#[derive(Resource, Default)]
pub struct ObjectEntityMapping(HashMap<ObjectId, Entity>);

/// Uploaded meshes, keyed by the session's mesh handle.
#[derive(Resource, Default)]
struct MeshCache(HashMap<MeshHandle, Handle<Mesh>>);

#[derive(Resource)]
struct SceneMaterials {
    ball: Handle<StandardMaterial>,
    platform: Handle<StandardMaterial>,
    obstacle: Handle<StandardMaterial>,
    laser: Handle<StandardMaterial>,
}

impl SceneMaterials {
    fn get(&self, kind: MaterialKind) -> Handle<StandardMaterial> {
        match kind {
            MaterialKind::Ball => self.ball.clone(),
            MaterialKind::Platform => self.platform.clone(),
            MaterialKind::Obstacle => self.obstacle.clone(),
            MaterialKind::Laser => self.laser.clone(),
        }
    }
}

#[derive(Component, Debug)]
pub struct SimObject(pub ObjectId);

pub(super) fn plugin(app: &mut App) {
    match GameConfig::load_or_default(CONFIG_PATH).and_then(GameSession::new) {
        Ok(session) => {
            app.insert_resource(Session(session));
        }
        Err(e) => {
            error!("could not start session: {e}");
            app.add_systems(Startup, exit_on_startup_error);
            return;
        }
    }

    app.init_resource::<ObjectEntityMapping>();
    app.init_resource::<MeshCache>();
    app.add_systems(Startup, (setup_materials, spawn_lights));
    app.add_systems(
        Update,
        (tick_session, mirror_objects, update_laser_material).chain(),
    );
}

pub fn session_ready(session: Option<Res<Session>>) -> bool {
    session.is_some()
}

fn exit_on_startup_error(mut exit: MessageWriter<AppExit>) {
    exit.write(AppExit::error());
}

fn laser_material(tuning: &Tuning) -> StandardMaterial {
    let [r, g, b] = tuning.laser_color;
    let color = Color::srgb(r, g, b);
    StandardMaterial {
        base_color: color,
        emissive: LinearRgba::from(color) * tuning.laser_emissive,
        perceptual_roughness: tuning.laser_roughness,
        specular_transmission: tuning.laser_transmission,
        ior: tuning.laser_ior,
        thickness: tuning.laser_thickness,
        ..default()
    }
}

fn setup_materials(
    mut commands: Commands,
    mut materials: ResMut<Assets<StandardMaterial>>,
    session: Res<Session>,
) {
    commands.insert_resource(SceneMaterials {
        ball: materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.9, 0.8),
            perceptual_roughness: 0.3,
            ..default()
        }),
        platform: materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.3, 0.25),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        }),
        obstacle: materials.add(Color::srgb_u8(124, 144, 255)),
        laser: materials.add(laser_material(session.0.tuning())),
    });
}

fn spawn_lights(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 1_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

pub fn tick_session(mut session: ResMut<Session>, time: Res<Time>) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    session.0.tick(now_ms);
}

fn indexed_mesh(buffers: &MeshBuffers) -> Mesh {
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, buffers.positions_flat())
    .with_inserted_indices(Indices::U32(buffers.indices_flat()))
    // Flat shading needs per-face vertices.
    .with_duplicated_vertices()
    .with_computed_flat_normals()
}

fn upload_mesh(asset: &MeshAsset) -> Mesh {
    match asset {
        MeshAsset::Sphere { radius } => Sphere::new(*radius).mesh().uv(32, 18),
        MeshAsset::Cuboid { half_extents } => {
            Cuboid::from_size(convert::vec3(half_extents) * 2.0).into()
        }
        MeshAsset::Indexed(buffers) => indexed_mesh(buffers),
    }
}

/// Spawn bevy entities for new objects, copy transforms, and hide what the frame leaves out.
fn mirror_objects(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mesh_cache: ResMut<MeshCache>,
    mut mapping: ResMut<ObjectEntityMapping>,
    materials: Res<SceneMaterials>,
    session: Res<Session>,
    mut objects_q: Query<(&mut Transform, &mut Visibility), With<SimObject>>,
) {
    let frame = session.0.frame();
    let mut shown = HashSet::with_capacity(frame.objects.len());

    for object in &frame.objects {
        shown.insert(object.id);
        let transform = convert::transform(&object.transform);

        if let Some(&entity) = mapping.0.get(&object.id) {
            if let Ok((mut tf, _)) = objects_q.get_mut(entity) {
                *tf = transform;
            }
            continue;
        }

        let Some(mesh) = mesh_cache.0.get(&object.mesh).cloned().or_else(|| {
            let asset = frame.meshes.get(object.mesh)?;
            let handle = meshes.add(upload_mesh(asset));
            mesh_cache.0.insert(object.mesh, handle.clone());
            Some(handle)
        }) else {
            warn!("object {:?} references unknown mesh {:?}", object.id, object.mesh);
            continue;
        };

        let entity = commands
            .spawn((
                SimObject(object.id),
                Mesh3d(mesh),
                MeshMaterial3d(materials.get(object.material)),
                transform,
                Visibility::Inherited,
            ))
            .id();
        mapping.0.insert(object.id, entity);
    }

    for (id, &entity) in &mapping.0 {
        if let Ok((_, mut visibility)) = objects_q.get_mut(entity) {
            let wanted = if shown.contains(id) {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
            visibility.set_if_neq(wanted);
        }
    }
}

/// Push laser knob edits into its material.
fn update_laser_material(
    session: Res<Session>,
    scene_materials: Res<SceneMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut applied: Local<Option<Tuning>>,
) {
    let tuning = session.0.tuning();
    if applied.as_ref() == Some(tuning) {
        return;
    }
    if let Some(material) = materials.get_mut(&scene_materials.laser) {
        *material = laser_material(tuning);
    }
    *applied = Some(tuning.clone());
}
