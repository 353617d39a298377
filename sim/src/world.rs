//! Rapier-backed physics world stepped at a fixed cadence.
//!
//! The world is the single source of truth for all dynamics. Everything else
//! reads poses out of it; nothing writes poses back.
//!
//! Stepping policy
//! - The very first `step` of a session advances exactly one fixed step,
//!   whatever interval is passed in.
//! - Later calls add the interval to an accumulator and run fixed steps until it
//!   is drained, capped at `max_sub_steps` per call. Time beyond the cap is
//!   dropped (modulo one step) so a long stall cannot snowball.
//! - Torques registered with [`World::apply_torque`] act for exactly one fixed step.

use std::collections::{HashMap, HashSet};

use rapier3d::prelude::*;

use crate::body::{BodyDef, BodyKind, collider_from_def, rigid_body_from_def};
use crate::config::PhysicsConfig;
use crate::error::SimError;
use crate::geometry::{Quat, Vec3};

/// Slack when comparing accumulated time against the fixed step.
const ACCUMULATOR_EPS: f64 = 1.0e-9;

/// Opaque handle to a body registered in a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

impl BodyHandle {
    fn raw(self) -> (u32, u32) {
        self.0.into_raw_parts()
    }
}

/// Unordered pair of bodies, stored smallest handle first.
fn body_pair(a: BodyHandle, b: BodyHandle) -> (BodyHandle, BodyHandle) {
    if a.raw() <= b.raw() { (a, b) } else { (b, a) }
}

pub struct World {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,

    fixed_time_step: f32,
    max_sub_steps: u32,
    accumulator: f64,
    started: bool,
    steps_taken: u64,

    /// Torques waiting for the next fixed step.
    pending_torques: HashMap<BodyHandle, Vector<Real>>,
    /// Every body pair that has had an active contact since the last clear.
    contacts: HashSet<(BodyHandle, BodyHandle)>,
}

impl World {
    pub fn new(config: &PhysicsConfig) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: config.fixed_time_step,
            ..IntegrationParameters::default()
        };

        Self {
            gravity: vector![0.0, -config.gravity, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            fixed_time_step: config.fixed_time_step,
            max_sub_steps: config.max_sub_steps.max(1),
            accumulator: 0.0,
            started: false,
            steps_taken: 0,
            pending_torques: HashMap::new(),
            contacts: HashSet::new(),
        }
    }

    /// Register a body. Static bodies only collide; dynamic bodies are integrated.
    pub fn add_body(&mut self, def: &BodyDef) -> Result<BodyHandle, SimError> {
        def.validate()?;
        let collider = collider_from_def(def)?;
        let rb_handle = self.bodies.insert(rigid_body_from_def(def));
        self.colliders
            .insert_with_parent(collider, rb_handle, &mut self.bodies);
        Ok(BodyHandle(rb_handle))
    }

    /// Queue a torque on a dynamic body for the next fixed step only.
    ///
    /// Non-finite torques are rejected and logged; the simulation is left untouched.
    pub fn apply_torque(&mut self, handle: BodyHandle, torque: Vec3) -> Result<(), SimError> {
        if !torque.iter().all(|v| v.is_finite()) {
            log::warn!("rejected non-finite torque {torque:?}");
            return Err(SimError::NonFinite("torque"));
        }
        let body = self.bodies.get(handle.0).ok_or(SimError::UnknownBody)?;
        if !body.is_dynamic() {
            return Ok(());
        }
        *self.pending_torques.entry(handle).or_insert_with(Vector::zeros) += torque;
        Ok(())
    }

    /// Advance the simulation, returning how many fixed steps ran.
    pub fn step(&mut self, target_interval_secs: f32) -> u32 {
        if !self.started {
            self.started = true;
            self.fixed_step();
            return 1;
        }

        if !target_interval_secs.is_finite() {
            log::warn!("ignored non-finite step interval {target_interval_secs}");
            return 0;
        }
        if target_interval_secs <= 0.0 {
            return 0;
        }

        let dt = f64::from(self.fixed_time_step);
        self.accumulator += f64::from(target_interval_secs);

        let mut substeps = 0;
        while self.accumulator + ACCUMULATOR_EPS >= dt && substeps < self.max_sub_steps {
            self.fixed_step();
            self.accumulator = (self.accumulator - dt).max(0.0);
            substeps += 1;
        }
        if substeps == self.max_sub_steps && self.accumulator >= dt {
            self.accumulator %= dt;
        }

        log::trace!("world step: {substeps} substeps, {:.5}s carried", self.accumulator);
        substeps
    }

    fn fixed_step(&mut self) {
        let torqued: Vec<BodyHandle> = self.pending_torques.keys().copied().collect();
        for (handle, torque) in self.pending_torques.drain() {
            if let Some(body) = self.bodies.get_mut(handle.0) {
                body.add_torque(torque, true);
            }
        }

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );

        // Rapier keeps user torques until reset; ours last one step.
        for handle in torqued {
            if let Some(body) = self.bodies.get_mut(handle.0) {
                body.reset_torques(false);
            }
        }

        self.steps_taken += 1;
        self.record_contacts();
    }

    fn record_contacts(&mut self) {
        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let parent = |h| self.colliders.get(h).and_then(|c| c.parent());
            if let (Some(a), Some(b)) = (parent(pair.collider1), parent(pair.collider2)) {
                self.contacts
                    .insert(body_pair(BodyHandle(a), BodyHandle(b)));
            }
        }
    }

    /// Have `a` and `b` touched since the last [`World::clear_contacts`]?
    pub fn has_contact(&self, a: BodyHandle, b: BodyHandle) -> bool {
        self.contacts.contains(&body_pair(a, b))
    }

    pub fn clear_contacts(&mut self) {
        self.contacts.clear();
    }

    /// World-space translation and rotation of a body.
    pub fn pose(&self, handle: BodyHandle) -> Option<(Vec3, Quat)> {
        self.bodies
            .get(handle.0)
            .map(|rb| (*rb.translation(), *rb.rotation()))
    }

    pub fn translation(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|rb| *rb.translation())
    }

    pub fn linvel(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|rb| *rb.linvel())
    }

    pub fn angvel(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|rb| *rb.angvel())
    }

    pub fn kind(&self, handle: BodyHandle) -> Option<BodyKind> {
        self.bodies.get(handle.0).map(|rb| {
            if rb.is_dynamic() {
                BodyKind::Dynamic
            } else {
                BodyKind::Static
            }
        })
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn fixed_time_step(&self) -> f32 {
        self.fixed_time_step
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Total simulated time in seconds.
    pub fn simulated_time(&self) -> f64 {
        self.steps_taken as f64 * f64::from(self.fixed_time_step)
    }
}
