//! Fixed-step filament simulation coordinator
//!
//! Owns the double-buffered grids and drives the physics kernels:
//! clamped sub-stepping with anchor-pose interpolation, reset + warm-up
//! on (re)initialization, and read-only snapshots for renderers.

use filament_physics::{kernels, AnchorPose, SimConfig, Template};
use glam::{Quat, Vec3};

use crate::state::{DoubleBuffered, Grid};

/// Hard upper bound on sub-steps per advance. Prevents runaway cost on
/// large frame-time spikes (e.g. resuming after a pause).
pub const MAX_SUBSTEPS: u32 = 100;

/// Simulated time integrated right after a reset so the first visible
/// frame shows a settled configuration instead of a snap from rest.
pub const WARMUP_TIME: f32 = 0.4;

/// Number of integration sub-steps for an elapsed time, in `[1, 100]`.
///
/// A non-positive `max_time_step` degenerates to the clamp ceiling.
pub fn substep_count(dt: f32, max_time_step: f32) -> u32 {
    if max_time_step <= 0.0 {
        return MAX_SUBSTEPS;
    }
    let steps = (dt / max_time_step).ceil();
    if !steps.is_finite() {
        return MAX_SUBSTEPS;
    }
    (steps as u32).clamp(1, MAX_SUBSTEPS)
}

struct SimState {
    position: DoubleBuffered<Vec3>,
    velocity: DoubleBuffered<Vec3>,
    basis: DoubleBuffered<Quat>,
}

impl SimState {
    fn allocate(filament_count: u32, segment_count: u32) -> Self {
        Self {
            position: DoubleBuffered::new(filament_count, segment_count, Vec3::ZERO),
            velocity: DoubleBuffered::new(filament_count, segment_count, Vec3::ZERO),
            basis: DoubleBuffered::new(filament_count, segment_count, Quat::IDENTITY),
        }
    }

    fn filament_count(&self) -> u32 {
        self.position.current().filament_count()
    }

    fn segment_count(&self) -> u32 {
        self.position.current().segment_count()
    }
}

/// Seed all buffers with a physically valid rest configuration.
fn reset(template: &Template, config: &SimConfig, state: &mut SimState, anchor: &AnchorPose) {
    let foundation = template.foundation();
    let segment_count = template.segment_count();

    for filament in 0..template.filament_count() {
        let rest = kernels::segment_rest_length(config, segment_count, filament);
        let root = foundation.root(filament);
        let normal = foundation.normal(filament);
        for segment in 0..segment_count {
            state.position.current_mut().set(
                filament,
                segment,
                kernels::reset_position(anchor, root, normal, rest, segment),
            );
            state
                .velocity
                .current_mut()
                .set(filament, segment, kernels::reset_velocity());
            state
                .basis
                .current_mut()
                .set(filament, segment, kernels::reset_basis(anchor, normal));
        }
    }
}

/// One integration sub-step: rewrite the scratch buffers from current,
/// then swap. Filaments are independent; segments run root to tip so
/// each spring anchors against its parent's already-updated position.
fn sub_step(
    template: &Template,
    config: &SimConfig,
    state: &mut SimState,
    anchor: &AnchorPose,
    dt: f32,
) {
    let filament_count = template.filament_count();
    let segment_count = template.segment_count();
    let foundation = template.foundation();

    {
        let (pos_cur, pos_next) = state.position.split_mut();
        let (vel_cur, vel_next) = state.velocity.split_mut();

        for filament in 0..filament_count {
            let rest = kernels::segment_rest_length(config, segment_count, filament);

            // Root is kinematic: pinned to the anchor, never integrated.
            pos_next.set(
                filament,
                0,
                kernels::root_position(anchor, foundation.root(filament)),
            );
            vel_next.set(filament, 0, kernels::reset_velocity());

            for segment in 1..segment_count {
                let parent = pos_next.get(filament, segment - 1);
                let velocity = kernels::integrate_velocity(
                    pos_cur.get(filament, segment),
                    vel_cur.get(filament, segment),
                    parent,
                    rest,
                    config,
                    dt,
                );
                vel_next.set(filament, segment, velocity);
                pos_next.set(
                    filament,
                    segment,
                    kernels::integrate_position(pos_cur.get(filament, segment), velocity, dt),
                );
            }
        }
    }
    state.position.swap();
    state.velocity.swap();

    // Basis pass reads the new positions and the previous frame's basis.
    {
        let positions = state.position.current();
        let (basis_cur, basis_next) = state.basis.split_mut();
        let up = anchor.up();

        for filament in 0..filament_count {
            for segment in 0..segment_count {
                let p = positions.get(filament, segment);
                let neighbor = if segment + 1 < segment_count {
                    positions.get(filament, segment + 1)
                } else {
                    // Tip: continue the last segment's direction.
                    2.0 * p - positions.get(filament, segment - 1)
                };
                basis_next.set(
                    filament,
                    segment,
                    kernels::compute_basis(basis_cur.get(filament, segment), p, neighbor, up),
                );
            }
        }
    }
    state.basis.swap();
}

/// Deterministic fixed-step simulator for a grid of filaments.
///
/// Not ready until a template is bound; `advance` is a no-op before
/// that. Binding a template (re)allocates all state and runs a warm-up,
/// so stale buffers from previous dimensions can never leak through.
pub struct FilamentSimulation {
    config: SimConfig,
    template: Option<Template>,
    state: Option<SimState>,
    prev_anchor: AnchorPose,
    needs_reset: bool,
    last_substeps: u32,
}

impl FilamentSimulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            template: None,
            state: None,
            prev_anchor: AnchorPose::IDENTITY,
            needs_reset: true,
            last_substeps: 0,
        }
    }

    /// Create, bind a template, and run reset + warm-up immediately.
    pub fn with_template(template: Template, config: SimConfig, anchor: AnchorPose) -> Self {
        let mut sim = Self::new(config);
        sim.set_template(template);
        sim.ensure_ready(&anchor);
        sim
    }

    /// Bind or replace the template. State is fully discarded and
    /// reallocated on the next advance; dimensions may have changed.
    pub fn set_template(&mut self, template: Template) {
        self.template = Some(template);
        self.needs_reset = true;
    }

    /// Replace the tuning parameters. Applies from the next sub-step
    /// without reallocating state.
    pub fn set_config(&mut self, config: SimConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.template.is_some() && self.state.is_some() && !self.needs_reset
    }

    /// Snapshot of the current position buffer, if state exists.
    pub fn positions(&self) -> Option<&Grid<Vec3>> {
        self.state.as_ref().map(|s| s.position.current())
    }

    /// Snapshot of the current velocity buffer, if state exists.
    pub fn velocities(&self) -> Option<&Grid<Vec3>> {
        self.state.as_ref().map(|s| s.velocity.current())
    }

    /// Snapshot of the current basis buffer, if state exists.
    pub fn bases(&self) -> Option<&Grid<Quat>> {
        self.state.as_ref().map(|s| s.basis.current())
    }

    /// Sub-steps performed by the most recent `advance` call.
    pub fn last_substep_count(&self) -> u32 {
        self.last_substeps
    }

    /// Total kinetic energy of the current state (unit segment mass).
    pub fn kinetic_energy(&self) -> f32 {
        match &self.state {
            Some(state) => state
                .velocity
                .current()
                .as_slice()
                .iter()
                .map(|v| 0.5 * v.length_squared())
                .sum(),
            None => 0.0,
        }
    }

    /// Integrate the system forward by `dt` seconds toward the anchor's
    /// new pose. The elapsed time is split into at most [`MAX_SUBSTEPS`]
    /// sub-steps, and the anchor pose is interpolated across them so a
    /// fast-moving anchor never pulls springs toward a stale target.
    ///
    /// No-op while no template is bound.
    pub fn advance(&mut self, dt: f32, anchor: AnchorPose) {
        if !self.ensure_ready(&anchor) {
            return;
        }
        self.last_substeps = self.simulate(dt.max(0.0), anchor);
    }

    /// Allocate + reset + warm up if the template changed (or was just
    /// bound). Returns false while no template is available.
    fn ensure_ready(&mut self, anchor: &AnchorPose) -> bool {
        let Some(template) = self.template.as_ref() else {
            return false;
        };

        let dims_changed = match &self.state {
            Some(state) => {
                state.filament_count() != template.filament_count()
                    || state.segment_count() != template.segment_count()
            }
            None => true,
        };

        if self.needs_reset || dims_changed {
            log::info!(
                "Resetting filament state: {} filaments x {} segments",
                template.filament_count(),
                template.segment_count()
            );
            let mut state =
                SimState::allocate(template.filament_count(), template.segment_count());
            reset(template, &self.config, &mut state, anchor);
            self.state = Some(state);
            self.prev_anchor = *anchor;
            self.needs_reset = false;

            self.simulate(WARMUP_TIME, *anchor);
        }
        true
    }

    fn simulate(&mut self, dt: f32, anchor: AnchorPose) -> u32 {
        let (Some(template), Some(state)) = (self.template.as_ref(), self.state.as_mut()) else {
            return 0;
        };

        let steps = substep_count(dt, self.config.max_time_step);
        let sub_dt = dt / steps as f32;

        for i in 0..steps {
            let p = i as f32 / steps as f32;
            let pose = AnchorPose::lerp(&self.prev_anchor, &anchor, p);
            sub_step(template, &self.config, state, &pose, sub_dt);
        }

        self.prev_anchor = anchor;
        steps
    }
}
