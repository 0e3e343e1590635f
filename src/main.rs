//! Filament simulation demo
//!
//! Headless driver: bakes a procedural scalp foundation, runs the
//! fixed-step solver against a swinging anchor, and logs convergence
//! statistics plus the skinned geometry a renderer would consume.

use filament_physics::{AnchorPose, Foundation, SimConfig, Template, TemplateError};
use filament_render::{skin_lines, skin_ribbons, strand_mesh};
use filament_simulation::FilamentSimulation;
use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};

const SCALP_SAMPLES: usize = 64;
const SCALP_RADIUS: f32 = 0.12;
const SEGMENT_COUNT: u32 = 32;
const FRAME_DT: f32 = 1.0 / 60.0;
const FRAME_COUNT: u32 = 600;

/// Sample root points on the upper hemisphere of a sphere, with the
/// radial direction as the growth normal.
fn build_scalp() -> Result<Template, TemplateError> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    let mut vertices = Vec::with_capacity(SCALP_SAMPLES);
    let mut normals = Vec::with_capacity(SCALP_SAMPLES);

    for _ in 0..SCALP_SAMPLES {
        let theta = rng.random::<f32>() * std::f32::consts::TAU;
        let cos_phi = rng.random::<f32>() * 0.8 + 0.2;
        let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();

        let normal = Vec3::new(
            sin_phi * theta.cos(),
            cos_phi,
            sin_phi * theta.sin(),
        );
        vertices.push(normal * SCALP_RADIUS);
        normals.push(normal);
    }

    let foundation = Foundation::bake(&vertices, &normals)?;
    Template::new(foundation, SEGMENT_COUNT)
}

fn anchor_at(time: f32) -> AnchorPose {
    AnchorPose::new(
        Vec3::new((time * 1.3).sin() * 0.4, 1.6, (time * 0.9).cos() * 0.2),
        Quat::from_rotation_z(0.25 * (time * 1.7).sin()),
    )
}

fn mean_spacing(sim: &FilamentSimulation) -> f32 {
    let Some(positions) = sim.positions() else {
        return 0.0;
    };
    let mut total = 0.0;
    let mut count = 0u32;
    for filament in 0..positions.filament_count() {
        for segment in 1..positions.segment_count() {
            total += (positions.get(filament, segment) - positions.get(filament, segment - 1))
                .length();
            count += 1;
        }
    }
    total / count as f32
}

fn main() -> Result<(), TemplateError> {
    env_logger::init();

    let template = build_scalp()?;
    log::info!(
        "Scalp baked: {} filaments x {} segments",
        template.filament_count(),
        template.segment_count()
    );

    let config = SimConfig::default();
    let nominal = config.length / SEGMENT_COUNT as f32;
    let mesh = strand_mesh(template.filament_count(), template.segment_count());

    let mut sim = FilamentSimulation::with_template(template, config, anchor_at(0.0));

    let mut time = 0.0f32;
    for frame in 0..FRAME_COUNT {
        time += FRAME_DT;
        sim.advance(FRAME_DT, anchor_at(time));

        if (frame + 1) % 60 == 0 {
            log::info!(
                "t={:5.2}s  substeps={}  spacing={:.4} (nominal {:.4})  kinetic={:.5}",
                time,
                sim.last_substep_count(),
                mean_spacing(&sim),
                nominal,
                sim.kinetic_energy()
            );
        }
    }

    // What a renderer would upload each frame.
    let positions = sim.positions().expect("simulation was initialized");
    let bases = sim.bases().expect("simulation was initialized");
    let lines = skin_lines(&mesh, positions);
    let (ribbons, ribbon_indices) = skin_ribbons(positions, bases, 0.004);
    log::info!(
        "Skinned {} line vertices, {} ribbon vertices / {} indices",
        lines.len(),
        ribbons.len(),
        ribbon_indices.len()
    );

    Ok(())
}
