//! CPU skinning of strand meshes against simulation snapshots
//!
//! Resolves template vertices to world-space vertex arrays ready for
//! GPU upload: plain line vertices from the position buffer, or ribbon
//! quads displaced along the basis normal for oriented geometry.

use bytemuck::{Pod, Zeroable};
use filament_simulation::Grid;
use glam::{Quat, Vec3};

use crate::mesh::StrandMesh;

/// Skinned vertex for line rendering.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    /// Normalized filament coordinate, for per-strand shading variation.
    pub filament_u: f32,
}

/// Skinned vertex for ribbon rendering.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct RibbonVertex {
    pub position: [f32; 3],
    /// -1 or +1: which edge of the ribbon this vertex sits on.
    pub side: f32,
    pub normal: [f32; 3],
    pub filament_u: f32,
}

fn grid_sample(positions: &Grid<Vec3>, u: f32, v: f32) -> (u32, u32) {
    let filament = ((u * positions.filament_count() as f32).round() as u32)
        .min(positions.filament_count() - 1);
    let segment = ((v * positions.segment_count() as f32).round() as u32)
        .min(positions.segment_count() - 1);
    (filament, segment)
}

/// Resolve each template vertex to its simulated position.
pub fn skin_lines(mesh: &StrandMesh, positions: &Grid<Vec3>) -> Vec<LineVertex> {
    mesh.vertices
        .iter()
        .map(|vertex| {
            let (filament, segment) = grid_sample(positions, vertex.u, vertex.v);
            LineVertex {
                position: positions.get(filament, segment).to_array(),
                filament_u: vertex.u,
            }
        })
        .collect()
}

/// Build ribbon geometry directly from simulation snapshots: two
/// vertices per segment offset along the basis normal, with a
/// triangle-list index buffer joining consecutive segments.
pub fn skin_ribbons(
    positions: &Grid<Vec3>,
    bases: &Grid<Quat>,
    half_width: f32,
) -> (Vec<RibbonVertex>, Vec<u32>) {
    let filament_count = positions.filament_count();
    let segment_count = positions.segment_count();

    let mut vertices = Vec::with_capacity((filament_count * segment_count * 2) as usize);
    let mut indices = Vec::with_capacity((filament_count * (segment_count - 1) * 6) as usize);

    for filament in 0..filament_count {
        let filament_u = filament as f32 / filament_count as f32;
        let base = vertices.len() as u32;

        for segment in 0..segment_count {
            let p = positions.get(filament, segment);
            let basis = bases.get(filament, segment);
            let normal = basis * Vec3::X;
            let offset = basis * Vec3::Z * half_width;

            for side in [-1.0f32, 1.0] {
                vertices.push(RibbonVertex {
                    position: (p + offset * side).to_array(),
                    side,
                    normal: normal.to_array(),
                    filament_u,
                });
            }
        }

        for segment in 0..segment_count - 1 {
            let row = base + segment * 2;
            indices.extend_from_slice(&[row, row + 1, row + 2, row + 2, row + 1, row + 3]);
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::strand_mesh;
    use glam::Quat;

    fn positions(filament_count: u32, segment_count: u32) -> Grid<Vec3> {
        let mut grid = Grid::new(filament_count, segment_count, Vec3::ZERO);
        for f in 0..filament_count {
            for s in 0..segment_count {
                grid.set(f, s, Vec3::new(f as f32, s as f32, 0.0));
            }
        }
        grid
    }

    #[test]
    fn test_skin_lines_maps_grid_samples() {
        let grid = positions(4, 8);
        let mesh = strand_mesh(4, 8);
        let vertices = skin_lines(&mesh, &grid);

        assert_eq!(vertices.len(), 32);
        // Vertex (filament 2, segment 3) lands at grid sample (2, 3).
        let v = vertices[2 * 8 + 3];
        assert_eq!(v.position, [2.0, 3.0, 0.0]);
        assert_eq!(v.filament_u, 0.5);
    }

    #[test]
    fn test_skin_ribbons_counts_and_offsets() {
        let grid = positions(2, 4);
        let bases = Grid::new(2, 4, Quat::IDENTITY);
        let (vertices, indices) = skin_ribbons(&grid, &bases, 0.1);

        assert_eq!(vertices.len(), 2 * 4 * 2);
        assert_eq!(indices.len(), 2 * 3 * 6);

        // Identity basis: ribbon edges offset along Z, normal along X.
        assert_eq!(vertices[0].position, [0.0, 0.0, -0.1]);
        assert_eq!(vertices[1].position, [0.0, 0.0, 0.1]);
        assert_eq!(vertices[0].normal, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_ribbon_indices_in_range() {
        let grid = positions(3, 5);
        let bases = Grid::new(3, 5, Quat::IDENTITY);
        let (vertices, indices) = skin_ribbons(&grid, &bases, 0.05);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }
}
