//! Strand template mesh generation
//!
//! A strand mesh is a static piece of geometry whose vertices carry
//! normalized grid coordinates instead of positions: `u` selects the
//! filament, `v` the segment along it. A renderer (or the CPU skinner
//! in this crate) resolves each vertex against a simulation snapshot.

use bytemuck::{Pod, Zeroable};

/// One template vertex: normalized `(filament, segment)` coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StrandVertex {
    pub u: f32,
    pub v: f32,
}

/// Line-list template mesh covering a full filament grid.
#[derive(Clone, Debug)]
pub struct StrandMesh {
    pub vertices: Vec<StrandVertex>,
    pub indices: Vec<u32>,
    filament_count: u32,
    segment_count: u32,
}

impl StrandMesh {
    pub fn filament_count(&self) -> u32 {
        self.filament_count
    }

    pub fn segment_count(&self) -> u32 {
        self.segment_count
    }
}

/// Build the line-list template for a `filament_count x segment_count`
/// grid: one vertex per grid sample, one line per segment pair.
pub fn strand_mesh(filament_count: u32, segment_count: u32) -> StrandMesh {
    if filament_count == 0 || segment_count == 0 {
        return StrandMesh {
            vertices: Vec::new(),
            indices: Vec::new(),
            filament_count,
            segment_count,
        };
    }

    let mut vertices = Vec::with_capacity((filament_count * segment_count) as usize);
    let mut indices = Vec::with_capacity((filament_count * (segment_count - 1) * 2) as usize);

    for filament in 0..filament_count {
        let u = filament as f32 / filament_count as f32;

        for segment in 0..segment_count {
            let v = segment as f32 / segment_count as f32;
            vertices.push(StrandVertex { u, v });
        }

        for segment in 0..segment_count - 1 {
            let i = filament * segment_count + segment;
            indices.push(i);
            indices.push(i + 1);
        }
    }

    StrandMesh {
        vertices,
        indices,
        filament_count,
        segment_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_counts() {
        let mesh = strand_mesh(4, 8);
        assert_eq!(mesh.vertices.len(), 32);
        assert_eq!(mesh.indices.len(), 4 * 7 * 2);
    }

    #[test]
    fn test_degenerate_grid_yields_empty_mesh() {
        for (filaments, segments) in [(0, 8), (4, 0), (0, 0)] {
            let mesh = strand_mesh(filaments, segments);
            assert!(mesh.vertices.is_empty());
            assert!(mesh.indices.is_empty());
        }
    }

    #[test]
    fn test_vertices_are_normalized_grid_coords() {
        let mesh = strand_mesh(2, 4);
        assert_eq!(mesh.vertices[0], StrandVertex { u: 0.0, v: 0.0 });
        assert_eq!(mesh.vertices[1], StrandVertex { u: 0.0, v: 0.25 });
        assert_eq!(mesh.vertices[4], StrandVertex { u: 0.5, v: 0.0 });
    }

    #[test]
    fn test_lines_stay_within_one_filament() {
        let mesh = strand_mesh(3, 5);
        for pair in mesh.indices.chunks(2) {
            assert_eq!(pair[1], pair[0] + 1);
            assert_eq!(pair[0] / 5, pair[1] / 5);
        }
    }
}
