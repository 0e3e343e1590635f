//! Filament grid templates baked from source meshes
//!
//! A template is read-only at simulation time: it fixes the grid
//! dimensions and carries one root sample (position + normal) per
//! filament, taken from the unique vertices of a source mesh.

use glam::Vec3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("foundation has no root samples")]
    EmptyFoundation,
    #[error("segment count must be at least 2, got {0}")]
    TooFewSegments(u32),
    #[error("foundation position/normal counts differ ({positions} vs {normals})")]
    MismatchedSamples { positions: usize, normals: usize },
}

/// Baked per-filament root samples.
#[derive(Clone, Debug)]
pub struct Foundation {
    roots: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl Foundation {
    /// Build a foundation from explicit root samples.
    pub fn new(roots: Vec<Vec3>, normals: Vec<Vec3>) -> Result<Self, TemplateError> {
        if roots.len() != normals.len() {
            return Err(TemplateError::MismatchedSamples {
                positions: roots.len(),
                normals: normals.len(),
            });
        }
        if roots.is_empty() {
            return Err(TemplateError::EmptyFoundation);
        }
        Ok(Self { roots, normals })
    }

    /// Bake a foundation from a source mesh's vertex/normal arrays.
    ///
    /// Duplicate positions (seams, split normals) collapse to the first
    /// occurrence so each surface point grows exactly one filament.
    pub fn bake(vertices: &[Vec3], normals: &[Vec3]) -> Result<Self, TemplateError> {
        if vertices.len() != normals.len() {
            return Err(TemplateError::MismatchedSamples {
                positions: vertices.len(),
                normals: normals.len(),
            });
        }

        let mut roots = Vec::new();
        let mut out_normals = Vec::new();
        for (v, n) in vertices.iter().zip(normals) {
            if !roots.contains(v) {
                roots.push(*v);
                out_normals.push(*n);
            }
        }
        Self::new(roots, out_normals)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Root position of one filament, in anchor-local space.
    pub fn root(&self, filament: u32) -> Vec3 {
        self.roots[filament as usize]
    }

    /// Root normal of one filament (initial growth direction).
    pub fn normal(&self, filament: u32) -> Vec3 {
        self.normals[filament as usize]
    }
}

/// Immutable description of a filament grid.
#[derive(Clone, Debug)]
pub struct Template {
    foundation: Foundation,
    segment_count: u32,
}

impl Template {
    pub fn new(foundation: Foundation, segment_count: u32) -> Result<Self, TemplateError> {
        if segment_count < 2 {
            return Err(TemplateError::TooFewSegments(segment_count));
        }
        Ok(Self {
            foundation,
            segment_count,
        })
    }

    pub fn foundation(&self) -> &Foundation {
        &self.foundation
    }

    pub fn filament_count(&self) -> u32 {
        self.foundation.len() as u32
    }

    pub fn segment_count(&self) -> u32 {
        self.segment_count
    }
}
