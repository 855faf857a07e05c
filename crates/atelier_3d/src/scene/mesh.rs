//! Mesh geometry and renderable surfaces

use atelier_core::Color;
use glam::Vec3;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity of a geometry, used as the renderer's cache key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(u64);

/// Immutable triangle mesh data shared between scene nodes
///
/// Geometry is uploaded to the GPU once per id; nodes referencing the
/// same geometry share buffers and differ only in transform and
/// surface color.
#[derive(Clone, Debug)]
pub struct Geometry {
    id: GeometryId,
    /// Vertex positions in local space
    pub positions: Vec<Vec3>,
    /// Per-vertex normals, same length as `positions`
    pub normals: Vec<Vec3>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Create geometry from positions, normals and indices
    ///
    /// When `normals` is empty or its length does not match
    /// `positions`, flat normals are generated by accumulating face
    /// normals per vertex.
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let id = GeometryId(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed));
        let mut geometry = Self {
            id,
            positions,
            normals,
            indices,
        };
        if geometry.normals.len() != geometry.positions.len() {
            geometry.compute_flat_normals();
        }
        geometry
    }

    /// Renderer cache key
    pub fn id(&self) -> GeometryId {
        self.id
    }

    /// Triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn compute_flat_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            // The loader rejects out-of-range indices; skip rather
            // than panic if a caller hands them in anyway.
            let (Some(&p0), Some(&p1), Some(&p2)) = (
                self.positions.get(i0),
                self.positions.get(i1),
                self.positions.get(i2),
            ) else {
                continue;
            };
            let face = (p1 - p0).cross(p2 - p0);
            normals[i0] += face;
            normals[i1] += face;
            normals[i2] += face;
        }
        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }
        self.normals = normals;
    }
}

/// A renderable surface: shared geometry plus a per-node base color
///
/// The color is the one piece of state the model binder rewrites when
/// the configuration changes.
#[derive(Clone, Debug)]
pub struct Surface {
    /// Shared mesh data
    pub geometry: Arc<Geometry>,
    /// Base color fed to the shader
    pub color: Color,
}

impl Surface {
    /// Create a surface over shared geometry
    pub fn new(geometry: Arc<Geometry>, color: Color) -> Self {
        Self { geometry, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_ids_are_unique() {
        let a = Geometry::new(vec![Vec3::ZERO], vec![Vec3::Y], vec![]);
        let b = Geometry::new(vec![Vec3::ZERO], vec![Vec3::Y], vec![]);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn missing_normals_are_generated() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let geometry = Geometry::new(positions, Vec::new(), vec![0, 1, 2]);
        assert_eq!(geometry.normals.len(), 3);
        // Triangle in the XZ plane, wound 0->X->Z: face normal is -Y.
        for normal in &geometry.normals {
            assert!((normal.length() - 1.0).abs() < 1e-5);
            assert!(normal.y < 0.0);
        }
    }

    #[test]
    fn out_of_range_indices_do_not_panic() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let geometry = Geometry::new(positions, Vec::new(), vec![0, 1, 9]);
        assert_eq!(geometry.normals.len(), 3);
    }

    #[test]
    fn mismatched_normal_count_is_regenerated() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let geometry = Geometry::new(positions, vec![Vec3::Y], vec![0, 1, 2]);
        assert_eq!(geometry.normals.len(), 3);
    }
}
