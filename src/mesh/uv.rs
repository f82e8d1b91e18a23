//! Per-loop UV layers.
//!
//! A UV layer is a named channel holding one texture coordinate and one
//! pin flag for every loop of the mesh. Storage is indexed by half-edge, so
//! boundary half-edges own unused slots; this keeps loop lookups O(1).

use nalgebra::Point2;

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex};
use crate::error::{MeshError, Result};

/// Identifies a UV layer within one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UvLayerId(usize);

impl UvLayerId {
    /// Position of the layer in the mesh's layer list.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named channel of per-loop UV coordinates and pin flags.
#[derive(Debug, Clone)]
pub struct UvLayer {
    name: String,
    coords: Vec<Point2<f64>>,
    pins: Vec<bool>,
}

impl UvLayer {
    fn new(name: String, num_halfedges: usize) -> Self {
        Self {
            name,
            coords: vec![Point2::origin(); num_halfedges],
            pins: vec![false; num_halfedges],
        }
    }

    /// The layer name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of per-half-edge slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if the layer has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Compute the bounding box of the coordinates of the given loops.
    pub fn bounding_box<I: MeshIndex>(
        &self,
        loops: impl IntoIterator<Item = HalfEdgeId<I>>,
    ) -> Option<(Point2<f64>, Point2<f64>)> {
        let mut bounds: Option<(Point2<f64>, Point2<f64>)> = None;
        for he in loops {
            let uv = self.coords[he.index()];
            bounds = Some(match bounds {
                None => (uv, uv),
                Some((min, max)) => (
                    Point2::new(min.x.min(uv.x), min.y.min(uv.y)),
                    Point2::new(max.x.max(uv.x), max.y.max(uv.y)),
                ),
            });
        }
        bounds
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Add a UV layer with every coordinate at the origin and no pins.
    ///
    /// The first layer added becomes the active layer.
    pub fn add_uv_layer(&mut self, name: impl Into<String>) -> Result<UvLayerId> {
        let name = name.into();
        if self.find_uv_layer(&name).is_some() {
            return Err(MeshError::DuplicateUvLayer { name });
        }

        let id = UvLayerId(self.uv_layers.len());
        self.uv_layers.push(UvLayer::new(name, self.halfedges.len()));
        if self.active_uv_layer.is_none() {
            self.active_uv_layer = Some(id.0);
        }
        Ok(id)
    }

    /// Number of UV layers.
    #[inline]
    pub fn num_uv_layers(&self) -> usize {
        self.uv_layers.len()
    }

    /// Check whether the mesh has at least one UV layer.
    #[inline]
    pub fn has_uv_layers(&self) -> bool {
        !self.uv_layers.is_empty()
    }

    /// Iterate over all UV layer IDs in creation order.
    pub fn uv_layer_ids(&self) -> impl Iterator<Item = UvLayerId> + '_ {
        (0..self.uv_layers.len()).map(UvLayerId)
    }

    /// Get a UV layer by ID.
    #[inline]
    pub fn uv_layer(&self, id: UvLayerId) -> &UvLayer {
        &self.uv_layers[id.0]
    }

    /// Look up a UV layer by name.
    pub fn find_uv_layer(&self, name: &str) -> Option<UvLayerId> {
        self.uv_layers
            .iter()
            .position(|layer| layer.name == name)
            .map(UvLayerId)
    }

    /// The active UV layer, or `None` if the mesh has no UV layer.
    pub fn active_uv_layer(&self) -> Option<UvLayerId> {
        self.active_uv_layer.map(UvLayerId)
    }

    /// Make a layer the active one.
    pub fn set_active_uv_layer(&mut self, id: UvLayerId) {
        debug_assert!(id.0 < self.uv_layers.len());
        self.active_uv_layer = Some(id.0);
    }

    /// Get the UV coordinate of a loop.
    #[inline]
    pub fn loop_uv(&self, layer: UvLayerId, he: HalfEdgeId<I>) -> Point2<f64> {
        self.uv_layers[layer.0].coords[he.index()]
    }

    /// Set the UV coordinate of a loop.
    #[inline]
    pub fn set_loop_uv(&mut self, layer: UvLayerId, he: HalfEdgeId<I>, uv: Point2<f64>) {
        self.uv_layers[layer.0].coords[he.index()] = uv;
    }

    /// Check whether a loop's UV coordinate is pinned.
    #[inline]
    pub fn is_loop_pinned(&self, layer: UvLayerId, he: HalfEdgeId<I>) -> bool {
        self.uv_layers[layer.0].pins[he.index()]
    }

    /// Pin or unpin a loop's UV coordinate.
    #[inline]
    pub fn set_loop_pinned(&mut self, layer: UvLayerId, he: HalfEdgeId<I>, pinned: bool) {
        self.uv_layers[layer.0].pins[he.index()] = pinned;
    }

    /// Produce a fresh layer name based on `base` that is not in use yet.
    ///
    /// Follows the `name.001`, `name.002`, ... convention.
    pub fn unique_uv_layer_name(&self, base: &str) -> String {
        if self.find_uv_layer(base).is_none() {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}.{:03}", base, n))
            .find(|candidate| self.find_uv_layer(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_quads, FaceId};
    use nalgebra::Point3;

    fn unit_quad() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_add_layers() {
        let mut mesh = unit_quad();
        assert!(!mesh.has_uv_layers());
        assert!(mesh.active_uv_layer().is_none());

        let a = mesh.add_uv_layer("UVMap").unwrap();
        let b = mesh.add_uv_layer("Lightmap").unwrap();
        assert_eq!(mesh.num_uv_layers(), 2);
        assert_eq!(mesh.active_uv_layer(), Some(a));
        assert_eq!(mesh.find_uv_layer("Lightmap"), Some(b));
        assert_eq!(mesh.uv_layer(b).name(), "Lightmap");
        assert_eq!(mesh.uv_layer(a).len(), mesh.num_halfedges());
        assert!(mesh.is_valid());

        mesh.set_active_uv_layer(b);
        assert_eq!(mesh.active_uv_layer(), Some(b));
    }

    #[test]
    fn test_duplicate_layer_rejected() {
        let mut mesh = unit_quad();
        mesh.add_uv_layer("UVMap").unwrap();
        let result = mesh.add_uv_layer("UVMap");
        assert!(matches!(result, Err(MeshError::DuplicateUvLayer { .. })));
    }

    #[test]
    fn test_loop_uv_and_pin() {
        let mut mesh = unit_quad();
        let layer = mesh.add_uv_layer("UVMap").unwrap();
        let loops: Vec<_> = mesh.face_loops(FaceId::new(0)).collect();

        mesh.set_loop_uv(layer, loops[2], Point2::new(0.25, 0.75));
        mesh.set_loop_pinned(layer, loops[2], true);

        assert_eq!(mesh.loop_uv(layer, loops[2]), Point2::new(0.25, 0.75));
        assert!(mesh.is_loop_pinned(layer, loops[2]));
        assert!(!mesh.is_loop_pinned(layer, loops[0]));

        let (min, max) = mesh.uv_layer(layer).bounding_box(loops).unwrap();
        assert_eq!(min, Point2::new(0.0, 0.0));
        assert_eq!(max, Point2::new(0.25, 0.75));
    }

    #[test]
    fn test_unique_layer_name() {
        let mut mesh = unit_quad();
        assert_eq!(mesh.unique_uv_layer_name("UVMap"), "UVMap");
        mesh.add_uv_layer("UVMap").unwrap();
        assert_eq!(mesh.unique_uv_layer_name("UVMap"), "UVMap.001");
        mesh.add_uv_layer("UVMap.001").unwrap();
        assert_eq!(mesh.unique_uv_layer_name("UVMap"), "UVMap.002");
    }
}
