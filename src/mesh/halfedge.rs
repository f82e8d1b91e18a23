//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! for polygon meshes. Faces may be triangles, quads or arbitrary n-gons.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions
//! - Each half-edge knows its **twin**, **next**, **prev**, **origin vertex**,
//!   **incident face** and the full **edge** it belongs to
//! - Each face stores its first half-edge; walking `next` from it visits the
//!   face's loops in input order
//! - Each edge stores one of its half-edges and the edge's **seam** flag
//!
//! # Loops
//!
//! An interior half-edge is a *loop*: one corner of a face. Per-corner data
//! (UV coordinates, pin flags) is stored per half-edge, see [`super::uv`].
//! The edge a loop references is the edge from the loop's vertex to the next
//! corner of the same face.
//!
//! # Boundary Handling
//!
//! Boundary half-edges have an invalid face ID. Their twins are the interior
//! half-edges of the faces along the boundary.

use nalgebra::Point3;

use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use super::uv::UvLayer;

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One outgoing half-edge from this vertex.
    /// For boundary vertices, this is a boundary half-edge when one exists.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge originates from.
    pub origin: VertexId<I>,

    /// The opposite half-edge (pointing in the reverse direction).
    pub twin: HalfEdgeId<I>,

    /// The next half-edge around the face.
    pub next: HalfEdgeId<I>,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId<I>,

    /// The face this half-edge belongs to.
    /// Invalid for boundary half-edges.
    pub face: FaceId<I>,

    /// The full edge shared with the twin.
    pub edge: EdgeId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a new uninitialized half-edge.
    pub fn new() -> Self {
        Self {
            origin: VertexId::invalid(),
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
            edge: EdgeId::invalid(),
        }
    }

    /// Check if this half-edge is on the boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A full edge. Its seam flag is shared by every loop that references it.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    /// One of the two half-edges of this edge.
    pub halfedge: HalfEdgeId<I>,

    /// UV seam marker.
    pub seam: bool,
}

impl<I: MeshIndex> Edge<I> {
    /// Create a new edge without a seam.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self {
            halfedge,
            seam: false,
        }
    }
}

/// A face in the half-edge mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// The half-edge of the face's first corner.
    pub halfedge: HalfEdgeId<I>,

    /// Whether the face is part of the current selection.
    pub selected: bool,
}

impl<I: MeshIndex> Face<I> {
    /// Create a new, unselected face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self {
            halfedge,
            selected: false,
        }
    }
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self::new(HalfEdgeId::invalid())
    }
}

/// A half-edge mesh for polygon meshes with per-loop UV layers.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex<I>>,

    /// All half-edges in the mesh.
    pub(crate) halfedges: Vec<HalfEdge<I>>,

    /// All full edges in the mesh.
    pub(crate) edges: Vec<Edge<I>>,

    /// All faces in the mesh.
    pub(crate) faces: Vec<Face<I>>,

    /// Per-loop UV layers, indexed by half-edge.
    pub(crate) uv_layers: Vec<UvLayer>,

    /// Index into `uv_layers` of the active layer.
    pub(crate) active_uv_layer: Option<usize>,

    /// Faces in the order they were selected, oldest first.
    pub(crate) select_history: Vec<FaceId<I>>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::with_capacity(0, 0, 0)
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize, num_loops: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_loops + num_loops / 4),
            edges: Vec::with_capacity(num_loops / 2 + num_loops / 4),
            faces: Vec::with_capacity(num_faces),
            uv_layers: Vec::new(),
            active_uv_layer: None,
            select_history: Vec::new(),
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges (loops plus boundary half-edges).
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of full edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId<I>) -> &mut Vertex<I> {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId<I>) -> &mut HalfEdge<I> {
        &mut self.halfedges[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// Get the full edge a half-edge belongs to.
    #[inline]
    pub fn edge_of(&self, he: HalfEdgeId<I>) -> EdgeId<I> {
        self.halfedge(he).edge
    }

    /// Check if a half-edge is on the boundary.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.halfedge(he).is_boundary()
    }

    /// Check if an edge lies on the mesh boundary.
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        let he = self.edge(e).halfedge;
        self.is_boundary_halfedge(he) || self.is_boundary_halfedge(self.twin(he))
    }

    /// Check if a vertex is on the boundary.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        let start = self.vertex(v).halfedge;
        if !start.is_valid() {
            return true; // Isolated vertex
        }

        let mut he = start;
        loop {
            if self.is_boundary_halfedge(he) {
                return true;
            }
            he = self.next(self.twin(he));
            if he == start {
                break;
            }
        }
        false
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all face IDs in stored order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// Iterate over the loops (interior half-edges) of a face, first corner first.
    pub fn face_loops(&self, f: FaceId<I>) -> FaceLoopIter<'_, I> {
        FaceLoopIter::new(self, f)
    }

    /// Iterate over vertices of a face in loop order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_loops(f).map(|he| self.origin(he))
    }

    /// Number of corners (the valence) of a face.
    pub fn face_vertex_count(&self, f: FaceId<I>) -> usize {
        self.face_loops(f).count()
    }

    /// Check whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.face_ids().all(|f| self.face_vertex_count(f) == 3)
    }

    /// Check whether every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.face_ids().all(|f| self.face_vertex_count(f) == 4)
    }

    // ==================== Selection ====================

    /// Check whether a face is selected.
    #[inline]
    pub fn is_face_selected(&self, f: FaceId<I>) -> bool {
        self.face(f).selected
    }

    /// Set the selection state of a face.
    ///
    /// Selecting a face moves it to the end of the selection history;
    /// deselecting removes it.
    pub fn set_face_selected(&mut self, f: FaceId<I>, selected: bool) {
        self.faces[f.index()].selected = selected;
        self.select_history.retain(|&h| h != f);
        if selected {
            self.select_history.push(f);
        }
    }

    /// Add a face to the selection.
    #[inline]
    pub fn select_face(&mut self, f: FaceId<I>) {
        self.set_face_selected(f, true);
    }

    /// Select every face. The selection history is left as is.
    pub fn select_all(&mut self) {
        for face in &mut self.faces {
            face.selected = true;
        }
    }

    /// Clear the selection.
    pub fn deselect_all(&mut self) {
        for face in &mut self.faces {
            face.selected = false;
        }
        self.select_history.clear();
    }

    /// Iterate over selected faces in stored order.
    pub fn selected_faces(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.face_ids().filter(|&f| self.is_face_selected(f))
    }

    /// Iterate over selected faces in the order they were selected.
    ///
    /// Only faces selected one at a time appear here.
    pub fn selection_history(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.select_history
            .iter()
            .copied()
            .filter(|&f| self.is_face_selected(f))
    }

    /// Number of selected faces.
    pub fn num_selected_faces(&self) -> usize {
        self.faces.iter().filter(|f| f.selected).count()
    }

    // ==================== Seams ====================

    /// Check whether an edge is marked as a UV seam.
    #[inline]
    pub fn is_seam(&self, e: EdgeId<I>) -> bool {
        self.edge(e).seam
    }

    /// Mark or clear a UV seam on an edge.
    #[inline]
    pub fn set_seam(&mut self, e: EdgeId<I>, seam: bool) {
        self.edges[e.index()].seam = seam;
    }

    /// Number of edges marked as seams.
    pub fn num_seams(&self) -> usize {
        self.edge_ids().filter(|&e| self.is_seam(e)).count()
    }

    // ==================== Geometry ====================

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        let mut min = first;
        let mut max = first;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    // ==================== Validation ====================

    /// Check if the mesh is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        for (i, v) in self.vertices.iter().enumerate() {
            if v.halfedge.is_valid() && self.halfedge(v.halfedge).origin.index() != i {
                return false;
            }
        }

        for (i, he) in self.halfedges.iter().enumerate() {
            if he.twin.is_valid() && self.halfedge(he.twin).twin.index() != i {
                return false;
            }
            if he.next.is_valid() && self.halfedge(he.next).prev.index() != i {
                return false;
            }
            if he.prev.is_valid() && self.halfedge(he.prev).next.index() != i {
                return false;
            }
            if !he.edge.is_valid()
                || (he.twin.is_valid() && self.halfedge(he.twin).edge != he.edge)
            {
                return false;
            }
        }

        for (i, e) in self.edges.iter().enumerate() {
            if !e.halfedge.is_valid() || self.halfedge(e.halfedge).edge.index() != i {
                return false;
            }
        }

        for (i, f) in self.faces.iter().enumerate() {
            if !f.halfedge.is_valid() || self.halfedge(f.halfedge).face.index() != i {
                return false;
            }
        }

        self.uv_layers
            .iter()
            .all(|layer| layer.len() == self.halfedges.len())
    }
}

/// Iterator over the loops of a face.
pub struct FaceLoopIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    done: bool,
}

impl<'a, I: MeshIndex> FaceLoopIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh.face(f).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<I: MeshIndex> Iterator for FaceLoopIter<'_, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygons;

    fn quad_and_triangle() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.5, 0.0),
        ];
        let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
        build_from_polygons(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::<u32>::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.bounding_box().is_none());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_face_loops_follow_input_order() {
        let mesh = quad_and_triangle();
        let f0 = FaceId::new(0);
        let verts: Vec<usize> = mesh.face_vertices(f0).map(|v| v.index()).collect();
        assert_eq!(verts, vec![0, 1, 2, 3]);
        assert_eq!(mesh.face_vertex_count(FaceId::new(1)), 3);
        assert!(!mesh.is_quad_mesh());
        assert!(!mesh.is_triangle_mesh());
    }

    #[test]
    fn test_loop_edge_is_shared_with_neighbor() {
        let mesh = quad_and_triangle();
        // Quad loop at vertex 1 runs 1 -> 2, triangle loop at vertex 2 runs 2 -> 1.
        let quad_loop = mesh.face_loops(FaceId::new(0)).nth(1).unwrap();
        let tri_loop = mesh.face_loops(FaceId::new(1)).nth(2).unwrap();
        assert_eq!(mesh.edge_of(quad_loop), mesh.edge_of(tri_loop));
        assert!(!mesh.is_boundary_edge(mesh.edge_of(quad_loop)));
        assert_eq!(mesh.num_edges(), 6);
    }

    #[test]
    fn test_selection() {
        let mut mesh = quad_and_triangle();
        assert_eq!(mesh.num_selected_faces(), 0);

        mesh.select_face(FaceId::new(1));
        let selected: Vec<_> = mesh.selected_faces().collect();
        assert_eq!(selected, vec![FaceId::new(1)]);

        mesh.select_all();
        assert_eq!(mesh.num_selected_faces(), 2);
        mesh.deselect_all();
        assert_eq!(mesh.num_selected_faces(), 0);
    }

    #[test]
    fn test_selection_history() {
        let mut mesh = quad_and_triangle();
        mesh.select_face(FaceId::new(1));
        mesh.select_face(FaceId::new(0));
        let history: Vec<_> = mesh.selection_history().collect();
        assert_eq!(history, vec![FaceId::new(1), FaceId::new(0)]);

        mesh.select_face(FaceId::new(1));
        let history: Vec<_> = mesh.selection_history().collect();
        assert_eq!(history, vec![FaceId::new(0), FaceId::new(1)]);

        mesh.set_face_selected(FaceId::new(0), false);
        let history: Vec<_> = mesh.selection_history().collect();
        assert_eq!(history, vec![FaceId::new(1)]);

        mesh.deselect_all();
        assert_eq!(mesh.selection_history().count(), 0);
    }

    #[test]
    fn test_seams() {
        let mut mesh = quad_and_triangle();
        let e = EdgeId::new(2);
        assert!(!mesh.is_seam(e));
        mesh.set_seam(e, true);
        assert!(mesh.is_seam(e));
        assert_eq!(mesh.num_seams(), 1);
    }

    #[test]
    fn test_bounding_box() {
        let mesh = quad_and_triangle();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(2.0, 1.0, 0.0));
    }
}
