//! Mesh construction utilities.
//!
//! This module provides functions for building half-edge meshes from
//! face-vertex lists as commonly found in mesh file formats.

use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::{Edge, Face, HalfEdge, HalfEdgeMesh};
use super::index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and polygon faces of any size.
///
/// Each face lists its vertex indices in winding order. The first index of a
/// face becomes the face's first loop.
///
/// # Example
/// ```
/// use uvkit::mesh::{build_from_polygons, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(2.0, 0.5, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
///
/// let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.num_edges(), 6);
/// ```
pub fn build_from_polygons<I, F>(vertices: &[Point3<f64>], faces: &[F]) -> Result<HalfEdgeMesh<I>>
where
    I: MeshIndex,
    F: AsRef<[usize]>,
{
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let mut num_loops = 0;
    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        for (k, &vi) in face.iter().enumerate() {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
            }
            if face[k + 1..].contains(&vi) {
                return Err(MeshError::DegenerateFace { face: fi });
            }
        }
        num_loops += face.len();
    }

    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), faces.len(), num_loops);

    let vertex_ids: Vec<VertexId<I>> = vertices
        .iter()
        .map(|&pos| mesh.add_vertex(pos))
        .collect();

    // Directed edge (v0, v1) -> loop running along it
    let mut edge_map: HashMap<(usize, usize), HalfEdgeId<I>> = HashMap::with_capacity(num_loops);

    // First pass: one loop per face corner
    for face in faces {
        let face = face.as_ref();
        let n = face.len();
        let base = mesh.num_halfedges();
        let face_id = FaceId::<I>::new(mesh.num_faces());
        mesh.faces.push(Face::new(HalfEdgeId::new(base)));

        for k in 0..n {
            let mut he = HalfEdge::new();
            he.origin = vertex_ids[face[k]];
            he.next = HalfEdgeId::new(base + (k + 1) % n);
            he.prev = HalfEdgeId::new(base + (k + n - 1) % n);
            he.face = face_id;
            mesh.halfedges.push(he);

            let id = HalfEdgeId::new(base + k);
            mesh.vertex_mut(vertex_ids[face[k]]).halfedge = id;

            let key = (face[k], face[(k + 1) % n]);
            if edge_map.insert(key, id).is_some() {
                return Err(MeshError::NonManifoldEdge {
                    v0: key.0,
                    v1: key.1,
                });
            }
        }
    }

    // Second pass: pair twins and create full edges, in loop order so edge
    // ids are deterministic
    for i in 0..num_loops {
        let he = HalfEdgeId::<I>::new(i);
        if mesh.halfedge(he).edge.is_valid() {
            continue;
        }

        let v0 = mesh.origin(he).index();
        let v1 = mesh.origin(mesh.next(he)).index();
        let edge_id = EdgeId::<I>::new(mesh.num_edges());
        mesh.edges.push(Edge::new(he));

        let twin = match edge_map.get(&(v1, v0)) {
            Some(&twin) => twin,
            None => {
                // Boundary edge - create boundary half-edge
                let boundary = HalfEdgeId::<I>::new(mesh.num_halfedges());
                let mut bhe = HalfEdge::new();
                bhe.origin = vertex_ids[v1];
                mesh.halfedges.push(bhe);
                boundary
            }
        };

        mesh.halfedge_mut(he).twin = twin;
        mesh.halfedge_mut(he).edge = edge_id;
        mesh.halfedge_mut(twin).twin = he;
        mesh.halfedge_mut(twin).edge = edge_id;
    }

    link_boundary_loops(&mut mesh);
    fix_boundary_vertex_halfedges(&mut mesh);

    Ok(mesh)
}

/// Build a half-edge mesh from vertices and triangle faces.
///
/// # Example
/// ```
/// use uvkit::mesh::{build_from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    build_from_polygons(vertices, faces)
}

/// Build a half-edge mesh from vertices and quad faces (counter-clockwise).
pub fn build_from_quads<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 4]],
) -> Result<HalfEdgeMesh<I>> {
    build_from_polygons(vertices, faces)
}

/// Link boundary half-edges into loops.
fn link_boundary_loops<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    let boundary_hes: Vec<HalfEdgeId<I>> = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .collect();

    let mut outgoing: HashMap<usize, HalfEdgeId<I>> = HashMap::new();
    for &he in &boundary_hes {
        outgoing.insert(mesh.origin(he).index(), he);
    }

    for &he in &boundary_hes {
        // The next boundary half-edge starts where this one ends
        let dest = mesh.dest(he).index();
        if let Some(&next_he) = outgoing.get(&dest) {
            mesh.halfedge_mut(he).next = next_he;
            mesh.halfedge_mut(next_he).prev = he;
        }
    }
}

/// Ensure boundary vertices point to a boundary half-edge.
fn fix_boundary_vertex_halfedges<I: MeshIndex>(mesh: &mut HalfEdgeMesh<I>) {
    for vid in mesh.vertex_ids().collect::<Vec<_>>() {
        let start_he = mesh.vertex(vid).halfedge;
        if !start_he.is_valid() {
            continue;
        }

        let mut he = start_he;
        loop {
            if mesh.is_boundary_halfedge(he) {
                mesh.vertex_mut(vid).halfedge = he;
                break;
            }
            let next = mesh.next(mesh.twin(he));
            if !next.is_valid() || next == start_he {
                break;
            }
            he = next;
        }
    }
}

/// Convert a half-edge mesh back to a face-vertex representation.
///
/// Returns (vertices, faces); each face lists its vertices in loop order.
pub fn to_polygons<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<Vec<usize>> = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| v.index()).collect())
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        // Two triangles sharing an edge
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [1, 0, 3]];
        (vertices, faces)
    }

    fn two_quads() -> (Vec<Point3<f64>>, Vec<[usize; 4]>) {
        // Two quads sharing an edge (1-2)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2, 3], [1, 4, 5, 2]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        // 3 loops + 3 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 6);
        assert_eq!(mesh.num_edges(), 3);
        assert!(mesh.is_valid());
        assert!(mesh.is_triangle_mesh());
        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_two_triangles() {
        let (vertices, faces) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_faces(), 2);
        // 6 loops + 4 boundary half-edges
        assert_eq!(mesh.num_halfedges(), 10);
        assert_eq!(mesh.num_edges(), 5);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_two_quads() {
        let (vertices, faces) = two_quads();
        let mesh: HalfEdgeMesh<u16> = build_from_quads(&vertices, &faces).unwrap();

        // 8 loops + 6 boundary half-edges (shared edge has no boundary)
        assert_eq!(mesh.num_halfedges(), 14);
        assert_eq!(mesh.num_edges(), 7);
        assert!(mesh.is_valid());
        assert!(mesh.is_quad_mesh());
    }

    #[test]
    fn test_ngon() {
        let vertices: Vec<Point3<f64>> = (0..5)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / 5.0;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        let mesh: HalfEdgeMesh = build_from_polygons(&vertices, &[vec![0, 1, 2, 3, 4]]).unwrap();

        assert_eq!(mesh.face_vertex_count(FaceId::new(0)), 5);
        assert_eq!(mesh.num_edges(), 5);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_quads();
        let mesh: HalfEdgeMesh<u32> = build_from_quads(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_polygons(&mesh);

        assert_eq!(vertices.len(), out_verts.len());
        for (f_in, f_out) in faces.iter().zip(out_faces.iter()) {
            assert_eq!(&f_in[..], &f_out[..]);
        }
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }

    #[test]
    fn test_empty_faces() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces: Vec<Vec<usize>> = Vec::new();
        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &[[0, 1, 2]]);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = two_quads();
        // Diagonal vertices the same
        let result: Result<HalfEdgeMesh<u32>> = build_from_quads(&vertices, &[[0, 1, 0, 3]]);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));

        let result: Result<HalfEdgeMesh<u32>> = build_from_polygons(&vertices, &[vec![0, 1]]);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_inconsistent_winding() {
        let (vertices, _) = two_triangles();
        // Both faces traverse 0 -> 1
        let faces = vec![[0, 1, 2], [0, 1, 3]];
        let result: Result<HalfEdgeMesh<u32>> = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::NonManifoldEdge { v0: 0, v1: 1 })
        ));
    }
}
