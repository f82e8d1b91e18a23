//! Core mesh data structures.
//!
//! This module provides the half-edge polygon mesh that plays the role of the
//! host's editable mesh: faces with a selection flag, loops carrying per-layer
//! UV coordinates and pin flags, and edges carrying seam flags.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge; a face's half-edges are its loops
//! - [`FaceId`] - Identifies a face
//! - [`EdgeId`] - Identifies a full edge
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait).
//!
//! # Construction
//!
//! ```
//! use uvkit::mesh::{build_from_quads, FaceId, HalfEdgeMesh};
//! use nalgebra::{Point2, Point3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//!
//! let layer = mesh.add_uv_layer("UVMap").unwrap();
//! let f = FaceId::new(0);
//! let loops: Vec<_> = mesh.face_loops(f).collect();
//! for he in loops {
//!     let p = *mesh.position(mesh.origin(he));
//!     mesh.set_loop_uv(layer, he, Point2::new(p.x, p.y));
//! }
//! assert_eq!(mesh.loop_uv(layer, mesh.face(f).halfedge), Point2::new(0.0, 0.0));
//! ```

mod builder;
mod halfedge;
mod index;
mod uv;

pub use builder::{build_from_polygons, build_from_quads, build_from_triangles, to_polygons};
pub use halfedge::{Edge, Face, FaceLoopIter, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{EdgeId, FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use uv::{UvLayer, UvLayerId};
