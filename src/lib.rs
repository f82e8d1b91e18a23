//! # uvkit
//!
//! Per-loop UV transfer on polygon meshes.
//!
//! uvkit models an editable polygon mesh (faces with a selection flag, loops
//! carrying per-layer UV coordinates and pin flags, edges carrying seam
//! flags) and copies UV assignments between face sets, optionally reversing
//! and rotating each face's cyclic loop order.
//!
//! ## Features
//!
//! - **Half-edge mesh**: arbitrary polygons with type-safe 16/32/64-bit indices
//! - **Face-info snapshots**: per-layer UV, pin and seam capture of selected faces
//! - **Transfer engine**: one-to-one or broadcast pairing with flip/rotate
//! - **Texture wrap**: extend a face's UV layout onto adjacent faces
//! - **Operators**: flip/rotate in place, copy/paste among objects, texture
//!   wrap, with reports
//! - **Explicit registries**: ordered operator and property-group registration
//! - **OBJ I/O**: per-corner texture coordinates, read through `tobj`
//!
//! ## Quick Start
//!
//! ```
//! use uvkit::prelude::*;
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
//! for (he, uv) in loops.iter().zip([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]) {
//!     mesh.set_loop_uv(layer, *he, Point2::new(uv.0, uv.1));
//! }
//! mesh.select_face(f);
//!
//! let options = FlipRotateOptions::new().with_flip(true).with_rotate(1);
//! assert_eq!(flip_rotate_selected(&mut mesh, &options).unwrap(), 1);
//! assert_eq!(mesh.loop_uv(layer, loops[1]), Point2::new(0.0, 1.0));
//! ```
//!
//! ## Files
//!
//! ```no_run
//! use uvkit::prelude::*;
//!
//! let mut mesh: HalfEdgeMesh = uvkit::io::load("model.obj").unwrap();
//! mesh.select_all();
//! flip_rotate_selected(&mut mesh, &FlipRotateOptions::new().with_rotate(2)).unwrap();
//! uvkit::io::save(&mesh, "rotated.obj").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;
pub mod ops;
pub mod registry;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use uvkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::transfer::{
        extract_face_info, transfer_uvs, FaceInfoSet, RotatePolicy, Strategy, TransferOptions,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_quads, build_from_triangles, EdgeId, FaceId, HalfEdgeId,
        HalfEdgeMesh, MeshIndex, UvLayerId, VertexId,
    };
    pub use crate::ops::{
        flip_rotate_selected, EditSession, FlipRotateOptions, FlipRotateUv, MeshObject, Mode,
        OperatorResult, OperatorStatus, UvClipboard,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::{Point2, Point3};

    #[test]
    fn test_cube_flip_round_trip() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
        ];
        let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &faces).unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_halfedges(), 24);
        assert_eq!(mesh.num_edges(), 12);

        let layer = mesh.add_uv_layer("UVMap").unwrap();
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        for f in mesh.face_ids().collect::<Vec<_>>() {
            let loops: Vec<_> = mesh.face_loops(f).collect();
            for (he, &(u, v)) in loops.into_iter().zip(&corners) {
                mesh.set_loop_uv(layer, he, Point2::new(u, v));
            }
        }
        mesh.select_all();
        let original = mesh.clone();

        let flip = FlipRotateOptions::new().with_flip(true);
        assert_eq!(flip_rotate_selected(&mut mesh, &flip).unwrap(), 6);
        flip_rotate_selected(&mut mesh, &flip).unwrap();

        for he in original.halfedge_ids() {
            if !original.is_boundary_halfedge(he) {
                assert_eq!(mesh.loop_uv(layer, he), original.loop_uv(layer, he));
            }
        }
    }
}
