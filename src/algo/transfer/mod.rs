//! UV transfer between face sets.
//!
//! This module copies per-loop UV assignments from a source set of faces to a
//! destination set, optionally reversing the winding (flip) and/or shifting
//! the starting loop (rotate) of every face, and optionally carrying edge
//! seam flags along.
//!
//! # Pipeline
//!
//! 1. [`extract_face_info`] snapshots the faces of interest per UV layer
//! 2. [`transfer_uvs`] pairs destination faces with source faces according to
//!    a [`Strategy`], transforms each source loop sequence with
//!    [`flip_rotate`] and writes the result back
//!
//! Source and destination may be the same snapshot, which flips/rotates the
//! selected faces in place.
//!
//! # Loop Order Transform
//!
//! Flip reverses the sequence. Rotate by `r` then moves the trailing `r`
//! loops, in order, to the front. For a quad with UVs `[a, b, c, d]`:
//!
//! | flip | rotate | result |
//! |------|--------|--------|
//! | no   | 1      | `[d, a, b, c]` |
//! | yes  | 0      | `[d, c, b, a]` |
//! | yes  | 1      | `[a, d, c, b]` |
//!
//! # Example
//!
//! ```
//! use uvkit::algo::transfer::{extract_face_info, transfer_uvs, TransferOptions};
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
//! let layer = mesh.add_uv_layer("UVMap").unwrap();
//! let first = mesh.face(FaceId::new(0)).halfedge;
//! mesh.set_loop_uv(layer, first, Point2::new(1.0, 1.0));
//! mesh.select_all();
//!
//! let info = extract_face_info(&mesh, &[layer], true).unwrap();
//! let options = TransferOptions::default().with_flip(true);
//! transfer_uvs(&mut mesh, &info, &info, &[layer], &options).unwrap();
//!
//! let last = mesh.prev(first);
//! assert_eq!(mesh.loop_uv(layer, last), Point2::new(1.0, 1.0));
//! ```

mod cycle;
mod engine;
mod extract;

pub use cycle::{flip_rotate, RotatePolicy};
pub use engine::{transfer_uvs, Strategy, TransferOptions};
pub use extract::{extract_face_info, FaceInfo, FaceInfoSet, LayerFaces, LoopSample};
