//! Texture wrapping across a shared edge.
//!
//! [`wrap_face`] extends the UV layout of a reference face onto an adjacent
//! target face. Both faces are unfolded into a 2D frame attached to their
//! shared edge `AB`: the `y` axis runs along `AB` and `x` measures the
//! distance from the edge line, positive on the reference side and negative
//! on the target side. The reference face fixes a linear map from this frame
//! to UV space, which is then applied to the target's remaining corners.
//!
//! Because only distances to the shared edge are used, a target face folded
//! away from the reference plane receives the same UVs as if it were flat,
//! so the texture wraps around the fold without stretching.
//!
//! # Example
//!
//! ```
//! use uvkit::algo::wrap::wrap_face;
//! use uvkit::mesh::{build_from_quads, FaceId, HalfEdgeMesh};
//! use nalgebra::{Point2, Point3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(2.0, 1.0, 0.0),
//! ];
//! let faces = [[0, 1, 2, 3], [1, 4, 5, 2]];
//! let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &faces).unwrap();
//! let layer = mesh.add_uv_layer("UVMap").unwrap();
//! for he in mesh.face_loops(FaceId::new(0)).collect::<Vec<_>>() {
//!     let p = *mesh.position(mesh.origin(he));
//!     mesh.set_loop_uv(layer, he, Point2::new(p.x, p.y));
//! }
//!
//! wrap_face(&mut mesh, layer, FaceId::new(0), FaceId::new(1)).unwrap();
//! let corner = mesh.face_loops(FaceId::new(1)).nth(1).unwrap();
//! assert!((mesh.loop_uv(layer, corner) - Point2::new(2.0, 0.0)).norm() < 1e-12);
//! ```

use nalgebra::{Matrix2, Point2, Point3, Vector2, Vector3};

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, UvLayerId, VertexId};

/// Minimum `|AB x AC|` for a reference corner `C` to span the frame with `AB`.
pub const EPS_COLLINEAR: f64 = 1e-6;

/// A vertex shared by the reference and target faces, with each face's loop.
#[derive(Debug, Clone, Copy)]
struct SharedCorner<I: MeshIndex> {
    vertex: VertexId<I>,
    ref_loop: HalfEdgeId<I>,
    tgt_loop: HalfEdgeId<I>,
}

/// Split `p` into its foot `x` on the line through `a` and `b`, and the
/// offset `p - x` perpendicular to that line.
fn split_at_line(
    a: &Point3<f64>,
    b: &Point3<f64>,
    p: &Point3<f64>,
) -> (Vector3<f64>, Point3<f64>) {
    let dir = (b - a).normalize();
    let foot = a + dir * dir.dot(&(p - a));
    (p - foot, foot)
}

/// Coordinates of `p` in the edge frame, `side` being `1.0` for the reference
/// face and `-1.0` for the target face.
fn edge_frame_coords(a: &Point3<f64>, b: &Point3<f64>, p: &Point3<f64>, side: f64) -> Vector2<f64> {
    let (offset, foot) = split_at_line(a, b, p);
    let along = foot - a;
    Vector2::new(
        side * offset.norm(),
        along.norm().copysign(along.dot(&(b - a))),
    )
}

/// Extend the UVs of `reference` onto the adjacent face `target` on `layer`.
///
/// The target's corners on the shared edge take the reference UVs; its other
/// corners are projected through the reference face's edge-frame-to-UV map.
/// The first reference corner off the shared edge that is not collinear with
/// it and gives an invertible frame defines the map.
///
/// # Errors
///
/// - [`MeshError::SharedVertexCount`] unless the faces share exactly 2 vertices
/// - [`MeshError::NoUnsharedVertex`] if either face lies entirely on the edge
/// - [`MeshError::InvalidReferenceFace`] if no reference corner yields a map;
///   the target is left untouched in every error case
pub fn wrap_face<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    layer: UvLayerId,
    reference: FaceId<I>,
    target: FaceId<I>,
) -> Result<()> {
    let shared: Vec<SharedCorner<I>> = mesh
        .face_loops(reference)
        .filter_map(|ref_loop| {
            let vertex = mesh.origin(ref_loop);
            mesh.face_loops(target)
                .find(|&l| mesh.origin(l) == vertex)
                .map(|tgt_loop| SharedCorner {
                    vertex,
                    ref_loop,
                    tgt_loop,
                })
        })
        .collect();
    if shared.len() != 2 {
        return Err(MeshError::SharedVertexCount {
            shared: shared.len(),
        });
    }

    let is_shared = |v: VertexId<I>| shared.iter().any(|s| s.vertex == v);
    let ref_others: Vec<HalfEdgeId<I>> = mesh
        .face_loops(reference)
        .filter(|&l| !is_shared(mesh.origin(l)))
        .collect();
    if ref_others.is_empty() {
        return Err(MeshError::NoUnsharedVertex {
            face: reference.index(),
        });
    }
    let tgt_others: Vec<HalfEdgeId<I>> = mesh
        .face_loops(target)
        .filter(|&l| !is_shared(mesh.origin(l)))
        .collect();
    if tgt_others.is_empty() {
        return Err(MeshError::NoUnsharedVertex {
            face: target.index(),
        });
    }

    let a = *mesh.position(shared[0].vertex);
    let b = *mesh.position(shared[1].vertex);
    let a_uv = mesh.loop_uv(layer, shared[0].ref_loop);
    let b_uv = mesh.loop_uv(layer, shared[1].ref_loop);
    let ab = b - a;

    let mut transform: Option<Matrix2<f64>> = None;
    for &other in &ref_others {
        let c = *mesh.position(mesh.origin(other));
        if ab.cross(&(c - a)).norm() < EPS_COLLINEAR {
            continue;
        }
        let c_uv = mesh.loop_uv(layer, other);

        let frame = Matrix2::from_columns(&[
            Vector2::new(0.0, ab.norm()),
            edge_frame_coords(&a, &b, &c, 1.0),
        ]);
        let uv = Matrix2::from_columns(&[b_uv - a_uv, c_uv - a_uv]);
        if let Some(inverse) = frame.try_inverse() {
            transform = Some(uv * inverse);
            break;
        }
    }
    let transform = transform.ok_or(MeshError::InvalidReferenceFace {
        face: reference.index(),
    })?;

    let projected: Vec<(HalfEdgeId<I>, Point2<f64>)> = tgt_others
        .iter()
        .map(|&l| {
            let d = mesh.position(mesh.origin(l));
            (l, a_uv + transform * edge_frame_coords(&a, &b, d, -1.0))
        })
        .collect();

    for corner in &shared {
        let uv = mesh.loop_uv(layer, corner.ref_loop);
        mesh.set_loop_uv(layer, corner.tgt_loop, uv);
    }
    for (l, uv) in projected {
        mesh.set_loop_uv(layer, l, uv);
    }

    log::debug!(
        "wrapped face {} from reference face {}",
        target.index(),
        reference.index()
    );
    Ok(())
}
