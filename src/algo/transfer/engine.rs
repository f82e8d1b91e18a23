//! UV transfer engine.
//!
//! Pairs destination face records with source records, flips and rotates
//! each source loop sequence, and writes the result onto the destination
//! mesh.

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeId, HalfEdgeMesh, MeshIndex, UvLayerId};

use super::cycle::{flip_rotate, RotatePolicy};
use super::extract::{FaceInfo, FaceInfoSet, LoopSample};

/// How a destination face picks its source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Destination face `i` takes source face `i`; both sides must have the
    /// same number of faces.
    #[default]
    OneToOne,
    /// Destination face `i` takes source face `i mod len(source)`, repeating
    /// the source sequence over a larger destination.
    Broadcast,
}

/// Options for [`transfer_uvs`].
#[derive(Debug, Clone)]
pub struct TransferOptions {
    /// Source/destination pairing.
    pub strategy: Strategy,

    /// Reverse each face's loop order before rotating.
    pub flip: bool,

    /// Number of loops to rotate by.
    pub rotate: usize,

    /// Overwrite edge seam flags with the transformed source seams.
    pub copy_seams: bool,

    /// Handling of rotations at or beyond a face's valence.
    pub rotate_policy: RotatePolicy,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::OneToOne,
            flip: false,
            rotate: 0,
            copy_seams: true,
            rotate_policy: RotatePolicy::Wrap,
        }
    }
}

impl TransferOptions {
    /// Create default options with the given strategy.
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Set whether to flip the loop order.
    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    /// Set the rotation amount.
    pub fn with_rotate(mut self, rotate: usize) -> Self {
        self.rotate = rotate;
        self
    }

    /// Set whether seam flags are copied.
    pub fn with_copy_seams(mut self, copy_seams: bool) -> Self {
        self.copy_seams = copy_seams;
        self
    }

    /// Set the rotation policy.
    pub fn with_rotate_policy(mut self, policy: RotatePolicy) -> Self {
        self.rotate_policy = policy;
        self
    }
}

/// Transfer UVs from `source` records onto the faces described by `destination`.
///
/// Source layers are paired with `dest_layers` by position; each destination
/// layer's records are looked up in `destination` by that layer's name.
/// For every destination face, the chosen source record's samples are
/// flipped and rotated, then written as UV coordinates and pin flags onto
/// the destination layer. Seam flags are written only with
/// [`TransferOptions::copy_seams`].
///
/// Returns the number of face writes performed across all layers.
///
/// # Errors
///
/// - [`MeshError::FaceCountMismatch`] for [`Strategy::OneToOne`] with
///   different face counts (checked before any write)
/// - [`MeshError::EmptySelection`] for [`Strategy::Broadcast`] without source faces
/// - [`MeshError::UvLayerNotFound`] if `destination` lacks a destination layer
/// - [`MeshError::SizeMismatch`] on the first face whose valence differs from
///   its source; that face is left untouched, faces written before it keep
///   their new values
/// - [`MeshError::RotateOverflow`] under [`RotatePolicy::Strict`]
///
/// # Example
///
/// ```
/// use uvkit::algo::transfer::{extract_face_info, transfer_uvs, Strategy, TransferOptions};
/// use uvkit::mesh::{build_from_quads, FaceId, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
/// let layer = mesh.add_uv_layer("UVMap").unwrap();
/// mesh.select_all();
///
/// let info = extract_face_info(&mesh, &[layer], true).unwrap();
/// let options = TransferOptions::new(Strategy::OneToOne).with_rotate(1);
/// let written = transfer_uvs(&mut mesh, &info, &info, &[layer], &options).unwrap();
/// assert_eq!(written, 1);
/// ```
pub fn transfer_uvs<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    source: &FaceInfoSet<I>,
    destination: &FaceInfoSet<I>,
    dest_layers: &[UvLayerId],
    options: &TransferOptions,
) -> Result<usize> {
    let mut written = 0;

    for (src_layer, &dest_layer) in source.layers().zip(dest_layers) {
        let dest_name = mesh.uv_layer(dest_layer).name().to_string();
        let src_faces = src_layer.faces.as_slice();
        let dest_faces = destination
            .get(&dest_name)
            .ok_or_else(|| MeshError::UvLayerNotFound {
                name: dest_name.clone(),
            })?;

        match options.strategy {
            Strategy::OneToOne if src_faces.len() != dest_faces.len() => {
                return Err(MeshError::FaceCountMismatch {
                    src: src_faces.len(),
                    dest: dest_faces.len(),
                });
            }
            Strategy::Broadcast if src_faces.is_empty() => {
                return Err(MeshError::EmptySelection);
            }
            _ => {}
        }

        for (idx, dinfo) in dest_faces.iter().enumerate() {
            let sinfo = match options.strategy {
                Strategy::OneToOne => &src_faces[idx],
                Strategy::Broadcast => &src_faces[idx % src_faces.len()],
            };
            let samples = transformed_samples(sinfo, dinfo, options)?;
            write_face(mesh, dest_layer, dinfo, &samples, options.copy_seams);
            written += 1;
        }

        log::debug!(
            "transferred {} face(s) from '{}' onto '{}'",
            dest_faces.len(),
            src_layer.name,
            dest_name
        );
    }

    Ok(written)
}

/// Validate a source/destination pair and produce the samples to write.
fn transformed_samples<I: MeshIndex>(
    sinfo: &FaceInfo<I>,
    dinfo: &FaceInfo<I>,
    options: &TransferOptions,
) -> Result<Vec<LoopSample>> {
    let valence = dinfo.valence();
    if sinfo.valence() != valence {
        return Err(MeshError::SizeMismatch {
            face: dinfo.face.index(),
            src: sinfo.valence(),
            dest: valence,
        });
    }

    let shift = options
        .rotate_policy
        .resolve(options.rotate, valence)
        .ok_or(MeshError::RotateOverflow {
            face: dinfo.face.index(),
            rotate: options.rotate,
            valence,
        })?;

    Ok(flip_rotate(&sinfo.loops, options.flip, shift))
}

fn write_face<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    layer: UvLayerId,
    dinfo: &FaceInfo<I>,
    samples: &[LoopSample],
    copy_seams: bool,
) {
    let loops: Vec<HalfEdgeId<I>> = mesh.face_loops(dinfo.face).collect();
    for (he, sample) in loops.into_iter().zip(samples) {
        mesh.set_loop_uv(layer, he, sample.uv);
        mesh.set_loop_pinned(layer, he, sample.pinned);
        if copy_seams {
            let edge = mesh.edge_of(he);
            mesh.set_seam(edge, sample.seam);
        }
    }
}
