//! Face-info snapshots.
//!
//! [`extract_face_info`] walks a mesh's faces and copies, per requested UV
//! layer, every loop's coordinate, pin flag and edge seam flag. The snapshot
//! owns its data, so later writes to the mesh cannot change it; this is what
//! makes an in-place transfer (source and destination being the same faces)
//! well defined.

use nalgebra::Point2;

use crate::mesh::{FaceId, HalfEdgeMesh, MeshIndex, UvLayerId};

/// Snapshot of one loop: its UV coordinate, pin flag and its edge's seam flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopSample {
    /// The loop's UV coordinate.
    pub uv: Point2<f64>,
    /// Whether the coordinate is pinned.
    pub pinned: bool,
    /// Seam flag of the edge starting at this loop.
    pub seam: bool,
}

/// Snapshot of one face on one UV layer, in loop order.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceInfo<I: MeshIndex = u32> {
    /// The face this record was captured from.
    pub face: FaceId<I>,
    /// One sample per loop.
    pub loops: Vec<LoopSample>,
}

impl<I: MeshIndex> FaceInfo<I> {
    /// Number of loops in the face.
    #[inline]
    pub fn valence(&self) -> usize {
        self.loops.len()
    }

    /// UV coordinates in loop order.
    pub fn uvs(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.loops.iter().map(|s| s.uv)
    }

    /// Pin flags in loop order.
    pub fn pins(&self) -> impl Iterator<Item = bool> + '_ {
        self.loops.iter().map(|s| s.pinned)
    }

    /// Seam flags in loop order.
    pub fn seams(&self) -> impl Iterator<Item = bool> + '_ {
        self.loops.iter().map(|s| s.seam)
    }
}

/// Face records captured for one named UV layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerFaces<I: MeshIndex = u32> {
    /// Name of the UV layer.
    pub name: String,
    /// Records in mesh face order.
    pub faces: Vec<FaceInfo<I>>,
}

/// Face records keyed by UV layer name, in the order the layers were requested.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceInfoSet<I: MeshIndex = u32> {
    layers: Vec<LayerFaces<I>>,
}

impl<I: MeshIndex> FaceInfoSet<I> {
    /// Iterate over the layers in request order.
    pub fn layers(&self) -> impl Iterator<Item = &LayerFaces<I>> + '_ {
        self.layers.iter()
    }

    /// Layer names in request order.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|l| l.name.as_str())
    }

    /// Number of layers.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Records for the named layer.
    pub fn get(&self, name: &str) -> Option<&[FaceInfo<I>]> {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.faces.as_slice())
    }

    /// Number of faces captured, taken from the first layer.
    ///
    /// Every layer of one snapshot covers the same faces.
    pub fn num_faces(&self) -> usize {
        self.layers.first().map_or(0, |l| l.faces.len())
    }
}

/// Capture face records for `layers`.
///
/// Faces are visited in stored order; with `only_selected` unselected faces
/// are skipped. Returns `None` when `layers` is empty or when no face was
/// captured, which callers treat as "nothing to do".
///
/// # Example
///
/// ```
/// use uvkit::algo::transfer::extract_face_info;
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
///
/// assert!(extract_face_info(&mesh, &[layer], true).is_none());
///
/// mesh.select_face(FaceId::new(0));
/// let info = extract_face_info(&mesh, &[layer], true).unwrap();
/// assert_eq!(info.get("UVMap").unwrap()[0].valence(), 4);
/// ```
pub fn extract_face_info<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    layers: &[UvLayerId],
    only_selected: bool,
) -> Option<FaceInfoSet<I>> {
    let mut captured = Vec::with_capacity(layers.len());

    for &layer in layers {
        let faces: Vec<FaceInfo<I>> = mesh
            .face_ids()
            .filter(|&f| !only_selected || mesh.is_face_selected(f))
            .map(|f| FaceInfo {
                face: f,
                loops: mesh
                    .face_loops(f)
                    .map(|he| LoopSample {
                        uv: mesh.loop_uv(layer, he),
                        pinned: mesh.is_loop_pinned(layer, he),
                        seam: mesh.is_seam(mesh.edge_of(he)),
                    })
                    .collect(),
            })
            .collect();

        let name = mesh.uv_layer(layer).name();
        if faces.is_empty() {
            log::debug!("no faces captured on UV map '{}'", name);
            return None;
        }
        log::debug!("captured {} face(s) on UV map '{}'", faces.len(), name);

        captured.push(LayerFaces {
            name: name.to_string(),
            faces,
        });
    }

    if captured.is_empty() {
        return None;
    }
    Some(FaceInfoSet { layers: captured })
}
