//! Flip/rotate the UVs of the selected faces in place.
//!
//! Every selected face keeps its geometry while its loop-ordered UV
//! coordinates, pin flags and (optionally) edge seams are reversed and/or
//! rotated by a number of corners.

use crate::algo::transfer::{extract_face_info, transfer_uvs, Strategy, TransferOptions};
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex};
use crate::registry::{PropertyClass, PropertyStore, PropertyValue};

use super::report::OperatorResult;
use super::session::EditSession;
use super::OperatorClass;

/// Largest rotation accepted by [`FlipRotateOptions::validate`].
pub const MAX_ROTATE: usize = 30;

/// Property: whether the flip/rotate panel section is expanded.
pub const PROP_ENABLED: &str = "flip_rotate_uv_enabled";
/// Property: last chosen seam toggle.
pub const PROP_SEAMS: &str = "flip_rotate_uv_seams";

/// Property group of the flip/rotate operator.
pub const PROPERTIES: PropertyClass = PropertyClass {
    init_props,
    del_props,
};

fn init_props(store: &mut PropertyStore) {
    store.set(PROP_ENABLED, PropertyValue::Bool(false));
    store.set(PROP_SEAMS, PropertyValue::Bool(true));
}

fn del_props(store: &mut PropertyStore) {
    store.remove(PROP_ENABLED);
    store.remove(PROP_SEAMS);
}

/// Options for flipping and rotating UVs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipRotateOptions {
    /// Reverse each face's UV order.
    pub flip: bool,

    /// Rotate each face's UVs by this many corners (0..=30).
    pub rotate: usize,

    /// Carry edge seams along with the UVs.
    pub copy_seams: bool,
}

impl Default for FlipRotateOptions {
    fn default() -> Self {
        Self {
            flip: false,
            rotate: 0,
            copy_seams: true,
        }
    }
}

impl FlipRotateOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to flip.
    pub fn with_flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    /// Set the rotation amount.
    pub fn with_rotate(mut self, rotate: usize) -> Self {
        self.rotate = rotate;
        self
    }

    /// Set whether seams are copied.
    pub fn with_copy_seams(mut self, copy_seams: bool) -> Self {
        self.copy_seams = copy_seams;
        self
    }

    /// Defaults with the seam toggle read from stored properties.
    pub fn from_properties(store: &PropertyStore) -> Self {
        let defaults = Self::default();
        Self {
            copy_seams: store.get_bool(PROP_SEAMS).unwrap_or(defaults.copy_seams),
            ..defaults
        }
    }

    /// Check the rotation range.
    pub fn validate(&self) -> Result<()> {
        if self.rotate > MAX_ROTATE {
            return Err(MeshError::invalid_param(
                "rotate",
                self.rotate,
                "must be between 0 and 30",
            ));
        }
        Ok(())
    }

    fn transfer_options(&self) -> TransferOptions {
        TransferOptions::new(Strategy::OneToOne)
            .with_flip(self.flip)
            .with_rotate(self.rotate)
            .with_copy_seams(self.copy_seams)
    }
}

/// Flip/rotate the selected faces of one mesh on its active UV layer.
///
/// Returns the number of faces transformed; zero when nothing is selected.
///
/// # Errors
///
/// - [`MeshError::InvalidParameter`] if `rotate` exceeds [`MAX_ROTATE`]
/// - [`MeshError::NoUvLayer`] if the mesh has no UV layer
///
/// # Example
///
/// ```
/// use uvkit::mesh::{build_from_quads, HalfEdgeMesh};
/// use uvkit::ops::{flip_rotate_selected, FlipRotateOptions};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
/// mesh.add_uv_layer("UVMap").unwrap();
/// mesh.select_all();
///
/// let options = FlipRotateOptions::new().with_flip(true);
/// assert_eq!(flip_rotate_selected(&mut mesh, &options).unwrap(), 1);
/// ```
pub fn flip_rotate_selected<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    options: &FlipRotateOptions,
) -> Result<usize> {
    options.validate()?;
    let layer = mesh.active_uv_layer().ok_or(MeshError::NoUvLayer)?;

    let Some(info) = extract_face_info(mesh, &[layer], true) else {
        return Ok(0);
    };
    transfer_uvs(mesh, &info, &info, &[layer], &options.transfer_options())?;
    Ok(info.num_faces())
}

/// Operator flipping/rotating UVs of every UV-editable object.
#[derive(Debug, Clone, Default)]
pub struct FlipRotateUv {
    /// Operator parameters.
    pub options: FlipRotateOptions,
}

impl FlipRotateUv {
    /// Registration metadata.
    pub const CLASS: OperatorClass = OperatorClass {
        idname: "uv.flip_rotate_uv",
        label: "Flip/Rotate UV",
        description: "Flip/Rotate UV coordinate",
    };

    /// Create the operator with the given parameters.
    pub fn new(options: FlipRotateOptions) -> Self {
        Self { options }
    }

    /// Whether the operator can run: edit mode with a UV-editable object.
    pub fn poll(session: &EditSession) -> bool {
        session.has_uv_editable_objects()
    }

    /// Run on every UV-editable object of the session.
    ///
    /// An object that fails is reported by name and skipped; objects already
    /// processed keep their changes. Any failure cancels the invocation.
    pub fn execute(&self, session: &mut EditSession) -> OperatorResult {
        let mut result = OperatorResult::finished();
        result.info(Self::CLASS.label);
        if let Err(e) = self.options.validate() {
            result.warn(e.to_string());
            result.cancel();
            return result;
        }

        let mut total = 0;
        let mut failed = false;
        for object in session.uv_editable_objects_mut() {
            match flip_rotate_selected(&mut object.mesh, &self.options) {
                Ok(n) => total += n,
                Err(MeshError::NoUvLayer) => {
                    result.warn(format!(
                        "Object {} must have more than one UV map",
                        object.name
                    ));
                    failed = true;
                }
                Err(MeshError::SizeMismatch { .. }) => {
                    result.warn(format!(
                        "Some Object {}'s faces are different size",
                        object.name
                    ));
                    failed = true;
                }
                Err(e) => {
                    result.warn(format!("Object {}: {}", object.name, e));
                    failed = true;
                }
            }
        }

        if failed {
            result.cancel();
            return result;
        }
        if total == 0 {
            result.warn("No faces are selected");
            result.cancel();
            return result;
        }

        result.info(format!("{} face(s) are flipped/rotated", total));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_quads, FaceId};
    use crate::ops::{MeshObject, Mode, OperatorStatus, ReportLevel};
    use nalgebra::{Point2, Point3};

    fn quad_with_uvs(with_layer: bool) -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
        if with_layer {
            let layer = mesh.add_uv_layer("UVMap").unwrap();
            let loops: Vec<_> = mesh.face_loops(FaceId::new(0)).collect();
            for he in loops {
                let p = *mesh.position(mesh.origin(he));
                mesh.set_loop_uv(layer, he, Point2::new(p.x, p.y));
            }
        }
        mesh
    }

    fn face_uvs(mesh: &HalfEdgeMesh) -> Vec<(f64, f64)> {
        let layer = mesh.active_uv_layer().unwrap();
        mesh.face_loops(FaceId::new(0))
            .map(|he| {
                let uv = mesh.loop_uv(layer, he);
                (uv.x, uv.y)
            })
            .collect()
    }

    fn edit_session(meshes: Vec<(&str, HalfEdgeMesh)>) -> EditSession {
        let mut session = EditSession::new();
        for (name, mesh) in meshes {
            let idx = session.add_object(MeshObject::new(name, mesh));
            session.set_selected(idx, true);
        }
        session.set_mode(Mode::Edit);
        session
    }

    #[test]
    fn test_options_defaults_and_validation() {
        let options = FlipRotateOptions::default();
        assert!(!options.flip);
        assert_eq!(options.rotate, 0);
        assert!(options.copy_seams);
        assert!(options.validate().is_ok());

        assert!(FlipRotateOptions::new().with_rotate(30).validate().is_ok());
        assert!(matches!(
            FlipRotateOptions::new().with_rotate(31).validate(),
            Err(MeshError::InvalidParameter { name: "rotate", .. })
        ));
    }

    #[test]
    fn test_options_from_properties() {
        let mut store = PropertyStore::new();
        assert!(FlipRotateOptions::from_properties(&store).copy_seams);

        (PROPERTIES.init_props)(&mut store);
        assert_eq!(store.get_bool(PROP_ENABLED), Some(false));
        store.set(PROP_SEAMS, PropertyValue::Bool(false));
        assert!(!FlipRotateOptions::from_properties(&store).copy_seams);

        (PROPERTIES.del_props)(&mut store);
        assert!(store.is_empty());
    }

    #[test]
    fn test_flip_rotate_selected() {
        let mut mesh = quad_with_uvs(true);
        mesh.select_all();
        let options = FlipRotateOptions::new().with_flip(true).with_rotate(1);

        assert_eq!(flip_rotate_selected(&mut mesh, &options).unwrap(), 1);
        assert_eq!(
            face_uvs(&mesh),
            vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]
        );
    }

    #[test]
    fn test_flip_rotate_selected_nothing_selected() {
        let mut mesh = quad_with_uvs(true);
        let before = face_uvs(&mesh);
        assert_eq!(flip_rotate_selected(&mut mesh, &FlipRotateOptions::new().with_flip(true)).unwrap(), 0);
        assert_eq!(face_uvs(&mesh), before);
    }

    #[test]
    fn test_flip_rotate_selected_without_layer() {
        let mut mesh = quad_with_uvs(false);
        mesh.select_all();
        assert!(matches!(
            flip_rotate_selected(&mut mesh, &FlipRotateOptions::new()),
            Err(MeshError::NoUvLayer)
        ));
    }

    #[test]
    fn test_execute_reports_count() {
        let mut a = quad_with_uvs(true);
        let mut b = quad_with_uvs(true);
        a.select_all();
        b.select_all();
        let mut session = edit_session(vec![("Cube", a), ("Cube.001", b)]);

        assert!(FlipRotateUv::poll(&session));
        let op = FlipRotateUv::new(FlipRotateOptions::new().with_rotate(2));
        let result = op.execute(&mut session);

        assert_eq!(result.status, OperatorStatus::Finished);
        assert_eq!(
            result.infos().collect::<Vec<_>>(),
            vec!["Flip/Rotate UV", "2 face(s) are flipped/rotated"]
        );
    }

    #[test]
    fn test_execute_missing_uv_map_continues_with_other_objects() {
        let mut bare = quad_with_uvs(false);
        let mut good = quad_with_uvs(true);
        bare.select_all();
        good.select_all();
        let before = face_uvs(&good);
        let mut session = edit_session(vec![("Plane", bare), ("Cube", good)]);

        let result = FlipRotateUv::new(FlipRotateOptions::new().with_flip(true)).execute(&mut session);

        assert_eq!(result.status, OperatorStatus::Cancelled);
        assert_eq!(
            result.warnings().collect::<Vec<_>>(),
            vec!["Object Plane must have more than one UV map"]
        );
        let cube = session.object(1).unwrap();
        assert_ne!(face_uvs(&cube.mesh), before);
    }

    #[test]
    fn test_execute_nothing_selected() {
        let mut session = edit_session(vec![("Cube", quad_with_uvs(true))]);
        let result = FlipRotateUv::default().execute(&mut session);

        assert_eq!(result.status, OperatorStatus::Cancelled);
        assert_eq!(result.warnings().collect::<Vec<_>>(), vec!["No faces are selected"]);
    }

    #[test]
    fn test_execute_rejects_out_of_range_rotate() {
        let mut mesh = quad_with_uvs(true);
        mesh.select_all();
        let before = face_uvs(&mesh);
        let mut session = edit_session(vec![("Cube", mesh)]);

        let result = FlipRotateUv::new(FlipRotateOptions::new().with_rotate(31)).execute(&mut session);
        assert_eq!(result.status, OperatorStatus::Cancelled);
        assert_eq!(result.reports[0].level, ReportLevel::Info);
        assert_eq!(result.reports[0].message, "Flip/Rotate UV");
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(face_uvs(&session.object(0).unwrap().mesh), before);
    }

    #[test]
    fn test_poll_requires_edit_mode() {
        let mut session = edit_session(vec![("Cube", quad_with_uvs(true))]);
        session.set_mode(Mode::Object);
        assert!(!FlipRotateUv::poll(&session));
    }
}
