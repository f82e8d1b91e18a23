//! Copy UVs from one object and paste them onto others.
//!
//! [`UvClipboard::copy`] snapshots the faces of a source mesh;
//! [`UvClipboard::paste`] writes that snapshot onto a target mesh through the
//! transfer engine, optionally flipping and rotating every face. The
//! [`CopyUvObject`] and [`PasteUvObject`] operators drive the clipboard over
//! an [`EditSession`].

use std::fmt;

use crate::algo::transfer::{
    extract_face_info, transfer_uvs, FaceInfoSet, RotatePolicy, Strategy, TransferOptions,
};
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, MeshIndex, UvLayerId};
use crate::registry::{PropertyClass, PropertyStore, PropertyValue};

use super::report::OperatorResult;
use super::session::EditSession;
use super::OperatorClass;

/// Name given to layers created by [`UvMapSelection::New`].
pub const DEFAULT_UV_MAP_NAME: &str = "UVMap";

/// Property: last chosen seam toggle for paste.
pub const PROP_COPY_SEAMS: &str = "copy_paste_uv_object_copy_seams";

/// Property group of the copy/paste operators.
pub const PROPERTIES: PropertyClass = PropertyClass {
    init_props,
    del_props,
};

fn init_props(store: &mut PropertyStore) {
    store.set(PROP_COPY_SEAMS, PropertyValue::Bool(true));
}

fn del_props(store: &mut PropertyStore) {
    store.remove(PROP_COPY_SEAMS);
}

/// Which UV map(s) to copy from or paste onto.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UvMapSelection {
    /// The active UV map.
    #[default]
    Default,
    /// Every UV map. Paste creates missing maps by name.
    All,
    /// Paste onto a newly created map; copy uses the active map.
    New,
    /// The map with this name.
    Named(String),
}

impl From<&str> for UvMapSelection {
    fn from(s: &str) -> Self {
        match s {
            "__default" => UvMapSelection::Default,
            "__all" => UvMapSelection::All,
            "__new" => UvMapSelection::New,
            name => UvMapSelection::Named(name.to_string()),
        }
    }
}

impl fmt::Display for UvMapSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UvMapSelection::Default => write!(f, "__default"),
            UvMapSelection::All => write!(f, "__all"),
            UvMapSelection::New => write!(f, "__new"),
            UvMapSelection::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Options for [`UvClipboard::copy`].
#[derive(Debug, Clone, Default)]
pub struct CopyUvOptions {
    /// UV map(s) to copy.
    pub uv_map: UvMapSelection,

    /// Copy only the selected faces instead of all faces.
    pub only_selected: bool,
}

impl CopyUvOptions {
    /// Copy all faces of the given map(s).
    pub fn new(uv_map: UvMapSelection) -> Self {
        Self {
            uv_map,
            ..Self::default()
        }
    }

    /// Restrict copying to selected faces.
    pub fn with_only_selected(mut self, only_selected: bool) -> Self {
        self.only_selected = only_selected;
        self
    }
}

/// Options for [`UvClipboard::paste`].
#[derive(Debug, Clone)]
pub struct PasteUvOptions {
    /// UV map(s) to paste onto.
    pub uv_map: UvMapSelection,

    /// Paste only onto the selected faces instead of all faces.
    pub only_selected: bool,

    /// Source/target face pairing.
    pub strategy: Strategy,

    /// Reverse each face's UV order.
    pub flip: bool,

    /// Rotate each face's UVs by this many corners.
    pub rotate: usize,

    /// Carry edge seams along with the UVs.
    pub copy_seams: bool,

    /// Handling of rotations at or beyond a face's valence.
    pub rotate_policy: RotatePolicy,
}

impl Default for PasteUvOptions {
    fn default() -> Self {
        Self {
            uv_map: UvMapSelection::Default,
            only_selected: false,
            strategy: Strategy::OneToOne,
            flip: false,
            rotate: 0,
            copy_seams: true,
            rotate_policy: RotatePolicy::Wrap,
        }
    }
}

impl PasteUvOptions {
    /// Paste onto the given map(s) with default transfer settings.
    pub fn new(uv_map: UvMapSelection) -> Self {
        Self {
            uv_map,
            ..Self::default()
        }
    }

    /// Defaults with the seam toggle read from stored properties.
    pub fn from_properties(store: &PropertyStore) -> Self {
        let defaults = Self::default();
        Self {
            copy_seams: store
                .get_bool(PROP_COPY_SEAMS)
                .unwrap_or(defaults.copy_seams),
            ..defaults
        }
    }

    /// Restrict pasting to selected faces.
    pub fn with_only_selected(mut self, only_selected: bool) -> Self {
        self.only_selected = only_selected;
        self
    }

    /// Set the pairing strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
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

    /// Set the rotation policy.
    pub fn with_rotate_policy(mut self, policy: RotatePolicy) -> Self {
        self.rotate_policy = policy;
        self
    }

    fn transfer_options(&self) -> TransferOptions {
        TransferOptions::new(self.strategy)
            .with_flip(self.flip)
            .with_rotate(self.rotate)
            .with_copy_seams(self.copy_seams)
            .with_rotate_policy(self.rotate_policy)
    }
}

/// Holds the most recently copied face snapshot.
#[derive(Debug, Clone)]
pub struct UvClipboard<I: MeshIndex = u32> {
    info: Option<FaceInfoSet<I>>,
}

impl<I: MeshIndex> Default for UvClipboard<I> {
    fn default() -> Self {
        Self { info: None }
    }
}

impl<I: MeshIndex> UvClipboard<I> {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether nothing has been copied yet.
    pub fn is_empty(&self) -> bool {
        self.info.is_none()
    }

    /// The copied snapshot.
    pub fn contents(&self) -> Option<&FaceInfoSet<I>> {
        self.info.as_ref()
    }

    /// Forget the copied snapshot.
    pub fn clear(&mut self) {
        self.info = None;
    }

    /// Snapshot `mesh`'s faces; returns the number of faces copied.
    ///
    /// # Errors
    ///
    /// - [`MeshError::NoUvLayer`] if the mesh has no UV layer
    /// - [`MeshError::UvLayerNotFound`] for a missing named map
    /// - [`MeshError::EmptySelection`] if no face qualifies
    pub fn copy(&mut self, mesh: &HalfEdgeMesh<I>, options: &CopyUvOptions) -> Result<usize> {
        let layers = copy_layers(mesh, &options.uv_map)?;
        let info = extract_face_info(mesh, &layers, options.only_selected)
            .ok_or(MeshError::EmptySelection)?;

        let count = info.num_faces();
        log::debug!(
            "copied {} face(s) from {} UV map(s)",
            count,
            info.num_layers()
        );
        self.info = Some(info);
        Ok(count)
    }

    /// Write the snapshot onto `mesh`; returns the number of faces pasted.
    ///
    /// A face counts once however many UV maps it was written on.
    ///
    /// # Errors
    ///
    /// - [`MeshError::ClipboardEmpty`] before any copy
    /// - [`MeshError::NoUvLayer`] if the default map is requested and the
    ///   mesh has none
    /// - [`MeshError::FaceCountMismatch`] for [`Strategy::OneToOne`] with a
    ///   different number of faces; nothing is written
    /// - [`MeshError::SizeMismatch`] when paired faces differ in valence
    pub fn paste(&self, mesh: &mut HalfEdgeMesh<I>, options: &PasteUvOptions) -> Result<usize> {
        let source = self.info.as_ref().ok_or(MeshError::ClipboardEmpty)?;
        let layers = paste_layers(mesh, source, &options.uv_map)?;
        let destination = extract_face_info(mesh, &layers, options.only_selected)
            .ok_or(MeshError::EmptySelection)?;

        transfer_uvs(
            mesh,
            source,
            &destination,
            &layers,
            &options.transfer_options(),
        )?;
        Ok(destination.num_faces())
    }
}

fn copy_layers<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    selection: &UvMapSelection,
) -> Result<Vec<UvLayerId>> {
    let active = mesh.active_uv_layer().ok_or(MeshError::NoUvLayer)?;
    match selection {
        UvMapSelection::Default | UvMapSelection::New => Ok(vec![active]),
        UvMapSelection::All => Ok(mesh.uv_layer_ids().collect()),
        UvMapSelection::Named(name) => find_layer(mesh, name).map(|l| vec![l]),
    }
}

fn paste_layers<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    source: &FaceInfoSet<I>,
    selection: &UvMapSelection,
) -> Result<Vec<UvLayerId>> {
    match selection {
        UvMapSelection::Default => mesh
            .active_uv_layer()
            .map(|l| vec![l])
            .ok_or(MeshError::NoUvLayer),
        UvMapSelection::New => {
            let name = mesh.unique_uv_layer_name(DEFAULT_UV_MAP_NAME);
            Ok(vec![mesh.add_uv_layer(name)?])
        }
        UvMapSelection::All => source
            .layer_names()
            .map(|name| match mesh.find_uv_layer(name) {
                Some(layer) => Ok(layer),
                None => mesh.add_uv_layer(name),
            })
            .collect(),
        UvMapSelection::Named(name) => find_layer(mesh, name).map(|l| vec![l]),
    }
}

fn find_layer<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, name: &str) -> Result<UvLayerId> {
    mesh.find_uv_layer(name)
        .ok_or_else(|| MeshError::UvLayerNotFound {
            name: name.to_string(),
        })
}

/// Operator copying UVs of the active object into a clipboard.
#[derive(Debug, Clone, Default)]
pub struct CopyUvObject {
    /// Operator parameters.
    pub options: CopyUvOptions,
}

impl CopyUvObject {
    /// Registration metadata.
    pub const CLASS: OperatorClass = OperatorClass {
        idname: "object.copy_paste_uv_object_copy_uv",
        label: "Copy UV",
        description: "Copy UV coordinate (Among Objects)",
    };

    /// Create the operator with the given parameters.
    pub fn new(options: CopyUvOptions) -> Self {
        Self { options }
    }

    /// Whether the operator can run: there is an active object.
    pub fn poll(session: &EditSession) -> bool {
        session.active_object().is_some()
    }

    /// Copy from the session's active object.
    pub fn execute(&self, session: &EditSession, clipboard: &mut UvClipboard) -> OperatorResult {
        let Some(object) = session.active_object() else {
            return OperatorResult::cancelled("No active object");
        };

        match clipboard.copy(&object.mesh, &self.options) {
            Ok(n) => {
                let mut result = OperatorResult::finished();
                result.info(format!("{} face(s) are copied", n));
                result
            }
            Err(MeshError::NoUvLayer) => OperatorResult::cancelled(format!(
                "Object {} must have more than one UV map",
                object.name
            )),
            Err(e) => OperatorResult::cancelled(format!("Object {}: {}", object.name, e)),
        }
    }
}

/// Operator pasting the clipboard onto every selected object.
#[derive(Debug, Clone, Default)]
pub struct PasteUvObject {
    /// Operator parameters.
    pub options: PasteUvOptions,
}

impl PasteUvObject {
    /// Registration metadata.
    pub const CLASS: OperatorClass = OperatorClass {
        idname: "object.copy_paste_uv_object_paste_uv",
        label: "Paste UV",
        description: "Paste UV coordinate (Among Objects)",
    };

    /// Create the operator with the given parameters.
    pub fn new(options: PasteUvOptions) -> Self {
        Self { options }
    }

    /// Whether the operator can run: some object is selected.
    pub fn poll(session: &EditSession) -> bool {
        session.objects().iter().any(|o| o.selected)
    }

    /// Paste onto every selected object.
    ///
    /// Failing objects are reported by name and skipped; any failure
    /// cancels the invocation.
    pub fn execute(&self, session: &mut EditSession, clipboard: &UvClipboard) -> OperatorResult {
        if clipboard.is_empty() {
            return OperatorResult::cancelled("Need copy UV at first");
        }

        let mut result = OperatorResult::finished();
        let mut total = 0;
        let mut failed = false;
        for object in session.selected_objects_mut() {
            match clipboard.paste(&mut object.mesh, &self.options) {
                Ok(n) => total += n,
                Err(e) => {
                    result.warn(paste_failure_message(&object.name, &e));
                    failed = true;
                }
            }
        }

        if failed {
            result.cancel();
            return result;
        }
        if total == 0 {
            result.warn("No objects are selected");
            result.cancel();
            return result;
        }

        result.info(format!("{} face(s) are pasted", total));
        result
    }
}

fn paste_failure_message(name: &str, err: &MeshError) -> String {
    match err {
        MeshError::NoUvLayer => format!("Object {} must have more than one UV map", name),
        MeshError::FaceCountMismatch { src, dest } => format!(
            "Number of faces is different from copied (src:{}, dest:{})",
            src, dest
        ),
        MeshError::SizeMismatch { .. } => format!("Some Object {}'s faces are different size", name),
        e => format!("Object {}: {}", name, e),
    }
}
