//! Wrap a texture across faces one shared edge at a time.
//!
//! [`TextureWrapRefer`] remembers one selected face as the reference.
//! [`TextureWrapSet`] then extends the reference's UV layout onto an
//! adjacent selected face with [`wrap_face`]. In selection-sequence mode
//! every face in the selection history is wrapped in turn, each one serving
//! as the reference for the next.

use crate::algo::wrap::wrap_face;
use crate::error::MeshError;
use crate::mesh::FaceId;
use crate::registry::{PropertyClass, PropertyStore, PropertyValue};

use super::report::OperatorResult;
use super::session::EditSession;
use super::OperatorClass;

/// Property: whether the texture wrap panel section is expanded.
pub const PROP_ENABLED: &str = "texture_wrap_enabled";
/// Property: make the last wrapped face the new reference.
pub const PROP_SET_AND_REFER: &str = "texture_wrap_set_and_refer";
/// Property: wrap the selection history in order.
pub const PROP_SELSEQ: &str = "texture_wrap_selseq";

/// Property group of the texture wrap operators.
pub const PROPERTIES: PropertyClass = PropertyClass {
    init_props,
    del_props,
};

fn init_props(store: &mut PropertyStore) {
    store.set(PROP_ENABLED, PropertyValue::Bool(false));
    store.set(PROP_SET_AND_REFER, PropertyValue::Bool(true));
    store.set(PROP_SELSEQ, PropertyValue::Bool(false));
}

fn del_props(store: &mut PropertyStore) {
    store.remove(PROP_ENABLED);
    store.remove(PROP_SET_AND_REFER);
    store.remove(PROP_SELSEQ);
}

const MSG_ONE_OBJECT: &str = "Must edit exactly one object";
const MSG_NO_UV_MAP: &str = "Object must have more than one UV map";
const MSG_ONE_FACE: &str = "Must select only one face";

/// The face remembered by [`TextureWrapRefer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFace {
    /// Name of the object owning the face.
    pub object: String,
    /// The reference face.
    pub face: FaceId,
}

/// Reference shared between the refer and set operators.
#[derive(Debug, Clone, Default)]
pub struct TextureWrapState {
    reference: Option<ReferenceFace>,
}

impl TextureWrapState {
    /// Create a state without a reference.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current reference face.
    pub fn reference(&self) -> Option<&ReferenceFace> {
        self.reference.as_ref()
    }

    /// Forget the reference face.
    pub fn clear(&mut self) {
        self.reference = None;
    }
}

/// Options for [`TextureWrapSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureWrapOptions {
    /// After setting, use the last target as the next reference.
    pub set_and_refer: bool,

    /// Wrap every face of the selection history instead of the single
    /// selected face.
    pub selection_sequence: bool,
}

impl Default for TextureWrapOptions {
    fn default() -> Self {
        Self {
            set_and_refer: true,
            selection_sequence: false,
        }
    }
}

impl TextureWrapOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether the last target becomes the reference.
    pub fn with_set_and_refer(mut self, set_and_refer: bool) -> Self {
        self.set_and_refer = set_and_refer;
        self
    }

    /// Set whether the selection history is wrapped in order.
    pub fn with_selection_sequence(mut self, selection_sequence: bool) -> Self {
        self.selection_sequence = selection_sequence;
        self
    }

    /// Defaults overridden by stored properties.
    pub fn from_properties(store: &PropertyStore) -> Self {
        let defaults = Self::default();
        Self {
            set_and_refer: store
                .get_bool(PROP_SET_AND_REFER)
                .unwrap_or(defaults.set_and_refer),
            selection_sequence: store
                .get_bool(PROP_SELSEQ)
                .unwrap_or(defaults.selection_sequence),
        }
    }
}

/// Operator storing the selected face as the wrap reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureWrapRefer;

impl TextureWrapRefer {
    /// Registration metadata.
    pub const CLASS: OperatorClass = OperatorClass {
        idname: "uv.texture_wrap_refer",
        label: "Refer",
        description: "Refer UV",
    };

    /// Whether the operator can run: exactly one object in edit mode.
    pub fn poll(session: &EditSession) -> bool {
        session.uv_editable_objects().count() == 1
    }

    /// Remember the single selected face of the edited object.
    pub fn execute(&self, session: &EditSession, state: &mut TextureWrapState) -> OperatorResult {
        let mut editable = session.uv_editable_objects();
        let (Some(object), None) = (editable.next(), editable.next()) else {
            return OperatorResult::cancelled(MSG_ONE_OBJECT);
        };

        if !object.mesh.has_uv_layers() {
            return OperatorResult::cancelled(MSG_NO_UV_MAP);
        }
        let selected: Vec<FaceId> = object.mesh.selected_faces().collect();
        let [face] = selected[..] else {
            return OperatorResult::cancelled(MSG_ONE_FACE);
        };

        log::debug!("texture wrap reference: {} face {}", object.name, face.index());
        state.reference = Some(ReferenceFace {
            object: object.name.clone(),
            face,
        });
        OperatorResult::finished()
    }
}

/// Operator wrapping the reference UVs onto the selected face(s).
#[derive(Debug, Clone, Default)]
pub struct TextureWrapSet {
    /// Operator parameters.
    pub options: TextureWrapOptions,
}

impl TextureWrapSet {
    /// Registration metadata.
    pub const CLASS: OperatorClass = OperatorClass {
        idname: "uv.texture_wrap_set",
        label: "Set",
        description: "Set UV",
    };

    /// Create the operator with the given parameters.
    pub fn new(options: TextureWrapOptions) -> Self {
        Self { options }
    }

    /// Whether the operator can run: a reference exists and exactly one
    /// object is in edit mode.
    pub fn poll(session: &EditSession, state: &TextureWrapState) -> bool {
        state.reference.is_some() && TextureWrapRefer::poll(session)
    }

    /// Wrap the reference onto the selected face, or onto the selection
    /// history in order.
    ///
    /// In sequence mode, faces wrapped before a failing one keep their UVs.
    pub fn execute(&self, session: &mut EditSession, state: &mut TextureWrapState) -> OperatorResult {
        let Some(reference) = state.reference.clone() else {
            return OperatorResult::cancelled("Must refer a face first");
        };
        let mut editable = session.uv_editable_objects_mut();
        let (Some(object), None) = (editable.next(), editable.next()) else {
            return OperatorResult::cancelled(MSG_ONE_OBJECT);
        };

        let mesh = &mut object.mesh;
        let Some(layer) = mesh.active_uv_layer() else {
            return OperatorResult::cancelled(MSG_NO_UV_MAP);
        };

        let targets: Vec<FaceId> = if self.options.selection_sequence {
            let history: Vec<FaceId> = mesh.selection_history().collect();
            if history.is_empty() {
                return OperatorResult::cancelled("Must select more than one face");
            }
            history
        } else {
            let selected: Vec<FaceId> = mesh.selected_faces().collect();
            if selected.len() != 1 {
                return OperatorResult::cancelled(MSG_ONE_FACE);
            }
            selected
        };

        let mut ref_face = reference.face;
        for &target in &targets {
            if ref_face == target {
                return OperatorResult::cancelled("Must select different face");
            }
            if reference.object != object.name {
                return OperatorResult::cancelled("Object must be same");
            }
            if ref_face.index() >= mesh.num_faces() {
                return OperatorResult::cancelled("Invalid reference face");
            }
            if let Err(e) = wrap_face(mesh, layer, ref_face, target) {
                return OperatorResult::cancelled(wrap_failure_message(&e));
            }
            ref_face = target;
        }

        if self.options.set_and_refer {
            state.reference = Some(ReferenceFace {
                object: object.name.clone(),
                face: ref_face,
            });
        }
        OperatorResult::finished()
    }
}

fn wrap_failure_message(err: &MeshError) -> String {
    match err {
        MeshError::SharedVertexCount { .. } => "2 vertices must be shared among faces".to_string(),
        MeshError::NoUnsharedVertex { .. } => "More than 1 vertex must be unshared".to_string(),
        MeshError::InvalidReferenceFace { .. } => "Invalid reference face".to_string(),
        e => e.to_string(),
    }
}
