//! Host-facing operators.
//!
//! Operators run over an [`EditSession`] and return an [`OperatorResult`]
//! with a status and user-facing reports instead of propagating errors:
//!
//! | Operator | Works on | Effect |
//! |----------|----------|--------|
//! | [`FlipRotateUv`] | selected objects in edit mode | flip/rotate UVs of selected faces |
//! | [`CopyUvObject`] | active object | snapshot UVs into a [`UvClipboard`] |
//! | [`PasteUvObject`] | selected objects | write the clipboard onto each object |
//! | [`TextureWrapRefer`] | the one object in edit mode | remember the selected face |
//! | [`TextureWrapSet`] | the one object in edit mode | wrap the reference UVs onto adjacent faces |
//!
//! [`register_builtin`] adds these operators and their property groups to
//! explicit registries.

mod copy_paste;
mod flip_rotate;
mod report;
mod session;
mod texture_wrap;

pub use copy_paste::{
    CopyUvObject, CopyUvOptions, PasteUvObject, PasteUvOptions, UvClipboard, UvMapSelection,
    DEFAULT_UV_MAP_NAME, PROP_COPY_SEAMS,
};
pub use flip_rotate::{
    flip_rotate_selected, FlipRotateOptions, FlipRotateUv, MAX_ROTATE, PROP_ENABLED, PROP_SEAMS,
};
pub use report::{OperatorResult, OperatorStatus, Report, ReportLevel};
pub use session::{EditSession, MeshObject, Mode};
pub use texture_wrap::{
    ReferenceFace, TextureWrapOptions, TextureWrapRefer, TextureWrapSet, TextureWrapState,
    PROP_SELSEQ, PROP_SET_AND_REFER,
};

use crate::error::Result;
use crate::registry::{ClassRegistry, PropertyClass};

/// Registration metadata of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorClass {
    /// Unique identifier.
    pub idname: &'static str,
    /// Display name.
    pub label: &'static str,
    /// Tooltip text.
    pub description: &'static str,
}

/// Add the built-in operators and property groups to the registries.
///
/// # Example
///
/// ```
/// use uvkit::ops::register_builtin;
/// use uvkit::registry::{ClassRegistry, PropertyStore};
///
/// let mut operators = ClassRegistry::new();
/// let mut properties = ClassRegistry::new();
/// register_builtin(&mut operators, &mut properties).unwrap();
/// assert_eq!(operators.len(), 5);
///
/// let mut store = PropertyStore::new();
/// properties.init_props(&mut store);
/// assert_eq!(store.get_bool("flip_rotate_uv_seams"), Some(true));
/// ```
pub fn register_builtin(
    operators: &mut ClassRegistry<OperatorClass>,
    properties: &mut ClassRegistry<PropertyClass>,
) -> Result<()> {
    for class in [
        FlipRotateUv::CLASS,
        CopyUvObject::CLASS,
        PasteUvObject::CLASS,
        TextureWrapRefer::CLASS,
        TextureWrapSet::CLASS,
    ] {
        operators.add(class.idname, class, false)?;
    }
    properties.add("flip_rotate_uv", flip_rotate::PROPERTIES, false)?;
    properties.add("copy_paste_uv_object", copy_paste::PROPERTIES, false)?;
    properties.add("texture_wrap", texture_wrap::PROPERTIES, false)?;
    Ok(())
}
