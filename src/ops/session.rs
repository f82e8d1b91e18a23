//! Edit session: the objects an operator works on.

use crate::mesh::HalfEdgeMesh;

/// Interaction mode of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Whole objects are manipulated.
    #[default]
    Object,
    /// Mesh elements of the selected objects are editable.
    Edit,
}

/// A named mesh object.
#[derive(Debug, Clone)]
pub struct MeshObject {
    /// Object name, used in reports.
    pub name: String,
    /// The object's mesh.
    pub mesh: HalfEdgeMesh,
    /// Whether the object is selected.
    pub selected: bool,
}

impl MeshObject {
    /// Create an unselected object.
    pub fn new(name: impl Into<String>, mesh: HalfEdgeMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            selected: false,
        }
    }
}

/// Objects, their mode and the active object.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    mode: Mode,
    objects: Vec<MeshObject>,
    active: Option<usize>,
}

impl EditSession {
    /// Create an empty session in object mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its position.
    ///
    /// The first object added becomes the active one.
    pub fn add_object(&mut self, object: MeshObject) -> usize {
        self.objects.push(object);
        let idx = self.objects.len() - 1;
        if self.active.is_none() {
            self.active = Some(idx);
        }
        idx
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// All objects.
    pub fn objects(&self) -> &[MeshObject] {
        &self.objects
    }

    /// Get an object by position.
    pub fn object(&self, idx: usize) -> Option<&MeshObject> {
        self.objects.get(idx)
    }

    /// Get an object by position, mutably.
    pub fn object_mut(&mut self, idx: usize) -> Option<&mut MeshObject> {
        self.objects.get_mut(idx)
    }

    /// Find an object by name.
    pub fn find_object(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.name == name)
    }

    /// Make an object active. Out-of-range positions clear the active object.
    pub fn set_active(&mut self, idx: usize) {
        self.active = (idx < self.objects.len()).then_some(idx);
    }

    /// The active object.
    pub fn active_object(&self) -> Option<&MeshObject> {
        self.active.and_then(|i| self.objects.get(i))
    }

    /// Select or deselect an object.
    pub fn set_selected(&mut self, idx: usize, selected: bool) {
        if let Some(object) = self.objects.get_mut(idx) {
            object.selected = selected;
        }
    }

    /// Select only the given object and make it active.
    pub fn select_only(&mut self, idx: usize) {
        for (i, object) in self.objects.iter_mut().enumerate() {
            object.selected = i == idx;
        }
        self.set_active(idx);
    }

    /// Selected objects, mutably.
    pub fn selected_objects_mut(&mut self) -> impl Iterator<Item = &mut MeshObject> + '_ {
        self.objects.iter_mut().filter(|o| o.selected)
    }

    /// Objects whose UVs may be edited: the selected ones, in edit mode only.
    pub fn uv_editable_objects(&self) -> impl Iterator<Item = &MeshObject> + '_ {
        let editing = self.mode == Mode::Edit;
        self.objects.iter().filter(move |o| editing && o.selected)
    }

    /// [`Self::uv_editable_objects`], mutably.
    pub fn uv_editable_objects_mut(&mut self) -> impl Iterator<Item = &mut MeshObject> + '_ {
        let editing = self.mode == Mode::Edit;
        self.objects
            .iter_mut()
            .filter(move |o| editing && o.selected)
    }

    /// Check whether any object's UVs may be edited.
    pub fn has_uv_editable_objects(&self) -> bool {
        self.uv_editable_objects().next().is_some()
    }
}
