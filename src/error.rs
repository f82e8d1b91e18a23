//! Error types for uvkit.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh and UV operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three corners or repeats a vertex.
    #[error("face {face} is degenerate (fewer than 3 corners or duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// The same directed edge is used by more than one face.
    #[error("edge ({v0}, {v1}) has more than two incident faces or inconsistent winding")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The mesh has no UV layer at all.
    #[error("mesh has no UV map")]
    NoUvLayer,

    /// A UV layer with the given name does not exist.
    #[error("UV map '{name}' not found")]
    UvLayerNotFound {
        /// The requested layer name.
        name: String,
    },

    /// A UV layer with the given name already exists.
    #[error("UV map '{name}' already exists")]
    DuplicateUvLayer {
        /// The conflicting layer name.
        name: String,
    },

    /// A paired source and destination face have different loop counts.
    #[error("face {face} has {dest} loops but its source face has {src}")]
    SizeMismatch {
        /// Index of the destination face.
        face: usize,
        /// Loop count of the source face.
        src: usize,
        /// Loop count of the destination face.
        dest: usize,
    },

    /// One-to-one transfer between collections of different length.
    #[error("number of faces is different from copied (src:{src}, dest:{dest})")]
    FaceCountMismatch {
        /// Number of source faces.
        src: usize,
        /// Number of destination faces.
        dest: usize,
    },

    /// No face was available to operate on.
    #[error("no faces are selected")]
    EmptySelection,

    /// A rotation at or beyond the face valence was rejected.
    #[error("cannot rotate face {face} by {rotate}: face has only {valence} loops")]
    RotateOverflow {
        /// Index of the face.
        face: usize,
        /// Requested rotation.
        rotate: usize,
        /// Loop count of the face.
        valence: usize,
    },

    /// Reference and target faces do not share exactly one edge's vertices.
    #[error("2 vertices must be shared among faces (found {shared})")]
    SharedVertexCount {
        /// Number of shared vertices found.
        shared: usize,
    },

    /// Every vertex of the face lies on the shared edge.
    #[error("face {face} has no vertex off the shared edge")]
    NoUnsharedVertex {
        /// Index of the face.
        face: usize,
    },

    /// The reference face gives no usable mapping from surface to UV space.
    #[error("face {face} cannot be used as a reference")]
    InvalidReferenceFace {
        /// Index of the face.
        face: usize,
    },

    /// Paste was requested before anything was copied.
    #[error("UV coordinates must be copied first")]
    ClipboardEmpty,

    /// A class or property group is already registered under this identifier.
    #[error("{idname} is already registered")]
    DuplicateRegistration {
        /// The duplicated identifier.
        idname: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed OBJ data.
    #[error("invalid OBJ data: {0}")]
    Obj(#[from] tobj::LoadError),

    /// Error loading mesh from file.
    #[error("failed to load mesh from {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
