//! Mesh processing algorithms.
//!
//! - **Transfer**: copy per-loop UV coordinates, pin flags and seams between
//!   face sets with flip/rotate of each face's loop order
//! - **Wrap**: extend a face's UV layout onto an adjacent face across their
//!   shared edge

pub mod transfer;
pub mod wrap;
