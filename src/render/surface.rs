//! Display surfaces that receive published meshes
//!
//! A surface holds a reference-counted handle to the renderer's live mesh.
//! The renderer keeps the only mutable path to the buffers; surfaces read
//! them. Clearing the binding drops the surface's handle so the geometry is
//! freed once the renderer releases its own.

use std::cell::RefCell;
use std::rc::Rc;

use crate::mesh::buffers::MeshBuffers;

/// Shared handle to a live mesh
pub type SharedMesh = Rc<RefCell<MeshBuffers>>;

/// Receiver of built or patched meshes
pub trait DisplaySurface {
    /// Bind (or re-bind after a patch) the mesh to draw
    fn present(&mut self, mesh: &SharedMesh);

    /// Drop the current binding
    fn clear(&mut self);
}

/// In-memory surface that records the bound mesh
#[derive(Debug, Default)]
pub struct MeshSlot {
    mesh: Option<SharedMesh>,
    presentations: usize,
}

impl MeshSlot {
    /// Create an unbound slot
    pub const fn new() -> Self {
        Self {
            mesh: None,
            presentations: 0,
        }
    }

    /// Currently bound mesh
    pub const fn mesh(&self) -> Option<&SharedMesh> {
        self.mesh.as_ref()
    }

    /// Check whether a mesh is bound
    pub const fn is_bound(&self) -> bool {
        self.mesh.is_some()
    }

    /// Number of times a mesh was presented
    pub const fn presentations(&self) -> usize {
        self.presentations
    }
}

impl DisplaySurface for MeshSlot {
    fn present(&mut self, mesh: &SharedMesh) {
        self.mesh = Some(Rc::clone(mesh));
        self.presentations += 1;
    }

    fn clear(&mut self) {
        self.mesh = None;
    }
}
