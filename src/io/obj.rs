//! Wavefront OBJ export of tile map meshes
//!
//! Every vertex and texture coordinate is written so that OBJ indices line
//! up with the mesh buffers; faces are only emitted for visible quads.

use std::io::Write;
use std::path::Path;

use crate::io::configuration::{QUAD_INDEX_COUNT, QUAD_VERTEX_COUNT};
use crate::io::error::{Result, WithPath};
use crate::mesh::buffers::MeshBuffers;

/// Mesh statistics returned by export functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStats {
    /// Number of vertices written
    pub vertex_count: usize,
    /// Number of triangles written
    pub triangle_count: usize,
    /// Number of reserved quad slots
    pub quad_count: usize,
    /// Number of quads that emit triangles
    pub visible_quad_count: usize,
}

/// Write a mesh as OBJ text
///
/// # Errors
///
/// Returns an error if writing fails
pub fn export_obj<W: Write>(mesh: &MeshBuffers, writer: &mut W) -> Result<MeshStats> {
    let visible_quad_count = mesh.visible_quad_count();
    writeln!(writer, "# paratile OBJ export")?;
    writeln!(
        writer,
        "# {} quads, {} visible",
        mesh.quad_count(),
        visible_quad_count
    )?;
    writeln!(writer)?;

    for [x, y, z] in mesh.vertices() {
        writeln!(writer, "v {x} {y} {z}")?;
    }
    for [u, v] in mesh.uvs() {
        writeln!(writer, "vt {u} {v}")?;
    }
    writeln!(writer)?;

    let mut triangle_count = 0;
    for (slot, indices) in mesh
        .triangle_indices()
        .chunks_exact(QUAD_INDEX_COUNT)
        .enumerate()
    {
        if !mesh.is_quad_visible(slot) {
            continue;
        }
        for triangle in indices.chunks_exact(3) {
            // OBJ uses 1-based indexing
            write!(writer, "f")?;
            for index in triangle {
                let index = index + 1;
                write!(writer, " {index}/{index}")?;
            }
            writeln!(writer)?;
            triangle_count += 1;
        }
    }

    Ok(MeshStats {
        vertex_count: mesh.quad_count() * QUAD_VERTEX_COUNT,
        triangle_count,
        quad_count: mesh.quad_count(),
        visible_quad_count,
    })
}

/// Write a mesh to an OBJ file
///
/// # Errors
///
/// Returns an error if the parent directory or file cannot be created or written
pub fn export_obj_to_file(mesh: &MeshBuffers, path: &Path) -> Result<MeshStats> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_path(parent, "create directory")?;
        }
    }
    let file = std::fs::File::create(path).with_path(path, "create mesh file")?;
    let mut writer = std::io::BufWriter::new(file);
    let stats = export_obj(mesh, &mut writer).with_path(path, "write mesh file")?;
    writer.flush().with_path(path, "write mesh file")?;
    Ok(stats)
}
