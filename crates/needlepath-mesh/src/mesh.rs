//! Indexed polygon mesh.

use needlepath_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

use crate::bbox::Aabb3;
use crate::error::{MeshError, Result};
use crate::triangle::Triangle;

/// Indexed surface mesh.
///
/// Cells are stored as general polygons so that inputs carrying quads or
/// strips can be represented faithfully; consumers that need triangles ask
/// for them through [`Mesh::triangle`], which reports non-triangular cells
/// instead of splitting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Cells as lists of vertex indices.
    pub cells: Vec<Vec<u32>>,
    /// Per-vertex normals. Empty until [`Mesh::recompute_normals`] runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<Vec3>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from vertices and triangle index triples.
    pub fn from_triangles(vertices: Vec<Point3>, triangles: &[[u32; 3]]) -> Self {
        Self {
            vertices,
            cells: triangles.iter().map(|t| t.to_vec()).collect(),
            normals: Vec::new(),
        }
    }

    /// Create a mesh from flat buffers: `[x0, y0, z0, x1, ...]` positions and
    /// `[i0, i1, i2, ...]` triangle indices.
    pub fn from_flat(positions: &[f32], indices: &[u32]) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::MalformedBuffer(format!(
                "position buffer length {} is not a multiple of 3",
                positions.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::MalformedBuffer(format!(
                "index buffer length {} is not a multiple of 3",
                indices.len()
            )));
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0] as f64, c[1] as f64, c[2] as f64))
            .collect();
        let cells = indices.chunks_exact(3).map(|c| c.to_vec()).collect();

        Ok(Self {
            vertices,
            cells,
            normals: Vec::new(),
        })
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of cells (of any arity).
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// True if the mesh has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check that all coordinates are finite and all cell indices are valid.
    pub fn validate(&self) -> Result<()> {
        for (i, v) in self.vertices.iter().enumerate() {
            if !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()) {
                return Err(MeshError::NonFiniteVertex(i));
            }
        }
        let vertex_count = self.vertices.len();
        for (cell, indices) in self.cells.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    cell,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Get cell `cell` as a triangle.
    pub fn triangle(&self, cell: usize) -> Result<Triangle> {
        let indices = self.cells.get(cell).ok_or(MeshError::MissingCell(cell))?;
        if indices.len() != 3 {
            return Err(MeshError::NonTriangularCell {
                cell,
                len: indices.len(),
            });
        }
        let vertex = |index: u32| {
            self.vertices
                .get(index as usize)
                .copied()
                .ok_or(MeshError::IndexOutOfRange {
                    cell,
                    index,
                    vertex_count: self.vertices.len(),
                })
        };
        Ok(Triangle::new(
            vertex(indices[0])?,
            vertex(indices[1])?,
            vertex(indices[2])?,
        ))
    }

    /// Iterate over all cells as triangles, in cell order.
    pub fn triangles(&self) -> impl Iterator<Item = (usize, Result<Triangle>)> + '_ {
        (0..self.cells.len()).map(move |cell| (cell, self.triangle(cell)))
    }

    /// Total area of all triangular cells. Other cells are ignored.
    pub fn total_surface_area(&self) -> f64 {
        self.triangles()
            .filter_map(|(_, tri)| tri.ok())
            .map(|tri| tri.area())
            .sum()
    }

    /// Bounding box of all vertices, or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<Aabb3> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut aabb = Aabb3::empty();
        for v in &self.vertices {
            aabb.include_point(v);
        }
        Some(aabb)
    }

    /// For each vertex, the cells that reference it.
    pub fn vertex_cells(&self) -> Vec<Vec<usize>> {
        let mut vertex_cells = vec![Vec::new(); self.vertices.len()];
        for (cell, indices) in self.cells.iter().enumerate() {
            for &v in indices {
                if let Some(list) = vertex_cells.get_mut(v as usize) {
                    list.push(cell);
                }
            }
        }
        vertex_cells
    }

    /// Recompute per-vertex normals from triangular cells (area-weighted).
    ///
    /// Vertex order and count are preserved. Vertices touched by no
    /// triangle get a zero normal.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vec3::zeros(); self.vertices.len()];

        for (cell, tri) in self.triangles() {
            let Ok(tri) = tri else { continue };
            // Length of the scaled normal is 2 * area, which gives the weighting.
            let weighted = tri.scaled_normal();
            for &vi in &self.cells[cell] {
                normals[vi as usize] += weighted;
            }
        }

        for normal in &mut normals {
            let len = normal.norm();
            if len > f64::EPSILON {
                *normal /= len;
            }
        }

        self.normals = normals;
    }

    /// Return a copy of this mesh with freshly computed normals.
    pub fn with_normals(&self) -> Self {
        let mut mesh = self.clone();
        mesh.recompute_normals();
        mesh
    }
}
