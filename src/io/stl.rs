use crate::io::{IoError, ModelFile};
use crate::mesh::Mesh;
use crate::triangulated::{Facet, Triangulated3D};
use std::fmt::Write as _;
use std::io::Cursor;

/// Export to ASCII STL
/// Convert a shape to an **ASCII STL** string with the given `name`.
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {name}");

    shape.visit_triangles(|Facet { normal: n, vertices }| {
        let _ = writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z);
        out.push_str("    outer loop\n");
        for p in &vertices {
            let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// Binary STL has no room for a name; the 80 byte header is left blank.
pub fn to_stl_binary<T: Triangulated3D>(shape: &T) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();
    shape.visit_triangles(|Facet { normal: n, vertices }| {
        triangles.push(Triangle {
            normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
            vertices: vertices.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
        });
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// STL writer for meshes, binary unless `ascii` is set.
#[derive(Debug, Clone, Copy)]
pub struct StlFile<'a> {
    pub mesh: &'a Mesh,
    pub ascii: bool,
}

impl ModelFile for StlFile<'_> {
    fn extension(&self) -> &'static str {
        "stl"
    }

    fn to_bytes(&self, name: &str) -> Result<Vec<u8>, IoError> {
        if self.mesh.is_empty() {
            return Err(IoError::EmptyGeometry(name.to_string()));
        }
        if self.ascii {
            Ok(to_stl_ascii(self.mesh, name).into_bytes())
        } else {
            Ok(to_stl_binary(self.mesh)?)
        }
    }
}

impl Mesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn binary_stl_reads_back() {
        let cube = Mesh::cuboid(Vector3::new(1.0, 2.0, 3.0)).unwrap();
        let bytes = cube.to_stl_binary().unwrap();
        // header, count, 50 bytes per triangle
        assert_eq!(bytes.len(), 84 + 12 * 50);
        let mut reader = Cursor::new(bytes);
        let indexed = stl_io::read_stl(&mut reader).unwrap();
        assert_eq!(indexed.faces.len(), 12);
        assert_eq!(indexed.vertices.len(), 8);
    }

    #[test]
    fn ascii_stl_names_the_solid() {
        let cube = Mesh::cuboid(Vector3::new(1.0, 1.0, 1.0)).unwrap();
        let text = cube.to_stl_ascii("cube");
        assert!(text.starts_with("solid cube\n"));
        assert!(text.ends_with("endsolid cube\n"));
        assert_eq!(text.matches("facet normal").count(), 12);
    }

    #[test]
    fn empty_mesh_is_not_exported() {
        let empty = Mesh::new();
        let file = StlFile {
            mesh: &empty,
            ascii: false,
        };
        assert!(matches!(file.to_bytes("x"), Err(IoError::EmptyGeometry(_))));
    }
}
