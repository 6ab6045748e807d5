//! Triangle mesh storage, loaded from Wavefront OBJ text through `tobj`.
//!
//! ```text
//! v 0.5 -0.5 0.25      vertex position
//! f 1 2 3              face, 1-based vertex indices
//! f 4/1/1 5/2/1 6/3/1  texture and normal indices are ignored
//! ```
//!
//! Only positions and faces are kept. Polygons contribute their first three
//! vertices, and every object or group in the file is merged into one mesh.
//! Vertices no face refers to are dropped, so face indices refer to the
//! loaded vertex list rather than to line numbers in the file.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{info, warn};

use crate::math::{Vec3f, Vector};

/// A triangular face referencing three vertices by 1-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Face {
    pub const fn new(a: usize, b: usize, c: usize) -> Self {
        Self { a, b, c }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

#[derive(Debug)]
pub enum LoadError {
    /// The file could not be read.
    Io(io::Error),
    /// The text is not valid OBJ, or a face refers to a missing vertex.
    Obj(tobj::LoadError),
    /// A face refers to a vertex that does not exist. `face` is the
    /// position of the face in the mesh; `index` is 1-based as written.
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read mesh: {e}"),
            LoadError::Obj(e) => write!(f, "failed to parse mesh: {e}"),
            LoadError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            } => write!(
                f,
                "face {face} references vertex {index}, but the mesh has {vertex_count} vertices"
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Obj(e) => Some(e),
            LoadError::FaceIndexOutOfRange { .. } => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}

/// Polygons are kept whole so that their first three vertices, not a fan,
/// become the face. Point and line elements are not faces.
fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: false,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Vertex positions plus the faces connecting them. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3f>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3f>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Reads and validates a mesh file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let mesh = Self::read(&mut reader)?;
        info!(
            "Loaded {}: {} vertices, {} faces",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }

    /// Like [`Mesh::load`], but a failure is logged and yields an empty mesh.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            warn!("Cannot load mesh {}: {e}", path.display());
            Self::default()
        })
    }

    /// Parses and validates mesh text held in memory.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        Self::read(&mut text.as_bytes())
    }

    fn read<B: BufRead>(reader: &mut B) -> Result<Self, LoadError> {
        // Material libraries are never opened; a missing one is not an error
        // for geometry.
        let (models, _materials) = tobj::load_obj_buf(reader, &load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;

        let mut mesh = Self::default();
        for model in &models {
            mesh.append(&model.name, &model.mesh);
        }
        mesh.validate()?;
        Ok(mesh)
    }

    /// Appends one OBJ object, shifting its model-local indices past the
    /// vertices already stored.
    fn append(&mut self, name: &str, obj: &tobj::Mesh) {
        let base = self.vertices.len();
        self.vertices.extend(
            obj.positions
                .chunks_exact(3)
                .map(|p| Vector::new([p[0], p[1], p[2]])),
        );

        let face = |corners: &[u32]| match corners {
            [a, b, c, ..] => Some(Face::new(
                base + *a as usize + 1,
                base + *b as usize + 1,
                base + *c as usize + 1,
            )),
            _ => None,
        };

        // No arities means every face is a triangle.
        if obj.face_arities.is_empty() {
            self.faces.extend(obj.indices.chunks_exact(3).filter_map(face));
            return;
        }

        let mut start = 0;
        for &arity in &obj.face_arities {
            let end = start + arity as usize;
            match obj.indices.get(start..end).and_then(face) {
                Some(f) => self.faces.push(f),
                None => warn!("Skipping {arity}-vertex face in object '{name}'"),
            }
            start = end;
        }
    }

    /// Checks that every face index lies in `1..=vertex_count`.
    pub fn validate(&self) -> Result<(), LoadError> {
        let vertex_count = self.vertices.len();
        for (face, f) in self.faces.iter().enumerate() {
            if let Some(&index) = f
                .indices()
                .iter()
                .find(|&&i| i == 0 || i > vertex_count)
            {
                return Err(LoadError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    pub fn vertices(&self) -> &[Vec3f] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Resolves a face's 1-based indices to positions.
    ///
    /// Returns `None` if any index is out of range, which cannot happen for
    /// a validated mesh.
    pub fn face_vertices(&self, face: &Face) -> Option<[Vec3f; 3]> {
        let get = |i: usize| i.checked_sub(1).and_then(|i| self.vertices.get(i)).copied();
        Some([get(face.a)?, get(face.b)?, get(face.c)?])
    }
}
