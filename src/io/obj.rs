//! Wavefront OBJ format support.
//!
//! Loading goes through [`tobj`] without triangulation, so quads and n-gons
//! keep their corners. When faces carry texture coordinates the loaded mesh
//! gets a UV layer named `UVMap` with one coordinate per corner. Objects and
//! groups in the file are merged into a single mesh.
//!
//! Saving writes one `vt` per loop of the active UV layer.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, HalfEdgeMesh, MeshIndex};

/// Name of the UV layer created for texture coordinates read from OBJ.
pub const UV_LAYER_NAME: &str = "UVMap";

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use uvkit::io::obj;
/// use uvkit::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    from_reader(BufReader::new(file)).map_err(|e| match e {
        MeshError::Io(_) => e,
        other => MeshError::LoadError {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    to_writer(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Parse OBJ text.
///
/// # Example
///
/// ```
/// use uvkit::io::obj;
/// use uvkit::mesh::HalfEdgeMesh;
///
/// let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";
/// let mesh: HalfEdgeMesh = obj::from_reader(text.as_bytes()).unwrap();
/// assert_eq!(mesh.num_faces(), 1);
/// assert!(mesh.find_uv_layer("UVMap").is_some());
/// ```
pub fn from_reader<R: BufRead, I: MeshIndex>(mut reader: R) -> Result<HalfEdgeMesh<I>> {
    let options = tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    // Materials are not used; a failing loader only drops them.
    let (models, _materials) =
        tobj::load_obj_buf(&mut reader, &options, |_| Err(tobj::LoadError::OpenFileFailed))?;

    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut polygons: Vec<Vec<usize>> = Vec::new();
    // Per-corner texture coordinates, parallel to `polygons`.
    let mut corner_uvs: Vec<Vec<Point2<f64>>> = Vec::new();
    let mut has_uvs = false;

    for model in &models {
        let m = &model.mesh;
        let offset = positions.len();
        positions.extend(m.positions.chunks_exact(3).map(|p| {
            Point3::new(f64::from(p[0]), f64::from(p[1]), f64::from(p[2]))
        }));

        let model_uvs = !m.texcoord_indices.is_empty();
        if model_uvs && m.texcoord_indices.len() != m.indices.len() {
            log::warn!(
                "object '{}' mixes faces with and without texture coordinates; UVs dropped",
                model.name
            );
        }
        let model_uvs = model_uvs && m.texcoord_indices.len() == m.indices.len();
        has_uvs |= model_uvs;

        let arities: Vec<usize> = if m.face_arities.is_empty() {
            vec![3; m.indices.len() / 3]
        } else {
            m.face_arities.iter().map(|&n| n as usize).collect()
        };

        let mut next = 0;
        for arity in arities {
            let corners = next..next + arity;
            next += arity;

            polygons.push(
                m.indices[corners.clone()]
                    .iter()
                    .map(|&v| offset + v as usize)
                    .collect(),
            );
            corner_uvs.push(if model_uvs {
                m.texcoord_indices[corners]
                    .iter()
                    .map(|&t| {
                        let t = t as usize;
                        Point2::new(f64::from(m.texcoords[2 * t]), f64::from(m.texcoords[2 * t + 1]))
                    })
                    .collect()
            } else {
                Vec::new()
            });
        }
    }

    let mut mesh = build_from_polygons(&positions, &polygons)?;

    if has_uvs {
        let layer = mesh.add_uv_layer(UV_LAYER_NAME)?;
        let face_ids: Vec<_> = mesh.face_ids().collect();
        for (f, uvs) in face_ids.into_iter().zip(&corner_uvs) {
            let loops: Vec<_> = mesh.face_loops(f).collect();
            for (he, &uv) in loops.into_iter().zip(uvs) {
                mesh.set_loop_uv(layer, he, uv);
            }
        }
    }

    log::debug!(
        "parsed OBJ: {} object(s), {} vertices, {} faces",
        models.len(),
        positions.len(),
        polygons.len()
    );
    Ok(mesh)
}

/// Write a mesh as OBJ text.
///
/// Texture coordinates come from the active UV layer, one per loop; without
/// a UV layer only positions and faces are written.
pub fn to_writer<W: Write, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, writer: &mut W) -> Result<()> {
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.num_vertices(),
        mesh.num_faces()
    )?;

    for v in mesh.vertex_ids() {
        let p = mesh.position(v);
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    let layer = mesh.active_uv_layer();
    if let Some(layer) = layer {
        for f in mesh.face_ids() {
            for he in mesh.face_loops(f) {
                let uv = mesh.loop_uv(layer, he);
                writeln!(writer, "vt {} {}", uv.x, uv.y)?;
            }
        }
    }

    let mut next_vt = 1;
    for f in mesh.face_ids() {
        write!(writer, "f")?;
        for he in mesh.face_loops(f) {
            let v = mesh.origin(he).index() + 1;
            if layer.is_some() {
                write!(writer, " {}/{}", v, next_vt)?;
                next_vt += 1;
            } else {
                write!(writer, " {}", v)?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::FaceId;
    use tempfile::TempDir;

    const QUAD_AND_TRIANGLE: &str = "\
# quad and triangle
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 2 0.5 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vt 0.5 0.5
f 1/1 2/2 3/3 4/4
f 2/2 5/5 3/3
";

    fn corner_uvs(mesh: &HalfEdgeMesh, f: usize) -> Vec<(f64, f64)> {
        let layer = mesh.active_uv_layer().unwrap();
        mesh.face_loops(FaceId::new(f))
            .map(|he| {
                let uv = mesh.loop_uv(layer, he);
                (uv.x, uv.y)
            })
            .collect()
    }

    #[test]
    fn test_read_polygons_with_uvs() {
        let mesh: HalfEdgeMesh = from_reader(QUAD_AND_TRIANGLE.as_bytes()).unwrap();

        assert_eq!(mesh.num_vertices(), 5);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.face_vertex_count(FaceId::new(0)), 4);
        assert_eq!(mesh.face_vertex_count(FaceId::new(1)), 3);
        assert_eq!(mesh.uv_layer(mesh.active_uv_layer().unwrap()).name(), UV_LAYER_NAME);
        assert_eq!(
            corner_uvs(&mesh, 0),
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
        );
        assert_eq!(corner_uvs(&mesh, 1), vec![(1.0, 0.0), (0.5, 0.5), (1.0, 1.0)]);
    }

    #[test]
    fn test_read_without_uvs() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let mesh: HalfEdgeMesh = from_reader(text.as_bytes()).unwrap();
        assert_eq!(mesh.num_faces(), 1);
        assert!(!mesh.has_uv_layers());
    }

    #[test]
    fn test_negative_indices() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf -3/-3 -2/-2 -1/-1\n";
        let mesh: HalfEdgeMesh = from_reader(text.as_bytes()).unwrap();
        assert_eq!(
            corner_uvs(&mesh, 0),
            vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
        );
    }

    #[test]
    fn test_objects_are_merged() {
        let text = "\
o First
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
o Second
v 5 0 0
v 6 0 0
v 6 1 0
v 5 1 0
vt 0.5 0.5
f 4/4 5/4 6/4 7/4
";
        let mesh: HalfEdgeMesh = from_reader(text.as_bytes()).unwrap();
        assert_eq!(mesh.num_vertices(), 7);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.face_vertex_count(FaceId::new(1)), 4);
        let first_corner = mesh.face_vertices(FaceId::new(1)).next().unwrap();
        assert_eq!(*mesh.position(first_corner), Point3::new(5.0, 0.0, 0.0));
        assert_eq!(corner_uvs(&mesh, 1), vec![(0.5, 0.5); 4]);
    }

    #[test]
    fn test_malformed_input() {
        let bad_number = "v 0 zero 0\n";
        assert!(matches!(
            from_reader::<_, u32>(bad_number.as_bytes()),
            Err(MeshError::Obj(_))
        ));

        let bad_texcoord = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/2 3/1\n";
        assert!(matches!(
            from_reader::<_, u32>(bad_texcoord.as_bytes()),
            Err(MeshError::Obj(_))
        ));

        let out_of_range = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
        assert!(matches!(
            from_reader::<_, u32>(out_of_range.as_bytes()),
            Err(MeshError::Obj(_))
        ));

        assert!(matches!(
            from_reader::<_, u32>("".as_bytes()),
            Err(MeshError::EmptyMesh)
        ));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.obj");
        std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n").unwrap();

        let result: Result<HalfEdgeMesh> = load(&path);
        assert!(matches!(result, Err(MeshError::LoadError { path: p, .. }) if p == path));
    }

    #[test]
    fn test_write_one_texcoord_per_loop() {
        let mesh: HalfEdgeMesh = from_reader(QUAD_AND_TRIANGLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        to_writer(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("vt ")).count(), 7);
        assert!(text.contains("f 1/1 2/2 3/3 4/4"));
        assert!(text.contains("f 2/5 5/6 3/7"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mesh.obj");

        let mesh: HalfEdgeMesh = from_reader(QUAD_AND_TRIANGLE.as_bytes()).unwrap();
        save(&mesh, &path).unwrap();
        let reloaded: HalfEdgeMesh = load(&path).unwrap();

        assert_eq!(reloaded.num_faces(), mesh.num_faces());
        for f in 0..mesh.num_faces() {
            assert_eq!(
                reloaded.face_vertex_count(FaceId::new(f)),
                mesh.face_vertex_count(FaceId::new(f))
            );
            assert_eq!(corner_uvs(&reloaded, f), corner_uvs(&mesh, f));
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result: Result<HalfEdgeMesh> = load(dir.path().join("missing.obj"));
        assert!(matches!(result, Err(MeshError::Io(_))));
    }
}
