//! Texture wrap across a bent strip of quads.

use nalgebra::{Point2, Point3};
use uvkit::ops::{
    register_builtin, TextureWrapOptions, TextureWrapRefer, TextureWrapSet, TextureWrapState,
    PROP_SELSEQ,
};
use uvkit::prelude::*;
use uvkit::registry::{ClassRegistry, PropertyStore, PropertyValue};

/// Three unit quads: flat, then bent up 90 degrees along `x = 2`.
///
/// Only face 0 has UVs, equal to its positions.
fn bent_strip() -> HalfEdgeMesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
        Point3::new(2.0, 1.0, 0.0),
        Point3::new(2.0, 0.0, 1.0),
        Point3::new(2.0, 1.0, 1.0),
    ];
    let faces = [[0, 2, 3, 1], [2, 4, 5, 3], [4, 6, 7, 5]];
    let mut mesh: HalfEdgeMesh = build_from_quads(&vertices, &faces).unwrap();
    let layer = mesh.add_uv_layer("UVMap").unwrap();
    for he in mesh.face_loops(FaceId::new(0)).collect::<Vec<_>>() {
        let p = *mesh.position(mesh.origin(he));
        mesh.set_loop_uv(layer, he, Point2::new(p.x, p.y));
    }
    mesh
}

fn face_uvs(mesh: &HalfEdgeMesh, f: usize) -> Vec<Point2<f64>> {
    let layer = mesh.active_uv_layer().unwrap();
    mesh.face_loops(FaceId::new(f))
        .map(|he| mesh.loop_uv(layer, he))
        .collect()
}

#[test]
fn wrap_sequence_unrolls_the_bend() {
    let mut operators = ClassRegistry::new();
    let mut properties = ClassRegistry::new();
    register_builtin(&mut operators, &mut properties).unwrap();
    let mut store = PropertyStore::new();
    properties.init_props(&mut store);
    store.set(PROP_SELSEQ, PropertyValue::Bool(true));

    let mut session = EditSession::new();
    let idx = session.add_object(MeshObject::new("Strip", bent_strip()));
    session.select_only(idx);
    session.set_mode(Mode::Edit);

    let mut state = TextureWrapState::new();
    session.object_mut(idx).unwrap().mesh.select_face(FaceId::new(0));
    assert!(TextureWrapRefer::poll(&session));
    assert!(TextureWrapRefer.execute(&session, &mut state).is_finished());

    let mesh = &mut session.object_mut(idx).unwrap().mesh;
    mesh.deselect_all();
    mesh.select_face(FaceId::new(1));
    mesh.select_face(FaceId::new(2));

    let set = TextureWrapSet::new(TextureWrapOptions::from_properties(&store));
    assert!(set.execute(&mut session, &mut state).is_finished());

    let mesh = &session.object(idx).unwrap().mesh;
    let expected = [
        vec![(2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (2.0, 1.0)],
        vec![(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0)],
    ];
    for (f, uvs) in [(2, &expected[0]), (1, &expected[1])] {
        for (uv, &(u, v)) in face_uvs(mesh, f).iter().zip(uvs.iter()) {
            assert!((uv - Point2::new(u, v)).norm() < 1e-12, "face {}: {:?}", f, uv);
        }
    }
    assert_eq!(state.reference().unwrap().face, FaceId::new(2));
}
