use crate::{
    bsp::{textures::normalize_name, BspLevel},
    error::BspResult,
    materials::{MaterialBinder, MaterialRegistry},
    scene::{Mesh, Model, Vertex, VertexColor},
};

/// Rebuilds the world geometry of a level as one model.
///
/// Meshes come out in model then mesh order, each with its own vertices and
/// one bound material. Meshes with no triangles are skipped.
pub fn build_model<R: MaterialRegistry + ?Sized>(
    level: &BspLevel,
    name: &str,
    binder: &MaterialBinder<R>,
) -> BspResult<Model> {
    let mut model = Model::new(name);

    for bsp_model in &level.models {
        for mesh_index in bsp_model.mesh_range() {
            let bsp_mesh = level.mesh(mesh_index)?;
            if bsp_mesh.face_count == 0 {
                continue;
            }

            let material = level.material(bsp_mesh.material_index as usize)?;
            let texture_name = level.texture_name(bsp_mesh)?;
            let key = normalize_name(&texture_name);

            let layout = bsp_mesh.vertex_layout();
            let vertex_offset = material.vertex_offset as usize;
            let faces = level.faces_for(bsp_mesh)?;

            let mut mesh = Mesh {
                vertices: Vec::with_capacity(faces.len()),
                faces: Vec::with_capacity(faces.len() / 3),
                material_index: binder.bind(&key, &mut model),
            };

            for tri in faces.chunks_exact(3) {
                for &face in tri {
                    let record = level
                        .vertex_lumps
                        .resolve(layout, face as usize + vertex_offset)?;

                    mesh.push_vertex(Vertex {
                        position: level.position(record.position_index())?,
                        normal: level.normal(record.normal_index())?,
                        color: VertexColor::default(),
                        uv: record.uv(),
                    });
                }
                mesh.push_tri();
            }

            model.meshes.push(mesh);
        }
    }

    log::debug!(
        "Built {} with {} meshes, {} vertices, {} triangles",
        name,
        model.meshes.len(),
        model.vertex_count(),
        model.face_count()
    );

    Ok(model)
}

#[cfg(test)]
mod meshes_tests {
    use bytemuck::Zeroable;
    use glam::{vec2, vec3, Vec2};

    use super::*;
    use crate::{
        bsp::{
            consts::LumpType,
            mesh::BspMesh,
            model::BspModel,
            textures::BspMaterial,
            vertex::{VertexLitBump, VertexLitFlat, VertexUnlit, VertexUnlitTs},
        },
        error::BspError,
        materials::{ExtractedMaterial, MaterialEntry, MaterialTable},
        test_utils::quad_level,
    };

    fn build(level: &BspLevel, table: &MaterialTable) -> BspResult<Model> {
        let binder = MaterialBinder::new(table, "out/_images");
        build_model(level, "mp_test", &binder)
    }

    #[test]
    fn quad_with_unknown_material() {
        let level = BspLevel::load(&mut quad_level("concrete").open()).unwrap();
        let model = build(&level, &MaterialTable::default()).unwrap();

        assert_eq!(model.name, "mp_test");
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.materials.len(), 1);

        let material = &model.materials[0];
        assert_eq!(material.name, "concrete");
        assert_eq!(material.hash, 0xDEADBEEF);
        assert!(material.slots.is_empty());

        let mesh = &model.meshes[0];
        assert_eq!(mesh.material_index, 0);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(mesh.vertices[4].position, vec3(1.0, 1.0, 0.0));
        assert_eq!(mesh.vertices[4].uv, vec2(1.0, 1.0));
        assert_eq!(mesh.vertices[5].normal, vec3(0.0, 0.0, 1.0));
    }

    #[test]
    fn quad_with_known_material() {
        let mut table = MaterialTable::default();
        table.insert(MaterialEntry {
            name: "Concrete".to_owned(),
            hash: 0x42,
            textures: ExtractedMaterial {
                albedo: Some("concrete_col.png".to_owned()),
                ..Default::default()
            },
        });

        let level =
            BspLevel::load(&mut quad_level("world/dev/CONCRETE.vmt").open()).unwrap();
        let model = build(&level, &table).unwrap();

        let material = &model.materials[0];
        assert_eq!(material.name, "Concrete");
        assert_eq!(material.hash, 0x42);
        assert_eq!(material.slots.len(), 1);
    }

    #[test]
    fn empty_meshes_are_skipped() {
        let mut level = BspLevel::load(&mut quad_level("concrete").open()).unwrap();
        level.meshes.insert(
            0,
            BspMesh {
                face_count: 0,
                // would be out of range if it were looked at
                material_index: 40,
                ..BspMesh::zeroed()
            },
        );
        level.models[0].mesh_count = 2;

        let model = build(&level, &MaterialTable::default()).unwrap();
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.materials.len(), 1);
    }

    #[test]
    fn triangle_indices_stay_in_mesh() {
        let mut level = BspLevel::load(&mut quad_level("concrete").open()).unwrap();
        // a second model reusing the same mesh
        level.models.push(level.models[0]);

        let model = build(&level, &MaterialTable::default()).unwrap();
        assert_eq!(model.meshes.len(), 2);
        assert_eq!(model.materials.len(), 2);
        assert_eq!(model.meshes[1].material_index, 1);

        for mesh in &model.meshes {
            for face in &mesh.faces {
                for &i in face {
                    assert!((i as usize) < mesh.vertices.len());
                }
            }
        }
    }

    #[test]
    fn decoding_is_deterministic() {
        let builder = quad_level("concrete");
        let a = build(
            &BspLevel::load(&mut builder.open()).unwrap(),
            &MaterialTable::default(),
        )
        .unwrap();
        let b = build(
            &BspLevel::load(&mut builder.open()).unwrap(),
            &MaterialTable::default(),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn streamed_and_inline_match() {
        let inline = quad_level("concrete");
        let streamed = inline.clone().streamed(true);

        let a = build(
            &BspLevel::load(&mut inline.open()).unwrap(),
            &MaterialTable::default(),
        )
        .unwrap();
        let b = build(
            &BspLevel::load(&mut streamed.open()).unwrap(),
            &MaterialTable::default(),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn faces_are_offset_by_material() {
        let vertices: Vec<VertexLitFlat> = (0..6)
            .map(|i| VertexLitFlat {
                position_index: i % 4,
                normal_index: 0,
                uv: vec2(i as f32, 0.0),
                unknown: 0,
            })
            .collect();
        let level = BspLevel::load(
            &mut quad_level("concrete")
                .records(LumpType::VertexLitFlat, &vertices)
                .records(
                    LumpType::Materials,
                    &[BspMaterial {
                        vertex_offset: 2,
                        ..BspMaterial::zeroed()
                    }],
                )
                .open(),
        )
        .unwrap();

        let model = build(&level, &MaterialTable::default()).unwrap();
        let uvs: Vec<f32> = model.meshes[0].vertices.iter().map(|v| v.uv.x).collect();
        assert_eq!(uvs, vec![2.0, 3.0, 4.0, 2.0, 4.0, 5.0]);
    }

    #[test]
    fn vertex_past_the_end_is_corrupt() {
        let mut level = BspLevel::load(&mut quad_level("concrete").open()).unwrap();
        level.materials[0].vertex_offset = 1;

        let err = build(&level, &MaterialTable::default()).unwrap_err();
        assert!(matches!(
            err,
            BspError::IndexOutOfRange {
                what: "lit flat vertex",
                index: 4,
                len: 4
            }
        ));
    }

    #[test]
    fn position_past_the_end_is_corrupt() {
        let mut level = BspLevel::load(&mut quad_level("concrete").open()).unwrap();
        level.vertices.truncate(2);

        assert!(matches!(
            build(&level, &MaterialTable::default()),
            Err(BspError::IndexOutOfRange {
                what: "vertex position",
                index: 2,
                len: 2
            })
        ));
    }

    #[test]
    fn mesh_flags_pick_the_vertex_lump() {
        // position i and uv (i, 0) for every vertex, in each layout
        let uv = |i: u32| vec2(i as f32, 0.0);
        let mut level = BspLevel::load(&mut quad_level("concrete").open()).unwrap();
        level.vertex_lumps.lit_flat.clear();
        level.vertex_lumps.lit_bump = (0..4)
            .map(|i| VertexLitBump {
                position_index: i,
                uv: uv(i),
                ..VertexLitBump::zeroed()
            })
            .collect();
        level.vertex_lumps.unlit = (0..4)
            .map(|i| VertexUnlit {
                position_index: i,
                uv: uv(i) + Vec2::Y,
                ..VertexUnlit::zeroed()
            })
            .collect();
        level.vertex_lumps.unlit_ts = (0..4)
            .map(|i| VertexUnlitTs {
                position_index: i,
                uv: uv(i) + Vec2::Y * 2.0,
                ..VertexUnlitTs::zeroed()
            })
            .collect();

        for (flags, v) in [(0x200, 0.0), (0x400, 1.0), (0x600, 2.0)] {
            level.meshes[0].flags = flags;
            let model = build(&level, &MaterialTable::default()).unwrap();
            let mesh = &model.meshes[0];

            assert_eq!(mesh.vertices.len(), 6, "{flags:#x}");
            assert_eq!(mesh.vertices[2].uv, vec2(2.0, v), "{flags:#x}");
            assert_eq!(mesh.vertices[2].position, vec3(1.0, 1.0, 0.0));
        }

        // the flat lit lump is now empty
        level.meshes[0].flags = 0;
        assert!(build(&level, &MaterialTable::default()).is_err());
    }

    #[test]
    fn meshes_follow_model_order() {
        let mut level = BspLevel::load(&mut quad_level("concrete").open()).unwrap();
        level.meshes.push(BspMesh {
            face_start: 3,
            face_count: 1,
            ..BspMesh::zeroed()
        });
        level.models = vec![
            BspModel {
                mesh_start: 1,
                mesh_count: 1,
                ..BspModel::zeroed()
            },
            BspModel {
                mesh_start: 0,
                mesh_count: 1,
                ..BspModel::zeroed()
            },
        ];

        let model = build(&level, &MaterialTable::default()).unwrap();
        assert_eq!(model.meshes[0].vertices.len(), 3);
        assert_eq!(model.meshes[1].vertices.len(), 6);
    }
}
