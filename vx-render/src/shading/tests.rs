use bevy::math::{Mat4, Vec3, Vec4};
use vx_utils::{Direction, PackedVertex, VertexError, VertexFields};

use super::*;
use crate::collaborators::{InstanceTable, MeshInstance};

fn assert_vec3_eq(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < 1e-5,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn identity_normals_follow_index_order() {
    let table = InstanceTable::default();
    let expected = [
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, -1.0, 0.0),
    ];
    for (index, normal) in expected.iter().enumerate() {
        let packed = VertexFields::new(0, 0, 0, 0, index as u32, 0).pack().unwrap();
        let decoded = decode_vertex(packed, 0, &table);
        assert_eq!(decoded.world_normal, *normal);
        assert_eq!(
            Direction::try_from(index as u32).unwrap().normal(),
            *normal
        );
    }
}

#[test]
fn ambient_table_is_exact() {
    assert_eq!(ambient_lerp(0), 1.0);
    assert_eq!(ambient_lerp(1), 0.7);
    assert_eq!(ambient_lerp(2), 0.5);
    assert_eq!(ambient_lerp(3), 0.15);
}

#[test]
fn out_of_table_indices_clamp() {
    for ao in 4..8 {
        assert_eq!(ambient_lerp(ao), 0.15);
    }
    assert_eq!(face_normal(6), Vec3::NEG_Y);
    assert_eq!(face_normal(7), Vec3::NEG_Y);
}

#[test]
fn checked_decode_reports_out_of_table_indices() {
    let bad_normal = VertexFields::new(0, 0, 0, 0, 6, 0).pack().unwrap();
    assert_eq!(
        decode_checked(bad_normal),
        Err(VertexError::InvalidNormalIndex(6))
    );
    let bad_ao = VertexFields::new(0, 0, 0, 5, 0, 0).pack().unwrap();
    assert_eq!(decode_checked(bad_ao), Err(VertexError::InvalidAmbientLevel(5)));
    let good = VertexFields::new(1, 2, 3, 3, 5, 1);
    assert_eq!(decode_checked(good.pack().unwrap()), Ok(good));
}

#[test]
fn blend_hits_endpoints_and_midpoint() {
    assert_vec3_eq(blend_color(0.0), Vec3::new(5.0, 0.2, 5.0));
    assert_vec3_eq(blend_color(32.0), Vec3::new(1.0, 1.0, 9.0));
    assert_vec3_eq(blend_color(16.0), Vec3::new(3.0, 0.6, 7.0));
}

#[test]
fn blend_extrapolates_without_clamping() {
    assert_vec3_eq(blend_color(64.0), Vec3::new(-3.0, 1.8, 13.0));
    assert_vec3_eq(blend_color(-32.0), Vec3::new(9.0, -0.6, 1.0));
}

#[test]
fn zero_word_decodes_to_origin_left_face() {
    let table = InstanceTable::default();
    let packed = PackedVertex(0);
    let decoded = decode_vertex(packed, 0, &table);
    assert_eq!(decoded.local_position, Vec3::ZERO);
    assert_eq!(decoded.ambient, 1.0);
    assert_eq!(decoded.world_normal, Vec3::new(-1.0, 0.0, 0.0));
    assert_eq!(packed.block(), 0);
}

#[test]
fn packed_fields_reach_the_vertex_stage() {
    let fields = VertexFields::new(5, 10, 20, 3, 4, 0);
    let packed = fields.pack().unwrap();
    assert_eq!(packed.decode(), fields);

    let table = InstanceTable::default();
    let out = vertex_stage(packed, 0, &table);
    assert_eq!(out.world_position, Vec4::new(5.0, 10.0, 20.0, 1.0));
    assert_eq!(out.world_normal, Vec3::Y);
    assert_eq!(out.ambient, 0.15);
    assert_vec3_eq(out.blend_color, blend_color(10.0) * 0.15);
}

#[test]
fn blend_uses_world_height_not_local() {
    let mut table = InstanceTable::default();
    let index = table.push(MeshInstance {
        world_from_local: Mat4::from_translation(Vec3::new(64.0, 32.0, -32.0)),
        flags: 0,
    });
    let packed = VertexFields::new(0, 0, 0, 0, 4, 0).pack().unwrap();
    let out = vertex_stage(packed, index, &table);
    assert_eq!(out.world_position, Vec4::new(64.0, 32.0, -32.0, 1.0));
    assert_vec3_eq(out.blend_color, LOW_COLOR);
    assert_eq!(out.instance_index, index);
}

#[test]
fn clip_position_uses_view_projection() {
    let clip_from_world = Mat4::from_scale(Vec3::splat(0.5));
    let table = InstanceTable::new(clip_from_world);
    let packed = VertexFields::new(2, 4, 6, 0, 0, 0).pack().unwrap();
    let out = vertex_stage(packed, 0, &table);
    assert_eq!(out.clip_position, Vec4::new(1.0, 2.0, 3.0, 1.0));
    assert_eq!(out.world_position, Vec4::new(2.0, 4.0, 6.0, 1.0));
}
