//! Offline inspection of packed vertex words through the CPU shading path.

use std::fmt::Write as _;

use bevy::math::{Mat4, Vec3, Vec4};
use vx_render::collaborators::{InstanceTable, MeshInstance};
use vx_render::fragment::{ShadingFragment, fragment_stage};
use vx_render::lighting::ReferenceLighting;
use vx_render::shading::{decode_checked, vertex_stage};
use vx_render::{ChunkMaterial, LightingQualityPreset};
use vx_utils::{PackedVertex, VertexError, VertexFields};

/// Parses a packed word written as decimal, `0x` hex or `0b` binary.
pub fn parse_packed(text: &str) -> Result<u32, String> {
    let cleaned = text.trim().replace('_', "");
    let parsed = if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = cleaned
        .strip_prefix("0b")
        .or_else(|| cleaned.strip_prefix("0B"))
    {
        u32::from_str_radix(bin, 2)
    } else {
        cleaned.parse::<u32>()
    };
    parsed.map_err(|err| format!("`{text}` is not a packed vertex word: {err}"))
}

pub fn describe_fields(packed: PackedVertex) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "word     0x{:08x} ({})", packed.0, packed.0);
    let _ = writeln!(out, "position ({}, {}, {})", packed.x(), packed.y(), packed.z());
    let _ = writeln!(out, "ao       {}", packed.ao());
    let _ = writeln!(out, "normal   {}", packed.normal_index());
    let _ = write!(out, "block    {}", packed.block());
    out
}

pub fn decode_report(packed: PackedVertex) -> String {
    let mut out = describe_fields(packed);
    if let Err(err) = decode_checked(packed) {
        let _ = write!(out, "\nwarning  {err}");
    }
    out
}

pub fn encode(fields: VertexFields) -> Result<PackedVertex, VertexError> {
    fields.pack()
}

#[derive(Debug, Clone, Copy)]
pub struct ShadeRequest {
    pub packed: PackedVertex,
    pub chunk_origin: Vec3,
    pub camera: Vec3,
    pub preset: LightingQualityPreset,
    pub material: ChunkMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeReport {
    pub world_position: Vec4,
    pub clip_position: Vec4,
    pub world_normal: Vec3,
    pub ambient: f32,
    pub blend_color: Vec3,
    pub color: Vec4,
}

/// Camera looking at `target`. Y stays up unless the view runs along it, in
/// which case Z takes over. A camera sitting on the target looks down -Z.
fn view_matrix(camera: Vec3, target: Vec3) -> Mat4 {
    let forward = target - camera;
    if forward.length_squared() <= f32::EPSILON {
        return Mat4::look_to_rh(camera, Vec3::NEG_Z, Vec3::Y);
    }
    let up = if forward.normalize().cross(Vec3::Y).length_squared() <= 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    Mat4::look_at_rh(camera, target, up)
}

/// Runs one vertex through both stages as if it were the only fragment
/// covering its pixel.
pub fn shade(request: &ShadeRequest) -> ShadeReport {
    let local = Vec3::new(
        request.packed.x() as f32,
        request.packed.y() as f32,
        request.packed.z() as f32,
    );
    let target = request.chunk_origin + local;
    let view = view_matrix(request.camera, target);
    let projection = Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);

    let mut instances = InstanceTable::new(projection * view);
    let instance = instances.push(MeshInstance {
        world_from_local: Mat4::from_translation(request.chunk_origin),
        ..Default::default()
    });

    let output = vertex_stage(request.packed, instance, &instances);

    let mut lighting = ReferenceLighting::new(request.preset, request.camera);
    lighting.camera_forward = (target - request.camera).normalize_or_zero();

    let fragment = ShadingFragment::from(output);
    let color = fragment_stage(&fragment, &request.material, &instances, &lighting);

    ShadeReport {
        world_position: output.world_position,
        clip_position: output.clip_position,
        world_normal: output.world_normal,
        ambient: output.ambient,
        blend_color: output.blend_color,
        color,
    }
}

pub fn shade_report(request: &ShadeRequest, report: &ShadeReport) -> String {
    let mut out = decode_report(request.packed);
    let _ = writeln!(out);
    let _ = writeln!(out, "world    {:.3}", report.world_position.truncate());
    let _ = writeln!(out, "clip     {:.3}", report.clip_position);
    let _ = writeln!(out, "normal   {:.3}", report.world_normal);
    let _ = writeln!(out, "ambient  {:.3}", report.ambient);
    let _ = writeln!(out, "blend    {:.3}", report.blend_color);
    let _ = write!(out, "color    {:.3}", report.color);
    out
}
