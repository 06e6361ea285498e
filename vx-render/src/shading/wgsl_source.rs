//! Checks that `chunk.wgsl` carries the same tables and field layout as the
//! CPU stage. The shader's declarations ahead of `struct Vertex` need no
//! Bevy imports, so naga parses them on their own.

use naga::{Expression, Literal, Module, UnaryOperator};
use vx_utils::NORMALS;
use vx_utils::vertex::{
    AO_BITS, AO_OFFSET, NORMAL_BITS, NORMAL_OFFSET, POSITION_BITS, X_OFFSET, Y_OFFSET, Z_OFFSET,
};

use super::*;

const CHUNK_WGSL: &str = include_str!("../../../vx-client/assets/shaders/chunk.wgsl");

/// Everything before the vertex input struct, minus the `#import` block.
fn standalone_prelude(source: &str) -> String {
    let end = source
        .find("struct Vertex {")
        .expect("chunk.wgsl declares struct Vertex");
    let mut in_import = false;
    let mut out = String::new();
    for line in source[..end].lines() {
        if line.starts_with("#import") {
            in_import = !line.trim_end().ends_with(';') && line.contains('{');
            continue;
        }
        if in_import {
            in_import = line.trim() != "}";
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn parse_prelude() -> Module {
    let prelude = standalone_prelude(CHUNK_WGSL);
    naga::front::wgsl::parse_str(&prelude)
        .unwrap_or_else(|err| panic!("chunk.wgsl prelude: {}", err.emit_to_string(&prelude)))
}

/// Flattens a constant expression into its scalar leaves, in order.
fn scalars(module: &Module, expr: naga::Handle<Expression>, out: &mut Vec<f32>) {
    match &module.global_expressions[expr] {
        Expression::Literal(Literal::F32(v)) => out.push(*v),
        Expression::Literal(Literal::AbstractFloat(v)) => out.push(*v as f32),
        Expression::Literal(Literal::U32(v)) => out.push(*v as f32),
        Expression::Literal(Literal::AbstractInt(v)) => out.push(*v as f32),
        Expression::Compose { components, .. } => {
            for &component in components {
                scalars(module, component, out);
            }
        }
        Expression::Splat { size, value } => {
            let mut one = Vec::new();
            scalars(module, *value, &mut one);
            for _ in 0..*size as usize {
                out.extend_from_slice(&one);
            }
        }
        Expression::Unary {
            op: UnaryOperator::Negate,
            expr,
        } => {
            let start = out.len();
            scalars(module, *expr, out);
            for v in &mut out[start..] {
                *v = -*v;
            }
        }
        Expression::Constant(handle) => scalars(module, module.constants[*handle].init, out),
        other => panic!("unexpected constant expression {other:?}"),
    }
}

fn global_var(module: &Module, name: &str) -> Vec<f32> {
    let (_, var) = module
        .global_variables
        .iter()
        .find(|(_, var)| var.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("chunk.wgsl has no global `{name}`"));
    let init = var
        .init
        .unwrap_or_else(|| panic!("`{name}` has no initializer"));
    let mut out = Vec::new();
    scalars(module, init, &mut out);
    out
}

fn constant(module: &Module, name: &str) -> Vec<f32> {
    let (_, constant) = module
        .constants
        .iter()
        .find(|(_, c)| c.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("chunk.wgsl has no const `{name}`"));
    let mut out = Vec::new();
    scalars(module, constant.init, &mut out);
    out
}

#[test]
fn normal_table_matches() {
    let module = parse_prelude();
    let expected: Vec<f32> = NORMALS.iter().flatten().copied().collect();
    assert_eq!(global_var(&module, "normals"), expected);
}

#[test]
fn ambient_table_matches() {
    let module = parse_prelude();
    assert_eq!(global_var(&module, "ambient_lerps"), AMBIENT_LERPS.to_vec());
}

#[test]
fn blend_constants_match() {
    let module = parse_prelude();
    assert_eq!(constant(&module, "HIGH_COLOR"), HIGH_COLOR.to_array().to_vec());
    assert_eq!(constant(&module, "LOW_COLOR"), LOW_COLOR.to_array().to_vec());
    assert_eq!(constant(&module, "BLEND_HEIGHT"), vec![BLEND_HEIGHT]);
}

#[test]
fn vertex_stage_reads_the_same_fields_and_clamps() {
    let expected = [
        format!("extract_field(vertex.vert_data, {X_OFFSET}u, {POSITION_BITS}u)"),
        format!("extract_field(vertex.vert_data, {Y_OFFSET}u, {POSITION_BITS}u)"),
        format!("extract_field(vertex.vert_data, {Z_OFFSET}u, {POSITION_BITS}u)"),
        format!(
            "min(extract_field(vertex.vert_data, {AO_OFFSET}u, {AO_BITS}u), {MAX_AMBIENT_LEVEL}u)"
        ),
        format!(
            "min(extract_field(vertex.vert_data, {NORMAL_OFFSET}u, {NORMAL_BITS}u), {MAX_NORMAL_INDEX}u)"
        ),
    ];
    for snippet in &expected {
        assert!(CHUNK_WGSL.contains(snippet.as_str()), "chunk.wgsl lacks `{snippet}`");
    }
}

#[test]
fn prelude_drops_only_the_import_block() {
    let prelude = standalone_prelude(CHUNK_WGSL);
    assert!(!prelude.contains("#import"));
    assert!(!prelude.contains("mesh_functions"));
    assert!(prelude.contains("var<uniform> chunk_material"));
    assert!(prelude.contains("fn extract_field"));
}

#[test]
fn shadow_pass_decodes_the_same_position() {
    let source = include_str!("../../../vx-client/assets/shaders/chunk_prepass.wgsl");
    let mask = vx_utils::vertex::field_mask(POSITION_BITS);
    for snippet in [
        format!("vertex.vert_data & {mask}u"),
        format!("(vertex.vert_data >> {Y_OFFSET}u) & {mask}u"),
        format!("(vertex.vert_data >> {Z_OFFSET}u) & {mask}u"),
    ] {
        assert!(source.contains(snippet.as_str()), "chunk_prepass.wgsl lacks `{snippet}`");
    }
    assert_eq!(X_OFFSET, 0);
}
