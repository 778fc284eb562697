use still_life::{
    render::DrawDirective,
    resources::{material::Material, mesh::Primitive},
    scene::{Scene, TextureSource},
    shader::uniform,
    transform::Transform,
};

use crate::common::test_utils::{Op, RecordingBackend, init_logs, rgb_png_fixture};

mod common;

fn one_box_scene(fixture: &str) -> Scene<u32> {
    let path = rgb_png_fixture(fixture);
    Scene::new(
        vec![TextureSource {
            path,
            tag: "crate".to_string(),
        }],
        vec![Material::new("wood", (0.3, 0.25, 0.24), (0.66, 0.26, 0.18), 80.0)],
        still_life::lights::LightingRig::table_scene(),
        vec![
            DrawDirective::textured(Primitive::Box, Transform::default(), "crate")
                .with_material("wood")
                .with_uv_scale(2.0, 2.0),
        ],
    )
}

#[test]
fn canonical_script_has_the_full_object_census() {
    let scene = Scene::<u32>::table_scene();
    let script = scene.script();

    assert_eq!(script.len(), 42);
    let count = |primitive| {
        script
            .iter()
            .filter(|d| d.primitive == primitive)
            .count()
    };
    assert_eq!(count(Primitive::Plane), 1);
    assert_eq!(count(Primitive::Box), 33);
    assert_eq!(count(Primitive::TaperedCylinder), 2);
    assert_eq!(count(Primitive::Cylinder), 4);
    assert_eq!(count(Primitive::Torus), 2);
}

#[test]
fn prepare_defines_materials_and_lights_once() {
    let mut backend = RecordingBackend::new();
    let mut scene = Scene::<u32>::table_scene();

    scene.prepare(&mut backend);

    assert!(scene.is_prepared());
    assert_eq!(scene.materials().len(), 5);
    assert!(scene.materials().find("porcelain").is_some());
    assert!(backend.ops.contains(&Op::SetVec3(
        "directionalLight.direction".to_string(),
        [-6.0, 5.0, 5.0]
    )));
    assert!(backend.ops.contains(&Op::SetVec3(
        "pointLights[0].position".to_string(),
        [0.0, 15.0, -8.0]
    )));
    assert!(backend.ops.contains(&Op::SetBool(
        "pointLights[2].bActive".to_string(),
        true
    )));
    assert!(backend
        .ops
        .contains(&Op::SetBool(uniform::USE_LIGHTING.to_string(), true)));
}

#[test]
fn repeated_prepare_is_rejected() {
    init_logs();
    let mut backend = RecordingBackend::new();
    let mut scene = one_box_scene("prepare-twice");

    scene.prepare(&mut backend);
    let ops_after_first = backend.ops.len();
    let textures_after_first = scene.textures().len();

    scene.prepare(&mut backend);
    assert_eq!(backend.ops.len(), ops_after_first);
    assert_eq!(scene.textures().len(), textures_after_first);
    assert_eq!(scene.materials().len(), 1);
}

#[test]
fn prepare_warms_only_the_primitives_the_script_uses() {
    let mut backend = RecordingBackend::new();
    let mut scene = one_box_scene("warm-used");

    scene.prepare(&mut backend);

    assert_eq!(backend.loads(), vec![Primitive::Box]);
}

#[test]
fn render_before_prepare_draws_nothing() {
    let mut backend = RecordingBackend::new();
    let scene = Scene::<u32>::table_scene();

    scene.render(&mut backend);

    assert!(backend.ops.is_empty());
}

#[test]
fn render_walks_the_script_in_order() {
    let mut backend = RecordingBackend::new();
    let mut scene = one_box_scene("render-order");

    scene.prepare(&mut backend);
    backend.ops.clear();
    scene.render(&mut backend);

    let model = Transform::default().matrix();
    assert_eq!(
        backend.ops,
        vec![
            Op::SetMat4(uniform::MODEL.to_string(), model.into()),
            Op::SetBool(uniform::USE_TEXTURE.to_string(), true),
            Op::SetSampler(uniform::OBJECT_TEXTURE.to_string(), 0),
            Op::SetVec2(uniform::UV_SCALE.to_string(), [2.0, 2.0]),
            Op::SetVec3(uniform::MATERIAL_DIFFUSE.to_string(), [0.3, 0.25, 0.24]),
            Op::SetVec3(uniform::MATERIAL_SPECULAR.to_string(), [0.66, 0.26, 0.18]),
            Op::SetFloat(uniform::MATERIAL_SHININESS.to_string(), 80.0),
            Op::Draw(Primitive::Box),
        ]
    );
}

#[test]
fn full_scene_render_issues_every_draw() {
    init_logs();
    let mut backend = RecordingBackend::new();
    let mut scene = Scene::<u32>::table_scene();

    // The asset files are not present here, so every texture load fails and
    // is logged; the script must still submit all objects, flat.
    scene.prepare(&mut backend);
    backend.ops.clear();
    scene.render(&mut backend);

    assert_eq!(backend.draws().len(), 42);
    assert!(!backend
        .ops
        .contains(&Op::SetBool(uniform::USE_TEXTURE.to_string(), true)));
}

#[test]
fn unresolved_texture_tag_degrades_to_flat_magenta() {
    let mut backend = RecordingBackend::new();
    let mut scene = Scene::new(
        Vec::new(),
        Vec::new(),
        still_life::lights::LightingRig::table_scene(),
        vec![DrawDirective::textured(
            Primitive::Box,
            Transform::default(),
            "nothing-here",
        )],
    );

    scene.prepare(&mut backend);
    backend.ops.clear();
    scene.render(&mut backend);

    assert!(backend
        .ops
        .contains(&Op::SetBool(uniform::USE_TEXTURE.to_string(), false)));
    assert!(backend.ops.contains(&Op::SetVec4(
        uniform::OBJECT_COLOR.to_string(),
        [1.0, 0.0, 1.0, 1.0]
    )));
    assert!(!backend
        .ops
        .iter()
        .any(|op| matches!(op, Op::SetSampler(..))));
    assert_eq!(backend.draws(), vec![Primitive::Box]);
}

#[test]
fn missing_material_uploads_the_neutral_default() {
    let mut backend = RecordingBackend::new();
    let mut scene = Scene::new(
        Vec::new(),
        Vec::new(),
        still_life::lights::LightingRig::table_scene(),
        vec![
            DrawDirective::solid(Primitive::Box, Transform::default(), (0.0, 0.0, 1.0, 1.0))
                .with_material("nothing-here"),
        ],
    );

    scene.prepare(&mut backend);
    backend.ops.clear();
    scene.render(&mut backend);

    assert!(backend.ops.contains(&Op::SetVec3(
        uniform::MATERIAL_DIFFUSE.to_string(),
        [0.8, 0.8, 0.8]
    )));
    assert!(backend
        .ops
        .contains(&Op::SetFloat(uniform::MATERIAL_SHININESS.to_string(), 1.0)));
}

#[test]
fn every_draw_carries_its_own_material_state() {
    // Two draws, only the first names a material: the second must fall back
    // to the neutral default instead of inheriting the wood values.
    let mut backend = RecordingBackend::new();
    let mut scene = Scene::new(
        Vec::new(),
        vec![Material::new("wood", (0.3, 0.25, 0.24), (0.66, 0.26, 0.18), 80.0)],
        still_life::lights::LightingRig::table_scene(),
        vec![
            DrawDirective::solid(Primitive::Box, Transform::default(), (1.0, 0.0, 0.0, 1.0))
                .with_material("wood"),
            DrawDirective::solid(Primitive::Box, Transform::default(), (0.0, 1.0, 0.0, 1.0)),
        ],
    );

    scene.prepare(&mut backend);
    backend.ops.clear();
    scene.render(&mut backend);

    let diffuse: Vec<_> = backend
        .ops
        .iter()
        .filter_map(|op| match op {
            Op::SetVec3(name, value) if name == uniform::MATERIAL_DIFFUSE => Some(*value),
            _ => None,
        })
        .collect();
    assert_eq!(diffuse, vec![[0.3, 0.25, 0.24], [0.8, 0.8, 0.8]]);
}
