//! Scene lifecycle: one-time preparation and per-frame rendering.
//!
//! A [`Scene`] owns the texture and material registries, the light rig and
//! the ordered draw script. [`Scene::prepare`] runs exactly once (a second
//! call warns and no-ops): it loads and binds the textures, defines the
//! material presets, configures the lights and warms the mesh cache.
//! [`Scene::render`] re-issues the whole script every frame; there is no
//! dirty-state tracking.

use std::{collections::HashSet, path::PathBuf};

use crate::{
    lights::LightingRig,
    render::{DrawDirective, submit},
    resources::{
        material::{Material, MaterialRegistry},
        mesh::{MeshLibrary, Primitive},
        texture::{TextureRegistry, TextureUpload},
    },
    shader::ShaderParams,
    transform::Transform,
};

/// One texture to load during Prepare: a host-relative image path and the
/// tag it registers under.
#[derive(Clone, Debug)]
pub struct TextureSource {
    pub path: PathBuf,
    pub tag: String,
}

impl TextureSource {
    pub fn new(path: &str, tag: &str) -> Self {
        Self {
            path: path.into(),
            tag: tag.to_string(),
        }
    }
}

/// A prepared-then-rendered scene: asset manifest, light rig and draw
/// script as data, registries as state.
#[derive(Debug)]
pub struct Scene<H> {
    manifest: Vec<TextureSource>,
    presets: Vec<Material>,
    lights: LightingRig,
    script: Vec<DrawDirective>,
    textures: TextureRegistry<H>,
    materials: MaterialRegistry,
    prepared: bool,
}

impl<H> Scene<H> {
    pub fn new(
        manifest: Vec<TextureSource>,
        presets: Vec<Material>,
        lights: LightingRig,
        script: Vec<DrawDirective>,
    ) -> Self {
        Self {
            manifest,
            presets,
            lights,
            script,
            textures: TextureRegistry::new(),
            materials: MaterialRegistry::new(),
            prepared: false,
        }
    }

    /// The canonical tabletop still life: floor plane, table, two chairs,
    /// two plates, two mugs with handles and their coffee.
    pub fn table_scene() -> Self {
        Self::new(
            table_scene_textures(),
            table_scene_materials(),
            LightingRig::table_scene(),
            table_scene_script(),
        )
    }

    pub fn script(&self) -> &[DrawDirective] {
        &self.script
    }

    pub fn textures(&self) -> &TextureRegistry<H> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// One-time scene preparation: textures, materials, lights, meshes.
    ///
    /// A failed texture load degrades that object to an untextured draw and
    /// is logged, it does not abort preparation. Re-invocation is rejected
    /// so registries cannot grow across calls.
    pub fn prepare<B>(&mut self, backend: &mut B)
    where
        B: TextureUpload<Handle = H> + ShaderParams + MeshLibrary,
    {
        if self.prepared {
            log::warn!("scene is already prepared, ignoring repeated prepare call");
            return;
        }

        for source in &self.manifest {
            if let Err(e) = self.textures.load(&source.path, &source.tag, backend) {
                log::error!("{e:#}");
            }
        }
        self.textures.bind_all(backend);

        for preset in &self.presets {
            self.materials.define(preset.clone());
        }

        self.lights.configure(backend);

        // Each primitive's geometry is generated once no matter how many
        // script entries draw it.
        let used: HashSet<Primitive> = self.script.iter().map(|d| d.primitive).collect();
        for primitive in Primitive::ALL {
            if used.contains(&primitive) {
                backend.load(primitive);
            }
        }

        self.prepared = true;
    }

    /// Render the full script once, in order. Call once per displayed
    /// frame, after [`prepare`](Self::prepare).
    pub fn render<B: ShaderParams + MeshLibrary>(&self, backend: &mut B) {
        if !self.prepared {
            log::warn!("render called before prepare, skipping frame");
            return;
        }
        for directive in &self.script {
            submit(backend, &self.textures, &self.materials, directive);
        }
    }
}

fn table_scene_textures() -> Vec<TextureSource> {
    vec![
        TextureSource::new("textures/Floor.jpg", "floor"),
        TextureSource::new("textures/Leg.jpg", "leg"),
        TextureSource::new("textures/Tabletop.jpg", "tabletop"),
        TextureSource::new("textures/Plate.jpg", "plate"),
        TextureSource::new("textures/Mug.jpg", "mug"),
    ]
}

fn table_scene_materials() -> Vec<Material> {
    vec![
        Material::new("gravel", (0.502, 0.502, 0.502), (0.502, 0.502, 0.502), 20.0),
        Material::new("metal", (0.0, 0.0, 0.0), (0.78, 0.78, 0.78), 85.0),
        Material::new("wood", (0.3, 0.25, 0.24), (0.66, 0.26, 0.18), 80.0),
        Material::new("porcelain", (0.96, 0.96, 0.96), (0.78, 0.78, 0.78), 80.0),
        Material::new("glass", (1.0, 1.0, 1.0), (0.21, 0.21, 0.21), 95.0),
    ]
}

/// The ordered draw script, object by object. Dimensions and placements
/// are scene content, not derived.
fn table_scene_script() -> Vec<DrawDirective> {
    // An upright metal box leg, used by the table and both chairs.
    let leg = |x: f32, y: f32, z: f32| {
        DrawDirective::textured(
            Primitive::Box,
            Transform::new((5.0, 0.7, 0.5), (0.0, 0.0, 90.0), (x, y, z)),
            "leg",
        )
        .with_material("metal")
    };
    // Thin lower cross guard between the front and back chair legs.
    let guard = |x: f32, z: f32| {
        DrawDirective::textured(
            Primitive::Box,
            Transform::new((6.0, 0.3, 0.3), (0.0, 0.0, 0.0), (x, 1.5, z)),
            "leg",
        )
        .with_material("metal")
    };
    let upper_guard = |x: f32, z: f32| {
        DrawDirective::textured(
            Primitive::Box,
            Transform::new((6.5, 0.7, 0.5), (0.0, 0.0, 0.0), (x, 3.5, z)),
            "leg",
        )
        .with_material("metal")
    };
    let seat = |x: f32| {
        DrawDirective::textured(
            Primitive::Box,
            Transform::new((6.5, 0.7, 3.5), (0.0, 0.0, 0.0), (x, 3.5, 0.0)),
            "tabletop",
        )
        .with_material("wood")
    };
    // Backrest bar, turned to run along Z.
    let bar = |x: f32, y: f32| {
        DrawDirective::textured(
            Primitive::Box,
            Transform::new((4.0, 0.7, 0.5), (0.0, 90.0, 0.0), (x, y, 0.0)),
            "leg",
        )
        .with_material("metal")
    };
    // The plate is a tapered cylinder flipped by its negative Y scale.
    let plate = |x: f32| {
        DrawDirective::textured(
            Primitive::TaperedCylinder,
            Transform::new((1.0, -0.4, 0.5), (0.0, 0.0, 0.0), (x, 5.4, 0.0)),
            "plate",
        )
        .with_material("porcelain")
    };
    let mug = |x: f32| {
        DrawDirective::textured(
            Primitive::Cylinder,
            Transform::new((0.3, 0.7, 0.2), (0.0, 0.0, 0.0), (x, 5.0, -1.0)),
            "mug",
        )
        .with_material("glass")
    };
    // Coffee surface sitting just below the mug rim.
    let liquid = |x: f32| {
        DrawDirective::solid(
            Primitive::Cylinder,
            Transform::new((0.3, 0.02, 0.2), (0.0, 0.0, 0.0), (x, 5.68, -1.0)),
            (0.0, 0.0, 1.0, 1.0),
        )
        .with_material("glass")
    };
    let handle = |x: f32| {
        DrawDirective::textured(
            Primitive::Torus,
            Transform::new((0.09, 0.25, 0.1), (0.0, 0.0, 0.0), (x, 5.35, -1.0)),
            "mug",
        )
        .with_material("glass")
    };

    let mut script = vec![
        // Floor.
        DrawDirective::textured(
            Primitive::Plane,
            Transform::new((20.0, 1.0, 10.0), (0.0, 0.0, 0.0), (0.0, 0.0, 0.0)),
            "floor",
        )
        .with_material("gravel"),
        // Table: four legs and the top.
        leg(3.0, 1.5, 3.0),
        leg(-3.0, 1.5, 3.0),
        leg(-3.0, 1.5, -3.0),
        leg(3.0, 1.5, -3.0),
        DrawDirective::textured(
            Primitive::Box,
            Transform::new((8.0, 1.0, 7.0), (0.0, 0.0, 0.0), (0.0, 4.5, 0.0)),
            "tabletop",
        )
        .with_material("wood"),
    ];

    // Right chair.
    script.extend([
        leg(8.0, 1.0, 2.0),
        leg(2.0, 1.0, 2.0),
        leg(8.0, 5.0, 2.0),
        leg(2.0, 1.0, -2.0),
        leg(8.0, 1.0, -2.0),
        leg(8.0, 5.0, -2.0),
        guard(5.0, -2.0),
        guard(5.0, 2.0),
        upper_guard(4.9, -2.0),
        upper_guard(4.9, 2.0),
        seat(5.0),
        bar(8.0, 4.5),
        bar(8.0, 5.5),
        bar(8.0, 6.5),
    ]);

    // Left chair.
    script.extend([
        leg(-8.0, 1.0, 2.0),
        leg(-2.0, 1.0, 2.0),
        leg(-8.0, 5.0, 2.0),
        leg(-2.0, 1.0, -2.0),
        leg(-8.0, 1.0, -2.0),
        leg(-8.0, 5.0, -2.0),
        guard(-5.0, -2.0),
        guard(-5.0, 2.0),
        upper_guard(-4.9, -2.0),
        upper_guard(-4.9, 2.0),
        seat(-5.0),
        bar(-8.0, 4.5),
        bar(-8.0, 5.5),
        bar(-8.0, 6.5),
    ]);

    // Tableware.
    script.extend([
        plate(-2.0),
        plate(2.0),
        liquid(1.0),
        mug(1.0),
        liquid(-1.0),
        mug(-1.0),
        handle(-1.3),
        handle(1.3),
    ]);

    script
}
