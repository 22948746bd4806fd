//! Cone editor
//!
//! Headless editing session for spot lights. Loads a scene description,
//! attaches a spot light to each entity that asks for one, applies the
//! scripted property edits, refreshes the cone wireframes and reports the
//! resulting geometry.
//!
//! ```text
//! cone_editor [scene.ron] [config.toml]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use light_engine::config::ConfigError;
use light_engine::foundation::logging;
use light_engine::geometry::read_cone_vertices;
use light_engine::prelude::*;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_SCENE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenes/studio.ron");
const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/cone_editor.toml");

#[derive(Error, Debug)]
enum EditorError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read scene {path}: {source}")]
    SceneIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse scene {path}: {source}")]
    SceneParse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },

    #[error("Edit refers to unknown entity '{0}'")]
    UnknownEntity(String),

    #[error("Spotlight error: {0}")]
    SpotLight(#[from] SpotLightError),
}

/// Scene file contents
#[derive(Debug, Deserialize)]
struct SceneDescription {
    entities: Vec<EntityDescription>,
    #[serde(default)]
    edits: Vec<FieldEdit>,
}

#[derive(Debug, Deserialize)]
struct EntityDescription {
    name: String,
    /// Spot light field overrides; absent means no spot light
    #[serde(default)]
    spotlight: Option<FieldOverrides>,
}

/// One property panel write
#[derive(Debug, Deserialize)]
struct FieldEdit {
    entity: String,
    field: String,
    value: RawValue,
}

impl SceneDescription {
    fn load(path: &Path) -> Result<Self, EditorError> {
        let contents = std::fs::read_to_string(path).map_err(|source| EditorError::SceneIo {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| EditorError::SceneParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn main() {
    if let Err(e) = run() {
        log::error!("Cone editor failed: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), EditorError> {
    let mut args = std::env::args().skip(1);
    let scene_path = args.next().map_or_else(|| PathBuf::from(DEFAULT_SCENE), PathBuf::from);
    let config_path = args.next().map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);

    let mut config = LightEngineConfig::load_or_default(&config_path)?;
    logging::init_with_filter(&config.log_filter);
    if !config.run_mode.is_editing() {
        log::warn!("Config asks for {:?}; the editor always runs in editing mode", config.run_mode);
        config.run_mode = RunMode::Editing;
    }

    let scene = SceneDescription::load(&scene_path)?;
    log::info!("Loaded scene {} ({} entities)", scene_path.display(), scene.entities.len());

    let mut ctx = SystemContext::new(HierarchyGraph::new(), HostDevice::new(), config);
    let mut spot_lights = SpotLightSystem::new(&mut ctx)?;

    let mut by_name = HashMap::new();
    for description in &scene.entities {
        let entity = ctx.scene.create_node(&description.name, NodeKind::Entity);
        by_name.insert(description.name.as_str(), entity);
        if let Some(overrides) = &description.spotlight {
            spot_lights.add_component(&mut ctx, entity, overrides)?;
        }
    }

    for edit in &scene.edits {
        let entity = *by_name
            .get(edit.entity.as_str())
            .ok_or_else(|| EditorError::UnknownEntity(edit.entity.clone()))?;
        spot_lights.set_field(entity, &edit.field, &edit.value)?;
        log::info!("{}.{} = {:?}", edit.entity, edit.field, edit.value);
    }

    let report = spot_lights.recompute_all(&mut ctx)?;
    log::info!(
        "Refreshed wireframes: {} updated, {} skipped, {} failed",
        report.updated,
        report.skipped,
        report.failed
    );

    for description in &scene.entities {
        let Some(&entity) = by_name.get(description.name.as_str()) else {
            continue;
        };
        let Some(component) = spot_lights.component(entity) else {
            continue;
        };
        print_cone(&ctx, &description.name, component)?;
    }

    spot_lights.shutdown(&mut ctx)?;
    log::info!("Editing session closed ({} buffers still live)", ctx.device.buffer_count());
    Ok(())
}

fn print_cone(
    ctx: &SystemContext<HierarchyGraph, HostDevice>,
    name: &str,
    component: &SpotLightComponent,
) -> Result<(), EditorError> {
    let buffer = component.debug_vertex_buffer(&ctx.scene)?;
    let bytes = ctx.device.read(buffer).map_err(SpotLightError::from)?;
    let vertices = read_cone_vertices(bytes);

    let data = &component.data;
    println!(
        "{name}: outer angle {:.1}°, attenuation end {:.2}, {} vertices",
        data.outer_cone_angle,
        data.attenuation_end,
        vertices.len()
    );
    if let Some(first) = vertices.get(1) {
        let [x, y, z] = first.position;
        println!("  ring radius {:.4}, ring height {:.4}", x.hypot(z), y);
    }
    for (i, vertex) in vertices.iter().enumerate().step_by(10) {
        let [x, y, z] = vertex.position;
        println!("  [{i:2}] ({x:8.4}, {y:8.4}, {z:8.4})");
    }
    Ok(())
}
