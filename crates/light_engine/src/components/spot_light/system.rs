//! Spot light component system
//!
//! Owns the store of spot light components, keyed by entity. Adding a
//! component creates a light node under the entity and registers a model for
//! it; inside an editing session the model also carries a cone wireframe.
//! Removing the component undoes all of that.
//!
//! ```text
//! entity node
//!   └── "spotlight" light node ── model { lights: [node], mesh_instances: [cone]? }
//!                                              │
//!                     per-entity vertex buffer ┘ + shared index buffer + material
//! ```

use slotmap::secondary::Entry;

use crate::core::config::FieldValidation;
use crate::foundation::collections::{BufferHandle, ModelId, NodeHandle, SecondaryMap};
use crate::geometry::write_cone_outline;
use crate::render::GraphicsDevice;
use crate::scene::{LightType, Model, NodeKind, SceneError, SceneGraph};

use super::data::SpotLightData;
use super::error::{SpotLightError, SpotLightResult};
use super::resources::SharedDebugResources;
use super::schema::{FieldOverrides, FieldValue, RawValue};
use crate::components::SystemContext;

/// Kind id of the spot light component
pub const SPOT_LIGHT_SYSTEM_ID: &str = "spotlight";

/// Name given to the light node created for each component
pub const SPOT_LIGHT_NODE_NAME: &str = "spotlight";

/// Spot light attached to one entity
#[derive(Debug, Clone)]
pub struct SpotLightComponent {
    entity: NodeHandle,
    light_node: NodeHandle,
    model: ModelId,
    debug_buffer: Option<BufferHandle>,
    /// Field values
    pub data: SpotLightData,
}

impl SpotLightComponent {
    /// Entity the component is attached to
    pub fn entity(&self) -> NodeHandle {
        self.entity
    }

    /// Light node owned by the component, a child of the entity
    pub fn light_node(&self) -> NodeHandle {
        self.light_node
    }

    /// Model registered with the scene for this component
    pub fn model(&self) -> ModelId {
        self.model
    }

    /// Whether the model carries a cone wireframe
    pub fn has_debug_mesh(&self) -> bool {
        self.debug_buffer.is_some()
    }

    /// Vertex buffer of the cone wireframe, looked up through the scene
    pub fn debug_vertex_buffer<S: SceneGraph + ?Sized>(&self, scene: &S) -> SpotLightResult<BufferHandle> {
        if self.debug_buffer.is_none() {
            return Err(SpotLightError::NoDebugMesh(self.entity));
        }
        let model = scene
            .model(self.model)
            .ok_or(SceneError::ModelNotRegistered(self.model))?;
        model
            .mesh_instances
            .first()
            .map(|instance| instance.mesh.vertex_buffer)
            .ok_or(SpotLightError::NoDebugMesh(self.entity))
    }
}

/// Outcome of a wireframe refresh over every component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeReport {
    /// Wireframes rewritten
    pub updated: usize,
    /// Components without a wireframe
    pub skipped: usize,
    /// Wireframes that failed to update
    pub failed: usize,
}

/// Lifecycle manager for spot light components
#[derive(Debug)]
pub struct SpotLightSystem {
    components: SecondaryMap<NodeHandle, SpotLightComponent>,
    debug_resources: Option<SharedDebugResources>,
    validation: FieldValidation,
}

impl SpotLightSystem {
    /// Create the system, allocating the shared wireframe resources when editing
    pub fn new<S: SceneGraph, D: GraphicsDevice>(ctx: &mut SystemContext<S, D>) -> SpotLightResult<Self> {
        let debug_resources = if ctx.is_editing() {
            Some(SharedDebugResources::new(&mut ctx.device, ctx.config.debug_color)?)
        } else {
            None
        };

        log::info!(
            "Created '{}' system ({:?}, {:?} validation)",
            SPOT_LIGHT_SYSTEM_ID,
            ctx.run_mode(),
            ctx.config.field_validation
        );

        Ok(Self {
            components: SecondaryMap::new(),
            debug_resources,
            validation: ctx.config.field_validation,
        })
    }

    /// Kind id of the components this system manages
    pub fn id(&self) -> &'static str {
        SPOT_LIGHT_SYSTEM_ID
    }

    /// Shared wireframe resources, present in editing sessions
    pub fn debug_resources(&self) -> Option<&SharedDebugResources> {
        self.debug_resources.as_ref()
    }

    /// Validation policy applied to field writes
    pub fn validation(&self) -> FieldValidation {
        self.validation
    }

    /// Attach a spot light to `entity`
    ///
    /// Fields not named in `overrides` take their schema defaults. On error
    /// nothing is left behind in the scene, the device or the store.
    pub fn add_component<S: SceneGraph, D: GraphicsDevice>(
        &mut self,
        ctx: &mut SystemContext<S, D>,
        entity: NodeHandle,
        overrides: &FieldOverrides,
    ) -> SpotLightResult<&SpotLightComponent> {
        let slot = match self.components.entry(entity) {
            Some(Entry::Vacant(slot)) => slot,
            Some(Entry::Occupied(_)) => return Err(SpotLightError::AlreadyPresent(entity)),
            None => return Err(SceneError::NodeNotFound(entity).into()),
        };
        if !ctx.scene.contains(entity) {
            return Err(SceneError::NodeNotFound(entity).into());
        }
        let data = SpotLightData::from_overrides(overrides, self.validation)?;

        let light_node = ctx.scene.create_node(SPOT_LIGHT_NODE_NAME, NodeKind::Light(LightType::Spot));
        let mut model = Model::new(light_node).with_light(light_node);

        let debug_buffer = match &self.debug_resources {
            Some(shared) => match Self::create_debug_mesh(ctx, shared, &data) {
                Ok(buffer) => {
                    model = model.with_mesh_instance(shared.mesh_instance(light_node, buffer));
                    Some(buffer)
                }
                Err(err) => {
                    Self::release_node(ctx, light_node);
                    return Err(err);
                }
            },
            None => None,
        };

        if let Err(err) = ctx.scene.attach_child(entity, light_node) {
            if let Some(buffer) = debug_buffer {
                Self::release_buffer(ctx, buffer);
            }
            Self::release_node(ctx, light_node);
            return Err(err.into());
        }
        let model = ctx.scene.register_model(model);

        log::debug!(
            "Added spotlight to {:?} (light node {:?}, model {:?}, wireframe: {})",
            entity,
            light_node,
            model,
            debug_buffer.is_some()
        );

        let component: &SpotLightComponent = slot.insert(SpotLightComponent {
            entity,
            light_node,
            model,
            debug_buffer,
            data,
        });
        Ok(component)
    }

    /// Detach and release the spot light on `entity`, returning its field values
    ///
    /// The record is dropped and its light node and wireframe buffer are
    /// released even when the scene no longer matches what the component
    /// set up. A model that was already deregistered is reported as an
    /// error after cleanup.
    pub fn remove_component<S: SceneGraph, D: GraphicsDevice>(
        &mut self,
        ctx: &mut SystemContext<S, D>,
        entity: NodeHandle,
    ) -> SpotLightResult<SpotLightData> {
        let component = self
            .components
            .remove(entity)
            .ok_or(SpotLightError::NotFound(entity))?;
        let light_node = component.light_node;

        if ctx.scene.parent(light_node) == Some(entity) {
            if let Err(err) = ctx.scene.detach_child(entity, light_node) {
                log::warn!("Failed to detach light node {:?} from {:?}: {}", light_node, entity, err);
            }
        } else if ctx.scene.contains(entity) {
            log::warn!("Light node {:?} is no longer under {:?}", light_node, entity);
        } else {
            log::warn!("Entity {:?} vanished before its spotlight was removed", entity);
        }

        let deregistered = match ctx.scene.deregister_model(component.model) {
            Ok(model) => {
                for instance in &model.mesh_instances {
                    Self::release_buffer(ctx, instance.mesh.vertex_buffer);
                }
                Ok(())
            }
            Err(err) => {
                log::warn!("Spotlight model on {:?} was already deregistered: {}", entity, err);
                if let Some(buffer) = component.debug_buffer {
                    Self::release_buffer(ctx, buffer);
                }
                Err(err)
            }
        };
        Self::release_node(ctx, light_node);

        log::debug!("Removed spotlight from {:?}", entity);
        deregistered?;
        Ok(component.data)
    }

    /// Component on `entity`
    pub fn component(&self, entity: NodeHandle) -> Option<&SpotLightComponent> {
        self.components.get(entity)
    }

    /// Mutable component on `entity`
    pub fn component_mut(&mut self, entity: NodeHandle) -> Option<&mut SpotLightComponent> {
        self.components.get_mut(entity)
    }

    /// Whether `entity` has a spot light
    pub fn has_component(&self, entity: NodeHandle) -> bool {
        self.components.contains_key(entity)
    }

    /// Number of live components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when no entity has a spot light
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Entities that have a spot light
    pub fn entities(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.components.keys()
    }

    /// Read a field by name
    pub fn field(&self, entity: NodeHandle, name: &str) -> SpotLightResult<FieldValue> {
        let component = self.component(entity).ok_or(SpotLightError::NotFound(entity))?;
        Ok(component.data.get(name)?)
    }

    /// Write a field by name, as a property panel does
    ///
    /// The wireframe is not touched; editing drivers follow up with
    /// [`Self::recompute_all`].
    pub fn set_field(&mut self, entity: NodeHandle, name: &str, value: &RawValue) -> SpotLightResult<()> {
        let validation = self.validation;
        let component = self.components.get_mut(entity).ok_or(SpotLightError::NotFound(entity))?;
        component.data.set_raw(name, value, validation)?;
        log::trace!("Set {} on {:?} to {:?}", name, entity, value);
        Ok(())
    }

    /// Rewrite the cone wireframe of one component
    pub fn recompute<S: SceneGraph, D: GraphicsDevice>(
        &self,
        ctx: &mut SystemContext<S, D>,
        entity: NodeHandle,
    ) -> SpotLightResult<()> {
        if !ctx.is_editing() {
            return Err(SpotLightError::NotEditing);
        }
        let component = self.component(entity).ok_or(SpotLightError::NotFound(entity))?;
        Self::refresh(ctx, component)
    }

    /// Rewrite the cone wireframe of every component that has one
    ///
    /// Fired by the editing driver after edits. Components created without a
    /// wireframe are skipped; a failure on one component does not stop the
    /// others.
    pub fn recompute_all<S: SceneGraph, D: GraphicsDevice>(
        &self,
        ctx: &mut SystemContext<S, D>,
    ) -> SpotLightResult<RecomputeReport> {
        if !ctx.is_editing() {
            return Err(SpotLightError::NotEditing);
        }

        let mut report = RecomputeReport::default();
        for (entity, component) in &self.components {
            if !component.has_debug_mesh() {
                report.skipped += 1;
                continue;
            }
            match Self::refresh(ctx, component) {
                Ok(()) => report.updated += 1,
                Err(err) => {
                    log::error!("Failed to refresh spotlight wireframe on {:?}: {}", entity, err);
                    report.failed += 1;
                }
            }
        }

        log::trace!("Recomputed spotlight wireframes: {:?}", report);
        Ok(report)
    }

    /// Remove every component and release the shared resources
    ///
    /// Every component is visited and the shared resources are always
    /// released; the first error met along the way is returned at the end.
    pub fn shutdown<S: SceneGraph, D: GraphicsDevice>(mut self, ctx: &mut SystemContext<S, D>) -> SpotLightResult<()> {
        let mut first_error = None;

        let entities: Vec<_> = self.entities().collect();
        for entity in entities {
            if let Err(err) = self.remove_component(ctx, entity) {
                log::error!("Failed to remove spotlight from {:?}: {}", entity, err);
                first_error.get_or_insert(err);
            }
        }
        if let Some(shared) = self.debug_resources.take() {
            if let Err(err) = shared.release(&mut ctx.device) {
                log::error!("Failed to release shared spotlight resources: {}", err);
                first_error.get_or_insert(err.into());
            }
        }

        log::info!("Shut down '{}' system", SPOT_LIGHT_SYSTEM_ID);
        first_error.map_or(Ok(()), Err)
    }

    fn create_debug_mesh<S: SceneGraph, D: GraphicsDevice>(
        ctx: &mut SystemContext<S, D>,
        shared: &SharedDebugResources,
        data: &SpotLightData,
    ) -> SpotLightResult<BufferHandle> {
        let buffer = shared.create_vertex_buffer(&mut ctx.device)?;
        if let Err(err) = write_cone_outline(&mut ctx.device, buffer, data.outer_cone_angle, data.attenuation_end) {
            Self::release_buffer(ctx, buffer);
            return Err(err.into());
        }
        Ok(buffer)
    }

    fn refresh<S: SceneGraph, D: GraphicsDevice>(
        ctx: &mut SystemContext<S, D>,
        component: &SpotLightComponent,
    ) -> SpotLightResult<()> {
        let buffer = component.debug_vertex_buffer(&ctx.scene)?;
        write_cone_outline(
            &mut ctx.device,
            buffer,
            component.data.outer_cone_angle,
            component.data.attenuation_end,
        )?;
        Ok(())
    }

    fn release_buffer<S: SceneGraph, D: GraphicsDevice>(ctx: &mut SystemContext<S, D>, buffer: BufferHandle) {
        if let Err(err) = ctx.device.destroy_buffer(buffer) {
            log::warn!("Failed to release wireframe buffer {:?}: {}", buffer, err);
        }
    }

    fn release_node<S: SceneGraph, D: GraphicsDevice>(ctx: &mut SystemContext<S, D>, node: NodeHandle) {
        if let Err(err) = ctx.scene.destroy_node(node) {
            log::warn!("Failed to destroy light node {:?}: {}", node, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::spot_light::schema::overrides;
    use crate::core::config::LightEngineConfig;
    use crate::render::HostDevice;
    use crate::scene::HierarchyGraph;

    fn editing_context() -> SystemContext<HierarchyGraph, HostDevice> {
        SystemContext::new(HierarchyGraph::new(), HostDevice::new(), LightEngineConfig::editing())
    }

    #[test]
    fn test_light_node_is_named_and_typed() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);

        let light = system.add_component(&mut ctx, lamp, &FieldOverrides::new()).unwrap().light_node();
        assert_eq!(ctx.scene.node_name(light), Some("spotlight"));
        assert_eq!(ctx.scene.node_kind(light), Some(NodeKind::Light(LightType::Spot)));
        assert_eq!(ctx.scene.parent(light), Some(lamp));
    }

    #[test]
    fn test_model_lists_light_and_wireframe() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);

        let component = system.add_component(&mut ctx, lamp, &FieldOverrides::new()).unwrap().clone();
        let model = ctx.scene.model(component.model()).unwrap();
        assert_eq!(model.graph, component.light_node());
        assert_eq!(model.lights, vec![component.light_node()]);
        assert_eq!(model.mesh_instances.len(), 1);

        let shared = system.debug_resources().unwrap();
        assert_eq!(model.mesh_instances[0].mesh.index_buffer, shared.index_buffer());
    }

    #[test]
    fn test_second_component_on_entity_is_rejected() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);

        system.add_component(&mut ctx, lamp, &FieldOverrides::new()).unwrap();
        let buffers = ctx.device.buffer_count();
        assert_eq!(
            system.add_component(&mut ctx, lamp, &FieldOverrides::new()).unwrap_err(),
            SpotLightError::AlreadyPresent(lamp)
        );
        assert_eq!(ctx.scene.child_count(lamp), 1);
        assert_eq!(ctx.device.buffer_count(), buffers);
        assert_eq!(system.len(), 1);
    }

    #[test]
    fn test_bad_override_leaves_nothing_behind() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);
        let nodes = ctx.scene.node_count();

        let result = system.add_component(&mut ctx, lamp, &overrides([("castShadows", 3.0)]));
        assert!(matches!(result, Err(SpotLightError::Schema(_))));
        assert_eq!(ctx.scene.node_count(), nodes);
        assert_eq!(ctx.scene.model_count(), 0);
        assert_eq!(ctx.device.buffer_count(), 1);
        assert!(system.is_empty());
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let ghost = ctx.scene.create_node("ghost", NodeKind::Entity);
        ctx.scene.destroy_node(ghost).unwrap();

        assert!(matches!(
            system.add_component(&mut ctx, ghost, &FieldOverrides::new()),
            Err(SpotLightError::Scene(crate::scene::SceneError::NodeNotFound(_)))
        ));
    }

    #[test]
    fn test_remove_absent_component_errors() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);

        assert_eq!(system.remove_component(&mut ctx, lamp).unwrap_err(), SpotLightError::NotFound(lamp));
    }

    #[test]
    fn test_set_field_by_name() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);
        system.add_component(&mut ctx, lamp, &FieldOverrides::new()).unwrap();

        system.set_field(lamp, "color", &RawValue::List(vec![0.0, 0.0, 1.0])).unwrap();
        assert_eq!(
            system.field(lamp, "color").unwrap(),
            FieldValue::Color(crate::foundation::math::Color::rgb(0.0, 0.0, 1.0))
        );
        assert!(matches!(
            system.set_field(lamp, "model", &RawValue::Number(1.0)),
            Err(SpotLightError::Schema(_))
        ));
    }

    #[test]
    fn test_recompute_single_component() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);
        system.add_component(&mut ctx, lamp, &FieldOverrides::new()).unwrap();
        let buffer = system.component(lamp).unwrap().debug_vertex_buffer(&ctx.scene).unwrap();
        let before = ctx.device.map_count(buffer);

        system.recompute(&mut ctx, lamp).unwrap();
        assert_eq!(ctx.device.map_count(buffer), before + 1);
        assert!(!ctx.device.is_mapped(buffer));
    }

    #[test]
    fn test_remove_after_light_node_moved_away() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);
        let light = system.add_component(&mut ctx, lamp, &FieldOverrides::new()).unwrap().light_node();
        let nodes = ctx.scene.node_count();

        ctx.scene.detach_child(lamp, light).unwrap();
        system.remove_component(&mut ctx, lamp).unwrap();

        assert!(!system.has_component(lamp));
        assert!(!ctx.scene.contains(light));
        assert_eq!(ctx.scene.node_count(), nodes - 1);
        assert_eq!(ctx.scene.model_count(), 0);
        assert_eq!(ctx.device.buffer_count(), 1);
    }

    #[test]
    fn test_remove_after_model_deregistered_drops_record() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);
        let component = system.add_component(&mut ctx, lamp, &FieldOverrides::new()).unwrap().clone();

        ctx.scene.deregister_model(component.model()).unwrap();
        assert_eq!(
            system.remove_component(&mut ctx, lamp).unwrap_err(),
            SpotLightError::Scene(SceneError::ModelNotRegistered(component.model()))
        );

        assert!(!system.has_component(lamp));
        assert!(!ctx.scene.contains(component.light_node()));
        assert_eq!(ctx.scene.child_count(lamp), 0);
        assert_eq!(ctx.device.buffer_count(), 1);
        assert_eq!(system.remove_component(&mut ctx, lamp).unwrap_err(), SpotLightError::NotFound(lamp));
    }

    #[test]
    fn test_shutdown_continues_past_failed_removal() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let a = ctx.scene.create_node("a", NodeKind::Entity);
        let b = ctx.scene.create_node("b", NodeKind::Entity);
        let model_a = system.add_component(&mut ctx, a, &FieldOverrides::new()).unwrap().model();
        system.add_component(&mut ctx, b, &FieldOverrides::new()).unwrap();

        ctx.scene.deregister_model(model_a).unwrap();
        assert_eq!(
            system.shutdown(&mut ctx).unwrap_err(),
            SpotLightError::Scene(SceneError::ModelNotRegistered(model_a))
        );

        assert_eq!(ctx.device.buffer_count(), 0);
        assert_eq!(ctx.scene.model_count(), 0);
        assert_eq!(ctx.scene.node_count(), 2);
    }

    #[test]
    fn test_shutdown_with_detached_light_node() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let a = ctx.scene.create_node("a", NodeKind::Entity);
        let b = ctx.scene.create_node("b", NodeKind::Entity);
        let light_a = system.add_component(&mut ctx, a, &FieldOverrides::new()).unwrap().light_node();
        system.add_component(&mut ctx, b, &FieldOverrides::new()).unwrap();

        ctx.scene.detach_child(a, light_a).unwrap();
        system.shutdown(&mut ctx).unwrap();

        assert_eq!(ctx.device.buffer_count(), 0);
        assert_eq!(ctx.scene.model_count(), 0);
        assert_eq!(ctx.scene.node_count(), 2);
    }

    #[test]
    fn test_add_returns_stored_component() {
        let mut ctx = editing_context();
        let mut system = SpotLightSystem::new(&mut ctx).unwrap();
        let lamp = ctx.scene.create_node("lamp", NodeKind::Entity);

        let added = system
            .add_component(&mut ctx, lamp, &overrides([("intensity", 3.0)]))
            .unwrap()
            .clone();
        let stored = system.component(lamp).unwrap();
        assert_eq!(added.entity(), lamp);
        assert_eq!(added.light_node(), stored.light_node());
        assert_eq!(added.model(), stored.model());
        assert_eq!(stored.data.intensity, 3.0);
    }
}
