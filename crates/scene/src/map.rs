use std::collections::BTreeMap;

use foundation::ids::{IdAllocator, next_instance_id};
use foundation::math::Projection;
use runtime::Listeners;
use tracing::{debug, trace};

use crate::dom::{DomElement, TargetListener};
use crate::error::SceneError;
use crate::layer::{LayerHandle, LayerHost, LayerId, LayerKind, LayerProps, ParentRef};
use crate::pointer::{MapId, PointerEventType, PointerListener};
use crate::view::{View, ViewOptions};

#[derive(Debug, Clone)]
struct LayerRecord {
    kind: LayerKind,
    props: LayerProps,
}

#[derive(Debug, Clone, Default)]
struct LayerGroup {
    name: String,
    children: Vec<LayerHandle>,
}

/// In-memory map: layer lists, a view, pointer listeners and a render target.
///
/// Ordering contract:
/// - Root entries draw in ascending `z_index`; equal `z_index` keeps list order.
/// - Group children draw in list order; their `z_index` is not consulted.
pub struct MapScene {
    id: MapId,
    ids: IdAllocator,
    layers: BTreeMap<LayerId, LayerRecord>,
    root: Vec<LayerHandle>,
    groups: BTreeMap<LayerId, LayerGroup>,
    view: View,
    projection: Projection,
    pub(crate) pointer_listeners: BTreeMap<PointerEventType, Listeners<PointerListener>>,
    pub(crate) target: Option<DomElement>,
    pub(crate) target_listeners: Listeners<TargetListener>,
}

impl std::fmt::Debug for MapScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapScene")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("groups", &self.groups)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl Default for MapScene {
    fn default() -> Self {
        Self::new(ViewOptions::default())
    }
}

impl MapScene {
    pub fn new(view: ViewOptions) -> Self {
        Self {
            id: MapId(next_instance_id()),
            ids: IdAllocator::new(),
            layers: BTreeMap::new(),
            root: Vec::new(),
            groups: BTreeMap::new(),
            view: View::new(view),
            projection: Projection::default(),
            pointer_listeners: BTreeMap::new(),
            target: None,
            target_listeners: Listeners::new(),
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn group_by_name(&self, name: &str) -> Option<LayerHandle> {
        self.groups
            .iter()
            .find(|(_, g)| g.name == name)
            .map(|(id, _)| LayerHandle::new(*id, LayerKind::Group))
    }

    pub fn layer_props(&self, layer: LayerId) -> Option<LayerProps> {
        self.layers.get(&layer).map(|r| r.props)
    }

    pub fn root_layers(&self) -> &[LayerHandle] {
        &self.root
    }

    /// Children of `group`, or `None` if the group does not exist.
    pub fn group_children(&self, group: LayerId) -> Option<&[LayerHandle]> {
        self.groups.get(&group).map(|g| g.children.as_slice())
    }

    /// Every parent whose list currently contains `layer`.
    ///
    /// With a well-behaved caller this has at most one element.
    pub fn parents_of(&self, layer: LayerId) -> Vec<ParentRef> {
        let mut out = Vec::new();
        if self.root.iter().any(|l| l.id() == layer) {
            out.push(ParentRef::Root);
        }
        for (id, group) in &self.groups {
            if group.children.iter().any(|l| l.id() == layer) {
                out.push(ParentRef::Group(*id));
            }
        }
        out
    }

    pub fn parent_of(&self, layer: LayerId) -> Option<ParentRef> {
        self.parents_of(layer).into_iter().next()
    }

    /// Leaf layers in draw order (bottom first). Hidden layers and hidden
    /// groups' subtrees are skipped.
    pub fn render_order(&self) -> Vec<LayerHandle> {
        let mut root = self.root.clone();
        root.sort_by_key(|l| self.layer_props(l.id()).map(|p| p.z_index).unwrap_or(0));
        let mut out = Vec::new();
        for layer in root {
            self.push_rendered(layer, &mut out);
        }
        out
    }

    /// Rendered layers eligible for pointer hit-testing, topmost first.
    pub fn hit_test_candidates(&self) -> Vec<LayerHandle> {
        let mut out: Vec<LayerHandle> = self
            .render_order()
            .into_iter()
            .filter(|l| {
                self.layer_props(l.id())
                    .is_some_and(|p| !p.hit_test_excluded)
            })
            .collect();
        out.reverse();
        out
    }

    fn push_rendered(&self, layer: LayerHandle, out: &mut Vec<LayerHandle>) {
        let visible = self.layer_props(layer.id()).is_some_and(|p| p.visible);
        if !visible {
            return;
        }
        match self.groups.get(&layer.id()) {
            Some(group) => {
                for child in &group.children {
                    self.push_rendered(*child, out);
                }
            }
            None => out.push(layer),
        }
    }

    /// Returns `true` if `ancestor` contains `layer` at any depth.
    fn contains_transitively(&self, ancestor: LayerId, layer: LayerId) -> bool {
        let mut current = layer;
        // Parents are unique, so the walk is a simple chain.
        while let Some(ParentRef::Group(parent)) = self.parent_of(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    fn list_mut(&mut self, parent: ParentRef) -> Option<&mut Vec<LayerHandle>> {
        match parent {
            ParentRef::Root => Some(&mut self.root),
            ParentRef::Group(id) => self.groups.get_mut(&id).map(|g| &mut g.children),
        }
    }
}

impl LayerHost for MapScene {
    fn create_layer(&mut self, kind: LayerKind, props: LayerProps) -> LayerHandle {
        let id = LayerId(self.ids.next_id());
        self.layers.insert(id, LayerRecord { kind, props });
        if kind == LayerKind::Group {
            self.groups.insert(id, LayerGroup::default());
        }
        trace!(layer = id.0, ?kind, "created layer");
        LayerHandle::new(id, kind)
    }

    fn create_group(&mut self, name: &str, props: LayerProps) -> LayerHandle {
        let handle = self.create_layer(LayerKind::Group, props);
        if let Some(group) = self.groups.get_mut(&handle.id()) {
            group.name = name.to_string();
        }
        handle
    }

    fn dispose_group(&mut self, group: LayerId) -> Result<Vec<LayerHandle>, SceneError> {
        let Some(removed) = self.groups.remove(&group) else {
            return Err(SceneError::UnknownGroup(group));
        };
        self.root.retain(|l| l.id() != group);
        for other in self.groups.values_mut() {
            other.children.retain(|l| l.id() != group);
        }
        self.layers.remove(&group);
        debug!(group = group.0, name = %removed.name, "disposed layer group");
        Ok(removed.children)
    }

    fn dispose_layer(&mut self, layer: LayerId) -> Result<(), SceneError> {
        if self.groups.contains_key(&layer) {
            return self.dispose_group(layer).map(|_| ());
        }
        if self.layers.remove(&layer).is_none() {
            trace!(layer = layer.0, "dispose: unknown layer");
            return Ok(());
        }
        self.root.retain(|l| l.id() != layer);
        for group in self.groups.values_mut() {
            group.children.retain(|l| l.id() != layer);
        }
        debug!(layer = layer.0, "disposed layer");
        Ok(())
    }

    fn set_layer_props(&mut self, layer: LayerId, props: LayerProps) -> Result<(), SceneError> {
        let record = self
            .layers
            .get_mut(&layer)
            .ok_or(SceneError::UnknownLayer(layer))?;
        record.props = props;
        Ok(())
    }

    fn attach(&mut self, parent: ParentRef, layer: LayerHandle) -> Result<(), SceneError> {
        match self.layers.get(&layer.id()) {
            Some(record) if record.kind == layer.kind() => {}
            _ => return Err(SceneError::UnknownLayer(layer.id())),
        }
        if let ParentRef::Group(group) = parent {
            if !self.groups.contains_key(&group) {
                return Err(SceneError::UnknownGroup(group));
            }
            if group == layer.id() || self.contains_transitively(layer.id(), group) {
                return Err(SceneError::Cycle(layer.id()));
            }
        }
        match self.parent_of(layer.id()) {
            Some(current) if current == parent => {
                trace!(layer = layer.id().0, %parent, "attach: already attached");
                return Ok(());
            }
            Some(current) => {
                return Err(SceneError::AlreadyAttached {
                    layer: layer.id(),
                    parent: current,
                });
            }
            None => {}
        }
        // Group existence was checked above.
        if let Some(list) = self.list_mut(parent) {
            list.push(layer);
        }
        debug!(layer = layer.id().0, %parent, "attached layer");
        Ok(())
    }

    fn detach(&mut self, parent: ParentRef, layer: LayerId) -> Result<(), SceneError> {
        let Some(list) = self.list_mut(parent) else {
            trace!(layer = layer.0, %parent, "detach: parent already torn down");
            return Ok(());
        };
        let before = list.len();
        list.retain(|l| l.id() != layer);
        if list.len() == before {
            trace!(layer = layer.0, %parent, "detach: not attached");
        } else {
            debug!(layer = layer.0, %parent, "detached layer");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::MapScene;
    use crate::error::SceneError;
    use crate::layer::{LayerHost, LayerKind, LayerProps, ParentRef};

    #[test]
    fn attach_appends_to_root_and_group() {
        let mut map = MapScene::default();
        let group = map.create_group("overlays", LayerProps::default());
        let tile = map.create_layer(LayerKind::Tile, LayerProps::default());
        let vector = map.create_layer(LayerKind::Vector, LayerProps::default());

        map.attach(ParentRef::Root, tile).unwrap();
        map.attach(ParentRef::Root, group).unwrap();
        map.attach(ParentRef::Group(group.id()), vector).unwrap();

        assert_eq!(map.root_layers(), &[tile, group]);
        assert_eq!(map.group_children(group.id()).unwrap(), &[vector]);
    }

    #[test]
    fn attach_and_detach_are_idempotent() {
        let mut map = MapScene::default();
        let tile = map.create_layer(LayerKind::Tile, LayerProps::default());

        map.attach(ParentRef::Root, tile).unwrap();
        map.attach(ParentRef::Root, tile).unwrap();
        assert_eq!(map.root_layers().len(), 1);

        map.detach(ParentRef::Root, tile.id()).unwrap();
        map.detach(ParentRef::Root, tile.id()).unwrap();
        assert!(map.root_layers().is_empty());
    }

    #[test]
    fn second_parent_is_rejected() {
        let mut map = MapScene::default();
        let group = map.create_group("g", LayerProps::default());
        let tile = map.create_layer(LayerKind::Tile, LayerProps::default());
        map.attach(ParentRef::Root, tile).unwrap();

        let err = map.attach(ParentRef::Group(group.id()), tile).unwrap_err();
        assert_eq!(
            err,
            SceneError::AlreadyAttached {
                layer: tile.id(),
                parent: ParentRef::Root
            }
        );
        assert_eq!(map.parents_of(tile.id()), vec![ParentRef::Root]);
    }

    #[test]
    fn unknown_group_and_foreign_layer_are_errors() {
        let mut map = MapScene::default();
        let mut other = MapScene::default();
        let group = map.create_group("g", LayerProps::default());
        let tile = map.create_layer(LayerKind::Tile, LayerProps::default());
        map.dispose_group(group.id()).unwrap();

        assert_eq!(
            map.attach(ParentRef::Group(group.id()), tile),
            Err(SceneError::UnknownGroup(group.id()))
        );

        other.create_layer(LayerKind::Vector, LayerProps::default());
        let vector = other.create_layer(LayerKind::Vector, LayerProps::default());
        // The same numeric id exists in `map`, but as a tile layer.
        assert_eq!(
            map.attach(ParentRef::Root, vector),
            Err(SceneError::UnknownLayer(vector.id()))
        );
    }

    #[test]
    fn groups_cannot_contain_themselves() {
        let mut map = MapScene::default();
        let outer = map.create_group("outer", LayerProps::default());
        let inner = map.create_group("inner", LayerProps::default());
        map.attach(ParentRef::Group(outer.id()), inner).unwrap();

        assert_eq!(
            map.attach(ParentRef::Group(outer.id()), outer),
            Err(SceneError::Cycle(outer.id()))
        );
        assert_eq!(
            map.attach(ParentRef::Group(inner.id()), outer),
            Err(SceneError::Cycle(outer.id()))
        );
    }

    #[test]
    fn detach_from_disposed_group_is_noop() {
        let mut map = MapScene::default();
        let group = map.create_group("g", LayerProps::default());
        let tile = map.create_layer(LayerKind::Tile, LayerProps::default());
        map.attach(ParentRef::Group(group.id()), tile).unwrap();

        let orphans = map.dispose_group(group.id()).unwrap();
        assert_eq!(orphans, vec![tile]);
        assert_eq!(map.detach(ParentRef::Group(group.id()), tile.id()), Ok(()));
        assert!(map.parents_of(tile.id()).is_empty());
    }

    #[test]
    fn dispose_layer_frees_the_record_and_unlinks_it() {
        let mut map = MapScene::default();
        let group = map.create_group("g", LayerProps::default());
        let tile = map.create_layer(LayerKind::Tile, LayerProps::default());
        map.attach(ParentRef::Group(group.id()), tile).unwrap();

        map.dispose_layer(tile.id()).unwrap();
        assert_eq!(map.layer_props(tile.id()), None);
        assert!(map.group_children(group.id()).unwrap().is_empty());
        assert_eq!(
            map.attach(ParentRef::Root, tile),
            Err(SceneError::UnknownLayer(tile.id()))
        );
        assert_eq!(map.dispose_layer(tile.id()), Ok(()));

        map.dispose_layer(group.id()).unwrap();
        assert_eq!(map.group_children(group.id()), None);
    }

    #[test]
    fn render_order_sorts_root_by_z_index_and_keeps_group_list_order() {
        let mut map = MapScene::default();
        let group = map.create_group("g", LayerProps::default().with_z_index(5));
        let base = map.create_layer(LayerKind::Tile, LayerProps::default().with_z_index(0));
        let top = map.create_layer(LayerKind::Vector, LayerProps::default().with_z_index(10));
        let first = map.create_layer(LayerKind::Vector, LayerProps::default().with_z_index(99));
        let second = map.create_layer(LayerKind::Vector, LayerProps::default().with_z_index(-1));

        map.attach(ParentRef::Root, top).unwrap();
        map.attach(ParentRef::Root, group).unwrap();
        map.attach(ParentRef::Root, base).unwrap();
        map.attach(ParentRef::Group(group.id()), first).unwrap();
        map.attach(ParentRef::Group(group.id()), second).unwrap();

        assert_eq!(map.render_order(), vec![base, first, second, top]);
    }

    #[test]
    fn hidden_layers_and_excluded_layers_are_filtered() {
        let mut map = MapScene::default();
        let hidden = map.create_layer(LayerKind::Tile, LayerProps::default().with_visible(false));
        let sketch = map.create_layer(
            LayerKind::Vector,
            LayerProps::default().with_z_index(2).excluded_from_hit_test(),
        );
        let features = map.create_layer(LayerKind::Vector, LayerProps::default().with_z_index(1));
        let base = map.create_layer(LayerKind::Tile, LayerProps::default());
        for layer in [hidden, sketch, features, base] {
            map.attach(ParentRef::Root, layer).unwrap();
        }

        assert_eq!(map.render_order(), vec![base, features, sketch]);
        assert_eq!(map.hit_test_candidates(), vec![features, base]);
    }

    #[test]
    fn group_lookup_by_name() {
        let mut map = MapScene::default();
        let group = map.create_group("measurements", LayerProps::default());
        assert_eq!(map.group_by_name("measurements"), Some(group));
        assert_eq!(map.group_by_name("missing"), None);
    }
}
