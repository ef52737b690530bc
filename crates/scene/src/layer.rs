use serde::{Deserialize, Serialize};

use crate::error::SceneError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Tile,
    Vector,
    /// Vector features rasterized to an image per frame.
    VectorImage,
    /// Container with its own ordered child list.
    Group,
}

/// Opaque handle to one layer. Identity is the id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerHandle {
    id: LayerId,
    kind: LayerKind,
}

impl LayerHandle {
    pub fn new(id: LayerId, kind: LayerKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn is_group(&self) -> bool {
        self.kind == LayerKind::Group
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerProps {
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
    /// Keeps the layer out of pointer hit-testing.
    pub hit_test_excluded: bool,
}

impl Default for LayerProps {
    fn default() -> Self {
        Self {
            z_index: 0,
            opacity: 1.0,
            visible: true,
            hit_test_excluded: false,
        }
    }
}

impl LayerProps {
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn excluded_from_hit_test(mut self) -> Self {
        self.hit_test_excluded = true;
        self
    }
}

/// Where a layer lives: the map's root list or a group's child list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ParentRef {
    #[default]
    Root,
    Group(LayerId),
}

impl ParentRef {
    pub fn group(group: LayerHandle) -> Result<Self, SceneError> {
        if group.is_group() {
            Ok(ParentRef::Group(group.id()))
        } else {
            Err(SceneError::UnknownGroup(group.id()))
        }
    }
}

impl std::fmt::Display for ParentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParentRef::Root => write!(f, "root"),
            ParentRef::Group(id) => write!(f, "group {}", id.0),
        }
    }
}

/// Mutable ordered layer lists owned by the engine.
///
/// `attach`/`detach` are idempotent: attaching to the list that already holds
/// the layer and detaching an absent layer are both `Ok(())`.
pub trait LayerHost {
    fn create_layer(&mut self, kind: LayerKind, props: LayerProps) -> LayerHandle;
    fn create_group(&mut self, name: &str, props: LayerProps) -> LayerHandle;
    /// Tears a group down; its children are left unattached and returned.
    fn dispose_group(&mut self, group: LayerId) -> Result<Vec<LayerHandle>, SceneError>;
    /// Frees a leaf layer, removing it from any list still holding it.
    /// Unknown ids are a no-op; groups go through `dispose_group`.
    fn dispose_layer(&mut self, layer: LayerId) -> Result<(), SceneError>;
    fn set_layer_props(&mut self, layer: LayerId, props: LayerProps) -> Result<(), SceneError>;
    fn attach(&mut self, parent: ParentRef, layer: LayerHandle) -> Result<(), SceneError>;
    fn detach(&mut self, parent: ParentRef, layer: LayerId) -> Result<(), SceneError>;
}
