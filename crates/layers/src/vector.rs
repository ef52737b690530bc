use scene::{LayerHandle, LayerHost, LayerKind, LayerProps, ParentRef, SceneError};
use serde::{Deserialize, Serialize};

use crate::attachment::LayerAttachment;
use crate::layer::{LayerNode, SourcedLayer};

/// Feature collection identity. Editing features in place does not change
/// it; loading a different dataset does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VectorSource {
    pub dataset: String,
}

impl VectorSource {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorRenderMode {
    /// Features re-rendered as vectors every frame.
    #[default]
    Vector,
    /// Features rendered to an image; cheaper while the view animates.
    Image,
}

impl VectorRenderMode {
    pub fn layer_kind(self) -> LayerKind {
        match self {
            VectorRenderMode::Vector => LayerKind::Vector,
            VectorRenderMode::Image => LayerKind::VectorImage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorLayerProps {
    pub source: VectorSource,
    #[serde(default)]
    pub render_mode: VectorRenderMode,
    #[serde(flatten)]
    pub layer: LayerProps,
}

/// UI node for a vector or vector-image layer.
#[derive(Debug, Clone, Default)]
pub struct VectorLayerNode {
    inner: SourcedLayer<VectorSource>,
}

impl VectorLayerNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&VectorSource> {
        self.inner.source()
    }

    pub fn render<H: LayerHost + ?Sized>(
        &mut self,
        host: &mut H,
        props: &VectorLayerProps,
        parent: ParentRef,
    ) -> Result<LayerHandle, SceneError> {
        self.inner.render(
            host,
            &props.source,
            props.render_mode.layer_kind(),
            props.layer,
            parent,
        )
    }
}

impl LayerNode for VectorLayerNode {
    fn handle(&self) -> Option<LayerHandle> {
        self.inner.handle()
    }

    fn attachment(&self) -> &LayerAttachment {
        self.inner.attachment()
    }

    fn unmount(&mut self, host: &mut dyn LayerHost) -> Result<(), SceneError> {
        self.inner.unmount(host)
    }
}
