use scene::{LayerHandle, LayerHost, LayerKind, LayerProps, ParentRef, SceneError};
use serde::{Deserialize, Serialize};

use crate::attachment::LayerAttachment;
use crate::layer::{LayerNode, SourcedLayer};

/// XYZ tile source. Two sources are the same data iff they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSource {
    /// e.g. `https://tile.openstreetmap.org/{z}/{x}/{y}.png`
    pub url_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl TileSource {
    pub fn new(url_template: impl Into<String>) -> Self {
        Self {
            url_template: url_template.into(),
            attribution: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerProps {
    pub source: TileSource,
    #[serde(flatten)]
    pub layer: LayerProps,
}

/// UI node for a raster tile layer.
#[derive(Debug, Clone, Default)]
pub struct TileLayerNode {
    inner: SourcedLayer<TileSource>,
}

impl TileLayerNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&TileSource> {
        self.inner.source()
    }

    pub fn render<H: LayerHost + ?Sized>(
        &mut self,
        host: &mut H,
        props: &TileLayerProps,
        parent: ParentRef,
    ) -> Result<LayerHandle, SceneError> {
        self.inner
            .render(host, &props.source, LayerKind::Tile, props.layer, parent)
    }
}

impl LayerNode for TileLayerNode {
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
