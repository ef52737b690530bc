use scene::{LayerHandle, LayerHost, LayerKind, LayerProps, ParentRef, SceneError};
use tracing::debug;

use crate::attachment::{LayerAttachment, LayerDescriptor};

/// A UI node that owns at most one engine layer.
pub trait LayerNode {
    fn handle(&self) -> Option<LayerHandle>;
    fn attachment(&self) -> &LayerAttachment;
    /// Detaches the layer. Safe after a failed or partial render.
    fn unmount(&mut self, host: &mut dyn LayerHost) -> Result<(), SceneError>;
}

/// Layer handle tied to a source identity.
///
/// The handle survives re-renders while `source` and `kind` stay equal; only
/// props are pushed. A new source or kind creates a fresh layer, and the
/// attachment swaps the old one out (detach first).
#[derive(Debug, Clone)]
pub struct SourcedLayer<S> {
    source: Option<S>,
    handle: Option<LayerHandle>,
    attachment: LayerAttachment,
}

impl<S> Default for SourcedLayer<S> {
    fn default() -> Self {
        Self {
            source: None,
            handle: None,
            attachment: LayerAttachment::new(),
        }
    }
}

impl<S: Clone + PartialEq + std::fmt::Debug> SourcedLayer<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn handle(&self) -> Option<LayerHandle> {
        self.handle
    }

    pub fn attachment(&self) -> &LayerAttachment {
        &self.attachment
    }

    pub fn render<H: LayerHost + ?Sized>(
        &mut self,
        host: &mut H,
        source: &S,
        kind: LayerKind,
        props: LayerProps,
        parent: ParentRef,
    ) -> Result<LayerHandle, SceneError> {
        let (handle, replaced) = match self.handle {
            Some(h) if h.kind() == kind && self.source.as_ref() == Some(source) => {
                host.set_layer_props(h.id(), props)?;
                (h, None)
            }
            previous => {
                let h = host.create_layer(kind, props);
                debug!(
                    layer = h.id().0,
                    replaces = previous.map(|p| p.id().0),
                    ?source,
                    "created layer for source"
                );
                self.handle = Some(h);
                self.source = Some(source.clone());
                (h, previous)
            }
        };
        let attached = self
            .attachment
            .update(host, LayerDescriptor::new(handle, parent));
        if let Some(old) = replaced {
            // Keep the old layer while the record still points at it.
            if self.attachment.record().map(|r| r.layer) != Some(old) {
                host.dispose_layer(old.id())?;
            }
        }
        attached?;
        Ok(handle)
    }

    /// Detaches and frees the layer. A later render starts from scratch.
    pub fn unmount<H: LayerHost + ?Sized>(&mut self, host: &mut H) -> Result<(), SceneError> {
        self.attachment.unmount(host)?;
        self.source = None;
        if let Some(handle) = self.handle.take() {
            host.dispose_layer(handle.id())?;
        }
        Ok(())
    }
}
