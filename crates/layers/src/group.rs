use scene::{LayerHandle, LayerHost, LayerProps, ParentRef, SceneError};
use tracing::debug;

use crate::attachment::{LayerAttachment, LayerDescriptor};
use crate::layer::LayerNode;
use crate::parent::UiAncestor;

/// UI node for a named layer group.
///
/// The group is created on first render and lives until unmount, which
/// detaches it and then disposes it. Children may unmount afterwards; their
/// detach from the disposed group is a no-op.
#[derive(Debug, Clone, Default)]
pub struct GroupLayerNode {
    handle: Option<LayerHandle>,
    attachment: LayerAttachment,
}

impl GroupLayerNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ancestry entry for this node's children, once the group exists.
    pub fn scope(&self) -> UiAncestor {
        match self.handle {
            Some(h) => UiAncestor::LayerGroup(h.id()),
            None => UiAncestor::Other,
        }
    }

    pub fn render<H: LayerHost + ?Sized>(
        &mut self,
        host: &mut H,
        name: &str,
        props: LayerProps,
        parent: ParentRef,
    ) -> Result<LayerHandle, SceneError> {
        let handle = match self.handle {
            Some(h) => {
                host.set_layer_props(h.id(), props)?;
                h
            }
            None => {
                let h = host.create_group(name, props);
                debug!(group = h.id().0, name, "created layer group");
                self.handle = Some(h);
                h
            }
        };
        self.attachment
            .update(host, LayerDescriptor::new(handle, parent))?;
        Ok(handle)
    }
}

impl LayerNode for GroupLayerNode {
    fn handle(&self) -> Option<LayerHandle> {
        self.handle
    }

    fn attachment(&self) -> &LayerAttachment {
        &self.attachment
    }

    fn unmount(&mut self, host: &mut dyn LayerHost) -> Result<(), SceneError> {
        self.attachment.unmount(host)?;
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match host.dispose_group(handle.id()) {
            Ok(orphans) => {
                debug!(group = handle.id().0, orphans = orphans.len(), "group unmounted");
                Ok(())
            }
            Err(SceneError::UnknownGroup(_)) => Ok(()),
            Err(err) => Err(err),
        }
    }
}
