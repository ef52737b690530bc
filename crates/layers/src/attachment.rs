use scene::{LayerHandle, LayerHost, ParentRef, SceneError};
use tracing::{debug, warn};

/// What a UI node wants attached: this layer, under this parent.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayerDescriptor {
    pub layer: LayerHandle,
    pub parent: ParentRef,
}

impl LayerDescriptor {
    pub fn new(layer: LayerHandle, parent: ParentRef) -> Self {
        Self { layer, parent }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttachmentAction {
    Detach(LayerDescriptor),
    Attach(LayerDescriptor),
}

/// Actions that move the engine from `prev` to `current`.
///
/// Ordering contract:
/// - A change of layer or parent yields `Detach(prev)` strictly before
///   `Attach(current)`, so the layer is never in two lists at once.
/// - Unchanged descriptors yield nothing.
pub fn reconcile(
    prev: Option<LayerDescriptor>,
    current: Option<LayerDescriptor>,
) -> Vec<AttachmentAction> {
    match (prev, current) {
        (None, None) => Vec::new(),
        (None, Some(current)) => vec![AttachmentAction::Attach(current)],
        (Some(prev), None) => vec![AttachmentAction::Detach(prev)],
        (Some(prev), Some(current)) if prev == current => Vec::new(),
        (Some(prev), Some(current)) => vec![
            AttachmentAction::Detach(prev),
            AttachmentAction::Attach(current),
        ],
    }
}

/// The live `(layer, parent)` record of one UI node.
///
/// The record always mirrors what has actually been applied: a failed
/// attach after a successful detach leaves the node unattached.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LayerAttachment {
    record: Option<LayerDescriptor>,
}

impl LayerAttachment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> Option<LayerDescriptor> {
        self.record
    }

    pub fn is_attached(&self) -> bool {
        self.record.is_some()
    }

    pub fn mount<H: LayerHost + ?Sized>(
        &mut self,
        host: &mut H,
        descriptor: LayerDescriptor,
    ) -> Result<(), SceneError> {
        self.sync(host, Some(descriptor))
    }

    pub fn update<H: LayerHost + ?Sized>(
        &mut self,
        host: &mut H,
        descriptor: LayerDescriptor,
    ) -> Result<(), SceneError> {
        self.sync(host, Some(descriptor))
    }

    /// Detaches the current record, if any.
    ///
    /// A parent group that is already gone is not an error here: the layer
    /// cannot be in a list that no longer exists.
    pub fn unmount<H: LayerHost + ?Sized>(&mut self, host: &mut H) -> Result<(), SceneError> {
        match self.sync(host, None) {
            Err(SceneError::UnknownGroup(group)) => {
                warn!(group = group.0, "unmount: parent group already torn down");
                self.record = None;
                Ok(())
            }
            other => other,
        }
    }

    fn sync<H: LayerHost + ?Sized>(
        &mut self,
        host: &mut H,
        current: Option<LayerDescriptor>,
    ) -> Result<(), SceneError> {
        for action in reconcile(self.record, current) {
            apply(host, action)?;
            self.record = match action {
                AttachmentAction::Detach(_) => None,
                AttachmentAction::Attach(d) => Some(d),
            };
        }
        Ok(())
    }
}

pub fn apply<H: LayerHost + ?Sized>(
    host: &mut H,
    action: AttachmentAction,
) -> Result<(), SceneError> {
    match action {
        AttachmentAction::Detach(d) => {
            debug!(layer = d.layer.id().0, parent = %d.parent, "detach");
            host.detach(d.parent, d.layer.id())
        }
        AttachmentAction::Attach(d) => {
            debug!(layer = d.layer.id().0, parent = %d.parent, "attach");
            host.attach(d.parent, d.layer)
        }
    }
}
