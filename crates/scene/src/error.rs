use crate::layer::{LayerId, ParentRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The handle was not created by this scene (or was disposed).
    UnknownLayer(LayerId),
    /// The group does not exist (never created or already disposed).
    UnknownGroup(LayerId),
    /// The layer is live in a different parent.
    AlreadyAttached { layer: LayerId, parent: ParentRef },
    /// Attaching the group would make it its own ancestor.
    Cycle(LayerId),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::UnknownLayer(id) => write!(f, "unknown layer {}", id.0),
            SceneError::UnknownGroup(id) => write!(f, "unknown layer group {}", id.0),
            SceneError::AlreadyAttached { layer, parent } => {
                write!(f, "layer {} is already attached to {parent}", layer.0)
            }
            SceneError::Cycle(id) => write!(f, "layer group {} cannot contain itself", id.0),
        }
    }
}

impl std::error::Error for SceneError {}
