//! Keeps engine layers in sync with a declarative UI tree.
//!
//! UI nodes mount, update and unmount in any order across siblings. Each
//! node owns at most one layer handle and a [`LayerAttachment`] that
//! reconciles `(layer, parent)` against the engine's layer lists.

pub mod attachment;
pub mod group;
pub mod layer;
pub mod parent;
pub mod raster;
pub mod vector;

pub use attachment::*;
pub use group::*;
pub use layer::*;
pub use parent::*;
pub use raster::*;
pub use vector::*;
