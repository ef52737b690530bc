//! In-memory map scene and the engine surface the UI bridge talks to.
//!
//! The bridge never reaches into engine internals. It sees:
//! - [`LayerHost`]: ordered root/group layer lists.
//! - [`ViewControl`]: rotation, interaction lock, settle animation.
//! - [`PointerSource`]: pointer listeners keyed by [`ListenerKey`](runtime::ListenerKey).
//! - [`TargetSource`]/[`EventTarget`]: the DOM element the map renders into.
//!
//! [`MapScene`], [`View`], [`MapHandle`] and [`DomElement`] implement that
//! surface in memory; tests use them as the engine double.

pub mod dom;
pub mod error;
pub mod instance;
pub mod layer;
pub mod map;
pub mod pointer;
pub mod view;

pub use dom::*;
pub use error::*;
pub use instance::*;
pub use layer::*;
pub use map::*;
pub use pointer::*;
pub use view::*;
