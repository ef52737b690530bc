//! Input plumbing between a map instance and UI nodes.
//!
//! - [`pointer`]: geographic pointer callbacks that follow map/event-type changes.
//! - [`dom`]: DOM listeners that follow the map's rendering target.
//! - [`drag_rotate`]: button-specific drag gesture that spins the view.
//! - [`config`]: serde-loaded settings for the above.

pub mod config;
pub mod dom;
pub mod drag_rotate;
pub mod pointer;

pub use config::*;
pub use dom::*;
pub use drag_rotate::*;
pub use pointer::*;
