pub mod handles;
pub mod ids;
pub mod math;

// Foundation crate: small, well-tested primitives only.
pub use handles::*;
pub use ids::*;
