//! Signal generation: classifier, formatter and the engine tying them together.

pub mod classifier;
pub mod engine;
pub mod formatter;

pub use classifier::*;
pub use engine::*;
pub use formatter::*;
