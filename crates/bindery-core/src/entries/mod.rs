//! Registry entry types.
//!
//! - [`ClassEntry`]: a registered class, its lineage and factory
//! - [`ParameterDescriptor`]: one whitelisted, typed attribute
//! - [`MethodEntry`]: one keyword-dispatched method

mod class;
mod method;
mod parameter;

pub use class::ClassEntry;
pub use method::MethodEntry;
pub use parameter::{Family, ParameterDescriptor};
