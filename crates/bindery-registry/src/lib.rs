//! Class registration for the bindery binding layer.
//!
//! Core object families describe themselves with [`ClassBuilder`]s grouped
//! into [`Module`]s. Installing a module into a [`ClassRegistry`] resolves
//! base classes, checks for duplicates and reads parameter defaults, after
//! which entries never change.
//!
//! ```text
//! ClassBuilder -> Module -> ClassRegistry::install() -> Rc<ClassEntry>
//! ```

mod class_builder;
mod error;
mod module;
mod registry;

pub use class_builder::ClassBuilder;
pub use error::RegistrationError;
pub use module::{ClassDecl, Module};
pub use registry::ClassRegistry;
