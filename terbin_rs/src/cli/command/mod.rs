//! Command descriptors, the alias table and the registry.
//!
//! - `types`: [`CommandSpec`] and the [`RunFn`] signature
//! - `aliases`: [`AliasTable`]
//! - `registry`: [`Registry`] (discover / register / lookup / all)
//! - `help`: per-command usage text

mod aliases;
pub mod help;
mod registry;
mod types;

pub use aliases::AliasTable;
pub use registry::{Registry, RegistryError};
pub use types::{CommandSpec, RunFn};
