//! Persistence layer: client-resident flags that survive reloads.

pub mod flags;
pub mod libsql_backend;
pub mod memory;
mod migrations;
pub mod traits;

pub use flags::{Flags, keys};
pub use libsql_backend::LibSqlFlagStore;
pub use memory::MemoryFlagStore;
pub use traits::FlagStore;
