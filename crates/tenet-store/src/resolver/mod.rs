//! Backing store resolvers.

mod memory;
mod sqlite;
mod state;
mod traits;

pub use memory::InMemoryResolver;
pub use sqlite::SqliteResolver;
pub use state::{StoreHealth, StoreState};
pub use traits::PropertyResolver;
